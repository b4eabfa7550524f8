use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use storefront_types::domain::order::{Customer, NewOrder, Order, OrderLine, OrderStatus};
use storefront_types::domain::product::{NewProduct, Product, ProductId};
use storefront_types::ports::catalog_repository::CatalogRepository;
use storefront_types::ports::order_repository::{OrderRepository, RepoError};
use uuid::Uuid;

const MIGRATIONS: [&str; 4] = [
    include_str!("../migrations/0001_create_products.sql"),
    include_str!("../migrations/0002_create_orders.sql"),
    include_str!("../migrations/0003_create_order_items.sql"),
    include_str!("../migrations/0004_index_order_items.sql"),
];

const ORDER_COLUMNS: &str =
    "id, order_number, full_name, email, phone, address, city, state, zip, status, created_at";
const ITEM_COLUMNS: &str = "order_id, product_id, title, unit_price, variant, quantity";

#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

fn db_err(e: impl std::fmt::Display) -> RepoError {
    RepoError::DbError(e.to_string())
}

// Fixed width so that text order matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(FromRow)]
struct DbProduct {
    id: i64,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    price: String,
    inventory: i64,
    variant_options: String,
}

impl DbProduct {
    fn into_product(self) -> Result<Product, RepoError> {
        Ok(Product {
            id: self.id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            price: Decimal::from_str(&self.price).map_err(db_err)?,
            inventory: u32::try_from(self.inventory).map_err(db_err)?,
            variant_options: serde_json::from_str(&self.variant_options).map_err(db_err)?,
        })
    }
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    order_number: String,
    full_name: String,
    email: String,
    phone: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    status: String,
    created_at: String,
}

impl DbOrder {
    fn into_order(self, items: Vec<OrderLine>) -> Result<Order, RepoError> {
        let status = OrderStatus::from_str(&self.status).map_err(db_err)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(db_err)?
            .with_timezone(&Utc);
        let order_number = Uuid::parse_str(&self.order_number).map_err(db_err)?;
        Ok(Order {
            id: self.id,
            order_number,
            customer: Customer {
                full_name: self.full_name,
                email: self.email,
                phone: self.phone,
                address: self.address,
                city: self.city,
                state: self.state,
                zip: self.zip,
            },
            status,
            created_at,
            items,
        })
    }
}

#[derive(FromRow)]
struct DbOrderItem {
    order_id: i64,
    product_id: i64,
    title: String,
    unit_price: String,
    variant: String,
    quantity: i64,
}

impl DbOrderItem {
    fn into_line(self) -> Result<OrderLine, RepoError> {
        Ok(OrderLine {
            product_id: self.product_id,
            title: self.title,
            unit_price: Decimal::from_str(&self.unit_price).map_err(db_err)?,
            variant: serde_json::from_str(&self.variant).map_err(db_err)?,
            quantity: u32::try_from(self.quantity).map_err(db_err)?,
        })
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        for ddl in MIGRATIONS {
            sqlx::query(ddl).execute(&pool).await?;
        }
        tracing::debug!(url = database_url, "sqlite store ready");

        Ok(Self { pool })
    }

    async fn items_for(&self, order_id: i64) -> Result<Vec<OrderLine>, RepoError> {
        let rows: Vec<DbOrderItem> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ? ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(DbOrderItem::into_line).collect()
    }
}

/// Inventory Adjuster: takes `qty` units from a product if at least that
/// many are in stock. Returns false, changing nothing, when they are not.
async fn decrement_inventory(
    conn: &mut SqliteConnection,
    id: ProductId,
    qty: u32,
) -> Result<bool, RepoError> {
    let res =
        sqlx::query("UPDATE products SET inventory = inventory - ? WHERE id = ? AND inventory >= ?")
            .bind(i64::from(qty))
            .bind(id)
            .bind(i64::from(qty))
            .execute(conn)
            .await
            .map_err(db_err)?;
    Ok(res.rows_affected() == 1)
}

fn insert_err(err: sqlx::Error, order: &NewOrder, product_id: Option<ProductId>) -> RepoError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return RepoError::Conflict(format!(
                "order number {} already exists",
                order.order_number
            ));
        }
        if db.is_foreign_key_violation() {
            if let Some(id) = product_id {
                return RepoError::UnknownProduct(id);
            }
        }
    }
    db_err(err)
}

#[async_trait]
impl CatalogRepository for SqliteRepo {
    async fn create_product(&self, product: NewProduct) -> Result<Product, RepoError> {
        let options = serde_json::to_string(&product.variant_options).map_err(db_err)?;
        let res = sqlx::query(
            "INSERT INTO products (title, description, image_url, price, inventory, variant_options)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.price.to_string())
        .bind(i64::from(product.inventory))
        .bind(options)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(product.into_product(res.last_insert_rowid()))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        let row: Option<DbProduct> = sqlx::query_as(
            "SELECT id, title, description, image_url, price, inventory, variant_options FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(DbProduct::into_product).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let rows: Vec<DbProduct> = sqlx::query_as(
            "SELECT id, title, description, image_url, price, inventory, variant_options FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(DbProduct::into_product).collect()
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let created_at = Utc::now().trunc_subsecs(6);
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let order_id = sqlx::query(
            "INSERT INTO orders (order_number, full_name, email, phone, address, city, state, zip, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.order_number.to_string())
        .bind(&order.customer.full_name)
        .bind(&order.customer.email)
        .bind(&order.customer.phone)
        .bind(&order.customer.address)
        .bind(&order.customer.city)
        .bind(&order.customer.state)
        .bind(&order.customer.zip)
        .bind(order.status.as_str())
        .bind(timestamp(created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_err(e, &order, None))?
        .last_insert_rowid();

        for line in &order.items {
            let variant = serde_json::to_string(&line.variant).map_err(db_err)?;
            sqlx::query(&format!(
                "INSERT INTO order_items ({ITEM_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
            ))
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.title)
            .bind(line.unit_price.to_string())
            .bind(variant)
            .bind(i64::from(line.quantity))
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_err(e, &order, Some(line.product_id)))?;
        }

        if order.status.is_approved() {
            for line in &order.items {
                if !decrement_inventory(&mut tx, line.product_id, line.quantity).await? {
                    tx.rollback().await.map_err(db_err)?;
                    return Err(RepoError::InsufficientInventory(line.product_id));
                }
            }
        }

        tx.commit().await.map_err(db_err)?;
        Ok(order.into_order(order_id, created_at))
    }

    async fn get_by_order_number(&self, order_number: Uuid) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?"
        ))
        .bind(order_number.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let items = self.items_for(row.id).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        let rows: Vec<DbOrder> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let item_rows: Vec<DbOrderItem> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items ORDER BY order_id, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut items: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        for row in item_rows {
            let order_id = row.order_id;
            items.entry(order_id).or_default().push(row.into_line()?);
        }

        rows.into_iter()
            .map(|r| {
                let lines = items.remove(&r.id).unwrap_or_default();
                r.into_order(lines)
            })
            .collect::<Result<Vec<_>, _>>()
    }
}
