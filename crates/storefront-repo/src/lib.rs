//! Storage adapters for the storefront: Catalog Lookup, Inventory Adjuster
//! and Order Store behind one capability.

#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use storefront_types::domain::order::{NewOrder, Order};
use storefront_types::domain::product::{NewProduct, Product, ProductId};
use storefront_types::ports::catalog_repository::CatalogRepository;
use storefront_types::ports::order_repository::{OrderRepository, RepoError};
use uuid::Uuid;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(all(feature = "sqlite", not(feature = "memory")))]
pub const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db";

/// Store chosen at start-up: SQLite when a database URL is given, the
/// in-memory store otherwise.
#[derive(Clone)]
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            #[cfg(feature = "sqlite")]
            Some(url) => {
                tracing::info!(url, "using sqlite store");
                Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
            }
            #[cfg(not(feature = "sqlite"))]
            Some(url) => anyhow::bail!("database url {url} given but the `sqlite` feature is off"),
            #[cfg(feature = "memory")]
            None => {
                tracing::info!("using in-memory store");
                Ok(Self::Memory(memory::InMemoryRepo::new()))
            }
            #[cfg(not(feature = "memory"))]
            None => {
                tracing::info!(url = DEFAULT_DATABASE_URL, "using sqlite store");
                Ok(Self::Sqlite(
                    sqlite::SqliteRepo::new(DEFAULT_DATABASE_URL).await?,
                ))
            }
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

#[async_trait::async_trait]
impl CatalogRepository for Repo {
    async fn create_product(&self, product: NewProduct) -> Result<Product, RepoError> {
        dispatch!(self, repo => repo.create_product(product).await)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        dispatch!(self, repo => repo.get_product(id).await)
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        dispatch!(self, repo => repo.list_products().await)
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        dispatch!(self, repo => repo.create(order).await)
    }

    async fn get_by_order_number(&self, order_number: Uuid) -> Result<Option<Order>, RepoError> {
        dispatch!(self, repo => repo.get_by_order_number(order_number).await)
    }

    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        dispatch!(self, repo => repo.list().await)
    }
}
