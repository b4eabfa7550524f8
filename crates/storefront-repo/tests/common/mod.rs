#![allow(dead_code)]

use rust_decimal::Decimal;
use storefront_types::domain::order::{Customer, NewOrder, OrderLine, OrderStatus, Variant};
use storefront_types::domain::product::{NewProduct, Product, ProductId, VariantOptions};
use storefront_types::ports::catalog_repository::CatalogRepository;
use storefront_types::ports::order_repository::{OrderRepository, RepoError};

pub fn customer(name: &str) -> Customer {
    Customer {
        full_name: name.into(),
        email: "test@example.com".into(),
        phone: "5551234567".into(),
        address: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip: "62701".into(),
    }
}

pub fn new_product(title: &str, cents: i64, inventory: u32) -> NewProduct {
    NewProduct {
        title: title.into(),
        description: Some(format!("{title} description")),
        image_url: None,
        price: Decimal::new(cents, 2),
        inventory,
        variant_options: VariantOptions::from([(
            "color".to_string(),
            vec!["Red".to_string(), "Blue".to_string()],
        )]),
    }
}

pub fn line(product: &Product, quantity: u32) -> OrderLine {
    OrderLine::snapshot(
        product,
        Variant::from([("color".to_string(), "Red".to_string())]),
        quantity,
    )
}

pub fn order(status: OrderStatus, items: Vec<OrderLine>) -> NewOrder {
    NewOrder::new(customer("Test"), status, items)
}

pub async fn stock<R: CatalogRepository>(repo: &R, id: ProductId) -> u32 {
    repo.get_product(id).await.unwrap().unwrap().inventory
}

pub async fn catalog_crud<R: CatalogRepository>(repo: R) {
    let first = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    let second = repo.create_product(new_product("Gadget", 250, 0)).await.unwrap();
    assert!(second.id > first.id);

    let fetched = repo.get_product(first.id).await.unwrap().unwrap();
    assert_eq!(fetched, first);
    assert_eq!(fetched.price, Decimal::new(1000, 2));
    assert_eq!(fetched.variant_options["color"], vec!["Red", "Blue"]);

    let listed = repo.list_products().await.unwrap();
    assert_eq!(listed, vec![first, second]);

    assert!(repo.get_product(9_999).await.unwrap().is_none());
}

pub async fn order_round_trip<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    let gadget = repo.create_product(new_product("Gadget", 250, 4)).await.unwrap();
    let new = order(
        OrderStatus::Declined,
        vec![line(&widget, 2), line(&gadget, 1)],
    );

    let created = repo.create(new.clone()).await.unwrap();
    assert_eq!(created.order_number, new.order_number);

    let fetched = repo
        .get_by_order_number(new.order_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.customer, new.customer);
    assert_eq!(fetched.status, OrderStatus::Declined);
    assert_eq!(fetched.items, new.items);
    assert_eq!(fetched.total(), Decimal::new(2250, 2));

    // Declined orders leave stock alone.
    assert_eq!(stock(&repo, widget.id).await, 5);
    assert_eq!(stock(&repo, gadget.id).await, 4);
}

pub async fn approved_order_takes_stock<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    repo.create(order(OrderStatus::Approved, vec![line(&widget, 2)]))
        .await
        .unwrap();
    assert_eq!(stock(&repo, widget.id).await, 3);

    repo.create(order(OrderStatus::Error, vec![line(&widget, 3)]))
        .await
        .unwrap();
    assert_eq!(stock(&repo, widget.id).await, 3);
}

pub async fn short_stock_rolls_back<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    let gadget = repo.create_product(new_product("Gadget", 250, 1)).await.unwrap();
    let new = order(
        OrderStatus::Approved,
        vec![line(&widget, 2), line(&gadget, 2)],
    );

    let err = repo.create(new.clone()).await.unwrap_err();
    assert!(matches!(err, RepoError::InsufficientInventory(id) if id == gadget.id));

    assert!(repo
        .get_by_order_number(new.order_number)
        .await
        .unwrap()
        .is_none());
    assert!(repo.list().await.unwrap().is_empty());
    assert_eq!(stock(&repo, widget.id).await, 5);
    assert_eq!(stock(&repo, gadget.id).await, 1);
}

pub async fn repeated_product_shares_stock<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    let err = repo
        .create(order(
            OrderStatus::Approved,
            vec![line(&widget, 3), line(&widget, 3)],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InsufficientInventory(_)));
    assert_eq!(stock(&repo, widget.id).await, 5);
}

pub async fn unknown_product_persists_nothing<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    let mut ghost = line(&widget, 1);
    ghost.product_id = 9_999;
    let new = order(OrderStatus::Declined, vec![line(&widget, 1), ghost]);

    let err = repo.create(new.clone()).await.unwrap_err();
    assert!(matches!(err, RepoError::UnknownProduct(9_999)), "{err}");
    assert!(repo
        .get_by_order_number(new.order_number)
        .await
        .unwrap()
        .is_none());
    assert!(repo.list().await.unwrap().is_empty());
}

pub async fn duplicate_order_number_conflicts<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 5)).await.unwrap();
    let new = order(OrderStatus::Approved, vec![line(&widget, 1)]);
    repo.create(new.clone()).await.unwrap();

    let err = repo.create(new).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "{err}");
    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert_eq!(stock(&repo, widget.id).await, 4);
}

pub async fn list_is_newest_first<R: CatalogRepository + OrderRepository>(repo: R) {
    let widget = repo.create_product(new_product("Widget", 1000, 50)).await.unwrap();
    let mut numbers = Vec::new();
    for qty in 1..=3 {
        let created = repo
            .create(order(OrderStatus::Approved, vec![line(&widget, qty)]))
            .await
            .unwrap();
        numbers.push(created.order_number);
    }
    numbers.reverse();

    let listed = repo.list().await.unwrap();
    let listed_numbers: Vec<_> = listed.iter().map(|o| o.order_number).collect();
    assert_eq!(listed_numbers, numbers);
    assert_eq!(listed[0].items.len(), 1);
    assert_eq!(listed[0].items[0].quantity, 3);
    assert_eq!(stock(&repo, widget.id).await, 44);
}

pub async fn last_unit_goes_to_one_buyer<R>(repo: R)
where
    R: CatalogRepository + OrderRepository + Clone,
{
    let widget = repo.create_product(new_product("Widget", 1000, 1)).await.unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let repo = repo.clone();
            let new = order(OrderStatus::Approved, vec![line(&widget, 1)]);
            tokio::spawn(async move { repo.create(new).await })
        })
        .collect();

    let mut placed = 0;
    let mut short = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(RepoError::InsufficientInventory(_)) => short += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!((placed, short), (1, 1));
    assert_eq!(stock(&repo, widget.id).await, 0);
    assert_eq!(repo.list().await.unwrap().len(), 1);
}
