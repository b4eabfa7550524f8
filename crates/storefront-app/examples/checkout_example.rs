///  To run :
///  cargo r --example checkout_example
use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::SecretString;
use storefront_client::StorefrontClient;
use storefront_hex::application::catalog_service::CatalogService;
use storefront_hex::application::checkout_service::CheckoutService;
use storefront_hex::inbound::http::{HttpServer, HttpServerConfig};
use storefront_hex::outbound::log_notifier::LogNotifier;
use storefront_hex::outbound::payment::FixedPaymentSimulator;
use storefront_repo::build_repo;
use storefront_types::domain::checkout::{CheckoutItem, CheckoutPayload};
use storefront_types::domain::order::{Customer, OrderStatus, Variant};
use storefront_types::domain::payment::PaymentCard;
use storefront_types::domain::product::{NewProduct, VariantOptions};
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn payload(product_id: i64, quantity: u32) -> CheckoutPayload {
    CheckoutPayload {
        customer: Customer {
            full_name: "Example Buyer".into(),
            email: "buyer@example.com".into(),
            phone: "555-010-2030".into(),
            address: "10 Market St".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            zip: "94103".into(),
        },
        payment: PaymentCard {
            card_number: SecretString::from("4242 4242 4242 4242".to_string()),
            expiry: "12/99".into(),
            cvv: SecretString::from("321".to_string()),
        },
        items: vec![CheckoutItem {
            product_id,
            variant: Variant::from([("size".to_string(), "M".to_string())]),
            quantity,
        }],
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // File-backed SQLite so every pooled connection sees the same data.
    let tmp = tempdir()?;
    let db_url = format!("sqlite://{}", tmp.path().join("storefront.db").display());

    let repo = build_repo(Some(&db_url)).await?;
    let checkout = CheckoutService::new(
        repo.clone(),
        Arc::new(FixedPaymentSimulator::new(OrderStatus::Approved)),
        Arc::new(LogNotifier),
    );
    let server = HttpServer::new(
        checkout,
        CatalogService::new(repo),
        HttpServerConfig {
            port: port.to_string(),
        },
    );

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = StorefrontClient::new(&addr)?;
    let shirt = client
        .create_product(&NewProduct {
            title: "T-Shirt".into(),
            description: Some("Cotton tee".into()),
            image_url: None,
            price: Decimal::new(1999, 2),
            inventory: 3,
            variant_options: VariantOptions::from([(
                "size".to_string(),
                vec!["S".to_string(), "M".to_string(), "L".to_string()],
            )]),
        })
        .await?;
    println!("Created product id={} inventory={}", shirt.id, shirt.inventory);

    let receipt = client.checkout(&payload(shirt.id, 2)).await?;
    println!("Order {} is {}", receipt.order_number, receipt.status);

    let order = client.get_order(receipt.order_number).await?;
    println!("Order total={} lines={}", order.total(), order.items.len());
    assert_eq!(order.total(), Decimal::new(3998, 2));

    let shirt = client.get_product(shirt.id).await?;
    println!("Remaining inventory={}", shirt.inventory);
    assert_eq!(shirt.inventory, 1);

    // Asking for more than is left is refused with 400.
    match client.checkout(&payload(shirt.id, 2)).await {
        Ok(r) => anyhow::bail!("unexpected order {}", r.order_number),
        Err(err) => {
            let status = err.downcast_ref::<reqwest::Error>().and_then(|e| e.status());
            assert_eq!(status, Some(StatusCode::BAD_REQUEST));
            println!("Second checkout refused: {err}");
        }
    }

    println!("Orders on file: {}", client.list_orders().await?.len());

    handle.abort();
    Ok(())
}
