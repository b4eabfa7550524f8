use std::sync::Arc;

use storefront_hex::application::catalog_service::CatalogService;
use storefront_hex::application::checkout_service::CheckoutService;
use storefront_hex::config::Config;
use storefront_hex::inbound::http::{HttpServer, HttpServerConfig};
use storefront_hex::outbound::log_notifier::LogNotifier;
use storefront_hex::outbound::payment::{FixedPaymentSimulator, RandomPaymentSimulator};
use storefront_hex::outbound::smtp_notifier::SmtpNotifier;
use storefront_hex::ports::notifier::Notifier;
use storefront_hex::ports::payment_simulator::PaymentSimulator;
use storefront_repo::{build_repo, Repo};

mod seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / MAIL_* when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let repo: Repo = build_repo(config.database_url.as_deref()).await?;

    let payments: Arc<dyn PaymentSimulator> = match config.payment_outcome {
        Some(outcome) => {
            tracing::info!(%outcome, "payment outcome fixed");
            Arc::new(FixedPaymentSimulator::new(outcome))
        }
        None => Arc::new(RandomPaymentSimulator),
    };

    let notifier: Arc<dyn Notifier> = match &config.mail {
        Some(mail) => {
            tracing::info!(host = %mail.host, port = mail.port, "sending order emails over smtp");
            Arc::new(SmtpNotifier::new(mail)?)
        }
        None => Arc::new(LogNotifier),
    };

    let catalog = CatalogService::new(repo.clone());
    if config.seed_catalog {
        catalog.seed_if_empty(seed::demo_catalog()).await?;
    }
    let checkout = CheckoutService::new(repo, payments, notifier);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };
    HttpServer::new(checkout, catalog, server_cfg).run().await
}
