use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    serve, Json, Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::catalog_service::CatalogService;
use crate::application::checkout_service::CheckoutService;
use crate::errors::AppError;
use storefront_types::domain::checkout::{CheckoutPayload, CheckoutReceipt};
use storefront_types::domain::order::Order;
use storefront_types::domain::product::{NewProduct, Product, ProductId};
use storefront_types::ports::catalog_repository::CatalogRepository;
use storefront_types::ports::order_repository::OrderRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct AppState<R>
where
    R: CatalogRepository + OrderRepository,
{
    pub checkout: Arc<CheckoutService<R>>,
    pub catalog: Arc<CatalogService<R>>,
}

impl<R> Clone for AppState<R>
where
    R: CatalogRepository + OrderRepository,
{
    fn clone(&self) -> Self {
        Self {
            checkout: Arc::clone(&self.checkout),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

pub struct HttpServer<R>
where
    R: CatalogRepository + OrderRepository,
{
    pub state: AppState<R>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: CatalogRepository + OrderRepository,
{
    pub fn new(
        checkout: CheckoutService<R>,
        catalog: CatalogService<R>,
        config: HttpServerConfig,
    ) -> Self {
        Self {
            state: AppState {
                checkout: Arc::new(checkout),
                catalog: Arc::new(catalog),
            },
            config,
        }
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            })
            .on_request(|_request: &axum::extract::Request<_>, _span: &tracing::Span| {
                tracing::debug!("request received");
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, _span: &tracing::Span| {
                    tracing::info!(
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route("/products", get(list_products::<R>).post(create_product::<R>))
            .route("/products/{id}", get(get_product::<R>))
            .route("/orders", get(list_orders::<R>))
            .route("/orders/checkout", post(checkout::<R>))
            .route("/orders/{order_number}", get(get_order::<R>))
            .layer(trace_layer)
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn list_products<R>(State(state): State<AppState<R>>) -> Result<Json<Vec<Product>>, AppError>
where
    R: CatalogRepository + OrderRepository,
{
    Ok(Json(state.catalog.list_products().await?))
}

async fn create_product<R>(
    State(state): State<AppState<R>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError>
where
    R: CatalogRepository + OrderRepository,
{
    let created = state.catalog.create_product(json_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_product<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError>
where
    R: CatalogRepository + OrderRepository,
{
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(state.catalog.get_product(id).await?))
}

async fn checkout<R>(
    State(state): State<AppState<R>>,
    body: Result<Json<CheckoutPayload>, JsonRejection>,
) -> Result<Json<CheckoutReceipt>, AppError>
where
    R: CatalogRepository + OrderRepository,
{
    let (request, card) = json_body(body)?.into_parts();
    card.validate(Utc::now().date_naive())?;
    let receipt = state.checkout.checkout(request).await?;
    Ok(Json(receipt))
}

async fn list_orders<R>(State(state): State<AppState<R>>) -> Result<Json<Vec<Order>>, AppError>
where
    R: CatalogRepository + OrderRepository,
{
    Ok(Json(state.checkout.list_orders().await?))
}

async fn get_order<R>(
    State(state): State<AppState<R>>,
    Path(order_number): Path<String>,
) -> Result<Json<Order>, AppError>
where
    R: CatalogRepository + OrderRepository,
{
    let uuid = Uuid::parse_str(&order_number)
        .map_err(|_| AppError::NotFound(format!("order {order_number}")))?;
    Ok(Json(state.checkout.get_order(uuid).await?))
}
