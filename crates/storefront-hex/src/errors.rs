use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storefront_types::domain::product::ProductId;
use storefront_types::domain::validation::ValidationError;
use storefront_types::ports::order_repository::RepoError;
use thiserror::Error;

/// Why a checkout was refused. Nothing has been written when any of these
/// is returned.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error("Insufficient inventory for product {title}")]
    InsufficientInventory { product_id: ProductId, title: String },

    #[error("could not persist order: {0}")]
    Persistence(#[source] RepoError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InsufficientInventory(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        let message = e.to_string();
        match e {
            CheckoutError::Invalid(v) => AppError::Validation(v),
            CheckoutError::ProductNotFound(_) => AppError::NotFound(message),
            CheckoutError::InsufficientInventory { .. } => AppError::InsufficientInventory(message),
            CheckoutError::Persistence(err) => AppError::Internal(
                anyhow::Error::new(err).context("checkout could not be persisted"),
            ),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, error, field) = match &self {
            AppError::Validation(v) => (StatusCode::BAD_REQUEST, v.to_string(), Some(v.field.clone())),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone(), None),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone(), None),
            AppError::InsufficientInventory(m) => (StatusCode::BAD_REQUEST, m.clone(), None),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into(), None)
            }
        };

        let body = serde_json::to_string(&ErrorBody { error, field })
            .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
