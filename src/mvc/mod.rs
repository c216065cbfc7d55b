//! HTML front end.
//!
//! Products, categories and the home page read the store through
//! [`ProductRepository`]; customer pages go through the service with
//! [`NorthwindServiceClient`].

pub mod customers;
pub mod home;
pub mod products;
pub mod views;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tracing::{error, warn};

use crate::client::NorthwindServiceClient;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::health::{health_routes, HasDb};
use crate::middleware_helpers::{log_matched_route, request_id_middleware};
use crate::repositories::ProductRepository;

/// Shared state of the MVC application
#[derive(Clone)]
pub struct MvcState {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub products: Arc<ProductRepository>,
    pub service: NorthwindServiceClient,
}

impl MvcState {
    /// Builds the state, including the named client, from configuration.
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Result<Self, ServiceError> {
        let service = NorthwindServiceClient::from_config(&config)?;
        Ok(Self::with_client(db, config, service))
    }

    pub fn with_client(db: Arc<DbPool>, config: AppConfig, service: NorthwindServiceClient) -> Self {
        Self {
            products: Arc::new(ProductRepository::new(db.clone())),
            db,
            config: Arc::new(config),
            service,
        }
    }
}

impl HasDb for MvcState {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Failure of an MVC action.
#[derive(Debug)]
pub enum MvcError {
    /// Plain-text 404, with an optional explanation
    NotFound(Option<String>),
    Service(ServiceError),
}

impl From<ServiceError> for MvcError {
    fn from(err: ServiceError) -> Self {
        MvcError::Service(err)
    }
}

impl IntoResponse for MvcError {
    fn into_response(self) -> Response {
        match self {
            MvcError::NotFound(message) => not_found(message),
            MvcError::Service(ServiceError::NotFound(message)) => not_found(Some(message)),
            MvcError::Service(err) => {
                let status = match err.status_code() {
                    StatusCode::CONFLICT => StatusCode::CONFLICT,
                    status if status.is_server_error() => status,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    error!(error = %err, "MVC request failed");
                } else {
                    warn!(error = %err, "MVC request rejected");
                }
                let request_id = crate::tracing::current_request_id();
                let page = views::error_page(
                    request_id.as_ref().map(|id| id.as_str()),
                    &err.response_message(),
                );
                (status, page).into_response()
            }
        }
    }
}

fn not_found(message: Option<String>) -> Response {
    match message {
        Some(message) => (StatusCode::NOT_FOUND, message).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fallback() -> MvcError {
    MvcError::NotFound(None)
}

/// Every MVC route, without middleware
pub fn mvc_routes() -> Router<MvcState> {
    Router::new()
        .merge(home::routes())
        .merge(customers::routes())
        .merge(products::routes())
        .merge(health_routes::<MvcState>())
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
}

/// The MVC application with its middleware stack
pub fn mvc_router(state: MvcState) -> Router {
    mvc_routes()
        .fallback(fallback)
        .route_layer(middleware::from_fn(log_matched_route))
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
