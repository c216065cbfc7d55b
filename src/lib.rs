//! Northwind
//!
//! A JSON service over the Northwind store and an HTML front end that reads
//! products directly and customers through the service.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod listing;
pub mod middleware_helpers;
pub mod migrator;
pub mod mvc;
pub mod repositories;
pub mod seed;
pub mod tracing;
pub mod validation;

use axum::{middleware, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

use crate::health::{health_routes, HasDb};
use crate::repositories::{CustomerRepository, OrderRepository, ProductRepository};

/// Shared state of the JSON service
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<config::AppConfig>,
    pub customers: Arc<CustomerRepository>,
    pub products: Arc<ProductRepository>,
    pub orders: Arc<OrderRepository>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        Self {
            customers: Arc::new(CustomerRepository::new(db.clone())),
            products: Arc::new(ProductRepository::new(db.clone())),
            orders: Arc::new(OrderRepository::new(db.clone())),
            db,
            config: Arc::new(config),
        }
    }
}

impl HasDb for AppState {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Routes of the JSON service, without middleware.
pub fn api_routes() -> Router<AppState> {
    use handlers::{customers, orders, products};

    Router::new()
        .route(
            "/api/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/api/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/api/customers/:id/orders", get(customers::get_customer_orders))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/orders/:id/details", get(orders::get_order_details))
        .merge(health_routes::<AppState>())
}

/// The JSON service with its middleware stack.
pub fn service_router(state: AppState) -> Router {
    api_routes()
        .route_layer(middleware::from_fn(middleware_helpers::log_matched_route))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        // Ensure every request carries a request id for traceability
        .layer(middleware::from_fn(middleware_helpers::request_id_middleware))
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                ::tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    ::tracing::info!("shutdown signal received");
}
