use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Json, Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use super::common::{
    created_response, json_body, no_content_response, path_param, success_response,
};
use crate::entities::product::Model as Product;
use crate::errors::ServiceError;
use crate::validation::check;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    pub category_id: Option<i32>,
}

/// Field constraints plus existence of the referenced category and supplier.
async fn validate_product(state: &AppState, product: &Product) -> Result<(), ServiceError> {
    let mut errors = match check(product) {
        Ok(()) => Default::default(),
        Err(errors) => errors,
    };
    errors.extend(state.products.check_references(product).await?);
    errors.into_result().map_err(ServiceError::ValidationError)
}

/// GET /api/products[?category_id=N]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Response, ServiceError> {
    let products = state.products.list(filter.category_id).await?;
    Ok(success_response(products))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = path_param(id)?;
    let product = state
        .products
        .find(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;
    Ok(success_response(product))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let product = json_body(payload)?;
    validate_product(&state, &product).await?;

    let created = state.products.create(product).await?;
    let location = format!("/api/products/{}", created.product_id);
    Ok(created_response(&location, created))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = path_param(id)?;
    let product = json_body(payload)?;

    if product.product_id != id {
        return Err(ServiceError::BadRequest(format!(
            "Route ID {} does not match product ID {}",
            id, product.product_id
        )));
    }
    validate_product(&state, &product).await?;

    if !state.products.exists(id).await? {
        return Err(ServiceError::NotFound(format!(
            "Product with ID {} not found",
            id
        )));
    }

    let updated = state.products.update(id, product).await?;
    Ok(success_response(updated))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = path_param(id)?;
    state.products.delete(id).await?;
    Ok(no_content_response())
}
