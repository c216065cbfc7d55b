use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Json, Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use super::common::{
    created_response, json_body, no_content_response, path_param, success_response,
    validate_input,
};
use crate::entities::customer::Model as Customer;
use crate::errors::ServiceError;
use crate::repositories::customer_repository::normalize_id;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CountryFilter {
    pub country: Option<String>,
}

/// GET /api/customers[?country=X]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(filter): Query<CountryFilter>,
) -> Result<Response, ServiceError> {
    let customers = match filter.country.as_deref().filter(|c| !c.is_empty()) {
        Some(country) => state.customers.retrieve_by_country(country).await?,
        None => state.customers.retrieve_all().await?,
    };
    Ok(success_response(customers))
}

/// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = normalize_id(&path_param(id)?);
    let customer = state
        .customers
        .retrieve(&id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))?;
    Ok(success_response(customer))
}

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let customer = json_body(payload)?;
    validate_input(&customer)?;

    let created = state.customers.create(customer).await?;
    let location = format!("/api/customers/{}", created.customer_id);
    Ok(created_response(&location, created))
}

/// PUT /api/customers/:id
pub async fn update_customer(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = normalize_id(&path_param(id)?);
    let customer = json_body(payload)?;

    if customer.customer_id != id {
        debug!(route_id = %id, body_id = %customer.customer_id, "customer id mismatch");
        return Err(ServiceError::BadRequest(format!(
            "Route ID {} does not match customer ID {}",
            id, customer.customer_id
        )));
    }
    validate_input(&customer)?;

    if !state.customers.exists(&id).await? {
        return Err(ServiceError::NotFound(format!(
            "Customer with ID {} not found",
            id
        )));
    }

    let updated = state.customers.update(&id, customer).await?;
    Ok(success_response(updated))
}

/// DELETE /api/customers/:id
pub async fn delete_customer(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = path_param(id)?;
    state.customers.delete(&id).await?;
    Ok(no_content_response())
}

/// GET /api/customers/:id/orders
pub async fn get_customer_orders(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = normalize_id(&path_param(id)?);
    if !state.customers.exists(&id).await? {
        return Err(ServiceError::NotFound(format!(
            "Customer with ID {} not found",
            id
        )));
    }
    let orders = state.orders.find_by_customer(&id).await?;
    Ok(success_response(orders))
}
