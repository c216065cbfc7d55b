use axum::{
    extract::rejection::PathRejection,
    extract::{Path, State},
    response::Response,
};

use super::common::{path_param, success_response};
use crate::errors::ServiceError;
use crate::AppState;

/// GET /api/orders/:id/details
pub async fn get_order_details(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = path_param(id)?;
    let details = state.orders.order_details(id).await?;
    Ok(success_response(details))
}
