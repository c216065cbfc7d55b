use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{views, MvcError, MvcState};
use crate::entities::customer::Model as Customer;
use crate::errors::ServiceError;
use crate::listing::filter_and_sort;
use crate::repositories::customer_repository::normalize_id;
use crate::validation::{check, FieldErrors};

const INDEX: &str = "/Customers";

pub fn routes() -> Router<MvcState> {
    Router::new()
        .route("/Customers", get(index))
        .route("/Customers/Index", get(index))
        .route("/Customers/Customers", get(all_customers))
        .route("/Customers/Details", get(details))
        .route("/Customers/Details/:id", get(details))
        .route("/Customers/Create", get(create_form).post(create))
        .route("/Customers/Edit", get(edit_form))
        .route("/Customers/Edit/:id", get(edit_form).post(edit))
        .route("/Customers/Delete", get(delete_form))
        .route("/Customers/Delete/:id", get(delete_form).post(delete))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerIndexParams {
    pub country: Option<String>,
    pub sort_order: Option<String>,
    pub search_string: Option<String>,
}

fn blank_customer() -> Customer {
    Customer {
        customer_id: String::new(),
        company_name: String::new(),
        contact_name: None,
        contact_title: None,
        address: None,
        city: None,
        region: None,
        postal_code: None,
        country: None,
        phone: None,
        fax: None,
    }
}

fn route_id(id: Option<Path<String>>) -> Result<String, MvcError> {
    id.map(|Path(raw)| normalize_id(&raw))
        .filter(|id| !id.is_empty())
        .ok_or(MvcError::NotFound(None))
}

async fn fetch(state: &MvcState, id: &str) -> Result<Customer, MvcError> {
    state
        .service
        .get_customer(id)
        .await?
        .ok_or_else(|| MvcError::NotFound(Some(format!("Customer with ID of {} not found.", id))))
}

fn form_page(
    status: StatusCode,
    title: &str,
    action: &str,
    customer: &Customer,
    errors: &FieldErrors,
    id_editable: bool,
) -> Response {
    (
        status,
        views::customer_form(title, action, customer, errors, id_editable),
    )
        .into_response()
}

/// GET /Customers?country=&sortOrder=&searchString=
pub async fn index(
    State(state): State<MvcState>,
    Query(params): Query<CustomerIndexParams>,
) -> Result<Html<String>, MvcError> {
    let country = params.country.unwrap_or_default();
    let search = params.search_string.unwrap_or_default();

    let customers = state
        .service
        .list_customers(Some(country.as_str()).filter(|c| !c.is_empty()))
        .await?;
    let (customers, key) = filter_and_sort(customers, Some(search.as_str()), params.sort_order.as_deref());
    debug!(count = customers.len(), sort = %key.as_param(), "customer list");

    Ok(views::customers_index(&customers, key, &search, &country))
}

/// GET /Customers/Customers?country=
pub async fn all_customers(
    State(state): State<MvcState>,
    Query(params): Query<CustomerIndexParams>,
) -> Result<Html<String>, MvcError> {
    let country = params.country.filter(|c| !c.is_empty());
    let customers = state.service.list_customers(country.as_deref()).await?;
    let title = match country.as_deref() {
        Some(country) => format!("Customers in {}", country),
        None => "All Customers Worldwide".to_string(),
    };
    Ok(views::customers_by_country(&title, &customers))
}

pub async fn details(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = route_id(id)?;
    let customer = fetch(&state, &id).await?;
    Ok(views::customer_details(&customer))
}

pub async fn create_form() -> Html<String> {
    views::customer_form(
        "Create Customer",
        "/Customers/Create",
        &blank_customer(),
        &FieldErrors::new(),
        true,
    )
}

/// POST /Customers/Create
pub async fn create(
    State(state): State<MvcState>,
    Form(customer): Form<Customer>,
) -> Result<Response, MvcError> {
    const TITLE: &str = "Create Customer";
    const ACTION: &str = "/Customers/Create";

    if let Err(errors) = check(&customer) {
        debug!(errors = errors.len(), "customer form rejected");
        return Ok(form_page(StatusCode::BAD_REQUEST, TITLE, ACTION, &customer, &errors, true));
    }

    match state.service.create_customer(&customer).await {
        Ok(created) => {
            info!(customer_id = %created.customer_id, "customer created through service");
            Ok(Redirect::to(INDEX).into_response())
        }
        Err(ServiceError::ValidationError(errors)) => Ok(form_page(
            StatusCode::BAD_REQUEST,
            TITLE,
            ACTION,
            &customer,
            &errors,
            true,
        )),
        Err(ServiceError::Conflict(message)) => {
            let mut errors = FieldErrors::new();
            errors.push("customer_id", message);
            Ok(form_page(StatusCode::CONFLICT, TITLE, ACTION, &customer, &errors, true))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit_form(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = route_id(id)?;
    let customer = fetch(&state, &id).await?;
    Ok(views::customer_form(
        "Edit Customer",
        &format!("/Customers/Edit/{}", id),
        &customer,
        &FieldErrors::new(),
        false,
    ))
}

/// POST /Customers/Edit/:id
pub async fn edit(
    State(state): State<MvcState>,
    Path(id): Path<String>,
    Form(customer): Form<Customer>,
) -> Result<Response, MvcError> {
    let id = normalize_id(&id);
    if customer.customer_id != id {
        warn!(route_id = %id, form_id = %customer.customer_id, "customer id mismatch");
        return Err(MvcError::NotFound(None));
    }

    let action = format!("/Customers/Edit/{}", id);
    if let Err(errors) = check(&customer) {
        return Ok(form_page(
            StatusCode::BAD_REQUEST,
            "Edit Customer",
            &action,
            &customer,
            &errors,
            false,
        ));
    }

    match state.service.update_customer(&id, &customer).await {
        Ok(_) => Ok(Redirect::to(INDEX).into_response()),
        Err(ServiceError::ValidationError(errors)) => Ok(form_page(
            StatusCode::BAD_REQUEST,
            "Edit Customer",
            &action,
            &customer,
            &errors,
            false,
        )),
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_form(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = route_id(id)?;
    let customer = fetch(&state, &id).await?;
    Ok(views::customer_delete(&customer))
}

/// POST /Customers/Delete/:id
pub async fn delete(
    State(state): State<MvcState>,
    Path(id): Path<String>,
) -> Result<Redirect, MvcError> {
    let id = normalize_id(&id);
    state.service.delete_customer(&id).await?;
    info!(customer_id = %id, "customer deleted through service");
    Ok(Redirect::to(INDEX))
}
