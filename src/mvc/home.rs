use axum::{
    extract::{Form, Path, Query, State},
    response::Html,
    routing::get,
    Router,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::{views, MvcError, MvcState};
use crate::validation::{check, parse_form_value, FieldErrors};

const PRODUCT_ID_HINT: &str =
    "You must pass a product ID in the route, for example, Home/ProductDetail/21";

pub fn routes() -> Router<MvcState> {
    Router::new()
        .route("/", get(index))
        .route("/Home", get(index))
        .route("/Home/Index", get(index))
        .route("/Home/ProductDetail", get(product_detail))
        .route("/Home/ProductDetail/:id", get(product_detail))
        .route("/Category", get(category))
        .route("/Category/:id", get(category))
        .route("/Home/Category", get(category))
        .route("/Home/Category/:id", get(category))
        .route("/Home/Customers", get(customers))
        .route("/Home/Privacy", get(privacy))
        .route("/Home/Error", get(error))
        .route("/Home/ModelBinding", get(model_binding_form).post(model_binding))
}

/// Route id as an integer; anything else is treated as missing.
fn route_id(id: Option<Path<String>>) -> Option<i32> {
    id.and_then(|Path(raw)| raw.trim().parse().ok())
}

pub async fn index(State(state): State<MvcState>) -> Result<Html<String>, MvcError> {
    let visitor_count: u32 = rand::thread_rng().gen_range(1..=1000);
    let categories = state.products.categories().await?;
    let products = state.products.list(None).await?;
    info!(visitor_count, "home page");
    Ok(views::home_index(visitor_count, &categories, &products))
}

pub async fn product_detail(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = route_id(id).ok_or_else(|| MvcError::NotFound(Some(PRODUCT_ID_HINT.into())))?;
    let product = state
        .products
        .find_with_refs(id)
        .await?
        .ok_or_else(|| MvcError::NotFound(Some(format!("Product with ID of {} not found.", id))))?;
    Ok(views::product_detail(&product))
}

pub async fn category(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = route_id(id).ok_or_else(|| MvcError::NotFound(Some(PRODUCT_ID_HINT.into())))?;
    let category = state
        .products
        .category(id)
        .await?
        .ok_or_else(|| MvcError::NotFound(Some(format!("Category with ID of {} not found", id))))?;
    let products = state.products.products_in_category(&category).await?;
    Ok(views::category(&category, &products))
}

#[derive(Debug, Default, Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

pub async fn customers(
    State(state): State<MvcState>,
    Query(query): Query<CountryQuery>,
) -> Result<Html<String>, MvcError> {
    let country = query.country.filter(|c| !c.trim().is_empty());
    let title = match country.as_deref() {
        Some(country) => format!("Customers in {}", country),
        None => "All Customers Worldwide".to_string(),
    };
    let customers = state.service.list_customers(country.as_deref()).await?;
    Ok(views::customers_by_country(&title, &customers))
}

pub async fn privacy() -> Html<String> {
    views::privacy()
}

pub async fn error() -> Html<String> {
    let request_id = crate::tracing::current_request_id();
    views::error_page(
        request_id.as_ref().map(|id| id.as_str()),
        "The request could not be completed.",
    )
}

/// What the model-binding page binds and validates.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
pub struct Thing {
    #[validate(
        required(message = "The Id field is required."),
        range(min = 1, max = 10, message = "Id must be between 1 and 10.")
    )]
    pub id: Option<i32>,
    #[validate(required(message = "The Color field is required."))]
    pub color: Option<String>,
    #[validate(email(message = "The Email field is not a valid e-mail address."))]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThingForm {
    pub id: String,
    pub color: String,
    pub email: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ThingForm {
    /// Binds the posted strings, collecting parse and constraint failures.
    pub fn bind(&self) -> (Thing, FieldErrors) {
        let mut errors = FieldErrors::new();
        let thing = Thing {
            id: parse_form_value("id", "Id", &self.id, &mut errors),
            color: non_empty(&self.color),
            email: non_empty(&self.email),
        };
        if let Err(invalid) = check(&thing) {
            for error in invalid.iter() {
                // A value that did not parse already has its message
                if !errors.contains_field(&error.field) {
                    errors.push(error.field.clone(), error.message.clone());
                }
            }
        }
        (thing, errors)
    }
}

pub async fn model_binding_form() -> Html<String> {
    views::model_binding(None, &FieldErrors::new())
}

pub async fn model_binding(Form(form): Form<ThingForm>) -> Html<String> {
    let (thing, errors) = form.bind();
    debug!(?thing, errors = errors.len(), "model binding");
    views::model_binding(Some(&thing), &errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: &str, color: &str, email: &str) -> ThingForm {
        ThingForm {
            id: id.into(),
            color: color.into(),
            email: email.into(),
        }
    }

    #[test]
    fn valid_thing_binds_cleanly() {
        let (thing, errors) = form("3", "Red", "red@example.com").bind();
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(thing.id, Some(3));
        assert_eq!(thing.color.as_deref(), Some("Red"));
    }

    #[test]
    fn out_of_range_and_missing_values_are_reported() {
        let (_, errors) = form("11", "", "not-an-email").bind();
        assert!(errors.contains_field("id"));
        assert!(errors.contains_field("color"));
        assert!(errors.contains_field("email"));
    }

    #[test]
    fn unparseable_id_reports_one_message() {
        let (thing, errors) = form("abc", "Blue", "").bind();
        assert_eq!(thing.id, None);
        let messages: Vec<&str> = errors.for_field("id").collect();
        assert_eq!(messages, vec!["The value 'abc' is not valid for Id."]);
    }

    #[test]
    fn route_ids_must_be_numeric() {
        assert_eq!(route_id(Some(Path("21".into()))), Some(21));
        assert_eq!(route_id(Some(Path("abc".into()))), None);
        assert_eq!(route_id(None), None);
    }
}
