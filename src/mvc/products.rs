use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{views, MvcError, MvcState};
use crate::entities::product::Model as Product;
use crate::listing::ProductSortKey;
use crate::repositories::ProductWithRefs;
use crate::validation::{check, parse_form_value, FieldErrors};

const INDEX: &str = "/Products";

pub fn routes() -> Router<MvcState> {
    Router::new()
        .route("/Products", get(index))
        .route("/Products/Index", get(index))
        .route("/Products/Details", get(details))
        .route("/Products/Details/:id", get(details))
        .route("/Products/Create", get(create_form).post(create))
        .route("/Products/Edit", get(edit_form))
        .route("/Products/Edit/:id", get(edit_form).post(edit))
        .route("/Products/Delete", get(delete_form))
        .route("/Products/Delete/:id", get(delete_form).post(delete))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIndexParams {
    pub sort_order: Option<String>,
    pub search_string: Option<String>,
}

/// Product form exactly as posted; numbers are parsed by [`ProductForm::into_model`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub product_id: String,
    pub product_name: String,
    pub supplier_id: String,
    pub category_id: String,
    pub quantity_per_unit: String,
    pub unit_price: String,
    pub units_in_stock: String,
    pub units_on_order: String,
    pub reorder_level: String,
    pub discontinued: Option<String>,
}

fn show<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ProductForm {
    pub fn from_model(product: &Product) -> Self {
        Self {
            product_id: product.product_id.to_string(),
            product_name: product.product_name.clone(),
            supplier_id: show(product.supplier_id),
            category_id: show(product.category_id),
            quantity_per_unit: product.quantity_per_unit.clone().unwrap_or_default(),
            unit_price: show(product.unit_price),
            units_in_stock: show(product.units_in_stock),
            units_on_order: show(product.units_on_order),
            reorder_level: show(product.reorder_level),
            discontinued: product.discontinued.then(|| "true".to_string()),
        }
    }

    /// Checkbox semantics: present and not "false"
    pub fn is_discontinued(&self) -> bool {
        matches!(self.discontinued.as_deref(), Some(v) if v != "false")
    }

    /// Parses and validates the form. The product id is 0 when not posted.
    pub fn into_model(&self) -> Result<Product, FieldErrors> {
        let mut errors = FieldErrors::new();
        let product = Product {
            product_id: parse_form_value("product_id", "ProductId", &self.product_id, &mut errors)
                .unwrap_or_default(),
            product_name: self.product_name.trim().to_string(),
            supplier_id: parse_form_value("supplier_id", "SupplierId", &self.supplier_id, &mut errors),
            category_id: parse_form_value("category_id", "CategoryId", &self.category_id, &mut errors),
            quantity_per_unit: Some(self.quantity_per_unit.trim().to_string())
                .filter(|q| !q.is_empty()),
            unit_price: parse_form_value::<Decimal>(
                "unit_price",
                "UnitPrice",
                &self.unit_price,
                &mut errors,
            ),
            units_in_stock: parse_form_value(
                "units_in_stock",
                "UnitsInStock",
                &self.units_in_stock,
                &mut errors,
            ),
            units_on_order: parse_form_value(
                "units_on_order",
                "UnitsOnOrder",
                &self.units_on_order,
                &mut errors,
            ),
            reorder_level: parse_form_value(
                "reorder_level",
                "ReorderLevel",
                &self.reorder_level,
                &mut errors,
            ),
            discontinued: self.is_discontinued(),
        };
        if let Err(invalid) = check(&product) {
            errors.extend(invalid);
        }
        errors.into_result().map(|_| product)
    }
}

fn parse_route_id(id: Option<Path<String>>) -> Result<i32, MvcError> {
    id.and_then(|Path(raw)| raw.trim().parse().ok())
        .ok_or(MvcError::NotFound(None))
}

async fn fetch(state: &MvcState, id: i32) -> Result<ProductWithRefs, MvcError> {
    state
        .products
        .find_with_refs(id)
        .await?
        .ok_or_else(|| MvcError::NotFound(Some(format!("Product with ID of {} not found.", id))))
}

async fn form_page(
    state: &MvcState,
    status: StatusCode,
    title: &str,
    action: &str,
    form: &ProductForm,
    errors: &FieldErrors,
) -> Result<Response, MvcError> {
    let categories = state.products.categories().await?;
    let suppliers = state.products.suppliers().await?;
    Ok((
        status,
        views::product_form(title, action, form, &categories, &suppliers, errors),
    )
        .into_response())
}

/// Parses the form and checks the referenced category and supplier exist.
async fn bind(state: &MvcState, form: &ProductForm) -> Result<Result<Product, FieldErrors>, MvcError> {
    let (product, mut errors) = match form.into_model() {
        Ok(product) => (Some(product), FieldErrors::new()),
        Err(errors) => (None, errors),
    };
    if let Some(product) = product {
        errors.extend(state.products.check_references(&product).await?);
        if errors.is_empty() {
            return Ok(Ok(product));
        }
    }
    Ok(Err(errors))
}

/// GET /Products?sortOrder=&searchString=
pub async fn index(
    State(state): State<MvcState>,
    Query(params): Query<ProductIndexParams>,
) -> Result<Html<String>, MvcError> {
    let key = ProductSortKey::parse_or_default(params.sort_order.as_deref());
    let search = params.search_string.unwrap_or_default();
    let products = state.products.search(Some(search.as_str()), key).await?;
    debug!(count = products.len(), sort = %key.as_param(), "product list");
    Ok(views::products_index(&products, key, &search))
}

pub async fn details(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = parse_route_id(id)?;
    Ok(views::product_details(&fetch(&state, id).await?))
}

pub async fn create_form(State(state): State<MvcState>) -> Result<Response, MvcError> {
    form_page(
        &state,
        StatusCode::OK,
        "Create Product",
        "/Products/Create",
        &ProductForm::default(),
        &FieldErrors::new(),
    )
    .await
}

/// POST /Products/Create
pub async fn create(
    State(state): State<MvcState>,
    Form(form): Form<ProductForm>,
) -> Result<Response, MvcError> {
    match bind(&state, &form).await? {
        Ok(product) => {
            let created = state.products.create(product).await?;
            info!(product_id = created.product_id, "product created from form");
            Ok(Redirect::to(INDEX).into_response())
        }
        Err(errors) => {
            form_page(
                &state,
                StatusCode::BAD_REQUEST,
                "Create Product",
                "/Products/Create",
                &form,
                &errors,
            )
            .await
        }
    }
}

pub async fn edit_form(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Response, MvcError> {
    let id = parse_route_id(id)?;
    let item = fetch(&state, id).await?;
    form_page(
        &state,
        StatusCode::OK,
        "Edit Product",
        &format!("/Products/Edit/{}", id),
        &ProductForm::from_model(&item.product),
        &FieldErrors::new(),
    )
    .await
}

/// POST /Products/Edit/:id
pub async fn edit(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
    Form(form): Form<ProductForm>,
) -> Result<Response, MvcError> {
    let id = parse_route_id(id)?;
    if form.product_id.trim().parse::<i32>().ok() != Some(id) {
        warn!(route_id = id, form_id = %form.product_id, "product id mismatch");
        return Err(MvcError::NotFound(None));
    }

    match bind(&state, &form).await? {
        Ok(product) => {
            state.products.update(id, product).await?;
            Ok(Redirect::to(INDEX).into_response())
        }
        Err(errors) => {
            form_page(
                &state,
                StatusCode::BAD_REQUEST,
                "Edit Product",
                &format!("/Products/Edit/{}", id),
                &form,
                &errors,
            )
            .await
        }
    }
}

pub async fn delete_form(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Html<String>, MvcError> {
    let id = parse_route_id(id)?;
    Ok(views::product_delete(&fetch(&state, id).await?))
}

/// POST /Products/Delete/:id
pub async fn delete(
    State(state): State<MvcState>,
    id: Option<Path<String>>,
) -> Result<Redirect, MvcError> {
    let id = parse_route_id(id)?;
    state.products.delete(id).await?;
    Ok(Redirect::to(INDEX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chai_form() -> ProductForm {
        ProductForm {
            product_id: "1".into(),
            product_name: "Chai".into(),
            supplier_id: "1".into(),
            category_id: "1".into(),
            quantity_per_unit: "10 boxes x 20 bags".into(),
            unit_price: "18.00".into(),
            units_in_stock: "39".into(),
            units_on_order: "0".into(),
            reorder_level: "10".into(),
            discontinued: None,
        }
    }

    #[test]
    fn well_formed_form_becomes_product() {
        let product = chai_form().into_model().unwrap();
        assert_eq!(product.product_id, 1);
        assert_eq!(product.unit_price, Some(dec!(18.00)));
        assert_eq!(product.units_in_stock, Some(39));
        assert!(!product.discontinued);
    }

    #[test]
    fn unparseable_numbers_become_field_errors() {
        let mut form = chai_form();
        form.unit_price = "cheap".into();
        form.units_in_stock = "lots".into();
        let errors = form.into_model().unwrap_err();
        let messages: Vec<&str> = errors.for_field("unit_price").collect();
        assert_eq!(messages, vec!["The value 'cheap' is not valid for UnitPrice."]);
        assert!(errors.contains_field("units_in_stock"));
    }

    #[test]
    fn constraint_failures_are_reported_with_parse_failures() {
        let mut form = chai_form();
        form.product_name = String::new();
        form.units_on_order = "-5".into();
        form.reorder_level = "x".into();
        let errors = form.into_model().unwrap_err();
        assert!(errors.contains_field("product_name"));
        assert!(errors.contains_field("units_on_order"));
        assert!(errors.contains_field("reorder_level"));
    }

    #[test]
    fn model_round_trips_through_form() {
        let product = chai_form().into_model().unwrap();
        let form = ProductForm::from_model(&product);
        assert_eq!(form.into_model().unwrap(), product);
    }

    #[test]
    fn checkbox_values() {
        let mut form = chai_form();
        assert!(!form.is_discontinued());
        form.discontinued = Some("true".into());
        assert!(form.is_discontinued());
        form.discontinued = Some("on".into());
        assert!(form.is_discontinued());
        form.discontinued = Some("false".into());
        assert!(!form.is_discontinued());
    }
}
