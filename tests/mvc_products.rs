mod common;

use axum::http::StatusCode;

use common::{body_text, location, TestApp};

// Products are read and written directly; the service is never called.
const NO_SERVICE: &str = "http://127.0.0.1:9/";

fn positions(page: &str, ids: &[i32]) -> Vec<usize> {
    ids.iter()
        .map(|id| {
            page.find(&format!(r#"<tr data-id="{}">"#, id))
                .unwrap_or_else(|| panic!("product {id} missing from page"))
        })
        .collect()
}

fn product_fields<'a>(id: &'a str, name: &'a str, price: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("product_id", id),
        ("product_name", name),
        ("supplier_id", "1"),
        ("category_id", "1"),
        ("quantity_per_unit", "24 - 355 ml bottles"),
        ("unit_price", price),
        ("units_in_stock", "12"),
        ("units_on_order", "0"),
        ("reorder_level", "5"),
    ]
}

#[tokio::test]
async fn index_lists_products_by_name() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let response = mvc.get("/Products").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    // Aniseed Syrup, Chai, Chang
    let order = positions(&page, &[3, 1, 2]);
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    assert!(page.contains("Exotic Liquids"));
    assert!(page.contains("$18.00"));
}

#[tokio::test]
async fn index_sorts_by_price_descending() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let page = body_text(mvc.get("/Products?sortOrder=unit_price_desc").await).await;
    // Mishi Kobe Niku, Northwoods Cranberry Sauce, Ikura
    let order = positions(&page, &[9, 8, 10]);
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn search_matches_product_category_or_supplier() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let page = body_text(mvc.get("/Products?searchString=Cajun").await).await;
    positions(&page, &[4, 5]);
    assert!(!page.contains(r#"<tr data-id="1">"#));

    let page = body_text(mvc.get("/Products?searchString=Seafood").await).await;
    positions(&page, &[10]);
    assert!(!page.contains(r#"<tr data-id="9">"#));
}

#[tokio::test]
async fn details_and_missing_ids() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let response = mvc.get("/Products/Details/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("10 boxes x 20 bags"));

    for uri in ["/Products/Details/99", "/Products/Details", "/Products/Edit/abc", "/Products/Delete"] {
        assert_eq!(mvc.get(uri).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn create_form_lists_categories_and_suppliers() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let page = body_text(mvc.get("/Products/Create").await).await;
    assert!(page.contains("Beverages"));
    assert!(page.contains("Tokyo Traders"));
    assert!(page.contains(r#"name="unit_price""#));
}

#[tokio::test]
async fn unparseable_input_rerenders_form_with_messages() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let mut fields = product_fields("", "Sasquatch Ale", "cheap");
    fields.retain(|(name, _)| *name != "units_in_stock");
    fields.push(("units_in_stock", "lots"));
    let response = mvc.post_form("/Products/Create", &fields).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let page = body_text(response).await;
    assert!(page.contains("The value &#39;cheap&#39; is not valid for UnitPrice."));
    assert!(page.contains(r#"value="Sasquatch Ale""#));

    let products = app.state.products.list(None).await.unwrap();
    assert_eq!(products.len(), 10);
}

#[tokio::test]
async fn unknown_category_is_a_field_error() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let mut fields = product_fields("", "Sasquatch Ale", "14.00");
    fields.retain(|(name, _)| *name != "category_id");
    fields.push(("category_id", "42"));
    let response = mvc.post_form("/Products/Create", &fields).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Category 42 does not exist"));
}

#[tokio::test]
async fn create_then_edit_then_delete() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let response = mvc
        .post_form("/Products/Create", &product_fields("", "Sasquatch Ale", "14.00"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/Products"));

    let page = body_text(mvc.get("/Products?searchString=Sasquatch").await).await;
    assert!(page.contains("Sasquatch Ale"));
    // The store assigns the next id
    positions(&page, &[11]);

    let mut fields = product_fields("11", "Sasquatch Stout", "15.50");
    fields.push(("discontinued", "true"));
    let response = mvc.post_form("/Products/Edit/11", &fields).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stored = app.state.products.find(11).await.unwrap().unwrap();
    assert_eq!(stored.product_name, "Sasquatch Stout");
    assert!(stored.discontinued);

    let response = mvc.post_form("/Products/Delete/11", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.state.products.find(11).await.unwrap().is_none());
}

#[tokio::test]
async fn edit_with_mismatched_id_leaves_store_untouched() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let response = mvc
        .post_form("/Products/Edit/1", &product_fields("2", "Renamed", "1.00"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for (id, name) in [(1, "Chai"), (2, "Chang")] {
        let stored = app.state.products.find(id).await.unwrap().unwrap();
        assert_eq!(stored.product_name, name);
    }
}

#[tokio::test]
async fn deleting_ordered_product_is_a_conflict() {
    let app = TestApp::new().await;
    let mvc = app.mvc(NO_SERVICE);

    let response = mvc.post_form("/Products/Delete/1", &[]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("cannot be deleted"));
    assert!(app.state.products.find(1).await.unwrap().is_some());
}
