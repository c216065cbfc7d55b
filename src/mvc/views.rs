//! HTML rendering for the MVC pages.
//!
//! Pages are assembled with `format!` around one shared layout. Every value
//! that comes from the store, the service or the request goes through
//! [`escape`].

use axum::response::Html;
use rust_decimal::Decimal;
use url::form_urlencoded;

use super::home::Thing;
use super::products::ProductForm;
use crate::entities::category::Model as Category;
use crate::entities::customer::Model as Customer;
use crate::entities::product::Model as Product;
use crate::entities::supplier::Model as Supplier;
use crate::listing::{CustomerSortColumn, CustomerSortKey, ProductSortColumn, ProductSortKey};
use crate::repositories::ProductWithRefs;
use crate::validation::FieldErrors;

pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn money(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("${:.2}", v.round_dp(2)))
        .unwrap_or_default()
}

fn small(value: Option<i16>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs.iter().filter(|(_, v)| !v.is_empty()) {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>{title} - Northwind</title>
</head>
<body>
<nav>
<a href="/">Home</a> | <a href="/Customers">Customers</a> | <a href="/Products">Products</a> | <a href="/Home/Privacy">Privacy</a>
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        body = body
    ))
}

/// Validation summary; empty when there is nothing to report.
fn error_summary(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| {
            format!(
                r#"<li data-field="{}">{}</li>"#,
                escape(&e.field),
                escape(&e.message)
            )
        })
        .collect();
    format!(r#"<ul class="validation-summary">{}</ul>"#, items)
}

fn text_input(name: &str, label: &str, value: &str, errors: &FieldErrors) -> String {
    let messages: Vec<String> = errors.for_field(name).map(escape).collect();
    format!(
        r#"<div><label for="{name}">{label}</label> <input id="{name}" name="{name}" value="{value}" /> <span class="field-error">{messages}</span></div>"#,
        name = name,
        label = escape(label),
        value = escape(value),
        messages = messages.join(" ")
    )
}

fn select(name: &str, label: &str, options: &[(i32, String)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(id, text)| {
            let id = id.to_string();
            let marker = if id == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                id,
                marker,
                escape(text)
            )
        })
        .collect();
    format!(
        r#"<div><label for="{name}">{label}</label> <select id="{name}" name="{name}"><option value=""></option>{options}</select></div>"#,
        name = name,
        label = escape(label),
        options = options
    )
}

// Home

pub fn home_index(visitor_count: u32, categories: &[Category], products: &[Product]) -> Html<String> {
    let categories: String = categories
        .iter()
        .map(|c| {
            format!(
                r#"<li><a href="/Category/{id}">{name}</a> {desc}</li>"#,
                id = c.category_id,
                name = escape(&c.category_name),
                desc = opt(&c.description)
            )
        })
        .collect();
    let products: String = products
        .iter()
        .map(|p| {
            format!(
                r#"<li><a href="/Home/ProductDetail/{id}">{name}</a> {price}</li>"#,
                id = p.product_id,
                name = escape(&p.product_name),
                price = money(p.unit_price)
            )
        })
        .collect();
    layout(
        "Welcome to Northwind",
        &format!(
            r#"<p class="visitors">This site has had {visitor_count} visitors this month.</p>
<h2>Categories</h2>
<ul class="categories">{categories}</ul>
<h2>Products</h2>
<ul class="products">{products}</ul>"#
        ),
    )
}

fn product_facts(item: &ProductWithRefs) -> String {
    let p = &item.product;
    format!(
        r#"<dl class="product">
<dt>Product ID</dt><dd>{id}</dd>
<dt>Product Name</dt><dd>{name}</dd>
<dt>Category</dt><dd>{category}</dd>
<dt>Supplier</dt><dd>{supplier}</dd>
<dt>Quantity Per Unit</dt><dd>{qpu}</dd>
<dt>Unit Price</dt><dd>{price}</dd>
<dt>Units In Stock</dt><dd>{stock}</dd>
<dt>Units On Order</dt><dd>{on_order}</dd>
<dt>Reorder Level</dt><dd>{reorder}</dd>
<dt>Discontinued</dt><dd>{discontinued}</dd>
</dl>"#,
        id = p.product_id,
        name = escape(&p.product_name),
        category = item
            .category
            .as_ref()
            .map(|c| escape(&c.category_name))
            .unwrap_or_default(),
        supplier = item
            .supplier
            .as_ref()
            .map(|s| escape(&s.company_name))
            .unwrap_or_default(),
        qpu = opt(&p.quantity_per_unit),
        price = money(p.unit_price),
        stock = small(p.units_in_stock),
        on_order = small(p.units_on_order),
        reorder = small(p.reorder_level),
        discontinued = if p.discontinued { "Yes" } else { "No" },
    )
}

pub fn product_detail(item: &ProductWithRefs) -> Html<String> {
    layout(
        &format!("Product Detail - {}", item.product.product_name),
        &product_facts(item),
    )
}

pub fn category(category: &Category, products: &[Product]) -> Html<String> {
    let rows: String = products
        .iter()
        .map(|p| {
            format!(
                r#"<tr><td><a href="/Home/ProductDetail/{id}">{name}</a></td><td>{price}</td><td>{stock}</td></tr>"#,
                id = p.product_id,
                name = escape(&p.product_name),
                price = money(p.unit_price),
                stock = small(p.units_in_stock)
            )
        })
        .collect();
    layout(
        &format!("Category - {}", category.category_name),
        &format!(
            r#"<p class="description">{desc}</p>
<p>There are {count} products in this category.</p>
<table class="products"><tr><th>Product Name</th><th>Unit Price</th><th>Units In Stock</th></tr>{rows}</table>"#,
            desc = opt(&category.description),
            count = products.len(),
            rows = rows
        ),
    )
}

pub fn privacy() -> Html<String> {
    layout(
        "Privacy Policy",
        "<p>Use this page to detail your site's privacy policy.</p>",
    )
}

pub fn error_page(request_id: Option<&str>, message: &str) -> Html<String> {
    let request_id = request_id
        .map(|id| {
            format!(
                r#"<p><strong>Request ID:</strong> <code class="request-id">{}</code></p>"#,
                escape(id)
            )
        })
        .unwrap_or_default();
    layout(
        "Error",
        &format!(
            r#"<h2 class="text-danger">An error occurred while processing your request.</h2>
<p class="message">{}</p>
{}"#,
            escape(message),
            request_id
        ),
    )
}

pub fn model_binding(thing: Option<&Thing>, errors: &FieldErrors) -> Html<String> {
    let echo = thing
        .map(|t| {
            format!(
                r#"<dl class="thing"><dt>Id</dt><dd>{}</dd><dt>Color</dt><dd>{}</dd><dt>Email</dt><dd>{}</dd></dl>"#,
                t.id.map(|id| id.to_string()).unwrap_or_default(),
                opt(&t.color),
                opt(&t.email)
            )
        })
        .unwrap_or_default();
    let valid = match thing {
        Some(_) if errors.is_empty() => "<p class=\"model-state\">Model state is valid.</p>",
        Some(_) => "<p class=\"model-state\">Model state is invalid.</p>",
        None => "",
    };
    layout(
        "Model Binding Demo",
        &format!(
            r#"{valid}
{echo}
{summary}
<form method="post" action="/Home/ModelBinding">
<div><label for="id">Id</label> <input id="id" name="id" /></div>
<div><label for="color">Color</label> <input id="color" name="color" /></div>
<div><label for="email">Email</label> <input id="email" name="email" /></div>
<input type="submit" value="Submit" />
</form>"#,
            summary = error_summary(errors)
        ),
    )
}

// Customers

fn customer_rows(customers: &[Customer], actions: bool) -> String {
    customers
        .iter()
        .map(|c| {
            let id = escape(&c.customer_id);
            let actions = if actions {
                format!(
                    r#"<td><a href="/Customers/Details/{id}">Details</a> | <a href="/Customers/Edit/{id}">Edit</a> | <a href="/Customers/Delete/{id}">Delete</a></td>"#
                )
            } else {
                String::new()
            };
            format!(
                r#"<tr data-id="{id}"><td>{company}</td><td>{contact}</td><td>{address}</td><td>{city}</td><td>{country}</td><td>{phone}</td>{actions}</tr>"#,
                company = escape(&c.company_name),
                contact = opt(&c.contact_name),
                address = opt(&c.address),
                city = opt(&c.city),
                country = opt(&c.country),
                phone = opt(&c.phone),
            )
        })
        .collect()
}

pub fn customers_by_country(title: &str, customers: &[Customer]) -> Html<String> {
    layout(
        title,
        &format!(
            r#"<table class="customers"><tr><th>Company Name</th><th>Contact Name</th><th>Address</th><th>City</th><th>Country</th><th>Phone</th></tr>{}</table>"#,
            customer_rows(customers, false)
        ),
    )
}

pub fn customers_index(
    customers: &[Customer],
    key: CustomerSortKey,
    search: &str,
    country: &str,
) -> Html<String> {
    let header = |column: CustomerSortColumn, label: &str| {
        format!(
            r#"<th><a href="/Customers?{}">{}</a></th>"#,
            escape(&query(&[
                ("sortOrder", &key.header_param(column)),
                ("searchString", search),
                ("country", country),
            ])),
            label
        )
    };
    layout(
        "Customers",
        &format!(
            r#"<p><a href="/Customers/Create">Create New</a></p>
<form method="get" action="/Customers">
<p>Find by name: <input type="text" name="searchString" value="{search}" />
<input type="hidden" name="country" value="{country}" />
<input type="submit" value="Search" /> <a href="/Customers">Back to Full List</a></p>
</form>
<p class="current-filter">Current filter: {search}</p>
<table class="customers"><tr>{company}{contact}{address}<th>City</th><th>Country</th>{phone}<th></th></tr>{rows}</table>"#,
            search = escape(search),
            country = escape(country),
            company = header(CustomerSortColumn::Company, "Company Name"),
            contact = header(CustomerSortColumn::Contact, "Contact Name"),
            address = header(CustomerSortColumn::Address, "Address"),
            phone = header(CustomerSortColumn::Phone, "Phone"),
            rows = customer_rows(customers, true)
        ),
    )
}

fn customer_facts(c: &Customer) -> String {
    let fields = [
        ("Customer ID", Some(c.customer_id.clone())),
        ("Company Name", Some(c.company_name.clone())),
        ("Contact Name", c.contact_name.clone()),
        ("Contact Title", c.contact_title.clone()),
        ("Address", c.address.clone()),
        ("City", c.city.clone()),
        ("Region", c.region.clone()),
        ("Postal Code", c.postal_code.clone()),
        ("Country", c.country.clone()),
        ("Phone", c.phone.clone()),
        ("Fax", c.fax.clone()),
    ];
    let items: String = fields
        .iter()
        .map(|(label, value)| format!("<dt>{}</dt><dd>{}</dd>", label, opt(value)))
        .collect();
    format!(r#"<dl class="customer">{}</dl>"#, items)
}

pub fn customer_details(customer: &Customer) -> Html<String> {
    layout(
        "Customer Details",
        &format!(
            r#"{}
<p><a href="/Customers/Edit/{id}">Edit</a> | <a href="/Customers">Back to List</a></p>"#,
            customer_facts(customer),
            id = escape(&customer.customer_id)
        ),
    )
}

/// Create and edit share one form; `action` is where it posts.
pub fn customer_form(
    title: &str,
    action: &str,
    customer: &Customer,
    errors: &FieldErrors,
    id_editable: bool,
) -> Html<String> {
    let id_field = if id_editable {
        text_input("customer_id", "Customer ID", &customer.customer_id, errors)
    } else {
        format!(
            r#"<div><label>Customer ID</label> {id}<input type="hidden" name="customer_id" value="{id}" /></div>"#,
            id = escape(&customer.customer_id)
        )
    };
    let fields = [
        ("contact_name", "Contact Name", &customer.contact_name),
        ("contact_title", "Contact Title", &customer.contact_title),
        ("address", "Address", &customer.address),
        ("city", "City", &customer.city),
        ("region", "Region", &customer.region),
        ("postal_code", "Postal Code", &customer.postal_code),
        ("country", "Country", &customer.country),
        ("phone", "Phone", &customer.phone),
        ("fax", "Fax", &customer.fax),
    ];
    let inputs: String = fields
        .iter()
        .map(|(name, label, value)| {
            text_input(name, label, value.as_deref().unwrap_or_default(), errors)
        })
        .collect();
    layout(
        title,
        &format!(
            r#"{summary}
<form method="post" action="{action}">
{id_field}
{company}
{inputs}
<input type="submit" value="Save" />
</form>
<p><a href="/Customers">Back to List</a></p>"#,
            summary = error_summary(errors),
            action = escape(action),
            company = text_input("company_name", "Company Name", &customer.company_name, errors),
        ),
    )
}

pub fn customer_delete(customer: &Customer) -> Html<String> {
    layout(
        "Delete Customer",
        &format!(
            r#"<h3>Are you sure you want to delete this?</h3>
{facts}
<form method="post" action="/Customers/Delete/{id}">
<input type="submit" value="Delete" /> | <a href="/Customers">Back to List</a>
</form>"#,
            facts = customer_facts(customer),
            id = escape(&customer.customer_id)
        ),
    )
}

// Products

pub fn products_index(items: &[ProductWithRefs], key: ProductSortKey, search: &str) -> Html<String> {
    let header = |column: ProductSortColumn, label: &str| {
        format!(
            r#"<th><a href="/Products?{}">{}</a></th>"#,
            escape(&query(&[
                ("sortOrder", &key.header_param(column)),
                ("searchString", search),
            ])),
            label
        )
    };
    let rows: String = items
        .iter()
        .map(|item| {
            let p = &item.product;
            format!(
                r#"<tr data-id="{id}"><td>{category}</td><td>{supplier}</td><td>{name}</td><td>{price}</td><td>{stock}</td><td><a href="/Products/Details/{id}">Details</a> | <a href="/Products/Edit/{id}">Edit</a> | <a href="/Products/Delete/{id}">Delete</a></td></tr>"#,
                id = p.product_id,
                category = item
                    .category
                    .as_ref()
                    .map(|c| escape(&c.category_name))
                    .unwrap_or_default(),
                supplier = item
                    .supplier
                    .as_ref()
                    .map(|s| escape(&s.company_name))
                    .unwrap_or_default(),
                name = escape(&p.product_name),
                price = money(p.unit_price),
                stock = small(p.units_in_stock),
            )
        })
        .collect();
    layout(
        "Products",
        &format!(
            r#"<p><a href="/Products/Create">Create New</a></p>
<form method="get" action="/Products">
<p>Find by product, category or supplier: <input type="text" name="searchString" value="{search}" />
<input type="submit" value="Search" /> <a href="/Products">Back to Full List</a></p>
</form>
<table class="products"><tr>{category}{supplier}{product}{price}{stock}<th></th></tr>{rows}</table>"#,
            search = escape(search),
            category = header(ProductSortColumn::Category, "Category"),
            supplier = header(ProductSortColumn::Supplier, "Supplier"),
            product = header(ProductSortColumn::Product, "Product Name"),
            price = header(ProductSortColumn::UnitPrice, "Unit Price"),
            stock = header(ProductSortColumn::UnitInStock, "Units In Stock"),
            rows = rows
        ),
    )
}

pub fn product_details(item: &ProductWithRefs) -> Html<String> {
    layout(
        "Product Details",
        &format!(
            r#"{}
<p><a href="/Products/Edit/{id}">Edit</a> | <a href="/Products">Back to List</a></p>"#,
            product_facts(item),
            id = item.product.product_id
        ),
    )
}

pub fn product_form(
    title: &str,
    action: &str,
    form: &ProductForm,
    categories: &[Category],
    suppliers: &[Supplier],
    errors: &FieldErrors,
) -> Html<String> {
    let categories: Vec<(i32, String)> = categories
        .iter()
        .map(|c| (c.category_id, c.category_name.clone()))
        .collect();
    let suppliers: Vec<(i32, String)> = suppliers
        .iter()
        .map(|s| (s.supplier_id, s.company_name.clone()))
        .collect();
    let id_field = if form.product_id.is_empty() {
        String::new()
    } else {
        format!(
            r#"<input type="hidden" name="product_id" value="{}" />"#,
            escape(&form.product_id)
        )
    };
    layout(
        title,
        &format!(
            r#"{summary}
<form method="post" action="{action}">
{id_field}
{name}
{category}
{supplier}
{qpu}
{price}
{stock}
{on_order}
{reorder}
<div><label for="discontinued">Discontinued</label> <input type="checkbox" id="discontinued" name="discontinued" value="true"{checked} /></div>
<input type="submit" value="Save" />
</form>
<p><a href="/Products">Back to List</a></p>"#,
            summary = error_summary(errors),
            action = escape(action),
            name = text_input("product_name", "Product Name", &form.product_name, errors),
            category = select("category_id", "Category", &categories, form.category_id.trim()),
            supplier = select("supplier_id", "Supplier", &suppliers, form.supplier_id.trim()),
            qpu = text_input("quantity_per_unit", "Quantity Per Unit", &form.quantity_per_unit, errors),
            price = text_input("unit_price", "Unit Price", &form.unit_price, errors),
            stock = text_input("units_in_stock", "Units In Stock", &form.units_in_stock, errors),
            on_order = text_input("units_on_order", "Units On Order", &form.units_on_order, errors),
            reorder = text_input("reorder_level", "Reorder Level", &form.reorder_level, errors),
            checked = if form.is_discontinued() { " checked" } else { "" },
        ),
    )
}

pub fn product_delete(item: &ProductWithRefs) -> Html<String> {
    layout(
        "Delete Product",
        &format!(
            r#"<h3>Are you sure you want to delete this?</h3>
{facts}
<form method="post" action="/Products/Delete/{id}">
<input type="submit" value="Delete" /> | <a href="/Products">Back to List</a>
</form>"#,
            facts = product_facts(item),
            id = item.product.product_id
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn header_links_toggle_sort_order() {
        let key = CustomerSortKey::descending(CustomerSortColumn::Company);
        let Html(page) = customers_index(&[], key, "Fu", "");
        assert!(page.contains("/Customers?sortOrder=company&amp;searchString=Fu"));
        assert!(page.contains("/Customers?sortOrder=contact_desc&amp;searchString=Fu"));
        assert!(page.contains("Current filter: Fu"));
    }

    #[test]
    fn error_summary_lists_field_messages() {
        let mut errors = FieldErrors::new();
        errors.push("company_name", "This field is required");
        let summary = error_summary(&errors);
        assert!(summary.contains(r#"data-field="company_name""#));
        assert!(summary.contains("This field is required"));
        assert!(error_summary(&FieldErrors::new()).is_empty());
    }
}
