//! Small Northwind sample set for local runs and tests.
//!
//! Inserted in one transaction, and only into an empty store.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::entities::{
    category, customer, customer_customer_demo, customer_demographic, order, order_detail,
    product, supplier,
};
use crate::errors::ServiceError;

/// Row counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub skipped: bool,
    pub categories: usize,
    pub suppliers: usize,
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    pub order_details: usize,
}

const CATEGORIES: [(&str, &str); 8] = [
    ("Beverages", "Soft drinks, coffees, teas, beers, and ales"),
    ("Condiments", "Sweet and savory sauces, relishes, spreads, and seasonings"),
    ("Confections", "Desserts, candies, and sweet breads"),
    ("Dairy Products", "Cheeses"),
    ("Grains/Cereals", "Breads, crackers, pasta, and cereal"),
    ("Meat/Poultry", "Prepared meats"),
    ("Produce", "Dried fruit and bean curd"),
    ("Seafood", "Seaweed and fish"),
];

// company, contact, city, country, phone
const SUPPLIERS: [(&str, &str, &str, &str, &str); 4] = [
    ("Exotic Liquids", "Charlotte Cooper", "London", "UK", "(171) 555-2222"),
    ("New Orleans Cajun Delights", "Shelley Burke", "New Orleans", "USA", "(100) 555-4822"),
    ("Grandma Kelly's Homestead", "Regina Murphy", "Ann Arbor", "USA", "(313) 555-5735"),
    ("Tokyo Traders", "Yoshi Nagase", "Tokyo", "Japan", "(03) 3555-5011"),
];

struct ProductRow {
    name: &'static str,
    supplier: usize,
    category: usize,
    quantity_per_unit: &'static str,
    unit_price: Decimal,
    units_in_stock: i16,
    units_on_order: i16,
    reorder_level: i16,
    discontinued: bool,
}

// supplier/category are 1-based positions in the tables above
fn products() -> Vec<ProductRow> {
    let row = |name: &'static str,
               supplier: usize,
               category: usize,
               quantity_per_unit: &'static str,
               unit_price: Decimal,
               stock: i16,
               on_order: i16,
               reorder: i16,
               discontinued: bool| ProductRow {
        name,
        supplier,
        category,
        quantity_per_unit,
        unit_price,
        units_in_stock: stock,
        units_on_order: on_order,
        reorder_level: reorder,
        discontinued,
    };
    vec![
        row("Chai", 1, 1, "10 boxes x 20 bags", dec!(18.00), 39, 0, 10, false),
        row("Chang", 1, 1, "24 - 12 oz bottles", dec!(19.00), 17, 40, 25, false),
        row("Aniseed Syrup", 1, 2, "12 - 550 ml bottles", dec!(10.00), 13, 70, 25, false),
        row("Chef Anton's Cajun Seasoning", 2, 2, "48 - 6 oz jars", dec!(22.00), 53, 0, 0, false),
        row("Chef Anton's Gumbo Mix", 2, 2, "36 boxes", dec!(21.35), 0, 0, 0, true),
        row("Grandma's Boysenberry Spread", 3, 2, "12 - 8 oz jars", dec!(25.00), 120, 0, 25, false),
        row("Uncle Bob's Organic Dried Pears", 3, 7, "12 - 1 lb pkgs.", dec!(30.00), 15, 0, 10, false),
        row("Northwoods Cranberry Sauce", 3, 2, "12 - 12 oz jars", dec!(40.00), 6, 0, 0, false),
        row("Mishi Kobe Niku", 4, 6, "18 - 500 g pkgs.", dec!(97.00), 29, 0, 0, true),
        row("Ikura", 4, 8, "12 - 200 ml jars", dec!(31.00), 31, 0, 0, false),
    ]
}

fn customers() -> Vec<customer::Model> {
    let row = |id: &str,
               company: &str,
               contact: &str,
               title: &str,
               address: &str,
               city: &str,
               postal: &str,
               country: &str,
               phone: &str,
               fax: Option<&str>| customer::Model {
        customer_id: id.into(),
        company_name: company.into(),
        contact_name: Some(contact.into()),
        contact_title: Some(title.into()),
        address: Some(address.into()),
        city: Some(city.into()),
        region: None,
        postal_code: Some(postal.into()),
        country: Some(country.into()),
        phone: Some(phone.into()),
        fax: fax.map(Into::into),
    };
    vec![
        row("ALFKI", "Alfreds Futterkiste", "Maria Anders", "Sales Representative", "Obere Str. 57", "Berlin", "12209", "Germany", "030-0074321", Some("030-0076545")),
        row("ANATR", "Ana Trujillo Emparedados y helados", "Ana Trujillo", "Owner", "Avda. de la Constitución 2222", "México D.F.", "05021", "Mexico", "(5) 555-4729", Some("(5) 555-3745")),
        row("ANTON", "Antonio Moreno Taquería", "Antonio Moreno", "Owner", "Mataderos  2312", "México D.F.", "05023", "Mexico", "(5) 555-3932", None),
        row("AROUT", "Around the Horn", "Thomas Hardy", "Sales Representative", "120 Hanover Sq.", "London", "WA1 1DP", "UK", "(171) 555-7788", Some("(171) 555-6750")),
        row("BERGS", "Berglunds snabbköp", "Christina Berglund", "Order Administrator", "Berguvsvägen  8", "Luleå", "S-958 22", "Sweden", "0921-12 34 65", Some("0921-12 34 67")),
        row("BLAUS", "Blauer See Delikatessen", "Hanna Moos", "Sales Representative", "Forsterstr. 57", "Mannheim", "68306", "Germany", "0621-08460", Some("0621-08924")),
    ]
}

struct OrderRow {
    customer_id: &'static str,
    ordered: (i32, u32, u32),
    freight: Decimal,
    // product position (1-based), quantity, discount
    lines: &'static [(usize, i16, f32)],
}

fn orders() -> [OrderRow; 4] {
    [
        OrderRow {
            customer_id: "ALFKI",
            ordered: (1997, 8, 25),
            freight: dec!(29.46),
            lines: &[(1, 15, 0.25), (2, 21, 0.25)],
        },
        OrderRow {
            customer_id: "ALFKI",
            ordered: (1997, 10, 3),
            freight: dec!(61.02),
            lines: &[(1, 20, 0.0)],
        },
        OrderRow {
            customer_id: "ANATR",
            ordered: (1996, 9, 18),
            freight: dec!(1.61),
            lines: &[(9, 1, 0.0), (10, 5, 0.0)],
        },
        OrderRow {
            customer_id: "AROUT",
            ordered: (1996, 11, 28),
            freight: dec!(41.95),
            lines: &[(3, 20, 0.0)],
        },
    ]
}

fn date(ymd: (i32, u32, u32)) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn lookup<T: Copy>(ids: &[T], position: usize, what: &str) -> Result<T, ServiceError> {
    position
        .checked_sub(1)
        .and_then(|i| ids.get(i).copied())
        .ok_or_else(|| ServiceError::InternalError(format!("seed data has no {} #{}", what, position)))
}

/// Inserts the sample set unless customers or products already exist.
#[instrument(skip(db))]
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<SeedSummary, ServiceError> {
    let existing = customer::Entity::find().count(db).await? + product::Entity::find().count(db).await?;
    if existing > 0 {
        info!(existing, "store already holds data; skipping seed");
        return Ok(SeedSummary {
            skipped: true,
            ..SeedSummary::default()
        });
    }

    let txn = db.begin().await?;
    let summary = insert_all(&txn).await?;
    txn.commit().await?;

    info!(?summary, "sample data inserted");
    Ok(summary)
}

async fn insert_all<C: ConnectionTrait>(db: &C) -> Result<SeedSummary, ServiceError> {
    let mut summary = SeedSummary::default();

    let mut category_ids = Vec::new();
    for (name, description) in CATEGORIES {
        let created = category::ActiveModel {
            category_id: NotSet,
            category_name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
        }
        .insert(db)
        .await?;
        category_ids.push(created.category_id);
    }
    summary.categories = category_ids.len();

    let mut supplier_ids = Vec::new();
    for (company, contact, city, country, phone) in SUPPLIERS {
        let created = supplier::ActiveModel {
            supplier_id: NotSet,
            company_name: Set(company.to_string()),
            contact_name: Set(Some(contact.to_string())),
            contact_title: Set(None),
            address: Set(None),
            city: Set(Some(city.to_string())),
            region: Set(None),
            postal_code: Set(None),
            country: Set(Some(country.to_string())),
            phone: Set(Some(phone.to_string())),
            fax: Set(None),
            home_page: Set(None),
        }
        .insert(db)
        .await?;
        supplier_ids.push(created.supplier_id);
    }
    summary.suppliers = supplier_ids.len();

    let mut product_ids = Vec::new();
    let mut product_prices = Vec::new();
    for row in products() {
        let created = product::ActiveModel {
            product_id: NotSet,
            product_name: Set(row.name.to_string()),
            supplier_id: Set(Some(lookup(&supplier_ids, row.supplier, "supplier")?)),
            category_id: Set(Some(lookup(&category_ids, row.category, "category")?)),
            quantity_per_unit: Set(Some(row.quantity_per_unit.to_string())),
            unit_price: Set(Some(row.unit_price)),
            units_in_stock: Set(Some(row.units_in_stock)),
            units_on_order: Set(Some(row.units_on_order)),
            reorder_level: Set(Some(row.reorder_level)),
            discontinued: Set(row.discontinued),
        }
        .insert(db)
        .await?;
        product_ids.push(created.product_id);
        product_prices.push(row.unit_price);
    }
    summary.products = product_ids.len();

    for model in customers() {
        let ship_to = model.clone();
        customer::ActiveModel {
            customer_id: Set(model.customer_id),
            company_name: Set(model.company_name),
            contact_name: Set(model.contact_name),
            contact_title: Set(model.contact_title),
            address: Set(model.address),
            city: Set(model.city),
            region: Set(model.region),
            postal_code: Set(model.postal_code),
            country: Set(model.country),
            phone: Set(model.phone),
            fax: Set(model.fax),
        }
        .insert(db)
        .await?;
        summary.customers += 1;

        for row in orders().iter().filter(|o| o.customer_id == ship_to.customer_id) {
            let created = order::ActiveModel {
                order_id: NotSet,
                customer_id: Set(Some(ship_to.customer_id.clone())),
                employee_id: Set(None),
                order_date: Set(date(row.ordered)),
                required_date: Set(None),
                shipped_date: Set(None),
                ship_via: Set(Some(1)),
                freight: Set(Some(row.freight)),
                ship_name: Set(Some(ship_to.company_name.clone())),
                ship_address: Set(ship_to.address.clone()),
                ship_city: Set(ship_to.city.clone()),
                ship_region: Set(ship_to.region.clone()),
                ship_postal_code: Set(ship_to.postal_code.clone()),
                ship_country: Set(ship_to.country.clone()),
            }
            .insert(db)
            .await?;
            summary.orders += 1;

            for &(position, quantity, discount) in row.lines {
                order_detail::ActiveModel {
                    order_id: Set(created.order_id),
                    product_id: Set(lookup(&product_ids, position, "product")?),
                    unit_price: Set(lookup(&product_prices, position, "product")?),
                    quantity: Set(quantity),
                    discount: Set(discount),
                }
                .insert(db)
                .await?;
                summary.order_details += 1;
            }
        }
    }

    customer_demographic::ActiveModel {
        customer_type_id: Set("REPEAT".to_string()),
        customer_desc: Set(Some("Customers with repeat orders".to_string())),
    }
    .insert(db)
    .await?;
    customer_customer_demo::ActiveModel {
        customer_id: Set("ALFKI".to_string()),
        customer_type_id: Set("REPEAT".to_string()),
    }
    .insert(db)
    .await?;

    Ok(summary)
}
