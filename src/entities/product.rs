use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{non_negative_decimal, required_text};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Assigned by the store on insert; ignored in create payloads
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub product_id: i32,

    #[serde(default)]
    #[validate(
        custom = "required_text",
        length(max = 40, message = "Product name cannot exceed 40 characters")
    )]
    pub product_name: String,

    #[serde(default)]
    pub supplier_id: Option<i32>,

    #[serde(default)]
    pub category_id: Option<i32>,

    #[serde(default)]
    #[validate(length(max = 20, message = "Quantity per unit cannot exceed 20 characters"))]
    pub quantity_per_unit: Option<String>,

    #[serde(default)]
    #[validate(custom = "non_negative_decimal")]
    pub unit_price: Option<Decimal>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Units in stock cannot be negative"))]
    pub units_in_stock: Option<i16>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Units on order cannot be negative"))]
    pub units_on_order: Option<i16>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i16>,

    #[serde(default)]
    pub discontinued: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::CategoryId"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::SupplierId"
    )]
    Supplier,
    #[sea_orm(has_many = "super::order_detail::Entity")]
    OrderDetails,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::order_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;
    use rust_decimal_macros::dec;

    fn chai() -> Model {
        Model {
            product_id: 1,
            product_name: "Chai".into(),
            supplier_id: Some(1),
            category_id: Some(1),
            quantity_per_unit: Some("10 boxes x 20 bags".into()),
            unit_price: Some(dec!(18.00)),
            units_in_stock: Some(39),
            units_on_order: Some(0),
            reorder_level: Some(10),
            discontinued: false,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(check(&chai()).is_ok());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut product = chai();
        product.unit_price = Some(dec!(-0.01));
        product.units_in_stock = Some(-1);
        let errors = check(&product).unwrap_err();
        assert!(errors.contains_field("unit_price"));
        assert!(errors.contains_field("units_in_stock"));
    }

    #[test]
    fn create_payload_without_id_defaults_to_zero() {
        let product: Model =
            serde_json::from_str(r#"{"product_name":"Tofu","unit_price":"23.25"}"#).unwrap();
        assert_eq!(product.product_id, 0);
        assert_eq!(product.unit_price, Some(dec!(23.25)));
        assert!(!product.discontinued);
    }
}
