use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{empty_string_as_none, required_text};

/// A Northwind customer, keyed by a five-letter code such as `ALFKI`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(default)]
    #[validate(regex(
        path = "crate::validation::CUSTOMER_ID_PATTERN",
        message = "Customer ID must be exactly five uppercase letters"
    ))]
    pub customer_id: String,

    #[serde(default)]
    #[validate(
        custom = "required_text",
        length(max = 40, message = "Company name cannot exceed 40 characters")
    )]
    pub company_name: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 30, message = "Contact name cannot exceed 30 characters"))]
    pub contact_name: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 30, message = "Contact title cannot exceed 30 characters"))]
    pub contact_title: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 60, message = "Address cannot exceed 60 characters"))]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 15, message = "City cannot exceed 15 characters"))]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 15, message = "Region cannot exceed 15 characters"))]
    pub region: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 10, message = "Postal code cannot exceed 10 characters"))]
    pub postal_code: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 15, message = "Country cannot exceed 15 characters"))]
    pub country: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 24, message = "Phone cannot exceed 24 characters"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 24, message = "Fax cannot exceed 24 characters"))]
    pub fax: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(has_many = "super::customer_customer_demo::Entity")]
    CustomerCustomerDemo,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::customer_customer_demo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerCustomerDemo.def()
    }
}

impl Related<super::customer_demographic::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_customer_demo::Relation::CustomerDemographic.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_customer_demo::Relation::Customer.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
