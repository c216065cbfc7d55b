use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_demographics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub customer_type_id: String,
    pub customer_desc: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_customer_demo::Entity")]
    CustomerCustomerDemo,
}

impl Related<super::customer_customer_demo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerCustomerDemo.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_customer_demo::Relation::Customer.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_customer_demo::Relation::CustomerDemographic.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
