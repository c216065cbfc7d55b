use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::order::{Column, Entity as Order, Model as OrderModel};
use crate::entities::order_detail::{self, Entity as OrderDetail, Model as OrderDetailModel};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Read access to orders and their lines, by foreign key
#[derive(Debug, Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, ServiceError> {
        Ok(Order::find_by_id(id).one(self.base.get_db()).await?)
    }

    /// Orders placed by one customer, oldest first
    pub async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<OrderModel>, ServiceError> {
        Ok(Order::find()
            .filter(Column::CustomerId.eq(customer_id))
            .order_by_asc(Column::OrderId)
            .all(self.base.get_db())
            .await?)
    }

    /// Lines of an order; `NotFound` when the order does not exist
    pub async fn order_details(&self, order_id: i32) -> Result<Vec<OrderDetailModel>, ServiceError> {
        let order = self.find_by_id(order_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Order with ID {} not found", order_id))
        })?;

        Ok(order
            .find_related(OrderDetail)
            .order_by_asc(order_detail::Column::ProductId)
            .all(self.base.get_db())
            .await?)
    }
}

impl Repository for OrderRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
