use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::entities::customer::{
    ActiveModel as CustomerActiveModel, Column, Entity as Customer, Model as CustomerModel,
};
use crate::entities::order::{self, Entity as Order};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Customer identifiers are stored upper-case.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

fn active_model(customer_id: String, customer: CustomerModel, insert: bool) -> CustomerActiveModel {
    CustomerActiveModel {
        customer_id: if insert {
            Set(customer_id)
        } else {
            Unchanged(customer_id)
        },
        company_name: Set(customer.company_name),
        contact_name: Set(customer.contact_name),
        contact_title: Set(customer.contact_title),
        address: Set(customer.address),
        city: Set(customer.city),
        region: Set(customer.region),
        postal_code: Set(customer.postal_code),
        country: Set(customer.country),
        phone: Set(customer.phone),
        fax: Set(customer.fax),
    }
}

/// Pass-through CRUD for customers
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve_all(&self) -> Result<Vec<CustomerModel>, ServiceError> {
        let customers = Customer::find()
            .order_by_asc(Column::CustomerId)
            .all(self.get_db())
            .await?;
        debug!(count = customers.len(), "retrieved customers");
        Ok(customers)
    }

    /// Customers whose country equals `country` exactly.
    #[instrument(skip(self))]
    pub async fn retrieve_by_country(
        &self,
        country: &str,
    ) -> Result<Vec<CustomerModel>, ServiceError> {
        Ok(Customer::find()
            .filter(Column::Country.eq(country))
            .order_by_asc(Column::CustomerId)
            .all(self.get_db())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, id: &str) -> Result<Option<CustomerModel>, ServiceError> {
        Ok(Customer::find_by_id(normalize_id(id))
            .one(self.get_db())
            .await?)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(Customer::find_by_id(normalize_id(id))
            .count(self.get_db())
            .await?
            > 0)
    }

    /// Inserts a new customer; an existing id is a conflict.
    #[instrument(skip(self, customer), fields(customer_id = %customer.customer_id))]
    pub async fn create(&self, customer: CustomerModel) -> Result<CustomerModel, ServiceError> {
        let id = normalize_id(&customer.customer_id);
        if self.exists(&id).await? {
            return Err(ServiceError::Conflict(format!(
                "Customer with ID {} already exists",
                id
            )));
        }

        let created = active_model(id.clone(), customer, true)
            .insert(self.get_db())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    ServiceError::Conflict(format!("Customer with ID {} already exists", id))
                }
                _ => ServiceError::DatabaseError(e),
            })?;

        info!(customer_id = %created.customer_id, "customer created");
        Ok(created)
    }

    /// Replaces every column of an existing customer.
    #[instrument(skip(self, customer))]
    pub async fn update(
        &self,
        id: &str,
        customer: CustomerModel,
    ) -> Result<CustomerModel, ServiceError> {
        let id = normalize_id(id);
        match active_model(id.clone(), customer, false)
            .update(self.get_db())
            .await
        {
            Ok(updated) => {
                info!(customer_id = %updated.customer_id, "customer updated");
                Ok(updated)
            }
            Err(DbErr::RecordNotUpdated) => {
                // Nothing matched: the row is gone, or changed underneath us.
                if self.exists(&id).await? {
                    warn!(customer_id = %id, "customer update affected no rows");
                    Err(ServiceError::Conflict(format!(
                        "Customer with ID {} was modified concurrently",
                        id
                    )))
                } else {
                    Err(ServiceError::NotFound(format!(
                        "Customer with ID {} not found",
                        id
                    )))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a customer that has no orders.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = normalize_id(id);
        let customer = self
            .retrieve(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))?;

        let orders = Order::find()
            .filter(order::Column::CustomerId.eq(id.as_str()))
            .count(self.get_db())
            .await?;
        if orders > 0 {
            return Err(ServiceError::Conflict(format!(
                "Customer {} has {} order(s) and cannot be deleted",
                id, orders
            )));
        }

        customer
            .delete(self.get_db())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::Conflict(format!(
                    "Customer {} is still referenced and cannot be deleted",
                    id
                )),
                _ => ServiceError::DatabaseError(e),
            })?;

        info!(customer_id = %id, "customer deleted");
        Ok(())
    }
}

impl Repository for CustomerRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed_and_upper_cased() {
        assert_eq!(normalize_id(" alfki "), "ALFKI");
        assert_eq!(normalize_id("BONAP"), "BONAP");
    }
}
