use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, JoinType, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::entities::category::{self, Entity as Category, Model as CategoryModel};
use crate::entities::order_detail::{self, Entity as OrderDetail};
use crate::entities::product::{
    ActiveModel as ProductActiveModel, Column, Entity as Product, Model as ProductModel, Relation,
};
use crate::entities::supplier::{self, Entity as Supplier, Model as SupplierModel};
use crate::errors::ServiceError;
use crate::listing::{ProductSortColumn, ProductSortKey, SortDirection};
use crate::repositories::Repository;
use crate::validation::FieldErrors;

use super::BaseRepository;

/// A product together with the rows its foreign keys point at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithRefs {
    pub product: ProductModel,
    pub category: Option<CategoryModel>,
    pub supplier: Option<SupplierModel>,
}

fn active_model(product: ProductModel, id: Option<i32>) -> ProductActiveModel {
    ProductActiveModel {
        product_id: match id {
            Some(id) => Unchanged(id),
            None => NotSet,
        },
        product_name: Set(product.product_name),
        supplier_id: Set(product.supplier_id),
        category_id: Set(product.category_id),
        quantity_per_unit: Set(product.quantity_per_unit),
        unit_price: Set(product.unit_price),
        units_in_stock: Set(product.units_in_stock),
        units_on_order: Set(product.units_on_order),
        reorder_level: Set(product.reorder_level),
        discontinued: Set(product.discontinued),
    }
}

/// Products, plus the categories and suppliers they reference
#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All products, or only those in `category_id`, ordered by id.
    #[instrument(skip(self))]
    pub async fn list(&self, category_id: Option<i32>) -> Result<Vec<ProductModel>, ServiceError> {
        let mut query = Product::find();
        if let Some(category_id) = category_id {
            query = query.filter(Column::CategoryId.eq(category_id));
        }
        Ok(query
            .order_by_asc(Column::ProductId)
            .all(self.get_db())
            .await?)
    }

    /// Filters by product name, category name or supplier company name and
    /// orders by one sort key. Matching follows the store's collation.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: Option<&str>,
        sort: ProductSortKey,
    ) -> Result<Vec<ProductWithRefs>, ServiceError> {
        let mut query = Product::find()
            .join(JoinType::LeftJoin, Relation::Category.def())
            .join(JoinType::LeftJoin, Relation::Supplier.def());

        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(Column::ProductName.contains(term))
                    .add(category::Column::CategoryName.contains(term))
                    .add(supplier::Column::CompanyName.contains(term)),
            );
        }

        let order = match sort.direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        query = match sort.column {
            ProductSortColumn::Category => query.order_by(category::Column::CategoryName, order),
            ProductSortColumn::Supplier => query.order_by(supplier::Column::CompanyName, order),
            ProductSortColumn::Product => query.order_by(Column::ProductName, order),
            ProductSortColumn::UnitPrice => query.order_by(Column::UnitPrice, order),
            ProductSortColumn::UnitInStock => query.order_by(Column::UnitsInStock, order),
        };

        let products = query
            .order_by_asc(Column::ProductId)
            .all(self.get_db())
            .await?;
        debug!(count = products.len(), "product search");

        self.attach_refs(products).await
    }

    /// Loads the categories and suppliers of `products` with one query each.
    async fn attach_refs(
        &self,
        products: Vec<ProductModel>,
    ) -> Result<Vec<ProductWithRefs>, ServiceError> {
        let category_ids: HashSet<i32> = products.iter().filter_map(|p| p.category_id).collect();
        let supplier_ids: HashSet<i32> = products.iter().filter_map(|p| p.supplier_id).collect();

        let categories: HashMap<i32, CategoryModel> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            Category::find()
                .filter(category::Column::CategoryId.is_in(category_ids))
                .all(self.get_db())
                .await?
                .into_iter()
                .map(|c| (c.category_id, c))
                .collect()
        };
        let suppliers: HashMap<i32, SupplierModel> = if supplier_ids.is_empty() {
            HashMap::new()
        } else {
            Supplier::find()
                .filter(supplier::Column::SupplierId.is_in(supplier_ids))
                .all(self.get_db())
                .await?
                .into_iter()
                .map(|s| (s.supplier_id, s))
                .collect()
        };

        Ok(products
            .into_iter()
            .map(|product| ProductWithRefs {
                category: product
                    .category_id
                    .and_then(|id| categories.get(&id).cloned()),
                supplier: product
                    .supplier_id
                    .and_then(|id| suppliers.get(&id).cloned()),
                product,
            })
            .collect())
    }

    pub async fn find(&self, id: i32) -> Result<Option<ProductModel>, ServiceError> {
        Ok(Product::find_by_id(id).one(self.get_db()).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_with_refs(&self, id: i32) -> Result<Option<ProductWithRefs>, ServiceError> {
        match self.find(id).await? {
            Some(product) => Ok(self.attach_refs(vec![product]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(Product::find_by_id(id).count(self.get_db()).await? > 0)
    }

    /// Field errors for category/supplier ids that point at nothing.
    pub async fn check_references(&self, product: &ProductModel) -> Result<FieldErrors, ServiceError> {
        let mut errors = FieldErrors::new();
        if let Some(id) = product.category_id {
            if Category::find_by_id(id).count(self.get_db()).await? == 0 {
                errors.push("category_id", format!("Category {} does not exist", id));
            }
        }
        if let Some(id) = product.supplier_id {
            if Supplier::find_by_id(id).count(self.get_db()).await? == 0 {
                errors.push("supplier_id", format!("Supplier {} does not exist", id));
            }
        }
        Ok(errors)
    }

    /// Inserts a product; the store assigns its id.
    #[instrument(skip(self, product), fields(product_name = %product.product_name))]
    pub async fn create(&self, product: ProductModel) -> Result<ProductModel, ServiceError> {
        let created = active_model(product, None).insert(self.get_db()).await?;
        info!(product_id = created.product_id, "product created");
        Ok(created)
    }

    #[instrument(skip(self, product))]
    pub async fn update(&self, id: i32, product: ProductModel) -> Result<ProductModel, ServiceError> {
        match active_model(product, Some(id)).update(self.get_db()).await {
            Ok(updated) => {
                info!(product_id = updated.product_id, "product updated");
                Ok(updated)
            }
            Err(DbErr::RecordNotUpdated) => {
                if self.exists(id).await? {
                    warn!(product_id = id, "product update affected no rows");
                    Err(ServiceError::Conflict(format!(
                        "Product with ID {} was modified concurrently",
                        id
                    )))
                } else {
                    Err(ServiceError::NotFound(format!(
                        "Product with ID {} not found",
                        id
                    )))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a product no order line refers to.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let product = self
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;

        let lines = OrderDetail::find()
            .filter(order_detail::Column::ProductId.eq(id))
            .count(self.get_db())
            .await?;
        if lines > 0 {
            return Err(ServiceError::Conflict(format!(
                "Product {} appears on {} order line(s) and cannot be deleted",
                id, lines
            )));
        }

        product
            .delete(self.get_db())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::Conflict(format!(
                    "Product {} is still referenced and cannot be deleted",
                    id
                )),
                _ => ServiceError::DatabaseError(e),
            })?;

        info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn categories(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Ok(Category::find()
            .order_by_asc(category::Column::CategoryId)
            .all(self.get_db())
            .await?)
    }

    pub async fn suppliers(&self) -> Result<Vec<SupplierModel>, ServiceError> {
        Ok(Supplier::find()
            .order_by_asc(supplier::Column::SupplierId)
            .all(self.get_db())
            .await?)
    }

    pub async fn category(&self, id: i32) -> Result<Option<CategoryModel>, ServiceError> {
        Ok(Category::find_by_id(id).one(self.get_db()).await?)
    }

    /// Products of one category, loaded through the category's relation.
    pub async fn products_in_category(
        &self,
        category: &CategoryModel,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(category
            .find_related(Product)
            .order_by_asc(Column::ProductId)
            .all(self.get_db())
            .await?)
    }
}

impl Repository for ProductRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
