use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog_tables::Migration),
            Box::new(m20240301_000002_create_customer_tables::Migration),
            Box::new(m20240301_000003_create_order_tables::Migration),
            Box::new(m20240301_000004_create_lookup_indexes::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    CategoryId,
    CategoryName,
    Description,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    SupplierId,
    CompanyName,
    ContactName,
    ContactTitle,
    Address,
    City,
    Region,
    PostalCode,
    Country,
    Phone,
    Fax,
    HomePage,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    ProductId,
    ProductName,
    SupplierId,
    CategoryId,
    QuantityPerUnit,
    UnitPrice,
    UnitsInStock,
    UnitsOnOrder,
    ReorderLevel,
    Discontinued,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    CustomerId,
    CompanyName,
    ContactName,
    ContactTitle,
    Address,
    City,
    Region,
    PostalCode,
    Country,
    Phone,
    Fax,
}

#[derive(DeriveIden)]
enum CustomerDemographics {
    Table,
    CustomerTypeId,
    CustomerDesc,
}

#[derive(DeriveIden)]
enum CustomerCustomerDemo {
    Table,
    CustomerId,
    CustomerTypeId,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    OrderId,
    CustomerId,
    EmployeeId,
    OrderDate,
    RequiredDate,
    ShippedDate,
    ShipVia,
    Freight,
    ShipName,
    ShipAddress,
    ShipCity,
    ShipRegion,
    ShipPostalCode,
    ShipCountry,
}

#[derive(DeriveIden)]
enum OrderDetails {
    Table,
    OrderId,
    ProductId,
    UnitPrice,
    Quantity,
    Discount,
}

mod m20240301_000001_create_catalog_tables {
    use super::{Categories, Products, Suppliers};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::CategoryId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::CategoryName)
                                .string_len(15)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Description).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::SupplierId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::CompanyName)
                                .string_len(40)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::ContactName).string_len(30).null())
                        .col(ColumnDef::new(Suppliers::ContactTitle).string_len(30).null())
                        .col(ColumnDef::new(Suppliers::Address).string_len(60).null())
                        .col(ColumnDef::new(Suppliers::City).string_len(15).null())
                        .col(ColumnDef::new(Suppliers::Region).string_len(15).null())
                        .col(ColumnDef::new(Suppliers::PostalCode).string_len(10).null())
                        .col(ColumnDef::new(Suppliers::Country).string_len(15).null())
                        .col(ColumnDef::new(Suppliers::Phone).string_len(24).null())
                        .col(ColumnDef::new(Suppliers::Fax).string_len(24).null())
                        .col(ColumnDef::new(Suppliers::HomePage).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::ProductId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Products::ProductName)
                                .string_len(40)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::SupplierId).integer().null())
                        .col(ColumnDef::new(Products::CategoryId).integer().null())
                        .col(
                            ColumnDef::new(Products::QuantityPerUnit)
                                .string_len(20)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Products::UnitPrice)
                                .decimal_len(19, 4)
                                .null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::UnitsInStock)
                                .small_integer()
                                .null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::UnitsOnOrder)
                                .small_integer()
                                .null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::ReorderLevel)
                                .small_integer()
                                .null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::Discontinued)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_categories")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::CategoryId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_suppliers")
                                .from(Products::Table, Products::SupplierId)
                                .to(Suppliers::Table, Suppliers::SupplierId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000002_create_customer_tables {
    use super::{CustomerCustomerDemo, CustomerDemographics, Customers};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_customer_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::CustomerId)
                                .string_len(5)
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Customers::CompanyName)
                                .string_len(40)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::ContactName).string_len(30).null())
                        .col(ColumnDef::new(Customers::ContactTitle).string_len(30).null())
                        .col(ColumnDef::new(Customers::Address).string_len(60).null())
                        .col(ColumnDef::new(Customers::City).string_len(15).null())
                        .col(ColumnDef::new(Customers::Region).string_len(15).null())
                        .col(ColumnDef::new(Customers::PostalCode).string_len(10).null())
                        .col(ColumnDef::new(Customers::Country).string_len(15).null())
                        .col(ColumnDef::new(Customers::Phone).string_len(24).null())
                        .col(ColumnDef::new(Customers::Fax).string_len(24).null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CustomerDemographics::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CustomerDemographics::CustomerTypeId)
                                .string_len(10)
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CustomerDemographics::CustomerDesc).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CustomerCustomerDemo::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CustomerCustomerDemo::CustomerId)
                                .string_len(5)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerCustomerDemo::CustomerTypeId)
                                .string_len(10)
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(CustomerCustomerDemo::CustomerId)
                                .col(CustomerCustomerDemo::CustomerTypeId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customer_customer_demo_customers")
                                .from(CustomerCustomerDemo::Table, CustomerCustomerDemo::CustomerId)
                                .to(Customers::Table, Customers::CustomerId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customer_customer_demo_demographics")
                                .from(
                                    CustomerCustomerDemo::Table,
                                    CustomerCustomerDemo::CustomerTypeId,
                                )
                                .to(
                                    CustomerDemographics::Table,
                                    CustomerDemographics::CustomerTypeId,
                                )
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CustomerCustomerDemo::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CustomerDemographics::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000003_create_order_tables {
    use super::{Customers, OrderDetails, Orders, Products};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Deleting a customer that still has orders must fail, never cascade
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::OrderId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::CustomerId).string_len(5).null())
                        .col(ColumnDef::new(Orders::EmployeeId).integer().null())
                        .col(ColumnDef::new(Orders::OrderDate).timestamp().null())
                        .col(ColumnDef::new(Orders::RequiredDate).timestamp().null())
                        .col(ColumnDef::new(Orders::ShippedDate).timestamp().null())
                        .col(ColumnDef::new(Orders::ShipVia).integer().null())
                        .col(
                            ColumnDef::new(Orders::Freight)
                                .decimal_len(19, 4)
                                .null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::ShipName).string_len(40).null())
                        .col(ColumnDef::new(Orders::ShipAddress).string_len(60).null())
                        .col(ColumnDef::new(Orders::ShipCity).string_len(15).null())
                        .col(ColumnDef::new(Orders::ShipRegion).string_len(15).null())
                        .col(ColumnDef::new(Orders::ShipPostalCode).string_len(10).null())
                        .col(ColumnDef::new(Orders::ShipCountry).string_len(15).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customers")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::CustomerId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderDetails::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OrderDetails::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderDetails::ProductId).integer().not_null())
                        .col(
                            ColumnDef::new(OrderDetails::UnitPrice)
                                .decimal_len(19, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderDetails::Quantity)
                                .small_integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(OrderDetails::Discount)
                                .float()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(OrderDetails::OrderId)
                                .col(OrderDetails::ProductId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_orders")
                                .from(OrderDetails::Table, OrderDetails::OrderId)
                                .to(Orders::Table, Orders::OrderId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_products")
                                .from(OrderDetails::Table, OrderDetails::ProductId)
                                .to(Products::Table, Products::ProductId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000004_create_lookup_indexes {
    use super::{Customers, OrderDetails, Orders, Products};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_lookup_indexes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_country")
                        .table(Customers::Table)
                        .col(Customers::Country)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .col(Orders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_details_product_id")
                        .table(OrderDetails::Table)
                        .col(OrderDetails::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_index(
                    Index::drop()
                        .name("idx_order_details_product_id")
                        .table(OrderDetails::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_index(
                    Index::drop()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_index(
                    Index::drop()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_index(
                    Index::drop()
                        .name("idx_customers_country")
                        .table(Customers::Table)
                        .to_owned(),
                )
                .await
        }
    }
}
