//! Northwind tables as sea-orm entities.

pub mod category;
pub mod customer;
pub mod customer_customer_demo;
pub mod customer_demographic;
pub mod order;
pub mod order_detail;
pub mod product;
pub mod supplier;

pub use category::Entity as Category;
pub use customer::Entity as Customer;
pub use customer_customer_demo::Entity as CustomerCustomerDemo;
pub use customer_demographic::Entity as CustomerDemographic;
pub use order::Entity as Order;
pub use order_detail::Entity as OrderDetail;
pub use product::Entity as Product;
pub use supplier::Entity as Supplier;
