//! JSON handlers of the Northwind service.

pub mod common;
pub mod customers;
pub mod orders;
pub mod products;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
