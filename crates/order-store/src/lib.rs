//! Durable persistence for order aggregates.
//!
//! An order and its line items are always written as a unit inside one
//! transaction; a failure while inserting items rolls the order back
//! too. The store also owns the daily order-number sequence and the
//! minimal customer lookup the creation workflow needs.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::{Customer, CustomerStore, OrderFilter, OrderStore};
