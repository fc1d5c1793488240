//! SalesDesk
//!
//! Local client, product and order store for a small business: typed records
//! in an embedded SQLite file, sorted and filtered listings, and atomic order
//! placement with price snapshots.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod money;
pub mod observability;
pub mod postal;
pub mod query;
pub mod schema;
pub mod uuids;
pub mod validation;

pub use domain::{clients, orders, products};

#[cfg(test)]
mod test;
