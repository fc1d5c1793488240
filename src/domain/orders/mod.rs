//! Orders

pub mod data;
pub mod errors;
pub mod listing;
pub mod models;
mod repositories;
pub mod service;
pub mod totals;

pub use errors::OrdersServiceError;
pub use service::*;
