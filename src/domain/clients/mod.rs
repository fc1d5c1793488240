//! Clients

pub mod data;
pub mod errors;
pub mod listing;
pub mod models;
mod repository;
pub mod service;

pub use errors::ClientsServiceError;
pub use service::*;
