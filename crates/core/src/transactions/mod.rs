pub mod transactions_model;
pub mod transactions_service;
pub mod transactions_traits;

pub use transactions_model::*;
pub use transactions_service::*;
pub use transactions_traits::*;
