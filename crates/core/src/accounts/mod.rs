pub mod accounts_model;
pub mod accounts_service;
pub mod accounts_traits;


pub use accounts_model::*;
pub use accounts_service::*;
pub use accounts_traits::*;
