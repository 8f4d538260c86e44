pub mod repository;
mod service;

pub use self::service::{DynProductService, ProductServiceTrait};
