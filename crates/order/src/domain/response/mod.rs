pub mod api;
pub mod order;
pub mod order_item;
pub mod pagination;
pub mod product;
pub mod stats;
