pub mod memory;
pub mod order;
pub mod product;
