mod command;
mod query;
pub mod stock;

pub use self::command::ProductCommandRepository;
pub use self::query::ProductQueryRepository;
