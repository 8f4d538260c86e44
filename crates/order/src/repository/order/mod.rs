mod command;
mod item;
mod query;
mod transaction;

pub use self::command::OrderCommandRepository;
pub use self::item::OrderItemQueryRepository;
pub use self::query::OrderQueryRepository;
pub use self::transaction::PgOrderTransaction;
