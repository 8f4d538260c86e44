mod command;
mod item;
mod query;
mod transaction;

pub use self::command::{DynOrderCommandRepository, OrderCommandRepositoryTrait};
pub use self::item::{DynOrderItemQueryRepository, OrderItemQueryRepositoryTrait};
pub use self::query::{DynOrderQueryRepository, OrderQueryRepositoryTrait};
pub use self::transaction::{DynOrderTransaction, OrderTransactionTrait};
