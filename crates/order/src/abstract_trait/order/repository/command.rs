use crate::{
    abstract_trait::order::repository::DynOrderTransaction,
    domain::requests::order::UpdateOrderStatusRecordRequest,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Opens a transaction for a multi-statement write.
    async fn begin(&self) -> Result<DynOrderTransaction, RepositoryError>;

    /// Updates only the supplied fields; `false` when no row matched.
    async fn update_status(
        &self,
        req: &UpdateOrderStatusRecordRequest,
    ) -> Result<bool, RepositoryError>;
}
