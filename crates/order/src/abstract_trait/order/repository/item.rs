use crate::model::order_item::OrderItemDetail;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderItemQueryRepository = Arc<dyn OrderItemQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderItemQueryRepositoryTrait {
    async fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemDetail>, RepositoryError>;

    /// Items of several orders in one round trip, ordered by order then item id.
    async fn find_by_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderItemDetail>, RepositoryError>;
}
