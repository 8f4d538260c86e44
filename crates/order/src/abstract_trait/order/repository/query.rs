use crate::{
    domain::requests::order::OrderFilter,
    model::order::{Order as OrderModel, OrderStatusCount},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError>;

    /// Newest first.
    async fn find_all(
        &self,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderModel>, RepositoryError>;

    async fn count(&self, filter: &OrderFilter) -> Result<i64, RepositoryError>;

    async fn count_by_status(&self) -> Result<Vec<OrderStatusCount>, RepositoryError>;

    /// Sum of `total_amount` over paid orders, zero when there are none.
    async fn total_revenue(&self) -> Result<Decimal, RepositoryError>;
}
