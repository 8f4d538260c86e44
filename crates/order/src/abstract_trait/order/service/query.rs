use crate::domain::{
    requests::order::FindAllOrder,
    response::{
        api::ApiResponse,
        order::{OrderListResponse, OrderResponse},
        stats::OrderStatsResponse,
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllOrder,
    ) -> Result<ApiResponse<OrderListResponse>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn get_stats(&self) -> Result<ApiResponse<OrderStatsResponse>, ServiceError>;
}
