use crate::{
    domain::response::order::OrderResponse,
    model::order::{OrderStatus, OrderStatusCount},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct StatusCountResponse {
    pub status: OrderStatus,
    pub count: i64,
}

impl From<OrderStatusCount> for StatusCountResponse {
    fn from(value: OrderStatusCount) -> Self {
        StatusCountResponse {
            status: value.status,
            count: value.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatsResponse {
    pub total_orders: i64,
    pub orders_by_status: Vec<StatusCountResponse>,
    pub recent_orders: Vec<OrderResponse>,
    pub total_revenue: Decimal,
}
