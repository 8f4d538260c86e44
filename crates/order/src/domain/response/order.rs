use crate::{
    domain::response::{order_item::OrderItemResponse, pagination::Pagination},
    model::{
        order::{Order as OrderModel, OrderStatus, PaymentStatus},
        order_item::OrderItemDetail,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub phone: String,
    pub email: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn with_items(order: OrderModel, items: Vec<OrderItemDetail>) -> Self {
        let mut response = OrderResponse::from(order);
        response.items = items.into_iter().map(OrderItemResponse::from).collect();
        response
    }
}

// header only; items are attached by the caller
impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            id: value.id,
            user_id: value.user_id,
            total_amount: value.total_amount,
            shipping_address: value.shipping_address,
            phone: value.phone,
            email: value.email,
            status: value.status,
            payment_status: value.payment_status,
            payment_method: value.payment_method,
            notes: value.notes,
            created_at: value.created_at.to_string(),
            updated_at: value.updated_at.to_string(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: Pagination,
}
