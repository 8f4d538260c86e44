mod command;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::{OrderQueryService, OrderQueryServiceDeps};

use crate::{
    abstract_trait::order::repository::{DynOrderItemQueryRepository, DynOrderQueryRepository},
    domain::response::order::OrderResponse,
    model::order_item::OrderItemDetail,
};
use shared::errors::ServiceError;
use std::collections::HashMap;
use tracing::error;

/// Items of one order. A failed read is logged and yields an empty list.
pub(crate) async fn items_or_empty(
    items: &DynOrderItemQueryRepository,
    order_id: i32,
) -> Vec<OrderItemDetail> {
    match items.find_by_order(order_id).await {
        Ok(rows) => rows,
        Err(err) => {
            error!("❌ Failed to load items of order {order_id}: {err}");
            Vec::new()
        }
    }
}

/// Items of several orders grouped by order id, fetched in one query.
/// A failed read is logged and yields no items for any of them.
pub(crate) async fn items_by_order(
    items: &DynOrderItemQueryRepository,
    order_ids: &[i32],
) -> HashMap<i32, Vec<OrderItemDetail>> {
    let rows = match items.find_by_orders(order_ids).await {
        Ok(rows) => rows,
        Err(err) => {
            error!(
                "❌ Failed to load items of {} orders: {err}",
                order_ids.len()
            );
            Vec::new()
        }
    };

    let mut grouped: HashMap<i32, Vec<OrderItemDetail>> = HashMap::new();
    for item in rows {
        grouped.entry(item.order_id).or_default().push(item);
    }
    grouped
}

/// Header plus items; `NotFound` when the header is absent.
pub(crate) async fn load_order(
    query: &DynOrderQueryRepository,
    items: &DynOrderItemQueryRepository,
    order_id: i32,
) -> Result<OrderResponse, ServiceError> {
    let order = query
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order with id {order_id} not found")))?;

    let lines = items_or_empty(items, order_id).await;
    Ok(OrderResponse::with_items(order, lines))
}
