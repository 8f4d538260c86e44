use crate::{
    abstract_trait::order::{
        repository::{
            DynOrderCommandRepository, DynOrderItemQueryRepository, DynOrderQueryRepository,
            OrderTransactionTrait,
        },
        service::OrderCommandServiceTrait,
    },
    domain::{
        policy::StockPolicy,
        requests::order::{
            CreateOrderItemRecordRequest, CreateOrderRecordRequest, CreateOrderRequest,
            UpdateOrderStatusRecordRequest, UpdateOrderStatusRequest,
        },
        response::{api::ApiResponse, order::OrderResponse},
    },
    service::order::load_order,
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, validation_messages},
};
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    items: DynOrderItemQueryRepository,
    policy: StockPolicy,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub items: DynOrderItemQueryRepository,
    pub policy: StockPolicy,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderCommandService {
    pub async fn new(deps: OrderCommandServiceDeps) -> Self {
        let OrderCommandServiceDeps {
            command,
            query,
            items,
            policy,
            registry,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(
            "order_command_service",
            "OrderCommandService",
            &mut *registry.lock().await,
        );

        Self {
            command,
            query,
            items,
            policy,
            metrics,
        }
    }

    fn complete(&self, started: Instant, method: Method, result: Result<&str, &ServiceError>) {
        let elapsed = started.elapsed().as_secs_f64();

        let status = match result {
            Ok(message) => {
                info!("✅ Operation completed successfully: {message}");
                StatusUtils::Success
            }
            Err(err) => {
                error!("❌ Operation failed: {err}");
                StatusUtils::Error
            }
        };

        self.metrics.record(method, status, elapsed);
    }

    /// Header, then per line item an insert followed by the stock decrement.
    async fn write_lines(
        tx: &mut dyn OrderTransactionTrait,
        req: &CreateOrderRequest,
        policy: StockPolicy,
    ) -> Result<i32, ServiceError> {
        let order_id = tx
            .insert_order(&CreateOrderRecordRequest::from(req))
            .await?;

        for item in &req.items {
            tx.insert_order_item(&CreateOrderItemRecordRequest {
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .await?;

            if !tx
                .decrement_stock(item.product_id, item.quantity, policy)
                .await?
            {
                return Err(match policy {
                    StockPolicy::Reject => ServiceError::InsufficientStock {
                        product_id: item.product_id,
                        requested: item.quantity,
                    },
                    StockPolicy::Permissive => ServiceError::NotFound(format!(
                        "Product with id {} not found",
                        item.product_id
                    )),
                });
            }
        }

        Ok(order_id)
    }

    /// Returns stock for every line item, then drops the header.
    async fn restock_and_delete(
        tx: &mut dyn OrderTransactionTrait,
        order_id: i32,
    ) -> Result<bool, ServiceError> {
        let lines = tx.find_order_items(order_id).await?;

        for line in &lines {
            tx.increment_stock(line.product_id, line.quantity).await?;
        }

        Ok(tx.delete_order(order_id).await?)
    }

    async fn create_in_transaction(&self, req: &CreateOrderRequest) -> Result<i32, ServiceError> {
        let mut tx = self.command.begin().await?;

        match Self::write_lines(tx.as_mut(), req, self.policy).await {
            Ok(order_id) => {
                tx.commit().await?;
                Ok(order_id)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("❌ Rollback after failed create also failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    async fn delete_in_transaction(&self, order_id: i32) -> Result<bool, ServiceError> {
        let mut tx = self.command.begin().await?;

        match Self::restock_and_delete(tx.as_mut(), order_id).await {
            Ok(true) => {
                tx.commit().await?;
                Ok(true)
            }
            Ok(false) => {
                tx.rollback().await?;
                Ok(false)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("❌ Rollback after failed delete also failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let method = Method::Post;
        let started = Instant::now();
        info!("🏗️ Creating new order for user_id={}", req.user_id);

        if let Err(errors) = req.validate() {
            let err = ServiceError::Validation(validation_messages(&errors));
            self.complete(started, method, Err(&err));
            return Err(err);
        }

        match req.items_total() {
            Some(items_total) if items_total != req.total_amount => warn!(
                "⚠️ Order for user_id={} declares total_amount={} but items sum to {}",
                req.user_id, req.total_amount, items_total
            ),
            Some(_) => {}
            None => warn!(
                "⚠️ Item sum of order for user_id={} overflows; keeping total_amount={}",
                req.user_id, req.total_amount
            ),
        }

        let order_id = match self.create_in_transaction(req).await {
            Ok(order_id) => order_id,
            Err(err) => {
                self.complete(started, method, Err(&err));
                return Err(err);
            }
        };

        match load_order(&self.query, &self.items, order_id).await {
            Ok(order) => {
                self.complete(started, method, Ok("Order created"));
                Ok(ApiResponse::success("Order created successfully", order))
            }
            Err(err) => {
                self.complete(started, method, Err(&err));
                Err(err)
            }
        }
    }

    async fn update_status(
        &self,
        id: i32,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let method = Method::Put;
        let started = Instant::now();
        info!("✏️ Updating status of order ID={id}");

        let result = async {
            if req.is_empty() {
                return Err(ServiceError::Validation(vec![
                    "status or paymentStatus is required".to_string(),
                ]));
            }

            let updated = self
                .command
                .update_status(&UpdateOrderStatusRecordRequest {
                    order_id: id,
                    status: req.status,
                    payment_status: req.payment_status,
                })
                .await?;

            if !updated {
                return Err(ServiceError::NotFound(format!(
                    "Order with id {id} not found"
                )));
            }

            load_order(&self.query, &self.items, id).await
        }
        .await;

        match result {
            Ok(order) => {
                self.complete(started, method, Ok("Order status updated"));
                Ok(ApiResponse::success("Order status updated successfully", order))
            }
            Err(err) => {
                self.complete(started, method, Err(&err));
                Err(err)
            }
        }
    }

    async fn delete_order(&self, id: i32) -> Result<ApiResponse<bool>, ServiceError> {
        let method = Method::Delete;
        let started = Instant::now();
        info!("🗑️ Deleting order ID={id}");

        match self.delete_in_transaction(id).await {
            Ok(true) => {
                self.complete(started, method, Ok("Order deleted"));
                Ok(ApiResponse::success("Order deleted successfully", true))
            }
            Ok(false) => {
                self.complete(started, method, Ok("Order not present, nothing deleted"));
                Ok(ApiResponse::success("Order not found", false))
            }
            Err(err) => {
                self.complete(started, method, Err(&err));
                Err(err)
            }
        }
    }
}
