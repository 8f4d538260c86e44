use crate::{
    abstract_trait::order::{
        repository::{DynOrderItemQueryRepository, DynOrderQueryRepository},
        service::OrderQueryServiceTrait,
    },
    domain::{
        requests::order::{FindAllOrder, OrderFilter},
        response::{
            api::ApiResponse,
            order::{OrderListResponse, OrderResponse},
            pagination::Pagination,
            stats::{OrderStatsResponse, StatusCountResponse},
        },
    },
    model::order::Order as OrderModel,
    service::order::{items_by_order, load_order},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, validation_messages},
};
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};
use validator::Validate;

const RECENT_ORDERS: i64 = 5;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    items: DynOrderItemQueryRepository,
    metrics: Metrics,
}

pub struct OrderQueryServiceDeps {
    pub query: DynOrderQueryRepository,
    pub items: DynOrderItemQueryRepository,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderQueryService {
    pub async fn new(deps: OrderQueryServiceDeps) -> Self {
        let OrderQueryServiceDeps {
            query,
            items,
            registry,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(
            "order_query_service",
            "OrderQueryService",
            &mut *registry.lock().await,
        );

        Self {
            query,
            items,
            metrics,
        }
    }

    fn complete<T>(
        &self,
        started: Instant,
        operation: &str,
        result: &Result<T, ServiceError>,
    ) {
        let elapsed = started.elapsed().as_secs_f64();

        let status = match result {
            Ok(_) => {
                info!("✅ {operation} completed in {elapsed:.3}s");
                StatusUtils::Success
            }
            Err(err) => {
                error!("❌ {operation} failed: {err}");
                StatusUtils::Error
            }
        };

        self.metrics.record(Method::Get, status, elapsed);
    }

    async fn with_items(&self, orders: Vec<OrderModel>) -> Vec<OrderResponse> {
        let ids: Vec<i32> = orders.iter().map(|order| order.id).collect();
        let mut grouped = items_by_order(&self.items, &ids).await;

        orders
            .into_iter()
            .map(|order| {
                let lines = grouped.remove(&order.id).unwrap_or_default();
                OrderResponse::with_items(order, lines)
            })
            .collect()
    }

    async fn list(&self, req: &FindAllOrder) -> Result<OrderListResponse, ServiceError> {
        req.validate()
            .map_err(|errors| ServiceError::Validation(validation_messages(&errors)))?;

        let filter = req.filter();
        let limit = req.limit();
        let offset = req.offset();

        let total = self.query.count(&filter).await?;
        let orders = self.query.find_all(&filter, limit, offset).await?;
        let orders = self.with_items(orders).await;

        Ok(OrderListResponse {
            orders,
            pagination: Pagination::new(total, limit, offset, req.page()),
        })
    }

    async fn stats(&self) -> Result<OrderStatsResponse, ServiceError> {
        let everything = OrderFilter::default();

        let total_orders = self.query.count(&everything).await?;
        let orders_by_status = self
            .query
            .count_by_status()
            .await?
            .into_iter()
            .map(StatusCountResponse::from)
            .collect();
        let recent = self.query.find_all(&everything, RECENT_ORDERS, 0).await?;
        let recent_orders = self.with_items(recent).await;
        let total_revenue = self.query.total_revenue().await?;

        Ok(OrderStatsResponse {
            total_orders,
            orders_by_status,
            recent_orders,
            total_revenue,
        })
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(
        &self,
        req: &FindAllOrder,
    ) -> Result<ApiResponse<OrderListResponse>, ServiceError> {
        let started = Instant::now();
        info!(
            "🔍 Listing orders (page {}, limit {})",
            req.page(),
            req.limit()
        );

        let result = self.list(req).await;
        self.complete(started, "find_all", &result);

        Ok(ApiResponse::success("Orders retrieved successfully", result?))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let started = Instant::now();
        info!("🆔 Fetching order ID={id}");

        let result = load_order(&self.query, &self.items, id).await;
        self.complete(started, "find_by_id", &result);

        Ok(ApiResponse::success("Order retrieved successfully", result?))
    }

    async fn get_stats(&self) -> Result<ApiResponse<OrderStatsResponse>, ServiceError> {
        let started = Instant::now();
        info!("📊 Computing order statistics");

        let result = self.stats().await;
        self.complete(started, "get_stats", &result);

        Ok(ApiResponse::success("Order stats retrieved successfully", result?))
    }
}
