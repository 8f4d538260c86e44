use crate::{
    abstract_trait::product::{
        ProductServiceTrait,
        repository::{DynProductCommandRepository, DynProductQueryRepository},
    },
    domain::{
        requests::product::{AdjustStockRequest, CreateProductRequest},
        response::{api::ApiResponse, product::ProductResponse},
    },
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

#[derive(Clone)]
pub struct ProductService {
    query: DynProductQueryRepository,
    command: DynProductCommandRepository,
    metrics: Metrics,
}

pub struct ProductServiceDeps {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub registry: Arc<Mutex<Registry>>,
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Product with id {id} not found"))
}

impl ProductService {
    pub async fn new(deps: ProductServiceDeps) -> Self {
        let ProductServiceDeps {
            query,
            command,
            registry,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("product_service", "ProductService", &mut *registry.lock().await);

        Self {
            query,
            command,
            metrics,
        }
    }

    fn complete<T>(&self, started: Instant, method: Method, result: &Result<T, ServiceError>) {
        let status = match result {
            Ok(_) => StatusUtils::Success,
            Err(err) => {
                error!("❌ Product operation failed: {err}");
                StatusUtils::Error
            }
        };
        self.metrics
            .record(method, status, started.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl ProductServiceTrait for ProductService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let started = Instant::now();
        info!("🆕 Creating product '{}'", req.name);

        let result = async {
            req.validate()
                .map_err(|errors| ServiceError::Validation(validation_messages(&errors)))?;
            Ok(self.command.create_product(req).await?)
        }
        .await;
        self.complete(started, Method::Post, &result);

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(result?),
        ))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let started = Instant::now();

        let result = match self.query.find_by_id(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(not_found(id)),
            Err(err) => Err(ServiceError::from(err)),
        };
        self.complete(started, Method::Get, &result);

        Ok(ApiResponse::success(
            "Product retrieved successfully",
            ProductResponse::from(result?),
        ))
    }

    async fn adjust_stock(
        &self,
        req: &AdjustStockRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let started = Instant::now();
        info!(
            "📦 Adjusting stock of product {} by {}",
            req.product_id, req.delta
        );

        let result = match self.command.adjust_stock(req.product_id, req.delta).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(not_found(req.product_id)),
            Err(err) => Err(ServiceError::from(err)),
        };
        self.complete(started, Method::Put, &result);

        Ok(ApiResponse::success(
            "Stock adjusted successfully",
            ProductResponse::from(result?),
        ))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        let started = Instant::now();
        info!("🗑️ Deleting product {id}");

        let result = match self.command.delete_product(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(not_found(id)),
            Err(err) => Err(ServiceError::from(err)),
        };
        self.complete(started, Method::Delete, &result);

        result?;
        Ok(ApiResponse::success("Product deleted successfully", ()))
    }
}
