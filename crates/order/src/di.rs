use crate::{
    abstract_trait::{
        order::repository::{
            DynOrderCommandRepository, DynOrderItemQueryRepository, DynOrderQueryRepository,
        },
        product::repository::{DynProductCommandRepository, DynProductQueryRepository},
    },
    domain::policy::StockPolicy,
    repository::{
        memory::InMemoryStore,
        order::{OrderCommandRepository, OrderItemQueryRepository, OrderQueryRepository},
        product::{ProductCommandRepository, ProductQueryRepository},
    },
    service::{
        order::{
            OrderCommandService, OrderCommandServiceDeps, OrderQueryService,
            OrderQueryServiceDeps,
        },
        product::{ProductService, ProductServiceDeps},
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_query: OrderQueryService,
    pub order_command: OrderCommandService,
    pub product: ProductService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .field("product", &"ProductService")
            .finish()
    }
}

/// Repository handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub order_command: DynOrderCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_items: DynOrderItemQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub product_query: DynProductQueryRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            order_command: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            order_items: Arc::new(OrderItemQueryRepository::new(pool.clone())),
            product_command: Arc::new(ProductCommandRepository::new(pool.clone())),
            product_query: Arc::new(ProductQueryRepository::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            order_command: store.clone(),
            order_query: store.clone(),
            order_items: store.clone(),
            product_command: store.clone(),
            product_query: store,
        }
    }
}

impl DependenciesInject {
    pub async fn new(
        repos: Repositories,
        policy: StockPolicy,
        registry: Arc<Mutex<Registry>>,
    ) -> Self {
        let Repositories {
            order_command,
            order_query,
            order_items,
            product_command,
            product_query,
        } = repos;

        let order_query_service = OrderQueryService::new(OrderQueryServiceDeps {
            query: order_query.clone(),
            items: order_items.clone(),
            registry: registry.clone(),
        })
        .await;

        let order_command_service = OrderCommandService::new(OrderCommandServiceDeps {
            command: order_command,
            query: order_query,
            items: order_items,
            policy,
            registry: registry.clone(),
        })
        .await;

        let product = ProductService::new(ProductServiceDeps {
            query: product_query,
            command: product_command,
            registry,
        })
        .await;

        Self {
            order_query: order_query_service,
            order_command: order_command_service,
            product,
        }
    }
}
