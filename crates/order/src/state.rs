use crate::{
    config::myconfig::Config,
    di::{DependenciesInject, Repositories},
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

/// Services and metrics registry of the ledger.
///
/// The binary only serves `/metrics` from this state. A host that wants the
/// ledger over HTTP or RPC mounts the services in `di_container` on its own
/// router; they record into `registry` either way.
#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config) -> Self {
        Self::with_repositories(Repositories::postgres(pool), config).await
    }

    pub async fn with_repositories(repos: Repositories, config: &Config) -> Self {
        let registry = Arc::new(Mutex::new(Registry::default()));

        let di_container =
            DependenciesInject::new(repos, config.stock_policy, registry.clone()).await;

        Self {
            di_container,
            registry,
        }
    }
}
