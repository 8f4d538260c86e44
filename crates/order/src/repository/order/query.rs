use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::OrderFilter,
    model::order::{Order as OrderModel, OrderStatusCount, PaymentStatus},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

const ORDER_COLUMNS: &str = r#"
    SELECT id, user_id, total_amount, shipping_address, phone, email,
           status, payment_status, payment_method, notes, created_at, updated_at
    FROM orders
"#;

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(payment_status) = filter.payment_status {
        builder
            .push(" AND payment_status = ")
            .push_bind(payment_status);
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        builder.push(" AND created_at <= ").push_bind(to);
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        info!("🆔 Fetching order by ID: {}", id);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let mut builder = QueryBuilder::<Postgres>::new(ORDER_COLUMNS);
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build_query_as::<OrderModel>()
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch order {}: {:?}", id, e);
                RepositoryError::from(e)
            })
    }

    async fn find_all(
        &self,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderModel>, RepositoryError> {
        info!(
            "🔍 Fetching orders with filter {:?} (limit {}, offset {})",
            filter, limit, offset
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let mut builder = QueryBuilder::<Postgres>::new(ORDER_COLUMNS);
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<OrderModel>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch orders: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn count(&self, filter: &OrderFilter) -> Result<i64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders");
        push_filter(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count orders: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn count_by_status(&self) -> Result<Vec<OrderStatusCount>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderStatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM orders
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to count orders by status: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn total_revenue(&self) -> Result<Decimal, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM orders
            WHERE payment_status = $1
            "#,
        )
        .bind(PaymentStatus::Paid)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to sum revenue: {:?}", e);
            RepositoryError::from(e)
        })
    }
}
