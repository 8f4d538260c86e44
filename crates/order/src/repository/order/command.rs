use crate::{
    abstract_trait::order::repository::{DynOrderTransaction, OrderCommandRepositoryTrait},
    domain::requests::order::UpdateOrderStatusRecordRequest,
    repository::order::transaction::PgOrderTransaction,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn begin(&self) -> Result<DynOrderTransaction, RepositoryError> {
        let tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {:?}", err);
            RepositoryError::from(err)
        })?;

        Ok(Box::new(PgOrderTransaction::new(tx)))
    }

    async fn update_status(
        &self,
        req: &UpdateOrderStatusRecordRequest,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status         = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status),
                updated_at     = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(req.order_id)
        .bind(req.status)
        .bind(req.payment_status)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to update status of order {}: {:?}",
                req.order_id, err
            );
            RepositoryError::from(err)
        })?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("🔄 Updated status of order {}", req.order_id);
        }

        Ok(updated)
    }
}
