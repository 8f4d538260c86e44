use crate::{
    abstract_trait::order::repository::OrderTransactionTrait,
    domain::{
        policy::StockPolicy,
        requests::order::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
    },
    model::order_item::OrderItem as OrderItemModel,
    repository::product::stock,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use sqlx::{Postgres, Transaction};
use tracing::{error, info};

pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgOrderTransaction {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl OrderTransactionTrait for PgOrderTransaction {
    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<i32, RepositoryError> {
        let order_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO orders (user_id, total_amount, shipping_address, phone, email, payment_method, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(req.user_id)
        .bind(req.total_amount)
        .bind(&req.shipping_address)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.payment_method)
        .bind(&req.notes)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert order for user {}: {:?}",
                req.user_id, err
            );
            RepositoryError::from(err)
        })?;

        info!("✅ Inserted order ID {} for user {}", order_id, req.user_id);
        Ok(order_id)
    }

    async fn insert_order_item(
        &mut self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError> {
        sqlx::query_as::<_, OrderItemModel>(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, product_id, quantity, price
            "#,
        )
        .bind(req.order_id)
        .bind(req.product_id)
        .bind(req.quantity)
        .bind(req.price)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert item (product {}) for order {}: {:?}",
                req.product_id, req.order_id, err
            );
            RepositoryError::from(err)
        })
    }

    async fn decrement_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
        policy: StockPolicy,
    ) -> Result<bool, RepositoryError> {
        let rows = stock::take(&mut self.tx, product_id, quantity, policy)
            .await
            .map_err(|err| {
                error!("❌ Failed to decrement stock of product {product_id}: {err:?}");
                RepositoryError::from(err)
            })?;

        Ok(rows > 0)
    }

    async fn increment_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let rows = stock::apply_delta(&mut self.tx, product_id, quantity)
            .await
            .map_err(|err| {
                error!("❌ Failed to restore stock of product {product_id}: {err:?}");
                RepositoryError::from(err)
            })?;

        Ok(rows > 0)
    }

    async fn find_order_items(
        &mut self,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT id, order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to read items of order {order_id}: {err:?}");
            RepositoryError::from(err)
        })
    }

    async fn delete_order(&mut self, order_id: i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete order {order_id}: {err:?}");
                RepositoryError::from(err)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let this = *self;
        this.tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit transaction: {err:?}");
            RepositoryError::from(err)
        })
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        let this = *self;
        this.tx.rollback().await.map_err(|err| {
            error!("❌ Failed to roll back transaction: {err:?}");
            RepositoryError::from(err)
        })
    }
}
