use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::CreateProductRequest,
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (name, category, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, category, price, stock, created_at, updated_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.category)
        .bind(req.price)
        .bind(req.stock)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product '{}': {:?}", req.name, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created product ID {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn adjust_stock(
        &self,
        product_id: i32,
        delta: i32,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET stock = stock + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING id, name, category, price, stock, created_at, updated_at
            "#,
        )
        .bind(delta)
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to adjust stock of product {}: {:?}", product_id, err);
            RepositoryError::from(err)
        })?;

        if let Some(product) = &product {
            info!(
                "📦 Stock of product {} adjusted by {} to {}",
                product.id, delta, product.stock
            );
        }

        Ok(product)
    }

    async fn delete_product(&self, product_id: i32) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete product {}: {:?}", product_id, err);
                RepositoryError::from(err)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("🗑️ Deleted product {}", product_id);
        }

        Ok(deleted)
    }
}
