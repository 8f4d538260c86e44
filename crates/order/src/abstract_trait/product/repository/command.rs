use crate::{domain::requests::product::CreateProductRequest, model::product::Product as ProductModel};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;

    /// Relative update `stock = stock + delta`; `None` when the product is absent.
    async fn adjust_stock(
        &self,
        product_id: i32,
        delta: i32,
    ) -> Result<Option<ProductModel>, RepositoryError>;

    /// Fails with `ForeignKey` while any order item still references the product.
    async fn delete_product(&self, product_id: i32) -> Result<bool, RepositoryError>;
}
