use crate::{
    domain::{
        policy::StockPolicy,
        requests::order::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
    },
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;

pub type DynOrderTransaction = Box<dyn OrderTransactionTrait>;

/// A single open transaction. Nothing is visible to other readers until
/// `commit`; dropping the handle without committing rolls it back.
#[async_trait]
pub trait OrderTransactionTrait: Send {
    /// Inserts the order header and returns its generated id.
    async fn insert_order(&mut self, req: &CreateOrderRecordRequest)
    -> Result<i32, RepositoryError>;

    async fn insert_order_item(
        &mut self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError>;

    /// `stock = stock - quantity`. Returns `false` when no row was updated,
    /// either because the product is gone or the policy refused it.
    async fn decrement_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
        policy: StockPolicy,
    ) -> Result<bool, RepositoryError>;

    /// `stock = stock + quantity`.
    async fn increment_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
    ) -> Result<bool, RepositoryError>;

    async fn find_order_items(
        &mut self,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, RepositoryError>;

    /// Deletes the header; line items cascade.
    async fn delete_order(&mut self, order_id: i32) -> Result<bool, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
