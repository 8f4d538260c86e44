use crate::{
    abstract_trait::{
        order::repository::{
            DynOrderTransaction, OrderCommandRepositoryTrait, OrderItemQueryRepositoryTrait,
            OrderQueryRepositoryTrait, OrderTransactionTrait,
        },
        product::repository::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
    },
    domain::{
        policy::StockPolicy,
        requests::{
            order::{
                CreateOrderItemRecordRequest, CreateOrderRecordRequest, OrderFilter,
                UpdateOrderStatusRecordRequest,
            },
            product::CreateProductRequest,
        },
    },
    model::{
        order::{Order as OrderModel, OrderStatusCount, PaymentStatus},
        order_item::{OrderItem as OrderItemModel, OrderItemDetail},
        product::Product as ProductModel,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

const ITEM_ORDER_FKEY: &str = "order_items_order_id_fkey";
const ITEM_PRODUCT_FKEY: &str = "order_items_product_id_fkey";

/// A write step that can be made to fail once, to exercise rollback paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertOrderItem,
    DecrementStock,
    IncrementStock,
    DeleteOrder,
    /// Line-item reads outside a transaction.
    FindItems,
}

#[derive(Debug, Clone, Default)]
struct State {
    products: BTreeMap<i32, ProductModel>,
    orders: BTreeMap<i32, OrderModel>,
    items: BTreeMap<i32, OrderItemModel>,
    product_seq: i32,
    order_seq: i32,
    item_seq: i32,
    armed: Option<FailPoint>,
}

impl State {
    fn trip_read(&mut self) -> Result<(), RepositoryError> {
        if self.armed == Some(FailPoint::FindItems) {
            self.armed = None;
            return Err(RepositoryError::Custom(
                "injected failure at FindItems".into(),
            ));
        }
        Ok(())
    }

    fn detail(&self, item: &OrderItemModel) -> OrderItemDetail {
        let (name, category) = self
            .products
            .get(&item.product_id)
            .map(|p| (p.name.clone(), p.category.clone()))
            .unwrap_or_default();

        OrderItemDetail {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
            name,
            category,
        }
    }
}

fn shift_stock(product: &mut ProductModel, delta: i32) -> Result<(), RepositoryError> {
    product.stock = product.stock.checked_add(delta).ok_or_else(|| {
        RepositoryError::Custom(format!(
            "stock of product {} out of range after adding {delta}",
            product.id
        ))
    })?;
    product.updated_at = now();
    Ok(())
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn matches(filter: &OrderFilter, order: &OrderModel) -> bool {
    filter.user_id.is_none_or(|id| order.user_id == id)
        && filter.status.is_none_or(|s| order.status == s)
        && filter.payment_status.is_none_or(|s| order.payment_status == s)
        && filter.created_from.is_none_or(|from| order.created_at >= from)
        && filter.created_to.is_none_or(|to| order.created_at <= to)
}

/// Process-local store with the same semantics as the Postgres schema:
/// foreign keys are enforced, deleting an order cascades to its items and
/// deleting a referenced product is refused.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next transaction fail when it reaches `point`.
    pub async fn fail_next(&self, point: FailPoint) {
        self.state.lock().await.armed = Some(point);
    }

    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    pub async fn item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<State>,
    working: State,
    armed: Option<FailPoint>,
}

impl MemoryTransaction {
    fn trip(&mut self, point: FailPoint) -> Result<(), RepositoryError> {
        if self.armed == Some(point) {
            self.armed = None;
            return Err(RepositoryError::Custom(format!(
                "injected failure at {point:?}"
            )));
        }
        Ok(())
    }

    fn bump_stock(&mut self, product_id: i32, delta: i32) -> Result<bool, RepositoryError> {
        match self.working.products.get_mut(&product_id) {
            Some(product) => shift_stock(product, delta).map(|_| true),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OrderTransactionTrait for MemoryTransaction {
    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<i32, RepositoryError> {
        self.working.order_seq += 1;
        let id = self.working.order_seq;
        let ts = now();

        self.working.orders.insert(
            id,
            OrderModel {
                id,
                user_id: req.user_id,
                total_amount: req.total_amount,
                shipping_address: req.shipping_address.clone(),
                phone: req.phone.clone(),
                email: req.email.clone(),
                status: Default::default(),
                payment_status: Default::default(),
                payment_method: req.payment_method.clone(),
                notes: req.notes.clone(),
                created_at: ts,
                updated_at: ts,
            },
        );

        Ok(id)
    }

    async fn insert_order_item(
        &mut self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError> {
        self.trip(FailPoint::InsertOrderItem)?;

        if !self.working.orders.contains_key(&req.order_id) {
            return Err(RepositoryError::ForeignKey(ITEM_ORDER_FKEY.into()));
        }
        if !self.working.products.contains_key(&req.product_id) {
            return Err(RepositoryError::ForeignKey(ITEM_PRODUCT_FKEY.into()));
        }

        self.working.item_seq += 1;
        let item = OrderItemModel {
            id: self.working.item_seq,
            order_id: req.order_id,
            product_id: req.product_id,
            quantity: req.quantity,
            price: req.price,
        };
        self.working.items.insert(item.id, item.clone());

        Ok(item)
    }

    async fn decrement_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
        policy: StockPolicy,
    ) -> Result<bool, RepositoryError> {
        self.trip(FailPoint::DecrementStock)?;

        if policy == StockPolicy::Reject {
            let on_hand = self.working.products.get(&product_id).map(|p| p.stock);
            if on_hand.is_none_or(|stock| stock < quantity) {
                return Ok(false);
            }
        }

        self.bump_stock(product_id, -quantity)
    }

    async fn increment_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        self.trip(FailPoint::IncrementStock)?;
        self.bump_stock(product_id, quantity)
    }

    async fn find_order_items(
        &mut self,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        Ok(self
            .working
            .items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn delete_order(&mut self, order_id: i32) -> Result<bool, RepositoryError> {
        self.trip(FailPoint::DeleteOrder)?;

        if self.working.orders.remove(&order_id).is_none() {
            return Ok(false);
        }
        self.working.items.retain(|_, item| item.order_id != order_id);

        Ok(true)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let MemoryTransaction {
            mut guard, working, ..
        } = *self;
        let armed = guard.armed;
        *guard = working;
        guard.armed = armed;
        debug!("in-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        debug!("in-memory transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn begin(&self) -> Result<DynOrderTransaction, RepositoryError> {
        let mut guard = self.state.clone().lock_owned().await;
        let armed = match guard.armed {
            Some(FailPoint::FindItems) => None,
            _ => guard.armed.take(),
        };
        let working = guard.clone();

        Ok(Box::new(MemoryTransaction {
            guard,
            working,
            armed,
        }))
    }

    async fn update_status(
        &self,
        req: &UpdateOrderStatusRecordRequest,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;

        let Some(order) = state.orders.get_mut(&req.order_id) else {
            return Ok(false);
        };
        if let Some(status) = req.status {
            order.status = status;
        }
        if let Some(payment_status) = req.payment_status {
            order.payment_status = payment_status;
        }
        order.updated_at = now();

        Ok(true)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        Ok(self.state.lock().await.orders.get(&id).cloned())
    }

    async fn find_all(
        &self,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderModel>, RepositoryError> {
        let state = self.state.lock().await;

        let mut orders: Vec<OrderModel> = state
            .orders
            .values()
            .filter(|order| matches(filter, order))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(orders
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &OrderFilter) -> Result<i64, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|order| matches(filter, order))
            .count() as i64)
    }

    async fn count_by_status(&self) -> Result<Vec<OrderStatusCount>, RepositoryError> {
        let state = self.state.lock().await;

        let mut counts: Vec<OrderStatusCount> = Vec::new();
        for order in state.orders.values() {
            match counts.iter_mut().find(|c| c.status == order.status) {
                Some(entry) => entry.count += 1,
                None => counts.push(OrderStatusCount {
                    status: order.status,
                    count: 1,
                }),
            }
        }
        counts.sort_by_key(|c| c.status as u8);

        Ok(counts)
    }

    async fn total_revenue(&self) -> Result<Decimal, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|order| order.payment_status == PaymentStatus::Paid)
            .map(|order| order.total_amount)
            .sum())
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for InMemoryStore {
    async fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let mut state = self.state.lock().await;
        state.trip_read()?;
        Ok(state
            .items
            .values()
            .filter(|item| item.order_id == order_id)
            .map(|item| state.detail(item))
            .collect())
    }

    async fn find_by_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let mut state = self.state.lock().await;
        state.trip_read()?;

        let mut items: Vec<OrderItemDetail> = state
            .items
            .values()
            .filter(|item| order_ids.contains(&item.order_id))
            .map(|item| state.detail(item))
            .collect();
        items.sort_by_key(|item| (item.order_id, item.id));

        Ok(items)
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryStore {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut state = self.state.lock().await;

        state.product_seq += 1;
        let ts = now();
        let product = ProductModel {
            id: state.product_seq,
            name: req.name.clone(),
            category: req.category.clone(),
            price: req.price,
            stock: req.stock,
            created_at: ts,
            updated_at: ts,
        };
        state.products.insert(product.id, product.clone());

        info!("✅ Created product ID {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn adjust_stock(
        &self,
        product_id: i32,
        delta: i32,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let mut state = self.state.lock().await;

        match state.products.get_mut(&product_id) {
            Some(product) => {
                shift_stock(product, delta)?;
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_product(&self, product_id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;

        if state
            .items
            .values()
            .any(|item| item.product_id == product_id)
        {
            return Err(RepositoryError::ForeignKey(ITEM_PRODUCT_FKEY.into()));
        }

        Ok(state.products.remove(&product_id).is_some())
    }
}
