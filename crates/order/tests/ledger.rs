use order::{
    abstract_trait::{
        order::service::{OrderCommandServiceTrait, OrderQueryServiceTrait},
        product::ProductServiceTrait,
    },
    di::{DependenciesInject, Repositories},
    domain::{
        policy::StockPolicy,
        requests::{
            order::{CreateOrderItemRequest, CreateOrderRequest, FindAllOrder, UpdateOrderStatusRequest},
            product::{AdjustStockRequest, CreateProductRequest},
        },
    },
    model::order::{OrderStatus, PaymentStatus},
    repository::memory::{FailPoint, InMemoryStore},
};
use chrono::Utc;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::errors::{RepositoryError, ServiceError};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

struct Harness {
    store: InMemoryStore,
    deps: DependenciesInject,
}

impl Harness {
    async fn new(policy: StockPolicy) -> Self {
        let store = InMemoryStore::new();
        let registry = Arc::new(Mutex::new(Registry::default()));
        let deps =
            DependenciesInject::new(Repositories::in_memory(store.clone()), policy, registry)
                .await;
        Self { store, deps }
    }

    async fn product(&self, name: &str, price: Decimal, stock: i32) -> i32 {
        self.deps
            .product
            .create_product(&CreateProductRequest {
                name: name.into(),
                category: "hardware".into(),
                price,
                stock,
            })
            .await
            .expect("create product")
            .data
            .id
    }

    async fn stock(&self, product_id: i32) -> i32 {
        self.deps
            .product
            .find_by_id(product_id)
            .await
            .expect("find product")
            .data
            .stock
    }
}

fn order_request(user_id: i32, lines: &[(i32, i32, Decimal)]) -> CreateOrderRequest {
    let items: Vec<CreateOrderItemRequest> = lines
        .iter()
        .map(|&(product_id, quantity, price)| CreateOrderItemRequest {
            product_id,
            quantity,
            price,
        })
        .collect();
    let total_amount = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    CreateOrderRequest {
        user_id,
        total_amount,
        shipping_address: "42 Harbour Road".into(),
        phone: "+1 555 0100".into(),
        email: "buyer@example.com".into(),
        items,
        payment_method: Some("card".into()),
        notes: None,
    }
}

#[tokio::test]
async fn stock_moves_down_on_create_and_back_on_delete() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let widget = h.product("Widget", dec!(9.99), 10).await;

    let created = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(widget, 3, dec!(9.99))]))
        .await
        .expect("create order")
        .data;

    assert_eq!(h.stock(widget).await, 7);
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.payment_status, PaymentStatus::Pending);
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].name, "Widget");
    assert_eq!(created.items[0].category, "hardware");
    assert_eq!(created.total_amount, dec!(29.97));

    let deleted = h
        .deps
        .order_command
        .delete_order(created.id)
        .await
        .expect("delete order");

    assert!(deleted.data);
    assert_eq!(h.stock(widget).await, 10);
    assert!(
        h.deps
            .order_query
            .find_by_id(created.id)
            .await
            .expect_err("gone")
            .is_not_found()
    );
}

#[tokio::test]
async fn failed_line_item_leaves_no_order_and_no_stock_change() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 10).await;
    let b = h.product("B", dec!(2.00), 10).await;
    let d = h.product("D", dec!(4.00), 10).await;

    let req = order_request(
        1,
        &[(a, 1, dec!(1.00)), (b, 2, dec!(2.00)), (999, 1, dec!(3.00)), (d, 4, dec!(4.00))],
    );
    let err = h
        .deps
        .order_command
        .create_order(&req)
        .await
        .expect_err("unknown product");

    assert!(matches!(
        err,
        ServiceError::Repo(RepositoryError::ForeignKey(_))
    ));
    assert_eq!(h.store.order_count().await, 0);
    assert_eq!(h.store.item_count().await, 0);
    assert_eq!(h.stock(a).await, 10);
    assert_eq!(h.stock(b).await, 10);
    assert_eq!(h.stock(d).await, 10);
}

#[tokio::test]
async fn failed_stock_update_rolls_back_the_create() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 10).await;

    h.store.fail_next(FailPoint::DecrementStock).await;
    let result = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(a, 2, dec!(1.00))]))
        .await;

    assert!(result.is_err());
    assert_eq!(h.store.order_count().await, 0);
    assert_eq!(h.stock(a).await, 10);
}

#[tokio::test]
async fn failed_delete_keeps_order_and_stock() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(5.00), 10).await;
    let b = h.product("B", dec!(6.00), 10).await;

    let created = h
        .deps
        .order_command
        .create_order(&order_request(3, &[(a, 2, dec!(5.00)), (b, 1, dec!(6.00))]))
        .await
        .expect("create")
        .data;

    h.store.fail_next(FailPoint::DeleteOrder).await;
    assert!(h.deps.order_command.delete_order(created.id).await.is_err());

    let still_there = h
        .deps
        .order_query
        .find_by_id(created.id)
        .await
        .expect("order kept")
        .data;
    assert_eq!(still_there.items.len(), 2);
    assert_eq!(h.stock(a).await, 8);
    assert_eq!(h.stock(b).await, 9);
}

#[tokio::test]
async fn create_then_delete_restores_every_product() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.50), 4).await;
    let b = h.product("B", dec!(2.50), 1).await;

    let created = h
        .deps
        .order_command
        .create_order(&order_request(
            8,
            &[(a, 3, dec!(1.50)), (b, 2, dec!(2.50)), (a, 1, dec!(1.50))],
        ))
        .await
        .expect("create")
        .data;

    assert_eq!(h.stock(a).await, 0);
    assert_eq!(h.stock(b).await, -1);

    h.deps
        .order_command
        .delete_order(created.id)
        .await
        .expect("delete");

    assert_eq!(h.stock(a).await, 4);
    assert_eq!(h.stock(b).await, 1);
    assert_eq!(h.store.item_count().await, 0);
}

#[tokio::test]
async fn deleting_a_missing_order_reports_false() {
    let h = Harness::new(StockPolicy::Permissive).await;

    let response = h
        .deps
        .order_command
        .delete_order(404)
        .await
        .expect("delete");

    assert!(!response.data);
}

#[tokio::test]
async fn pages_cover_the_filtered_set_newest_first() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 100).await;

    for n in 0..25 {
        let user_id = if n % 5 == 0 { 2 } else { 1 };
        h.deps
            .order_command
            .create_order(&order_request(user_id, &[(a, 1, dec!(1.00))]))
            .await
            .expect("create");
    }

    let page = |page: i64| FindAllOrder {
        user_id: Some(1),
        limit: Some(8),
        page: Some(page),
        ..Default::default()
    };

    let first = h
        .deps
        .order_query
        .find_all(&page(1))
        .await
        .expect("page 1")
        .data;
    assert_eq!(first.pagination.total, 20);
    assert_eq!(first.pagination.offset, 0);
    assert!(first.pagination.has_more);
    assert_eq!(first.orders.len(), 8);
    assert!(first.orders.windows(2).all(|w| w[0].id > w[1].id));
    assert!(first.orders.iter().all(|o| o.items.len() == 1));

    let last = h
        .deps
        .order_query
        .find_all(&page(3))
        .await
        .expect("page 3")
        .data;
    assert_eq!(last.pagination.offset, 16);
    assert_eq!(last.orders.len(), 4);
    assert!(!last.pagination.has_more);

    let beyond = h
        .deps
        .order_query
        .find_all(&page(4))
        .await
        .expect("page 4")
        .data;
    assert!(beyond.orders.is_empty());
    assert_eq!(beyond.pagination.total, 20);
}

#[tokio::test]
async fn out_of_range_limit_is_a_validation_error() {
    let h = Harness::new(StockPolicy::Permissive).await;

    let err = h
        .deps
        .order_query
        .find_all(&FindAllOrder {
            limit: Some(500),
            ..Default::default()
        })
        .await
        .expect_err("limit too large");

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn status_update_touches_only_supplied_fields() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 5).await;
    let created = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(a, 1, dec!(1.00))]))
        .await
        .expect("create")
        .data;

    let paid = h
        .deps
        .order_command
        .update_status(
            created.id,
            &UpdateOrderStatusRequest {
                status: None,
                payment_status: Some(PaymentStatus::Paid),
            },
        )
        .await
        .expect("update")
        .data;

    assert_eq!(paid.status, OrderStatus::Pending);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(h.stock(a).await, 4);

    let shipped = h
        .deps
        .order_command
        .update_status(
            created.id,
            &UpdateOrderStatusRequest {
                status: Some(OrderStatus::Shipped),
                payment_status: None,
            },
        )
        .await
        .expect("update")
        .data;
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(shipped.payment_status, PaymentStatus::Paid);

    let empty = h
        .deps
        .order_command
        .update_status(created.id, &UpdateOrderStatusRequest::default())
        .await
        .expect_err("nothing to update");
    assert!(matches!(empty, ServiceError::Validation(_)));

    let missing = h
        .deps
        .order_command
        .update_status(
            9_999,
            &UpdateOrderStatusRequest {
                status: Some(OrderStatus::Cancelled),
                payment_status: None,
            },
        )
        .await
        .expect_err("no such order");
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn stats_sum_only_paid_orders() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(10.00), 50).await;

    let empty = h.deps.order_query.get_stats().await.expect("stats").data;
    assert_eq!(empty.total_orders, 0);
    assert_eq!(empty.total_revenue, Decimal::ZERO);
    assert!(empty.orders_by_status.is_empty());

    let mut ids = Vec::new();
    for quantity in 1..=7 {
        let order = h
            .deps
            .order_command
            .create_order(&order_request(1, &[(a, quantity, dec!(10.00))]))
            .await
            .expect("create")
            .data;
        ids.push(order.id);
    }

    for id in &ids[..2] {
        h.deps
            .order_command
            .update_status(
                *id,
                &UpdateOrderStatusRequest {
                    status: Some(OrderStatus::Delivered),
                    payment_status: Some(PaymentStatus::Paid),
                },
            )
            .await
            .expect("mark paid");
    }

    let stats = h.deps.order_query.get_stats().await.expect("stats").data;

    assert_eq!(stats.total_orders, 7);
    // orders 1 and 2 carry 10.00 and 20.00
    assert_eq!(stats.total_revenue, dec!(30.00));
    assert_eq!(stats.recent_orders.len(), 5);
    assert_eq!(stats.recent_orders[0].id, ids[6]);
    assert!(stats.recent_orders.iter().all(|o| o.items.len() == 1));

    let count_of = |status: OrderStatus| {
        stats
            .orders_by_status
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
    };
    assert_eq!(count_of(OrderStatus::Pending), Some(5));
    assert_eq!(count_of(OrderStatus::Delivered), Some(2));
    assert_eq!(count_of(OrderStatus::Shipped), None);
}

#[tokio::test]
async fn reject_policy_refuses_an_oversell_without_side_effects() {
    let h = Harness::new(StockPolicy::Reject).await;
    let a = h.product("A", dec!(1.00), 5).await;
    let b = h.product("B", dec!(1.00), 2).await;

    let err = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(a, 4, dec!(1.00)), (b, 3, dec!(1.00))]))
        .await
        .expect_err("oversell");

    assert!(matches!(
        err,
        ServiceError::InsufficientStock { product_id, requested: 3 } if product_id == b
    ));
    assert_eq!(h.store.order_count().await, 0);
    assert_eq!(h.stock(a).await, 5);
    assert_eq!(h.stock(b).await, 2);

    h.deps
        .order_command
        .create_order(&order_request(1, &[(b, 2, dec!(1.00))]))
        .await
        .expect("exact stock is fine");
    assert_eq!(h.stock(b).await, 0);
}

#[tokio::test]
async fn invalid_create_requests_are_refused_up_front() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 5).await;

    let mut no_items = order_request(1, &[(a, 1, dec!(1.00))]);
    no_items.items.clear();
    let err = h
        .deps
        .order_command
        .create_order(&no_items)
        .await
        .expect_err("no items");
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut bad_email = order_request(1, &[(a, 1, dec!(1.00))]);
    bad_email.email = "not-an-email".into();
    assert!(h.deps.order_command.create_order(&bad_email).await.is_err());

    assert_eq!(h.store.order_count().await, 0);
    assert_eq!(h.stock(a).await, 5);
}

#[tokio::test]
async fn mismatched_total_is_kept_as_supplied() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(3.00), 5).await;

    let mut req = order_request(1, &[(a, 2, dec!(3.00))]);
    req.total_amount = dec!(5.00);

    let created = h
        .deps
        .order_command
        .create_order(&req)
        .await
        .expect("create")
        .data;
    assert_eq!(created.total_amount, dec!(5.00));
}

#[tokio::test]
async fn referenced_product_cannot_be_deleted() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 5).await;
    let created = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(a, 1, dec!(1.00))]))
        .await
        .expect("create")
        .data;

    let err = h
        .deps
        .product
        .delete_product(a)
        .await
        .expect_err("still referenced");
    assert!(matches!(
        err,
        ServiceError::Repo(RepositoryError::ForeignKey(_))
    ));

    h.deps
        .order_command
        .delete_order(created.id)
        .await
        .expect("delete order");
    h.deps
        .product
        .delete_product(a)
        .await
        .expect("now unreferenced");

    assert!(
        h.deps
            .product
            .delete_product(a)
            .await
            .expect_err("already gone")
            .is_not_found()
    );
}

#[tokio::test]
async fn stock_can_be_adjusted_directly() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 5).await;

    let adjusted = h
        .deps
        .product
        .adjust_stock(&AdjustStockRequest {
            product_id: a,
            delta: -7,
        })
        .await
        .expect("adjust")
        .data;
    assert_eq!(adjusted.stock, -2);

    let missing = h
        .deps
        .product
        .adjust_stock(&AdjustStockRequest {
            product_id: 77,
            delta: 1,
        })
        .await
        .expect_err("no product");
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn stock_overflow_fails_without_moving_stock() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let full = h.product("Full", dec!(1.00), i32::MAX).await;
    let drained = h.product("Drained", dec!(1.00), i32::MIN + 1).await;

    let err = h
        .deps
        .product
        .adjust_stock(&AdjustStockRequest {
            product_id: full,
            delta: 1,
        })
        .await
        .expect_err("overflow");
    assert!(matches!(err, ServiceError::Repo(RepositoryError::Custom(_))));
    assert_eq!(h.stock(full).await, i32::MAX);

    let err = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(full, 1, dec!(1.00)), (drained, 2, dec!(1.00))]))
        .await
        .expect_err("underflow");
    assert!(matches!(err, ServiceError::Repo(RepositoryError::Custom(_))));
    assert_eq!(h.stock(full).await, i32::MAX);
    assert_eq!(h.stock(drained).await, i32::MIN + 1);
    assert_eq!(h.store.order_count().await, 0);
    assert_eq!(h.store.item_count().await, 0);
}

#[tokio::test]
async fn date_range_bounds_the_listing() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 10).await;

    let early = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(a, 1, dec!(1.00))]))
        .await
        .expect("create")
        .data;

    tokio::time::sleep(Duration::from_millis(5)).await;
    let cutoff = Utc::now().naive_utc();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let mut late = Vec::new();
    for _ in 0..2 {
        late.push(
            h.deps
                .order_command
                .create_order(&order_request(1, &[(a, 1, dec!(1.00))]))
                .await
                .expect("create")
                .data
                .id,
        );
    }

    let since = h
        .deps
        .order_query
        .find_all(&FindAllOrder {
            start_date: Some(cutoff),
            ..Default::default()
        })
        .await
        .expect("since cutoff")
        .data;
    assert_eq!(since.pagination.total, 2);
    let ids: Vec<i32> = since.orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![late[1], late[0]]);

    let until = h
        .deps
        .order_query
        .find_all(&FindAllOrder {
            end_date: Some(cutoff),
            ..Default::default()
        })
        .await
        .expect("until cutoff")
        .data;
    assert_eq!(until.pagination.total, 1);
    assert_eq!(until.orders[0].id, early.id);

    let empty_window = h
        .deps
        .order_query
        .find_all(&FindAllOrder {
            start_date: Some(cutoff),
            end_date: Some(cutoff),
            ..Default::default()
        })
        .await
        .expect("empty window")
        .data;
    assert_eq!(empty_window.pagination.total, 0);
    assert!(empty_window.orders.is_empty());
}

#[tokio::test]
async fn status_filters_combine_with_and() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 10).await;

    let mut ids = Vec::new();
    for user_id in [1, 1, 2, 2] {
        ids.push(
            h.deps
                .order_command
                .create_order(&order_request(user_id, &[(a, 1, dec!(1.00))]))
                .await
                .expect("create")
                .data
                .id,
        );
    }

    // ids[0]: shipped + paid, ids[1]: pending + paid, ids[2]: shipped + pending
    for (id, status, payment_status) in [
        (ids[0], Some(OrderStatus::Shipped), Some(PaymentStatus::Paid)),
        (ids[1], None, Some(PaymentStatus::Paid)),
        (ids[2], Some(OrderStatus::Shipped), None),
    ] {
        h.deps
            .order_command
            .update_status(
                id,
                &UpdateOrderStatusRequest {
                    status,
                    payment_status,
                },
            )
            .await
            .expect("update");
    }

    let listed = |filter: FindAllOrder| {
        let deps = &h.deps;
        async move {
            let page = deps
                .order_query
                .find_all(&filter)
                .await
                .expect("list")
                .data;
            let mut ids: Vec<i32> = page.orders.iter().map(|o| o.id).collect();
            ids.sort_unstable();
            assert_eq!(page.pagination.total, ids.len() as i64);
            ids
        }
    };

    let shipped = listed(FindAllOrder {
        status: Some(OrderStatus::Shipped),
        ..Default::default()
    })
    .await;
    assert_eq!(shipped, vec![ids[0], ids[2]]);

    let paid = listed(FindAllOrder {
        payment_status: Some(PaymentStatus::Paid),
        ..Default::default()
    })
    .await;
    assert_eq!(paid, vec![ids[0], ids[1]]);

    let shipped_and_paid = listed(FindAllOrder {
        status: Some(OrderStatus::Shipped),
        payment_status: Some(PaymentStatus::Paid),
        ..Default::default()
    })
    .await;
    assert_eq!(shipped_and_paid, vec![ids[0]]);

    let shipped_for_user_2 = listed(FindAllOrder {
        user_id: Some(2),
        status: Some(OrderStatus::Shipped),
        ..Default::default()
    })
    .await;
    assert_eq!(shipped_for_user_2, vec![ids[2]]);

    let paid_for_user_2 = listed(FindAllOrder {
        user_id: Some(2),
        payment_status: Some(PaymentStatus::Paid),
        ..Default::default()
    })
    .await;
    assert!(paid_for_user_2.is_empty());

    let paid_in_the_future = listed(FindAllOrder {
        payment_status: Some(PaymentStatus::Paid),
        start_date: Some(Utc::now().naive_utc() + chrono::Duration::hours(1)),
        ..Default::default()
    })
    .await;
    assert!(paid_in_the_future.is_empty());
}

#[tokio::test]
async fn failed_item_read_still_returns_the_header() {
    let h = Harness::new(StockPolicy::Permissive).await;
    let a = h.product("A", dec!(1.00), 10).await;
    let created = h
        .deps
        .order_command
        .create_order(&order_request(1, &[(a, 2, dec!(1.00))]))
        .await
        .expect("create")
        .data;

    h.store.fail_next(FailPoint::FindItems).await;
    let degraded = h
        .deps
        .order_query
        .find_by_id(created.id)
        .await
        .expect("header still served")
        .data;
    assert_eq!(degraded.id, created.id);
    assert_eq!(degraded.total_amount, dec!(2.00));
    assert!(degraded.items.is_empty());

    let healthy = h
        .deps
        .order_query
        .find_by_id(created.id)
        .await
        .expect("find")
        .data;
    assert_eq!(healthy.items.len(), 1);

    h.store.fail_next(FailPoint::FindItems).await;
    let listed = h
        .deps
        .order_query
        .find_all(&FindAllOrder::default())
        .await
        .expect("list still served")
        .data;
    assert_eq!(listed.orders.len(), 1);
    assert!(listed.orders[0].items.is_empty());
}
