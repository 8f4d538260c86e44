use crate::model::order::{OrderStatus, PaymentStatus};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Highest page a list request may ask for; keeps `offset` inside `i64`.
pub const MAX_PAGE: i64 = 10_000_000;

/// Exclusive upper bound of a NUMERIC(10,2) column.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

pub(crate) fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    if *value >= AMOUNT_LIMIT {
        return Err(ValidationError::new("amount_too_large"));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderRequest {
    /// Authenticated buyer, filled in by the HTTP layer.
    #[validate(range(min = 1))]
    pub user_id: i32,

    #[validate(custom(function = "validate_amount"))]
    pub total_amount: Decimal,

    #[validate(length(min = 1))]
    pub shipping_address: String,

    #[validate(length(min = 1, max = 32))]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItemRequest>,

    #[serde(default)]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    /// Sum of `price * quantity` over the line items; `None` on overflow.
    pub fn items_total(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| acc.checked_add(line))
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderItemRequest {
    #[validate(range(min = 1))]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(custom(function = "validate_amount"))]
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default, ToSchema)]
pub struct FindAllOrder {
    #[serde(default)]
    pub user_id: Option<i32>,

    #[serde(default)]
    pub status: Option<OrderStatus>,

    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,

    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,

    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<i64>,

    /// 1-based.
    #[validate(range(min = 1, max = 10_000_000))]
    #[serde(default)]
    pub page: Option<i64>,
}

impl FindAllOrder {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).max(0).saturating_mul(self.limit())
    }

    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            user_id: self.user_id,
            status: self.status,
            payment_status: self.payment_status,
            created_from: self.start_date,
            created_to: self.end_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[serde(default)]
    pub status: Option<OrderStatus>,

    #[serde(default, rename = "paymentStatus", alias = "payment_status")]
    pub payment_status: Option<PaymentStatus>,
}

impl UpdateOrderStatusRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none()
    }
}

/// AND-combined predicate shared by the list and count queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created_from: Option<NaiveDateTime>,
    pub created_to: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub user_id: i32,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub phone: String,
    pub email: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl From<&CreateOrderRequest> for CreateOrderRecordRequest {
    fn from(req: &CreateOrderRequest) -> Self {
        Self {
            user_id: req.user_id,
            total_amount: req.total_amount,
            shipping_address: req.shipping_address.clone(),
            phone: req.phone.clone(),
            email: req.email.clone(),
            payment_method: req.payment_method.clone(),
            notes: req.notes.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderStatusRecordRequest {
    pub order_id: i32,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}
