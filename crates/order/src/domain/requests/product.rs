use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::order::validate_amount;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub category: String,

    #[validate(custom(function = "validate_amount"))]
    pub price: Decimal,

    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct AdjustStockRequest {
    pub product_id: i32,
    /// Signed change applied as `stock = stock + delta`.
    pub delta: i32,
}
