use crate::domain::policy::StockPolicy;
use sqlx::PgConnection;

/// `stock = stock - quantity`. Under `StockPolicy::Reject` the row is only
/// touched when enough stock is on hand. Returns the affected row count.
pub async fn take(
    conn: &mut PgConnection,
    product_id: i32,
    quantity: i32,
    policy: StockPolicy,
) -> Result<u64, sqlx::Error> {
    let sql = match policy {
        StockPolicy::Permissive => {
            r#"
            UPDATE products
            SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            "#
        }
        StockPolicy::Reject => {
            r#"
            UPDATE products
            SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND stock >= $1
            "#
        }
    };

    let result = sqlx::query(sql)
        .bind(quantity)
        .bind(product_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// `stock = stock + delta`, where `delta` may be negative.
pub async fn apply_delta(
    conn: &mut PgConnection,
    product_id: i32,
    delta: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + $1, updated_at = CURRENT_TIMESTAMP
        WHERE id = $2
        "#,
    )
    .bind(delta)
    .bind(product_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
