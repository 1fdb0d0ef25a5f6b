use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;

use crate::models::Coupon;
use crate::pg_array;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Coupon not found")]
    NotFound,
    #[error("coupon code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Ensure the schema exists (idempotent; safe to call on every startup).
    async fn init(&self) -> Result<()>;

    /// Fetch one coupon by primary key.
    async fn get(&self, id: i64) -> StoreResult<Coupon>;

    /// Insert a new coupon and return it with its storage-assigned id.
    async fn create(&self, coupon: &Coupon) -> StoreResult<Coupon>;

    /// Not yet implemented: succeeds without persisting anything.
    async fn update(&self, coupon: &Coupon) -> StoreResult<()>;

    /// Not yet implemented: succeeds without persisting anything.
    async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// Row shape shared by both backends. The product list crosses the driver
/// boundary as text and is decoded exactly once, here.
#[derive(FromRow)]
pub(crate) struct CouponRow {
    id: i64,
    code: String,
    discount_type: String,
    value: f64,
    max_redemptions: Option<i64>,
    redeemed_count: i64,
    expiry_date: DateTime<Utc>,
    minimum_order_value: Option<f64>,
    applicable_products: String,
    is_active: bool,
    user_specific: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = StoreError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let applicable_products = pg_array::decode(&row.applicable_products)
            .map_err(|e| StoreError::Other(anyhow::Error::new(e)))?;

        Ok(Coupon {
            id: row.id,
            code: row.code,
            discount_type: row.discount_type,
            value: row.value,
            minimum_order_value: row.minimum_order_value,
            max_redemptions: row.max_redemptions,
            redeemed_count: row.redeemed_count,
            expiry_date: row.expiry_date,
            applicable_products,
            is_active: row.is_active,
            user_specific: row.user_specific,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
