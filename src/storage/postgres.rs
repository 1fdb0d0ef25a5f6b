use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::models::Coupon;
use crate::storage::{CouponRow, CouponStore, StoreError, StoreResult};

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl CouponStore for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coupons (
                id BIGSERIAL PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                discount_type TEXT NOT NULL,
                value DOUBLE PRECISION NOT NULL,
                max_redemptions BIGINT,
                redeemed_count BIGINT NOT NULL DEFAULT 0,
                expiry_date TIMESTAMPTZ NOT NULL,
                minimum_order_value DOUBLE PRECISION,
                applicable_products BIGINT[] NOT NULL DEFAULT '{}',
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                user_specific BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coupon_users (
                id BIGSERIAL PRIMARY KEY,
                external_id TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coupon_redemptions (
                id BIGSERIAL PRIMARY KEY,
                coupon_id BIGINT NOT NULL REFERENCES coupons(id) ON DELETE CASCADE,
                coupon_user_id BIGINT NOT NULL REFERENCES coupon_users(id),
                order_id BIGINT NOT NULL,
                redeemed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get(&self, id: i64) -> StoreResult<Coupon> {
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount_type, value, max_redemptions, redeemed_count,
                   expiry_date, minimum_order_value,
                   applicable_products::text AS applicable_products,
                   is_active, user_specific, created_at, updated_at
            FROM coupons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Other(e.into()))?
        .ok_or(StoreError::NotFound)?;

        row.try_into()
    }

    async fn create(&self, coupon: &Coupon) -> StoreResult<Coupon> {
        // The array column binds natively; only reads go through the text form.
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            INSERT INTO coupons (
                code, discount_type, value, max_redemptions, expiry_date,
                minimum_order_value, applicable_products, is_active, user_specific,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, code, discount_type, value, max_redemptions, redeemed_count,
                      expiry_date, minimum_order_value,
                      applicable_products::text AS applicable_products,
                      is_active, user_specific, created_at, updated_at
            "#,
        )
        .bind(&coupon.code)
        .bind(&coupon.discount_type)
        .bind(coupon.value)
        .bind(coupon.max_redemptions)
        .bind(coupon.expiry_date)
        .bind(coupon.minimum_order_value)
        .bind(&coupon.applicable_products)
        .bind(coupon.is_active)
        .bind(coupon.user_specific)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Other(e.into()),
        })?;

        row.try_into()
    }

    async fn update(&self, coupon: &Coupon) -> StoreResult<()> {
        debug!(id = coupon.id, "coupon update is not implemented yet; nothing persisted");
        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        debug!(id, "coupon delete is not implemented yet; nothing persisted");
        Ok(())
    }
}
