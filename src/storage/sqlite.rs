use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

use crate::models::Coupon;
use crate::pg_array;
use crate::storage::{CouponRow, CouponStore, StoreError, StoreResult};

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl CouponStore for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coupons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                discount_type TEXT NOT NULL,
                value REAL NOT NULL,
                max_redemptions INTEGER,
                redeemed_count INTEGER NOT NULL DEFAULT 0,
                expiry_date TEXT NOT NULL,
                minimum_order_value REAL,
                applicable_products TEXT NOT NULL DEFAULT '{}',
                is_active INTEGER NOT NULL DEFAULT 1,
                user_specific INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coupon_users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coupon_redemptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                coupon_id INTEGER NOT NULL REFERENCES coupons(id) ON DELETE CASCADE,
                coupon_user_id INTEGER NOT NULL REFERENCES coupon_users(id),
                order_id INTEGER NOT NULL,
                redeemed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
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
                   expiry_date, minimum_order_value, applicable_products,
                   is_active, user_specific, created_at, updated_at
            FROM coupons
            WHERE id = ?
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
        let products = pg_array::encode(&coupon.applicable_products);

        let result = sqlx::query(
            r#"
            INSERT INTO coupons (
                code, discount_type, value, max_redemptions, expiry_date,
                minimum_order_value, applicable_products, is_active, user_specific,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(code) DO NOTHING
            "#,
        )
        .bind(&coupon.code)
        .bind(&coupon.discount_type)
        .bind(coupon.value)
        .bind(coupon.max_redemptions)
        .bind(coupon.expiry_date)
        .bind(coupon.minimum_order_value)
        .bind(products)
        .bind(coupon.is_active)
        .bind(coupon.user_specific)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Other(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        // SQLite does not hand the inserted row back inline; read it by its
        // unique code.
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount_type, value, max_redemptions, redeemed_count,
                   expiry_date, minimum_order_value, applicable_products,
                   is_active, user_specific, created_at, updated_at
            FROM coupons
            WHERE code = ?
            "#,
        )
        .bind(&coupon.code)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Other(e.into()))?;

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
