use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::models::{Coupon, CreateCouponRequest};
use crate::storage::CouponStore;

use super::error::ApiError;

pub struct AppState {
    pub store: Arc<dyn CouponStore>,
}

/// Uniform wrapper for all non-error responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn empty(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("invalid coupon id {raw:?}")))
}

/// Placeholder until listing exists; answers with an empty envelope.
pub async fn list_coupons() -> Json<ApiResponse<Coupon>> {
    Json(ApiResponse::empty("Coupon Retrieved Successfully"))
}

pub async fn get_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Coupon>>, ApiError> {
    let id = parse_id(&id)?;
    let coupon = state.store.get(id).await?;

    Ok(Json(ApiResponse::success(
        "Coupon Retrieved Successfully",
        coupon,
    )))
}

pub async fn create_coupon(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Coupon>>), ApiError> {
    debug!(code = %payload.code, "creating coupon");

    let coupon = Coupon::from_request(payload)?;
    let created = state.store.create(&coupon).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Coupon Created Successfully", created)),
    ))
}

/// Stub: answers success without persisting a change. The storage layer's
/// `update` is equally unimplemented.
pub async fn update_coupon(Path(id): Path<String>) -> Json<ApiResponse<Coupon>> {
    debug!(%id, "coupon update is not implemented yet; answering stub success");
    Json(ApiResponse::empty("Coupon Updated Successfully"))
}

/// Stub: answers success without persisting a change. The storage layer's
/// `delete` is equally unimplemented.
pub async fn delete_coupon(Path(id): Path<String>) -> Json<ApiResponse<Coupon>> {
    debug!(%id, "coupon delete is not implemented yet; answering stub success");
    Json(ApiResponse::empty("Coupon Deleted Successfully"))
}

/// Health check endpoint
pub async fn health_check() -> Json<ApiResponse<Coupon>> {
    Json(ApiResponse::empty("OK"))
}
