use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::storage::CouponStore;

use super::handlers::{
    create_coupon, delete_coupon, get_coupon, health_check, list_coupons, update_coupon, AppState,
};

pub fn create_api_router(store: Arc<dyn CouponStore>, api: &ApiConfig) -> Router {
    let state = Arc::new(AppState { store });

    let base = format!("{}/{}/coupon", api.base_path, api.version);

    Router::new()
        .route("/health", get(health_check))
        .route(&base, get(list_coupons).post(create_coupon))
        .route(
            &format!("{base}/{{id}}"),
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
