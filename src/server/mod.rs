//! HTTP 边界层
//!
//! 只负责请求校验、调用流程层以及把错误映射为状态码，不包含业务判断。
//!
//! | 路由 | 说明 |
//! |---|---|
//! | `POST /upload` | multipart：`order_id` + `image`（兼容 `file`） |
//! | `POST /detections` | JSON：`{order_id, detections: [{label, confidence}]}` |
//! | `POST /finalize/:order_id` | 标记订单完成 |
//! | `GET /health` | 存活检查 |

pub mod handlers;
pub mod response;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::workflow::ReconcileFlow;

/// multipart 表单里除图片外其他字段和边界的余量
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<ReconcileFlow>,
    pub max_image_bytes: usize,
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/upload", post(handlers::upload_image))
        .route("/detections", post(handlers::submit_detections))
        .route("/finalize/:order_id", post(handlers::finalize_order))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
