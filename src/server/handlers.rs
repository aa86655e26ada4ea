use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppResult, RequestError};
use crate::models::detection::Detection;
use crate::models::order::OrderStatus;
use crate::models::report::ReconcileReport;
use crate::server::AppState;

/// 客户端未声明类型时按 JPEG 处理（ESP32 摄像头默认输出）
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// `POST /detections` 请求体
#[derive(Debug, Deserialize)]
pub struct DetectionRequest {
    pub order_id: u64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// `POST /finalize/:order_id` 响应体
#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub message: String,
    pub order_id: u64,
    pub status: OrderStatus,
}

/// 上传的图片
struct UploadedImage {
    data: Bytes,
    mime_type: String,
}

/// Handler for `POST /upload`
///
/// 表单字段：`order_id` 和 `image`（老版本固件使用 `file`）。
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ReconcileReport>> {
    let mut order_id_field: Option<String> = None;
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("order_id") => order_id_field = Some(field.text().await?),
            Some("image") | Some("file") => {
                let mime_type = field
                    .content_type()
                    .filter(|ct| ct.starts_with("image/"))
                    .unwrap_or(DEFAULT_IMAGE_MIME)
                    .to_string();
                let data = field.bytes().await?;
                image = Some(UploadedImage { data, mime_type });
            }
            other => debug!("忽略未知表单字段: {:?}", other),
        }
    }

    let order_id = parse_order_id(order_id_field.as_deref())?;

    let image = image
        .filter(|img| !img.data.is_empty())
        .ok_or(RequestError::MissingImage)?;
    if image.data.len() > state.max_image_bytes {
        return Err(RequestError::ImageTooLarge {
            size: image.data.len(),
            limit: state.max_image_bytes,
        }
        .into());
    }

    let report = state
        .flow
        .run_image(order_id, &image.data, &image.mime_type)
        .await?;
    Ok(Json(report))
}

/// Handler for `POST /detections`
pub async fn submit_detections(
    State(state): State<AppState>,
    Json(payload): Json<DetectionRequest>,
) -> AppResult<Json<ReconcileReport>> {
    if payload.order_id == 0 {
        return Err(RequestError::InvalidOrderId {
            value: "0".to_string(),
        }
        .into());
    }

    let report = state
        .flow
        .run_detections(payload.order_id, &payload.detections)
        .await?;
    Ok(Json(report))
}

/// Handler for `POST /finalize/:order_id`
pub async fn finalize_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> AppResult<Json<FinalizeResponse>> {
    let order = state.flow.finalize(order_id).await?;
    info!("📦 订单 {} 已完成", order.id);

    Ok(Json(FinalizeResponse {
        message: format!("订单 {} 已完成", order.id),
        order_id: order.id,
        status: order.status,
    }))
}

/// Handler for `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// 解析表单中的 order_id，缺失、非数字或为 0 都视为无效
fn parse_order_id(raw: Option<&str>) -> AppResult<u64> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty());
    let Some(value) = raw else {
        return Err(RequestError::MissingOrderId.into());
    };

    match value.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RequestError::InvalidOrderId {
            value: value.to_string(),
        }
        .into()),
    }
}
