use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{AppError, RequestError};

/// 错误响应体：`{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// 错误对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Request(RequestError::ImageTooLarge { .. } | RequestError::BodyTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::Request(_) => StatusCode::BAD_REQUEST,
            AppError::Order(_) => StatusCode::NOT_FOUND,
            AppError::Vision(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::File(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ 请求失败 ({}): {}", status, self);
        } else {
            warn!("⚠️ 请求被拒绝 ({}): {}", status, self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
