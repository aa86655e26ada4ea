use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
///
/// 核心算法（解析、比对、过滤）本身不会失败，这里只覆盖边界层：
/// 请求校验、订单查询、视觉模型调用、配置和文件读取。
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求参数错误
    #[error("请求错误: {0}")]
    Request(#[from] RequestError),
    /// 订单相关错误
    #[error("订单错误: {0}")]
    Order(#[from] OrderError),
    /// 视觉模型服务错误
    #[error("视觉服务错误: {0}")]
    Vision(#[from] VisionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 请求参数错误
#[derive(Debug, Error)]
pub enum RequestError {
    /// 缺少 order_id
    #[error("缺少 order_id")]
    MissingOrderId,
    /// order_id 无法解析为正整数
    #[error("无效的 order_id: '{value}'")]
    InvalidOrderId { value: String },
    /// 缺少图片文件
    #[error("未提供图片文件")]
    MissingImage,
    /// 图片过大
    #[error("图片大小 {size} 字节超出上限 {limit} 字节")]
    ImageTooLarge { size: usize, limit: usize },
    /// 请求体超出上限，图片未读完
    #[error("请求体超出上限: {source}")]
    BodyTooLarge { source: BoxError },
    /// multipart 表单读取失败
    #[error("无法读取 multipart 表单: {source}")]
    MultipartFailed { source: BoxError },
}

/// 订单相关错误
#[derive(Debug, Error)]
pub enum OrderError {
    /// 订单不存在
    #[error("未找到订单 id={order_id}")]
    NotFound { order_id: u64 },
}

/// 视觉模型服务错误
#[derive(Debug, Error)]
pub enum VisionError {
    /// API 调用失败
    #[error("视觉模型 API 调用失败 (模型: {model}): {source}")]
    ApiCallFailed { model: String, source: BoxError },
    /// 构建请求失败
    #[error("构建视觉模型请求失败: {source}")]
    RequestBuildFailed { source: BoxError },
    /// 返回内容为空
    #[error("视觉模型返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 置信度阈值不在 [0, 1] 区间
    #[error("置信度阈值 {value} 必须位于 [0, 1] 区间")]
    ThresholdOutOfRange { value: f32 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxError },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed { path: String, source: BoxError },
}

// ========== 从常见错误类型转换 ==========

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Vision(VisionError::RequestBuildFailed {
            source: Box::new(err),
        })
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        // 超出 DefaultBodyLimit 时 axum 以 413 状态报告
        if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::Request(RequestError::BodyTooLarge {
                source: Box::new(err),
            });
        }
        AppError::Request(RequestError::MultipartFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建订单不存在错误
    pub fn order_not_found(order_id: u64) -> Self {
        AppError::Order(OrderError::NotFound { order_id })
    }

    /// 创建视觉模型 API 调用错误
    pub fn vision_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Vision(VisionError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category_and_detail() {
        let err = AppError::order_not_found(404);
        assert_eq!(err.to_string(), "订单错误: 未找到订单 id=404");

        let err: AppError = RequestError::InvalidOrderId {
            value: "abc".to_string(),
        }
        .into();
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_file_read_failed_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::file_read_failed("orders.toml", io);
        assert!(matches!(
            &err,
            AppError::File(FileError::ReadFailed { path, .. }) if path == "orders.toml"
        ));
        assert!(err.to_string().contains("orders.toml"));
    }
}
