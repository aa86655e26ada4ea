use std::str::FromStr;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 订单 TOML 文件路径
    pub orders_file: String,
    /// 结构化检测结果的置信度阈值，低于该值记为未识别
    pub confidence_threshold: f32,
    /// 响应中是否附带视觉模型原始文本
    pub include_raw_response: bool,
    /// 上传图片的最大字节数
    pub max_image_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 视觉模型配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            orders_file: "orders.toml".to_string(),
            confidence_threshold: 0.80,
            include_raw_response: true,
            max_image_bytes: 10 * 1024 * 1024,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-exp-1206".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置
    ///
    /// `from_env` 基于此实现；测试中可以传入 HashMap 查找函数。
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let config = Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(default.bind_addr),
            orders_file: lookup("ORDERS_FILE").unwrap_or(default.orders_file),
            confidence_threshold: parse_var(
                &lookup,
                "CONFIDENCE_THRESHOLD",
                "f32",
                default.confidence_threshold,
            )?,
            include_raw_response: parse_var(
                &lookup,
                "INCLUDE_RAW_RESPONSE",
                "bool",
                default.include_raw_response,
            )?,
            max_image_bytes: parse_var(&lookup, "MAX_IMAGE_BYTES", "usize", default.max_image_bytes)?,
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool", default.verbose_logging)?,
            llm_api_key: lookup("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        };

        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.confidence_threshold,
            }
            .into());
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var_name: &str, expected_type: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var_name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
    }
}
