//! 视觉模型服务 - 业务能力层
//!
//! 只负责"看图列清单"能力：把图片交给视觉模型，返回模型的原始文本。
//! 文本的解析由 `item_parser` 负责。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 图片以 base64 data URL 形式内联发送
//! - 兼容 OpenAI API 的服务（如 Gemini, Azure, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, VisionError};

/// 要求模型逐行列出商品的提示词
pub const LISTING_PROMPT: &str = "List all grocery items you see in the image. \
    If you see multiple of the same item, mention it multiple times or indicate the count. \
    Use bullet points or lines so it's easier to parse.";

const SYSTEM_PROMPT: &str = "You are a grocery checkout assistant. \
    Reply with one item per line, for example \"- 2 Coke\". \
    If no grocery items are visible, reply exactly \"No items visible\".";

/// 图片识别能力
///
/// 输入原始图片字节，输出模型的文本描述（格式不做保证）。
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> AppResult<String>;
}

/// 基于 OpenAI 兼容接口的视觉模型服务
pub struct VisionService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl VisionService {
    /// 创建新的视觉模型服务
    pub fn new(config: &Config) -> Self {
        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY，视觉模型调用可能会失败");
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 构建请求消息：系统消息 + (提示词, 图片)
    fn build_messages(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()?;

        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: LISTING_PROMPT.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: to_data_url(image, mime_type),
                        detail: Some(ImageDetail::High),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

#[async_trait]
impl VisionAnalyzer for VisionService {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> AppResult<String> {
        debug!(
            "调用视觉模型，模型: {}，图片 {} 字节 ({})",
            self.model_name,
            image.len(),
            mime_type
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(self.build_messages(image, mime_type)?)
            .temperature(0.2)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("视觉模型 API 调用失败: {}", e);
            AppError::vision_api_failed(&self.model_name, e)
        })?;

        debug!("视觉模型 API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| VisionError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

/// 图片字节转 data URL
fn to_data_url(image: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(image))
}
