use serde::{Deserialize, Serialize};

/// 结构化检测器返回的单个物体
///
/// 例如 `{"label": "Coke 750ml", "confidence": 0.92}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
