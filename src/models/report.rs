use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::item::QuantityMapping;

/// 一次核对的结果，直接作为 HTTP 响应体返回
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub order_id: u64,
    pub recognized_items: QuantityMapping,
    pub missing_items: QuantityMapping,
    pub extra_items: QuantityMapping,
    /// 识别出的商品总件数
    pub total_recognized_items: u64,
    /// 参与核对的检测条目数（文本路径下为有效行数）
    pub total_detected: usize,
    /// 置信度低于阈值而未计入的检测数
    pub unidentified_count: usize,
    /// 没有缺少也没有多出
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    pub checked_at: DateTime<Local>,
}
