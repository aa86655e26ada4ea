//! 检测结果过滤
//!
//! 结构化检测器返回的是逐个物体的 `(label, confidence)`。
//! 置信度低于阈值的物体不计入识别结果，只累加到未识别计数。

use crate::models::detection::Detection;
use crate::models::item::{ItemLabel, QuantityMapping};

/// 过滤后的检测结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredDetections {
    pub recognized: QuantityMapping,
    pub unidentified_count: usize,
    pub total_detected: usize,
}

/// 按置信度阈值过滤并计数
///
/// 名称为空的检测也算作未识别。
pub fn filter_detections(detections: &[Detection], threshold: f32) -> FilteredDetections {
    let mut result = FilteredDetections {
        total_detected: detections.len(),
        ..Default::default()
    };

    for detection in detections {
        // NaN 置信度比较结果为 false，同样走未识别分支
        let confident = detection.confidence >= threshold;
        match ItemLabel::new(&detection.label) {
            Some(label) if confident => result.recognized.add(label, 1),
            _ => result.unidentified_count += 1,
        }
    }

    result
}
