//! 订单核对流程 - 流程层
//!
//! 核心职责：定义"一次上传"的完整处理流程
//!
//! 图片路径：
//! 1. 查询订单 → 2. 视觉模型列清单 → 3. 解析文本 → 4. 比对 → 5. 生成报告
//!
//! 检测结果路径：
//! 1. 查询订单 → 2. 按置信度过滤 → 3. 比对 → 4. 生成报告

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::detection::Detection;
use crate::models::item::QuantityMapping;
use crate::models::order::Order;
use crate::models::report::ReconcileReport;
use crate::services::{
    compare, filter_detections, item_parser, Comparison, OrderStore, VisionAnalyzer,
};
use crate::utils::logging::{log_report, truncate_text};
use crate::workflow::reconcile_ctx::ReconcileCtx;

/// 订单核对流程
///
/// - 编排完整的核对流程
/// - 不持有 HTTP 相关的任何东西
/// - 只依赖业务能力（services）
pub struct ReconcileFlow {
    vision: Arc<dyn VisionAnalyzer>,
    orders: Arc<dyn OrderStore>,
    confidence_threshold: f32,
    include_raw_response: bool,
    verbose_logging: bool,
    next_request: AtomicU64,
}

impl ReconcileFlow {
    /// 创建新的核对流程
    pub fn new(config: &Config, vision: Arc<dyn VisionAnalyzer>, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            vision,
            orders,
            confidence_threshold: config.confidence_threshold,
            include_raw_response: config.include_raw_response,
            verbose_logging: config.verbose_logging,
            next_request: AtomicU64::new(1),
        }
    }

    /// 图片路径：调用视觉模型识别后与订单比对
    pub async fn run_image(
        &self,
        order_id: u64,
        image: &[u8],
        mime_type: &str,
    ) -> AppResult<ReconcileReport> {
        let ctx = self.next_ctx(order_id);
        let required = self.required_items(&ctx).await?;

        info!("{} 📷 收到图片 {} 字节，正在调用视觉模型...", ctx, image.len());
        let raw_response = self.vision.analyze(image, mime_type).await.map_err(|e| {
            warn!("{} ⚠️ 视觉模型调用失败: {}", ctx, e);
            e
        })?;
        debug!("{} 模型原始响应: {}", ctx, truncate_text(&raw_response, 200));

        let lines = item_parser::parse_lines(&raw_response);
        if self.verbose_logging {
            for line in &lines {
                info!("{}   {:?}: {} x{}", ctx, line.rule, line.label, line.quantity);
            }
        }
        let total_detected = lines.len();
        let recognized: QuantityMapping = lines
            .into_iter()
            .map(|line| (line.label, line.quantity))
            .collect();

        let comparison = compare(&recognized, &required);
        let report = self.build_report(
            &ctx,
            recognized,
            comparison,
            total_detected,
            0,
            Some(raw_response),
        );

        log_report(&ctx, &report);
        Ok(report)
    }

    /// 检测结果路径：按置信度过滤后与订单比对
    pub async fn run_detections(
        &self,
        order_id: u64,
        detections: &[Detection],
    ) -> AppResult<ReconcileReport> {
        let ctx = self.next_ctx(order_id);
        let required = self.required_items(&ctx).await?;

        info!("{} 🔍 收到 {} 条检测结果", ctx, detections.len());
        let filtered = filter_detections(detections, self.confidence_threshold);
        if filtered.unidentified_count > 0 {
            info!(
                "{} {} 条检测低于置信度阈值 {:.2}，记为未识别",
                ctx, filtered.unidentified_count, self.confidence_threshold
            );
        }

        let comparison = compare(&filtered.recognized, &required);
        let report = self.build_report(
            &ctx,
            filtered.recognized,
            comparison,
            filtered.total_detected,
            filtered.unidentified_count,
            None,
        );

        log_report(&ctx, &report);
        Ok(report)
    }

    /// 标记订单完成
    pub async fn finalize(&self, order_id: u64) -> AppResult<Order> {
        self.orders.finalize(order_id).await
    }

    fn next_ctx(&self, order_id: u64) -> ReconcileCtx {
        ReconcileCtx::new(order_id, self.next_request.fetch_add(1, Ordering::Relaxed))
    }

    async fn required_items(&self, ctx: &ReconcileCtx) -> AppResult<QuantityMapping> {
        match self.orders.get_required_items(ctx.order_id).await {
            Some(items) => Ok(items),
            None => {
                warn!("{} ⚠️ 订单不存在", ctx);
                Err(AppError::order_not_found(ctx.order_id))
            }
        }
    }

    fn build_report(
        &self,
        ctx: &ReconcileCtx,
        recognized: QuantityMapping,
        comparison: Comparison,
        total_detected: usize,
        unidentified_count: usize,
        raw_response: Option<String>,
    ) -> ReconcileReport {
        ReconcileReport {
            order_id: ctx.order_id,
            total_recognized_items: recognized.total(),
            is_complete: comparison.is_exact(),
            recognized_items: recognized,
            missing_items: comparison.missing,
            extra_items: comparison.extra,
            total_detected,
            unidentified_count,
            raw_response: raw_response.filter(|_| self.include_raw_response),
            checked_at: Local::now(),
        }
    }
}
