/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::report::ReconcileReport;
use crate::workflow::ReconcileCtx;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`；未设置时按 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会 panic（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
/// - `order_count`: 已加载的订单数
pub fn log_startup(config: &Config, order_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 订单核对服务启动 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("🌐 监听地址: {}", config.bind_addr);
    info!("🤖 视觉模型: {}", config.llm_model_name);
    info!("📋 已加载订单: {} 个", order_count);
    info!("🎯 置信度阈值: {:.2}", config.confidence_threshold);
    info!("{}", "=".repeat(60));
}

/// 记录单次核对结果
pub fn log_report(ctx: &ReconcileCtx, report: &ReconcileReport) {
    if report.is_complete {
        info!(
            "{} ✅ 核对通过: 识别 {} 件商品，与订单一致",
            ctx, report.total_recognized_items
        );
        return;
    }

    warn!(
        "{} ⚠️ 核对不一致: 识别 {} 件，缺少 {} 种 ({} 件)，多出 {} 种 ({} 件)",
        ctx,
        report.total_recognized_items,
        report.missing_items.len(),
        report.missing_items.total(),
        report.extra_items.len(),
        report.extra_items.total()
    );
    for (label, quantity) in &report.missing_items {
        info!("{}   ❌ 缺少 {} x{}", ctx, label, quantity);
    }
    for (label, quantity) in &report.extra_items {
        info!("{}   ➕ 多出 {} x{}", ctx, label, quantity);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
