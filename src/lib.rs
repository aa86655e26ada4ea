//! # Order Check
//!
//! 拍照核对杂货订单：视觉模型列出图片中的商品，与订单比对，报告缺少和多出的数量。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据模型层（Models）
//! - `models/` - `ItemLabel`、`QuantityMapping`、`Order`、`Detection`、`ReconcileReport`
//! - `models/loaders` - 从 TOML 文件加载订单
//!
//! ### ② 业务能力层（Services）
//! - `item_parser` - 视觉模型文本 → 数量映射（按规则表逐行解析）
//! - `order_comparator` - 识别结果 vs 订单 → 缺少 / 多出
//! - `detection_filter` - 结构化检测结果按置信度过滤
//! - `VisionService` - 调用视觉模型
//! - `InMemoryOrderStore` - 订单存储
//!
//! ### ③ 流程层（Workflow）
//! - `ReconcileFlow` - 查询订单 → 识别 → 解析 → 比对 → 报告
//!
//! ### ④ 编排层（Orchestration）
//! - `server/` - axum 路由与错误映射
//! - `App` - 加载配置和订单、启动 HTTP 服务
//!
//! 解析、比对、过滤都是无状态纯函数，可被任意多个请求并发调用。

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Detection, ItemLabel, Order, QuantityMapping, ReconcileReport};
pub use services::{compare, parse, Comparison};
pub use workflow::ReconcileFlow;
