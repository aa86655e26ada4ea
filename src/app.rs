use crate::config::Config;
use crate::models::loaders::load_orders_or_demo;
use crate::server::{build_router, AppState};
use crate::services::{InMemoryOrderStore, VisionService};
use crate::utils::logging::log_startup;
use crate::workflow::ReconcileFlow;
use anyhow::{Context, Result};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用：加载订单、创建视觉服务、组装路由
    pub async fn initialize(config: Config) -> Result<Self> {
        let orders = load_orders_or_demo(Path::new(&config.orders_file))
            .await
            .with_context(|| format!("无法加载订单文件: {}", config.orders_file))?;

        log_startup(&config, orders.len());

        let store = Arc::new(InMemoryOrderStore::new(orders));
        let vision = Arc::new(VisionService::new(&config));
        let flow = Arc::new(ReconcileFlow::new(&config, vision, store));

        let router = build_router(AppState {
            flow,
            max_image_bytes: config.max_image_bytes,
        });

        Ok(Self { config, router })
    }

    /// 运行 HTTP 服务，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听地址: {}", self.config.bind_addr))?;

        info!("✓ HTTP 服务已启动: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到退出信号，正在关闭...");
    }
}
