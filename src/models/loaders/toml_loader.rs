use crate::error::{AppError, AppResult, FileError};
use crate::models::order::{Order, OrderBook};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载订单
///
/// 订单中数量为 0 的条目会被去掉，与"未出现"等价。
pub async fn load_order_book(toml_file_path: &Path) -> AppResult<OrderBook> {
    if !fs::try_exists(toml_file_path).await.unwrap_or(false) {
        return Err(FileError::NotFound {
            path: toml_file_path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(toml_file_path.display().to_string(), e))?;

    let mut book: OrderBook = toml::from_str(&content)
        .map_err(|e| AppError::toml_parse_failed(toml_file_path.display().to_string(), e))?;

    for order in &mut book.orders {
        order.items = std::mem::take(&mut order.items).without_zeros();
    }

    Ok(book)
}

/// 加载订单文件，文件不存在时退回内置演示订单
pub async fn load_orders_or_demo(toml_file_path: &Path) -> AppResult<Vec<Order>> {
    match load_order_book(toml_file_path).await {
        Ok(book) => {
            tracing::info!(
                "✓ 从 {} 加载了 {} 个订单",
                toml_file_path.display(),
                book.orders.len()
            );
            Ok(book.orders)
        }
        Err(AppError::File(FileError::NotFound { path })) => {
            tracing::warn!("⚠️ 订单文件不存在: {}，使用内置演示订单", path);
            Ok(Order::demo_orders())
        }
        Err(e) => Err(e),
    }
}
