//! 订单存储
//!
//! 核心比对逻辑从不直接访问存储，只接收查询得到的 `QuantityMapping`。

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::item::QuantityMapping;
use crate::models::order::{Order, OrderStatus};

/// 订单来源
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// 查询订单应有的商品，订单不存在时返回 None
    async fn get_required_items(&self, order_id: u64) -> Option<QuantityMapping>;

    /// 标记订单完成，重复调用不会出错
    async fn finalize(&self, order_id: u64) -> AppResult<Order>;
}

/// 内存订单存储
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<u64, Order>>,
}

impl InMemoryOrderStore {
    /// 用订单列表初始化，重复的订单 id 保留第一个
    pub fn new(orders: Vec<Order>) -> Self {
        let mut map = HashMap::with_capacity(orders.len());
        for mut order in orders {
            order.items = std::mem::take(&mut order.items).without_zeros();
            if map.contains_key(&order.id) {
                warn!("⚠️ 订单 id={} 重复，忽略后出现的定义", order.id);
                continue;
            }
            map.insert(order.id, order);
        }

        Self {
            orders: RwLock::new(map),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn get(&self, order_id: u64) -> Option<Order> {
        self.orders.read().await.get(&order_id).cloned()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get_required_items(&self, order_id: u64) -> Option<QuantityMapping> {
        self.orders
            .read()
            .await
            .get(&order_id)
            .map(|order| order.items.clone())
    }

    async fn finalize(&self, order_id: u64) -> AppResult<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::order_not_found(order_id))?;

        if order.status != OrderStatus::Finalized {
            order.status = OrderStatus::Finalized;
            info!("✓ 订单 {} 已标记为完成", order_id);
        }

        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;

    fn store() -> InMemoryOrderStore {
        InMemoryOrderStore::new(Order::demo_orders())
    }

    #[tokio::test]
    async fn test_get_required_items() {
        let store = store();
        let items = store.get_required_items(101).await.unwrap();
        assert_eq!(items, QuantityMapping::from([("Coke", 2), ("Chips", 1)]));
        assert!(store.get_required_items(999).await.is_none());
    }

    #[tokio::test]
    async fn test_finalize_is_idempotent() {
        let store = store();
        let first = store.finalize(102).await.unwrap();
        let second = store.finalize(102).await.unwrap();
        assert_eq!(first.status, OrderStatus::Finalized);
        assert_eq!(first, second);
        assert_eq!(store.get(102).await.unwrap().status, OrderStatus::Finalized);
    }

    #[tokio::test]
    async fn test_finalize_unknown_order() {
        let err = store().finalize(7).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Order(OrderError::NotFound { order_id: 7 })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first_and_drop_zeros() {
        let store = InMemoryOrderStore::new(vec![
            Order::new(1, QuantityMapping::from([("Coke", 1), ("Milk", 0)])),
            Order::new(1, QuantityMapping::from([("Bread", 5)])),
        ]);
        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get_required_items(1).await.unwrap(),
            QuantityMapping::from([("Coke", 1)])
        );
    }
}
