use serde::{Deserialize, Serialize};

use crate::models::item::QuantityMapping;

/// 订单状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// 待核对
    #[default]
    Open,
    /// 已完成
    Finalized,
}

/// 单个订单：商品名称到应有数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub items: QuantityMapping,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    pub fn new(id: u64, items: QuantityMapping) -> Self {
        Self {
            id,
            items,
            status: OrderStatus::Open,
        }
    }

    /// 内置的演示订单，订单文件不存在时使用
    pub fn demo_orders() -> Vec<Order> {
        vec![
            Order::new(101, QuantityMapping::from([("Coke", 2), ("Chips", 1)])),
            Order::new(
                102,
                QuantityMapping::from([("Eggs", 12), ("Orange Juice", 1), ("Bread", 2)]),
            ),
        ]
    }
}

/// 订单文件的顶层结构
///
/// ```toml
/// [[orders]]
/// id = 101
///
/// [orders.items]
/// "Coke" = 2
/// "Chips" = 1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub orders: Vec<Order>,
}
