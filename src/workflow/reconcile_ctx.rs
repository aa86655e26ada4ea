//! 核对请求上下文
//!
//! 封装"第几个请求、核对哪个订单"这一信息，只用于日志前缀

use std::fmt::Display;

/// 核对请求上下文
#[derive(Debug, Clone, Copy)]
pub struct ReconcileCtx {
    /// 订单ID
    pub order_id: u64,

    /// 进程内递增的请求序号（从1开始）
    pub request_seq: u64,
}

impl ReconcileCtx {
    pub fn new(order_id: u64, request_seq: u64) -> Self {
        Self {
            order_id,
            request_seq,
        }
    }
}

impl Display for ReconcileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[请求#{} 订单#{}]", self.request_seq, self.order_id)
    }
}
