//! 订单比对 - 业务能力层
//!
//! 纯函数：输入两份已规范化的数量映射，输出缺少和多出的部分。

use crate::models::item::QuantityMapping;

/// 比对结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// 应有但数量不足的商品，值为差额
    pub missing: QuantityMapping,
    /// 未下单或数量超出的商品，值为超出部分
    pub extra: QuantityMapping,
}

impl Comparison {
    /// 没有缺少也没有多出
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// 比较识别结果与订单要求
///
/// - 订单中的每个商品，识别数量少于要求时记入 `missing`
/// - 识别出的每个商品，数量多于要求（未下单视为 0）时记入 `extra`
/// - 数量相等的商品两边都不出现，结果中不会有数量为 0 的键
pub fn compare(recognized: &QuantityMapping, required: &QuantityMapping) -> Comparison {
    let missing: QuantityMapping = required
        .iter()
        .filter_map(|(label, &required_qty)| {
            let found = recognized.quantity_of(label);
            (found < required_qty).then(|| (label.clone(), required_qty - found))
        })
        .collect();

    let extra: QuantityMapping = recognized
        .iter()
        .filter_map(|(label, &found)| {
            let required_qty = required.quantity_of(label);
            (found > required_qty).then(|| (label.clone(), found - required_qty))
        })
        .collect();

    Comparison { missing, extra }
}
