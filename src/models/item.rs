use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// 规范化后的商品名称
///
/// 构造时会去掉首尾空白、合并中间多余空白并转换为标题大小写，
/// 因此 "coke 750ml" 与 "  COKE   750ML " 会得到同一个键 "Coke 750Ml"。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemLabel(String);

impl ItemLabel {
    /// 从原始文本构造规范化名称，规范化后为空则返回 None
    pub fn new(raw: &str) -> Option<Self> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return None;
        }
        Some(Self(title_case(&collapsed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 标题大小写：字母前一个字符不是字母时大写，否则小写
///
/// 数字不算字母，所以 "750ml" 会变成 "750Ml"。
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }

    result
}

/// 商品名称到数量的映射
///
/// 不存在的名称等价于数量 0。内部使用 BTreeMap，序列化结果按名称排序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantityMapping(BTreeMap<ItemLabel, u32>);

impl QuantityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加数量（溢出时饱和到 u32::MAX）
    pub fn add(&mut self, label: ItemLabel, quantity: u32) {
        let entry = self.0.entry(label).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// 获取数量，不存在时为 0
    pub fn quantity_of(&self, label: &ItemLabel) -> u32 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &ItemLabel) -> bool {
        self.0.contains_key(label)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ItemLabel, u32> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 所有数量之和
    pub fn total(&self) -> u64 {
        self.0.values().map(|&q| u64::from(q)).sum()
    }

    /// 去掉数量为 0 的键
    pub fn without_zeros(mut self) -> Self {
        self.0.retain(|_, quantity| *quantity > 0);
        self
    }
}

impl FromIterator<(ItemLabel, u32)> for QuantityMapping {
    /// 重复的名称会累加
    fn from_iter<I: IntoIterator<Item = (ItemLabel, u32)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (label, quantity) in iter {
            mapping.add(label, quantity);
        }
        mapping
    }
}

impl<'a> FromIterator<(&'a str, u32)> for QuantityMapping {
    /// 名称会先规范化，规范化后为空的条目被忽略
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        iter.into_iter()
            .filter_map(|(raw, quantity)| ItemLabel::new(raw).map(|label| (label, quantity)))
            .collect()
    }
}

impl<const N: usize> From<[(&str, u32); N]> for QuantityMapping {
    fn from(pairs: [(&str, u32); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for QuantityMapping {
    type Item = (ItemLabel, u32);
    type IntoIter = btree_map::IntoIter<ItemLabel, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuantityMapping {
    type Item = (&'a ItemLabel, &'a u32);
    type IntoIter = btree_map::Iter<'a, ItemLabel, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for QuantityMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuantityMapping {
    /// 反序列化时同样规范化名称，大小写不同的重复名称会合并累加
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .map(|(label, quantity)| (label.as_str(), *quantity))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(raw: &str) -> ItemLabel {
        ItemLabel::new(raw).unwrap()
    }

    #[test]
    fn test_label_title_case() {
        assert_eq!(label("coke").as_str(), "Coke");
        assert_eq!(label("ORANGE JUICE").as_str(), "Orange Juice");
        assert_eq!(label("coke 750ml").as_str(), "Coke 750Ml");
        assert_eq!(label("eggs 12-pack").as_str(), "Eggs 12-Pack");
    }

    #[test]
    fn test_label_whitespace_is_collapsed() {
        assert_eq!(label("  chips   classic \t").as_str(), "Chips Classic");
        assert!(ItemLabel::new("   ").is_none());
        assert!(ItemLabel::new("").is_none());
    }

    #[test]
    fn test_mapping_absent_label_is_zero() {
        let mapping = QuantityMapping::from([("Coke", 2)]);
        assert_eq!(mapping.quantity_of(&label("coke")), 2);
        assert_eq!(mapping.quantity_of(&label("Chips")), 0);
    }

    #[test]
    fn test_mapping_from_pairs_merges_variants() {
        let mapping = QuantityMapping::from([("coke", 1), ("COKE", 2), ("Chips", 0)]);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.quantity_of(&label("Coke")), 3);
        assert_eq!(mapping.total(), 3);

        let cleaned = mapping.without_zeros();
        assert_eq!(cleaned.len(), 1);
        assert!(!cleaned.contains(&label("Chips")));
    }

    #[test]
    fn test_mapping_add_saturates() {
        let mut mapping = QuantityMapping::new();
        mapping.add(label("Coke"), u32::MAX);
        mapping.add(label("Coke"), 5);
        assert_eq!(mapping.quantity_of(&label("Coke")), u32::MAX);
    }

    #[test]
    fn test_mapping_json_shape() {
        let mapping = QuantityMapping::from([("Coke", 2), ("Chips", 1)]);
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"Chips":1,"Coke":2}"#);

        let back: QuantityMapping = serde_json::from_str(r#"{"coke": 2, "Coke": 1}"#).unwrap();
        assert_eq!(back.quantity_of(&label("Coke")), 3);
    }
}
