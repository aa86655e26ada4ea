//! 商品清单解析 - 业务能力层
//!
//! 把视觉模型返回的逐行文本转换为 `QuantityMapping`。
//!
//! 每一行按固定顺序尝试以下规则，前一条失败才尝试下一条：
//!
//! 1. 数量在前：`2 Coke`、`2x Coke`、`2xCoke`、`2 x Coke`
//! 2. 数量在后：`Coke (2)`、`Coke x2`、`Coke 2`、`Coke: 2`、`Coke - 2`
//! 3. 兜底：整行作为名称，数量为 1
//!
//! 匹配前先去掉 markdown 加粗、列表符号和 `1.` 这样的编号。
//! 同时满足 1 和 2 的行（如 `2 Coke 3`）始终取规则 1 的结果。
//! 解析永远不会失败，无法理解的行要么走兜底规则，要么被跳过。
//! 模型表示"没有看到商品"的行同样被跳过。

use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;
use tracing::debug;

use crate::models::item::{ItemLabel, QuantityMapping};

/// 行首尾需要去掉的列表符号
static BULLET_CHARS: phf::Set<char> = phf_set! { '-', '•', '*' };

/// 名称末尾需要去掉的分隔符
static LABEL_SEPARATORS: phf::Set<char> = phf_set! { ':', ',', '-', '–', '—' };

// `2xCoke` 中的 x 紧跟数字；`2 Xbox` 中 x 前有空格时后面也必须有空格
static QUANTITY_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]+)(?:[xX×]\s*|\s*[xX×]\s+|\s+)([\p{L}\p{N}][\p{L}\p{N}\s'&./-]*)$",
    )
    .unwrap()
});

static QUANTITY_LAST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([\p{L}\p{N}][\p{L}\p{N}\s'&./-]*?)\s*[:,\-–—]?\s*(?:\(\s*[xX×]?\s*([0-9]+)\s*\)|[xX×]\s*([0-9]+)|([0-9]+)\s*[xX×]?)$",
    )
    .unwrap()
});

/// 有序列表编号，如 `1.`、`2)`
static ENUMERATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+[.)]\s+").unwrap());

static NO_ITEMS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:none|nothing|no (?:grocery )?items?(?: (?:are |were )?(?:visible|found|detected|seen|recognized|recognised))?(?: in (?:the|this) (?:image|photo))?)[.!]?$",
    )
    .unwrap()
});

/// 命中的解析规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    /// 数量在前
    QuantityFirst,
    /// 数量在后
    QuantityLast,
    /// 整行作为名称，数量为 1
    Fallback,
}

/// 单行解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub label: ItemLabel,
    pub quantity: u32,
    pub rule: LineRule,
}

type RuleFn = fn(&str) -> Option<(&str, u32)>;

/// 按优先级排列的规则表
const RULES: [(LineRule, RuleFn); 2] = [
    (LineRule::QuantityFirst, match_quantity_first),
    (LineRule::QuantityLast, match_quantity_last),
];

/// 解析整段文本
///
/// 空行和只含标点的行不产生条目；同名商品的数量累加。
pub fn parse(text: &str) -> QuantityMapping {
    let lines = parse_lines(text);
    let mapping: QuantityMapping = lines
        .into_iter()
        .map(|parsed| (parsed.label, parsed.quantity))
        .collect();

    debug!("解析完成: {} 种商品, 共 {} 件", mapping.len(), mapping.total());

    mapping
}

/// 逐行解析，只返回产生条目的行
pub fn parse_lines(text: &str) -> Vec<ParsedLine> {
    text.lines().filter_map(parse_line).collect()
}

/// 解析单行，返回 None 表示该行被跳过
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let cleaned = clean_line(line);
    let stripped = cleaned.as_str();
    if !stripped.chars().any(char::is_alphanumeric) || NO_ITEMS_RE.is_match(stripped) {
        return None;
    }

    for (rule, matcher) in RULES {
        if let Some((raw_label, quantity)) = matcher(stripped) {
            // 名称规范化后为空时继续尝试下一条规则
            if let Some(label) = ItemLabel::new(trim_separators(raw_label)) {
                return Some(ParsedLine {
                    label,
                    quantity,
                    rule,
                });
            }
        }
    }

    ItemLabel::new(stripped).map(|label| ParsedLine {
        label,
        quantity: 1,
        rule: LineRule::Fallback,
    })
}

/// 去掉首尾的列表符号和空白
pub fn strip_bullets(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || BULLET_CHARS.contains(&c))
}

/// 去掉加粗标记、列表符号和行首编号
fn clean_line(line: &str) -> String {
    let unbolded = line.replace("**", "");
    let stripped = strip_bullets(&unbolded);
    let without_number = match ENUMERATOR_RE.find(stripped) {
        Some(m) => strip_bullets(&stripped[m.end()..]),
        None => stripped,
    };
    without_number.to_string()
}

/// 去掉名称末尾残留的分隔符
fn trim_separators(label: &str) -> &str {
    label.trim_end_matches(|c: char| c.is_whitespace() || LABEL_SEPARATORS.contains(&c))
}

fn match_quantity_first(line: &str) -> Option<(&str, u32)> {
    let caps = QUANTITY_FIRST_RE.captures(line)?;
    let quantity = parse_quantity(caps.get(1)?.as_str());
    Some((caps.get(2)?.as_str(), quantity))
}

fn match_quantity_last(line: &str) -> Option<(&str, u32)> {
    let caps = QUANTITY_LAST_RE.captures(line)?;
    let digits = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
    Some((caps.get(1)?.as_str(), parse_quantity(digits.as_str())))
}

/// 数字串转数量，超出 u32 时饱和
fn parse_quantity(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
