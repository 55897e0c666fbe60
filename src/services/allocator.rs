//! 题量分配 - 业务能力层
//!
//! 把题型权重分布换算成各题型的整数题量：贪心地从权重最高的
//! 题型开始分配，并为后面的每个题型预留至少 1 个名额；最后一个
//! 题型吃掉剩余全部名额。不是精确比例分摊算法（没有最大余额法
//! 之类的保证），只保证总量精确和"还有名额时人人有份"。

use std::cmp::Ordering;

use crate::models::question_type::QuestionType;
use crate::services::classifier::TypeRatio;

/// 题型 → 题目数量
pub type Distribution = Vec<(QuestionType, usize)>;

/// 按权重分配题量
///
/// 返回的数量总和精确等于 `total`；数量为 0 的题型被过滤掉。
/// 排序按权重降序，权重相同时保持输入顺序（稳定排序）。
pub fn allocate(total: usize, ratios: &TypeRatio) -> Distribution {
    if total == 0 || ratios.is_empty() {
        return Vec::new();
    }

    let mut sorted: TypeRatio = ratios.clone();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    let mut left = total;
    let mut out: Distribution = Vec::with_capacity(n);

    for (i, (qtype, ratio)) in sorted.iter().enumerate() {
        let count = if i + 1 == n {
            // 最后一个题型吃掉剩余名额
            left
        } else {
            let want = ((total as f64 * ratio) as usize).max(1);
            // 为后面每个题型预留 1 个名额，名额不足时夹到 0
            let reserved = n - i - 1;
            want.min(left.saturating_sub(reserved))
        };
        left -= count;
        out.push((*qtype, count));
    }

    out.retain(|(_, count)| *count > 0);
    out
}
