//! 题型分类 - 业务能力层
//!
//! 扫描正规化后的文本，按关键词命中次数估计各题型的相对权重。
//! 权重带下限（保证每个题型都有最低占比），并重新归一化到总和
//! 恰好为 1.0；一个关键词都没命中时退化为纯选择题分布。

use crate::config::Config;
use crate::models::question_type::QuestionType;

/// 题型 → 相对权重，顺序即题型声明顺序（平局时的稳定顺序）
pub type TypeRatio = Vec<(QuestionType, f64)>;

/// 各题型的关键词表（子串计数，韩文/英文混合）
static KEYWORDS: [(QuestionType, &[&str]); 5] = [
    (QuestionType::TreeAnalysis, &["트리", "Fan-In", "Fan-Out", "노드", "그래프"]),
    (QuestionType::CodeExecution, &["Java", "public", "class", "main", "코드", "실행", "결과"]),
    (QuestionType::AlgorithmAnalysis, &["알고리즘", "복잡도", "Big-O", "시간복잡도"]),
    (QuestionType::DataStructure, &["스택", "큐", "배열", "리스트", "자료구조"]),
    (QuestionType::DiagramMatching, &["그림", "도식", "차트", "흐름도", "플로차트", "다이어그램"]),
];

/// 题型分类器
pub struct TypeClassifier {
    floor: f64,
}

impl TypeClassifier {
    pub fn new(config: &Config) -> Self {
        Self {
            floor: config.ratio_floor,
        }
    }

    /// 分析文本，返回题型权重分布
    ///
    /// 零命中时返回 `{multiple_choice: 1.0}`；否则所有参与分类的
    /// 题型都会出现，权重 ≥ floor 且总和为 1.0。
    pub fn classify(&self, text: &str) -> TypeRatio {
        let counts: Vec<(QuestionType, usize)> = KEYWORDS
            .iter()
            .map(|(qtype, keywords)| {
                let count = keywords.iter().map(|kw| text.matches(kw).count()).sum();
                (*qtype, count)
            })
            .collect();

        let total: usize = counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return vec![(QuestionType::MultipleChoice, 1.0)];
        }

        let raw: TypeRatio = counts
            .into_iter()
            .map(|(qtype, count)| (qtype, count as f64 / total as f64))
            .collect();

        renormalize_with_floor(raw, self.floor)
    }
}

/// 下限夹紧 + 重新归一化
///
/// 低于下限的题型固定在下限上，剩余质量在其余题型间按原始比例
/// 重新分配；分配后又跌破下限的题型并入固定集合，循环直到稳定。
fn renormalize_with_floor(raw: TypeRatio, floor: f64) -> TypeRatio {
    let n = raw.len();
    let mut fixed = vec![false; n];

    loop {
        let fixed_mass = floor * fixed.iter().filter(|f| **f).count() as f64;
        let free_raw: f64 = raw
            .iter()
            .zip(&fixed)
            .filter(|(_, f)| !**f)
            .map(|((_, w), _)| w)
            .sum();
        let remaining = 1.0 - fixed_mass;

        let mut changed = false;
        for (i, (_, w)) in raw.iter().enumerate() {
            if fixed[i] {
                continue;
            }
            if free_raw <= f64::EPSILON || w / free_raw * remaining < floor {
                fixed[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // 全部命中下限时退化为均分
    if fixed.iter().all(|f| *f) {
        let share = 1.0 / n as f64;
        return raw.into_iter().map(|(qtype, _)| (qtype, share)).collect();
    }

    let fixed_mass = floor * fixed.iter().filter(|f| **f).count() as f64;
    let free_raw: f64 = raw
        .iter()
        .zip(&fixed)
        .filter(|(_, f)| !**f)
        .map(|((_, w), _)| w)
        .sum();
    let remaining = 1.0 - fixed_mass;

    raw.into_iter()
        .enumerate()
        .map(|(i, (qtype, w))| {
            if fixed[i] {
                (qtype, floor)
            } else {
                (qtype, w / free_raw * remaining)
            }
        })
        .collect()
}
