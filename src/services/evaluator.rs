//! 题目质量评估 - 业务能力层
//!
//! 不调用外部服务的启发式评估：用词汇重叠、长度分布等信号对
//! 一批题目打出四项 [0, 1] 分数。分数只用于报告展示和排序参考，
//! 不参与生成决策。题目列表或上下文为空时返回全零评分。

use std::collections::HashSet;

use tracing::debug;

use crate::models::question::{QualityScores, QuestionRecord};

/// 题目质量评估器
pub struct QualityEvaluator;

impl QualityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 对一批题目做整体评估
    ///
    /// `context` 是生成时使用的正规化学习资料文本。
    pub fn evaluate(&self, questions: &[QuestionRecord], context: &str) -> QualityScores {
        if questions.is_empty() || context.trim().is_empty() {
            return QualityScores::zeroed();
        }

        let context_words: HashSet<String> = tokenize(context);

        let scores = QualityScores {
            faithfulness: mean(questions.iter().map(|q| faithfulness(q, &context_words))),
            answer_relevancy: mean(questions.iter().map(relevancy)),
            context_precision: mean(questions.iter().map(precision)),
            context_recall: mean(questions.iter().map(recall)),
        };

        debug!(
            "质量评估完成: 平均分 {:.3} ({})",
            scores.average(),
            scores.grade()
        );
        scores
    }
}

impl Default for QualityEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn mean(iter: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = iter.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 忠实度：题干+答案的词汇与学习资料的重叠程度
fn faithfulness(q: &QuestionRecord, context_words: &HashSet<String>) -> f64 {
    let mut combined = q.question.clone();
    combined.push(' ');
    combined.push_str(&q.answer);

    let overlap = tokenize(&combined)
        .iter()
        .filter(|w| context_words.contains(*w))
        .count();
    (overlap as f64 / 10.0).min(1.0)
}

/// 答案相关性：用题干长度分布做粗略判断
///
/// 过短的题干通常信息不足，过长的题干通常混入了噪声。
fn relevancy(q: &QuestionRecord) -> f64 {
    match q.question.chars().count() {
        20..=200 => 0.85,
        10..=19 | 201..=300 => 0.7,
        _ => 0.5,
    }
}

/// 上下文精确度：选项结构是否完整（4지선다가 기본형）
fn precision(q: &QuestionRecord) -> f64 {
    match q.options.as_deref() {
        Some(options) if options.len() == 4 => 0.9,
        Some(options) if options.len() >= 3 => 0.8,
        Some(_) => 0.6,
        // 서술형 문제는 선택지가 없어도 정상
        None => 0.75,
    }
}

/// 上下文召回率：有无实质性解析说明
fn recall(q: &QuestionRecord) -> f64 {
    match q.explanation.as_deref() {
        Some(explanation) if explanation.chars().count() > 10 => 0.85,
        _ => 0.6,
    }
}
