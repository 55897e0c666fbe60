use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 生成的题目记录
///
/// 由 LLM 按批返回，后处理阶段只做清洗（去掉选项前缀、补代码块、
/// 整理空白），未知字段原样透传。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 批内唯一ID（打乱后重新编号）
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: u32,

    /// 题型名称
    #[serde(rename = "type", default)]
    pub question_type: String,

    /// 题干（可能内嵌 fenced 代码块）
    #[serde(default)]
    pub question: String,

    /// 选项（仅选择类题目存在）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// 正确答案
    #[serde(default)]
    pub answer: String,

    /// 解析说明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// LLM 返回的其他字段，原样透传
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = crate::utils::logging::truncate_text(&self.question, 80);
        write!(f, "#{} [{}] {}", self.id, self.question_type, preview)
    }
}

// id 字段兼容整数和数字字符串两种写法
fn deserialize_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = u32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or numeric string id")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as u32)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.max(0) as u32)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trim().parse().unwrap_or(0))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// 统计各题型的题目数量
pub fn type_stats(questions: &[QuestionRecord]) -> BTreeMap<String, usize> {
    let mut stats: BTreeMap<String, usize> = BTreeMap::new();
    for q in questions {
        let key = if q.question_type.is_empty() {
            "unknown".to_string()
        } else {
            q.question_type.clone()
        };
        *stats.entry(key).or_insert(0) += 1;
    }
    stats
}

/// 待处理的源文档（文本已由上游抽取完成）
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub path: String,
    pub text: String,
}

/// 题目质量评分，各项均在 [0, 1] 区间
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct QualityScores {
    pub faithfulness: f64,
    pub answer_relevancy: f64,
    pub context_precision: f64,
    pub context_recall: f64,
}

impl QualityScores {
    /// 全零评分（评估失败时的兜底值）
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// 四项指标的平均值
    pub fn average(&self) -> f64 {
        (self.faithfulness + self.answer_relevancy + self.context_precision + self.context_recall)
            / 4.0
    }

    /// 把平均分转换为等级标签
    pub fn grade(&self) -> &'static str {
        let avg = self.average();
        if avg >= 0.9 {
            "매우 우수"
        } else if avg >= 0.8 {
            "우수"
        } else if avg >= 0.7 {
            "양호"
        } else if avg >= 0.6 {
            "보통"
        } else {
            "개선 필요"
        }
    }
}

/// 单个文档的生成报告（写入输出目录的 JSON 文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub source: String,
    pub generated_at: String,
    pub questions: Vec<QuestionRecord>,
    pub type_stats: BTreeMap<String, usize>,
    pub quality_scores: QualityScores,
    pub average_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tolerates_missing_fields() {
        // options / explanation 缺失时不报错
        let q: QuestionRecord =
            serde_json::from_str(r#"{"id": 1, "type": "code_execution", "question": "출력은?", "answer": "3"}"#)
                .unwrap();
        assert_eq!(q.id, 1);
        assert!(q.options.is_none());
        assert!(q.explanation.is_none());
    }

    #[test]
    fn test_record_id_accepts_numeric_string() {
        let q: QuestionRecord = serde_json::from_str(r#"{"id": "7", "question": "q", "answer": "a"}"#).unwrap();
        assert_eq!(q.id, 7);
        assert_eq!(q.question_type, "");
    }

    #[test]
    fn test_record_passes_unknown_fields_through() {
        let q: QuestionRecord = serde_json::from_str(
            r#"{"id": 1, "question": "q", "answer": "a", "difficulty": "hard"}"#,
        )
        .unwrap();
        assert_eq!(q.extra.get("difficulty").and_then(|v| v.as_str()), Some("hard"));

        let round_trip = serde_json::to_value(&q).unwrap();
        assert_eq!(round_trip.get("difficulty").and_then(|v| v.as_str()), Some("hard"));
    }

    #[test]
    fn test_type_stats_counts_unknown() {
        let questions = vec![
            QuestionRecord { question_type: "code_execution".into(), ..Default::default() },
            QuestionRecord { question_type: "code_execution".into(), ..Default::default() },
            QuestionRecord::default(),
        ];
        let stats = type_stats(&questions);
        assert_eq!(stats.get("code_execution"), Some(&2));
        assert_eq!(stats.get("unknown"), Some(&1));
    }

    #[test]
    fn test_quality_grade_bands() {
        let perfect = QualityScores {
            faithfulness: 1.0,
            answer_relevancy: 1.0,
            context_precision: 1.0,
            context_recall: 1.0,
        };
        assert_eq!(perfect.grade(), "매우 우수");
        assert_eq!(QualityScores::zeroed().grade(), "개선 필요");
    }
}
