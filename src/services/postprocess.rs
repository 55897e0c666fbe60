//! 生成结果后处理 - 业务能力层
//!
//! 对 LLM 返回的题目记录做展示前清洗：
//!
//! - 去掉选项的枚举前缀（①、A)、1)、(3) 等）
//! - 题干里有代码信号但缺少 fenced block 时补上
//! - 整理解析说明的空白
//!
//! 逐条处理、保持顺序、一进一出；options / explanation 缺失视为
//! 不存在而不是错误，未知字段原样透传。

use regex::Regex;

use crate::models::question::QuestionRecord;
use crate::services::lang::LangGuesser;

/// 生成结果后处理器
pub struct QuestionPostprocessor {
    /// 选项枚举前缀：A) / B. / ① / (3) / 12)
    choice_prefix: Regex,
    /// 题干中的代码信号
    code_hint: Regex,
    /// 换行前的多余空白
    trailing_ws: Regex,
    lang: LangGuesser,
}

impl QuestionPostprocessor {
    pub fn new() -> Self {
        Self {
            choice_prefix: Regex::new(
                r"(?i)^\s*(?:[A-D]\s*[\)\.\s]|[①-⑳]|(?:\(?\d{1,2}\)?[\.\)]))\s*",
            )
            .expect("内置正则表达式必须合法"),
            code_hint: Regex::new(
                r"(?i)(public\s+class|static\s+void\s+main|\bfor\s*\(|\bif\s*\(|\bwhile\s*\(|#include\s*<)",
            )
            .expect("内置正则表达式必须合法"),
            trailing_ws: Regex::new(r"\s+\n").expect("内置正则表达式必须合法"),
            lang: LangGuesser::new(),
        }
    }

    /// 清洗一批题目记录（保持顺序，一进一出）
    pub fn postprocess(&self, questions: Vec<QuestionRecord>) -> Vec<QuestionRecord> {
        questions.into_iter().map(|q| self.postprocess_one(q)).collect()
    }

    fn postprocess_one(&self, mut q: QuestionRecord) -> QuestionRecord {
        // 选项前缀清理
        if let Some(options) = q.options.take() {
            q.options = Some(
                options
                    .into_iter()
                    .map(|opt| self.strip_choice_prefix(&opt))
                    .collect(),
            );
        }

        // 代码块补全
        let body = q.question.replace("\r\n", "\n");
        q.question = if self.code_hint.is_match(&body) && !body.contains("```") {
            let lang = self.lang.guess(&body);
            format!("```{}\n{}\n```", lang, body)
        } else {
            body
        };

        // 解析说明空白整理
        if let Some(explanation) = q.explanation.take() {
            let cleaned = self.trailing_ws.replace_all(&explanation, "\n");
            q.explanation = Some(cleaned.trim().to_string());
        }

        q
    }

    /// 去掉选项文本行首的枚举前缀
    pub fn strip_choice_prefix(&self, option: &str) -> String {
        self.choice_prefix.replace(option, "").trim().to_string()
    }
}

impl Default for QuestionPostprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_options(options: &[&str]) -> QuestionRecord {
        QuestionRecord {
            id: 1,
            question_type: "multiple_choice".to_string(),
            question: "다음 중 옳은 것은?".to_string(),
            options: Some(options.iter().map(|s| s.to_string()).collect()),
            answer: "1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_strips_choice_prefixes() {
        let p = QuestionPostprocessor::new();
        let out = p.postprocess(vec![record_with_options(&["① apple", "B) banana", "(3) cherry"])]);
        assert_eq!(
            out[0].options.as_deref().unwrap(),
            ["apple", "banana", "cherry"]
        );
    }

    #[test]
    fn test_strips_more_prefix_variants() {
        let p = QuestionPostprocessor::new();
        assert_eq!(p.strip_choice_prefix("A. 스택"), "스택");
        assert_eq!(p.strip_choice_prefix("c) 큐"), "큐");
        assert_eq!(p.strip_choice_prefix("12) 트리"), "트리");
        assert_eq!(p.strip_choice_prefix("⑤ 그래프"), "그래프");
        assert_eq!(p.strip_choice_prefix("전위 순회"), "전위 순회");
    }

    #[test]
    fn test_wraps_code_hinted_question() {
        let p = QuestionPostprocessor::new();
        let mut q = record_with_options(&[]);
        q.question = "public class Test {\n  int x = 1;\n}\n출력은?".to_string();
        let out = p.postprocess(vec![q]);
        assert!(out[0].question.starts_with("```java\n"));
        assert!(out[0].question.ends_with("```"));
    }

    #[test]
    fn test_no_double_wrapping() {
        let p = QuestionPostprocessor::new();
        let mut q = record_with_options(&["① 1", "② 2"]);
        q.question = "```java\npublic class Test {}\n```\n출력은?".to_string();

        let once = p.postprocess(vec![q]);
        let twice = p.postprocess(once.clone());
        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap(),
            "postprocess 应当幂等"
        );
        assert_eq!(once[0].question.matches("```").count(), 2);
    }

    #[test]
    fn test_plain_question_untouched() {
        let p = QuestionPostprocessor::new();
        let mut q = record_with_options(&[]);
        q.question = "스택의 LIFO 특성을 설명하시오.".to_string();
        let out = p.postprocess(vec![q]);
        assert_eq!(out[0].question, "스택의 LIFO 특성을 설명하시오.");
    }

    #[test]
    fn test_explanation_whitespace_collapsed() {
        let p = QuestionPostprocessor::new();
        let mut q = record_with_options(&[]);
        q.explanation = Some("첫 줄  \n둘째 줄\n".to_string());
        let out = p.postprocess(vec![q]);
        assert_eq!(out[0].explanation.as_deref(), Some("첫 줄\n둘째 줄"));
    }

    #[test]
    fn test_missing_optional_fields_tolerated() {
        let p = QuestionPostprocessor::new();
        let q = QuestionRecord {
            question: "서술형 문제".to_string(),
            answer: "답".to_string(),
            ..Default::default()
        };
        let out = p.postprocess(vec![q]);
        assert!(out[0].options.is_none());
        assert!(out[0].explanation.is_none());
    }
}
