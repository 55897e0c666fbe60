//! 代码语言推断 - 业务能力层
//!
//! 简单的代码语言推断（即使前端不做语法高亮，带语言标签的
//! fenced block 可读性也更好）。规则是有序的 (模式, 标签) 表，
//! 自上而下第一个命中的生效。

use regex::Regex;

/// 有序推断规则表
const LANG_RULES: &[(&str, &str)] = &[
    (r"(?i)public\s+class|static\s+void\s+main", "java"),
    (r"(?i)create\s+table|select\s+.+\s+from", "sql"),
    (r"\bdef\b|\bimport\b", "python"),
    (r"#include\s*<|int\s+main\s*\(", "c"),
];

/// 代码语言推断器
pub struct LangGuesser {
    rules: Vec<(Regex, &'static str)>,
}

impl LangGuesser {
    pub fn new() -> Self {
        let rules = LANG_RULES
            .iter()
            .map(|(pattern, label)| {
                (Regex::new(pattern).expect("内置正则表达式必须合法"), *label)
            })
            .collect();
        Self { rules }
    }

    /// 推断代码片段的语言，无法判断时返回空字符串
    pub fn guess(&self, code: &str) -> &'static str {
        for (pattern, label) in &self.rules {
            if pattern.is_match(code) {
                return label;
            }
        }
        ""
    }
}

impl Default for LangGuesser {
    fn default() -> Self {
        Self::new()
    }
}
