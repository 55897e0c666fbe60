//! 文本正规化 - 业务能力层
//!
//! 把上传文档抽取出的原始文本整理成 LLM 好处理、客户端好渲染的
//! 规范形式：
//!
//! - 统一换行、清理页码和多余空行
//! - 修复连字符断行和被硬换行拆开的调用语法
//! - 把元数据标签行（연산/조건/예시/설명/참고）固定为 `标签: ` 行首格式
//! - 用 {NOT_IN_CODE, IN_CODE} 两态行扫描识别代码段并包成 fenced block
//!
//! 纯文本变换，不做任何 I/O，也不返回错误；空输入返回空字符串。
//! 整个变换是幂等的：已包好的 fenced block 原样通过，不会二次包裹。

use regex::Regex;

use crate::config::Config;
use crate::services::lang::LangGuesser;

/// 元数据标签集合（연산/조건/예시/설명/참고）
static META_LABELS: phf::Set<&'static str> = phf::phf_set! {
    "연산",
    "조건",
    "예시",
    "설명",
    "참고",
};

fn label_alternation() -> String {
    META_LABELS.iter().copied().collect::<Vec<_>>().join("|")
}

/// 文本正规化器
pub struct TextNormalizer {
    /// 独立成行的页码 `1 / 30`
    page_number: Regex,
    /// 3 个以上连续换行
    blank_runs: Regex,
    /// 连字符断行 `compu-\nter`
    hyphen_wrap: Regex,
    /// 被断开的调用语法 `for\n(`
    call_wrap: Regex,
    /// 行首标签 `연산 : ` / `연산： `
    label_line: Regex,
    /// 句中出现的标签，拉到独立行首
    label_inline: Regex,
    /// 已规范化的标签行前缀
    label_prefix: Regex,
    /// 代码起始行启发式
    code_start: Regex,
    /// 换行前的行尾空白
    trailing_ws: Regex,
    lang: LangGuesser,
}

impl TextNormalizer {
    pub fn new(_config: &Config) -> Self {
        let labels = label_alternation();
        Self {
            page_number: Regex::new(r"\n?\s*\d+\s*/\s*\d+\s*\n").expect("内置正则表达式必须合法"),
            blank_runs: Regex::new(r"\n{3,}").expect("内置正则表达式必须合法"),
            hyphen_wrap: Regex::new(r"(\w)-\n(\w)").expect("内置正则表达式必须合法"),
            call_wrap: Regex::new(r"([A-Za-z0-9_])\n\(").expect("内置正则表达式必须合法"),
            label_line: Regex::new(&format!(r"(?m)^({labels})\s*[:：]\s*"))
                .expect("内置正则表达式必须合法"),
            label_inline: Regex::new(&format!(r"\s+({labels}):\s*"))
                .expect("内置正则表达式必须合法"),
            label_prefix: Regex::new(&format!(r"^({labels}):")).expect("内置正则表达式必须合法"),
            code_start: Regex::new(
                r"(public\s+class|static\s+void\s+main|#include\s*<|^\s*for\s*\(|^\s*if\s*\(|^\s*while\s*\(|;\s*$|\{\s*$)",
            )
            .expect("内置正则表达式必须合法"),
            trailing_ws: Regex::new(r"[ \t]+\n").expect("内置正则表达式必须合法"),
            lang: LangGuesser::new(),
        }
    }

    /// 正规化抽取文本
    ///
    /// 变换按固定顺序执行，每一步都是纯文本替换；
    /// 详见模块文档。
    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        // 0) 统一换行
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");

        // 1) 删除页码行、压缩空行
        let text = self.page_number.replace_all(&text, "\n");
        let text = self.blank_runs.replace_all(&text, "\n\n");

        // 2) 连字符断行 / 调用语法断行复原
        let text = self.hyphen_wrap.replace_all(&text, "$1$2");
        let text = self.call_wrap.replace_all(&text, "$1(");

        // 3) 元数据标签行规范化 + 句中标签拆行
        let text = self.label_line.replace_all(&text, "$1: ");
        let text = self.label_inline.replace_all(&text, "\n$1: ");

        // 4) 代码段识别并包成 fenced block
        let text = self.wrap_code_blocks(&text);

        // 5) 收尾：行尾空白、空行、首尾空白
        let text = self.trailing_ws.replace_all(&text, "\n");
        let text = self.blank_runs.replace_all(&text, "\n\n");
        text.trim().to_string()
    }

    /// 行扫描状态机：把疑似代码的连续行缓冲后输出为 fenced block
    fn wrap_code_blocks(&self, text: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut code_buf: Vec<String> = Vec::new();
        let mut in_code = false;
        let mut in_fence = false;

        for raw_line in text.split('\n') {
            let line = raw_line.trim_end();
            let trimmed = line.trim();

            // 已有的 fenced block 原样通过（保证幂等）
            if trimmed.starts_with("```") {
                self.flush_code(&mut code_buf, &mut out);
                in_code = false;
                in_fence = !in_fence;
                out.push(line.to_string());
                continue;
            }
            if in_fence {
                out.push(line.to_string());
                continue;
            }

            // 代码起始 / 起始后的延续判断
            if self.code_start.is_match(line) || trimmed.ends_with('{') || trimmed.ends_with("};") {
                in_code = true;
                code_buf.push(line.to_string());
                continue;
            }
            if in_code
                && (trimmed.ends_with(';') || trimmed.ends_with('}') || trimmed.ends_with('{'))
            {
                code_buf.push(line.to_string());
                continue;
            }

            // 标签行：先把缓冲的代码落盘，再输出标签
            if self.label_prefix.is_match(line) {
                self.flush_code(&mut code_buf, &mut out);
                in_code = false;
                out.push(line.to_string());
                continue;
            }

            // 完全平文
            if in_code {
                self.flush_code(&mut code_buf, &mut out);
                in_code = false;
            }
            out.push(line.to_string());
        }

        self.flush_code(&mut code_buf, &mut out);
        out.join("\n")
    }

    fn flush_code(&self, code_buf: &mut Vec<String>, out: &mut Vec<String>) {
        if code_buf.is_empty() {
            return;
        }
        let joined = code_buf.join("\n");
        let block = joined.trim_matches('\n');
        let lang = self.lang.guess(block);
        out.push(format!("```{}\n{}\n```\n", lang, block));
        code_buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(&Config::default())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalizer().normalize(""), "");
    }

    #[test]
    fn test_removes_page_number_lines() {
        let n = normalizer();
        let out = n.normalize("첫 페이지 내용\n3 / 30\n둘째 줄");
        assert!(!out.contains("3 / 30"));
        assert!(out.contains("첫 페이지 내용"));
        assert!(out.contains("둘째 줄"));
    }

    #[test]
    fn test_repairs_hyphen_and_call_wraps() {
        let n = normalizer();
        assert_eq!(n.normalize("compu-\nter"), "computer");
        assert_eq!(n.normalize("호출 구문 foo\n(x)"), "호출 구문 foo(x)");
    }

    #[test]
    fn test_normalizes_meta_label_lines() {
        let n = normalizer();
        assert_eq!(n.normalize("연산 : push, pop"), "연산: push, pop");
        assert_eq!(n.normalize("조건：n > 0"), "조건: n > 0");

        // 句中标签拉到行首
        let out = n.normalize("스택의 다음 연산: push");
        assert_eq!(out, "스택의 다음\n연산: push");
    }

    #[test]
    fn test_collapses_blank_runs() {
        let n = normalizer();
        let out = n.normalize("첫 줄\n\n\n\n\n둘째 줄");
        assert_eq!(out, "첫 줄\n\n둘째 줄");
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_never_emits_three_blank_lines() {
        let n = normalizer();
        for raw in [
            "a\n\n\n\nb\n\n\n\n\nc",
            "연산: x\n\n\n\npublic class A {\n}\n\n\n\n끝",
            "\n\n\n\n\n",
        ] {
            assert!(!n.normalize(raw).contains("\n\n\n"));
        }
    }

    #[test]
    fn test_wraps_code_block_between_meta_lines() {
        // 메타 두 줄 사이에 java 코드가 fenced block으로 들어가는 시나리오
        let n = normalizer();
        let raw = "연산: push, pop\npublic class Test {\n  int x = 1;\n}\n연산: 계속";
        let out = n.normalize(raw);
        assert_eq!(
            out,
            "연산: push, pop\n```java\npublic class Test {\n  int x = 1;\n}\n```\n\n연산: 계속"
        );
    }

    #[test]
    fn test_flushes_code_at_end_of_input() {
        let n = normalizer();
        let out = n.normalize("설명: 다음 코드를 보라\n#include <stdio.h>\nint main() {\nreturn 0;\n}");
        assert!(out.contains("```c\n"));
        assert!(out.trim_end().ends_with("```"));
    }

    #[test]
    fn test_idempotent() {
        let n = normalizer();
        let samples = [
            "연산: push, pop\npublic class Test {\n  int x = 1;\n}\n연산: 계속",
            "compu-\nter 설명 : 참고\n\n\n\n1 / 9\nfor (int i = 0; i < n; i++) {\n  sum += i;\n}",
            "이미 정리된 평문입니다.\n\n조건: n > 0",
            "",
        ];
        for raw in samples {
            let once = n.normalize(raw);
            let twice = n.normalize(&once);
            assert_eq!(once, twice, "normalize 应当幂等: {:?}", raw);
        }
    }

    #[test]
    fn test_existing_fence_not_rewrapped() {
        let n = normalizer();
        let raw = "설명: 코드\n```java\npublic class A {\n}\n```";
        let out = n.normalize(raw);
        assert_eq!(out.matches("```").count(), 2);
        assert_eq!(n.normalize(&out), out);
    }
}
