//! 出题上下文
//!
//! 封装"我正在为哪个文档出多少道题"这一信息

use std::fmt::Display;

/// 出题上下文
///
/// 包含处理单个文档所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct GenerationCtx {
    /// 文档索引（仅用于日志显示）
    pub doc_index: usize,

    /// 文档名称
    pub doc_name: String,

    /// 出题数量（已夹到合法范围）
    pub num_questions: usize,

    /// 难度标签
    pub difficulty: String,
}

impl GenerationCtx {
    /// 创建新的出题上下文
    pub fn new(doc_index: usize, doc_name: String, num_questions: usize, difficulty: String) -> Self {
        Self {
            doc_index,
            doc_name,
            num_questions,
            difficulty,
        }
    }
}

impl Display for GenerationCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文档#{} {} 出题数#{} 难度#{}]",
            self.doc_index, self.doc_name, self.num_questions, self.difficulty
        )
    }
}
