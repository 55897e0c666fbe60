/// 题型枚举
///
/// 固定的题型集合，混合出题时按权重分配到各题型；
/// `MultipleChoice` 是关键词全部落空时的兜底题型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 树/图结构分析
    TreeAnalysis,
    /// 代码执行结果
    CodeExecution,
    /// 算法复杂度分析
    AlgorithmAnalysis,
    /// 数据结构
    DataStructure,
    /// 图表匹配
    DiagramMatching,
    /// 普通选择题（兜底）
    MultipleChoice,
}

/// 参与关键词分类的题型（不含兜底题型），顺序即平局时的稳定顺序
pub const CLASSIFIED_TYPES: [QuestionType; 5] = [
    QuestionType::TreeAnalysis,
    QuestionType::CodeExecution,
    QuestionType::AlgorithmAnalysis,
    QuestionType::DataStructure,
    QuestionType::DiagramMatching,
];

impl QuestionType {
    /// 获取标准名称（写入提示词和生成结果的 type 字段）
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::TreeAnalysis => "tree_analysis",
            QuestionType::CodeExecution => "code_execution",
            QuestionType::AlgorithmAnalysis => "algorithm_analysis",
            QuestionType::DataStructure => "data_structure",
            QuestionType::DiagramMatching => "diagram_matching",
            QuestionType::MultipleChoice => "multiple_choice",
        }
    }

    /// 尝试从字符串解析题型（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tree_analysis" => Some(QuestionType::TreeAnalysis),
            "code_execution" => Some(QuestionType::CodeExecution),
            "algorithm_analysis" => Some(QuestionType::AlgorithmAnalysis),
            "data_structure" => Some(QuestionType::DataStructure),
            "diagram_matching" => Some(QuestionType::DiagramMatching),
            "multiple_choice" | "multiple-choice" => Some(QuestionType::MultipleChoice),
            _ => None,
        }
    }

    /// 智能查找题型（支持模糊匹配，找不到时回落到兜底题型）
    pub fn find(s: &str) -> Self {
        if let Some(qtype) = Self::from_str(s) {
            return qtype;
        }

        let s_lower = s.to_lowercase();
        if s_lower.contains("tree") || s_lower.contains("graph") {
            return QuestionType::TreeAnalysis;
        }
        if s_lower.contains("code") || s_lower.contains("execution") {
            return QuestionType::CodeExecution;
        }
        if s_lower.contains("algorithm") {
            return QuestionType::AlgorithmAnalysis;
        }
        if s_lower.contains("structure") {
            return QuestionType::DataStructure;
        }
        if s_lower.contains("diagram") || s_lower.contains("chart") {
            return QuestionType::DiagramMatching;
        }

        QuestionType::MultipleChoice
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_str_round_trip() {
        for qtype in CLASSIFIED_TYPES {
            assert_eq!(QuestionType::from_str(qtype.name()), Some(qtype));
        }
        assert_eq!(
            QuestionType::from_str("multiple_choice"),
            Some(QuestionType::MultipleChoice)
        );
    }

    #[test]
    fn test_find_falls_back_to_multiple_choice() {
        assert_eq!(QuestionType::find("essay"), QuestionType::MultipleChoice);
        assert_eq!(QuestionType::find("mixed"), QuestionType::MultipleChoice);
        assert_eq!(QuestionType::find("tree_and_graph"), QuestionType::TreeAnalysis);
    }
}
