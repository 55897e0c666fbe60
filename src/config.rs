/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 待处理文档（已抽取文本）所在目录
    pub docs_folder: String,
    /// 生成结果（JSON 报告）输出目录
    pub output_folder: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 同时处理的文档数量
    pub max_concurrent_docs: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 是否启用上传文本的服务端正规化
    pub preprocess_enabled: bool,
    /// 默认出题数量
    pub default_num_questions: usize,
    /// 出题数量下限
    pub min_questions: usize,
    /// 出题数量上限
    pub max_questions: usize,
    /// 出题模式："mixed" 按关键词分析混合出题，其他值视为单一题型名称
    pub question_type: String,
    /// 难度标签（直接写入提示词）
    pub difficulty: String,
    /// 题型权重下限（保证每个题型都有最低占比）
    pub ratio_floor: f64,
    /// 发送给 LLM 的学习资料最大前缀长度（字符数）
    pub prompt_max_chars: usize,
    /// 单一题型模式下每批生成的题目数量
    pub gen_batch_size: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub gen_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_folder: "downloads".to_string(),
            output_folder: "output".to_string(),
            output_log_file: "output.txt".to_string(),
            max_concurrent_docs: 2,
            verbose_logging: false,
            preprocess_enabled: true,
            default_num_questions: 20,
            min_questions: 5,
            max_questions: 50,
            question_type: "mixed".to_string(),
            difficulty: "medium-high".to_string(),
            ratio_floor: 0.03,
            prompt_max_chars: 8000,
            gen_batch_size: 10,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            gen_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            docs_folder: std::env::var("DOCS_FOLDER").unwrap_or(default.docs_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            max_concurrent_docs: std::env::var("MAX_CONCURRENT_DOCS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_docs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            preprocess_enabled: std::env::var("PREPROCESS_ENABLE").map(|v| v == "1").unwrap_or(default.preprocess_enabled),
            default_num_questions: std::env::var("NUM_QUESTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.default_num_questions),
            min_questions: default.min_questions,
            max_questions: default.max_questions,
            question_type: std::env::var("QUESTION_TYPE").unwrap_or(default.question_type),
            difficulty: std::env::var("DIFFICULTY").unwrap_or(default.difficulty),
            ratio_floor: std::env::var("RATIO_FLOOR").ok().and_then(|v| v.parse().ok()).unwrap_or(default.ratio_floor),
            prompt_max_chars: std::env::var("PROMPT_MAX_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.prompt_max_chars),
            gen_batch_size: default.gen_batch_size,
            llm_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            gen_model: std::env::var("GEN_MODEL").unwrap_or(default.gen_model),
        }
    }

    /// 把请求的出题数量夹到合法范围内
    pub fn clamp_question_count(&self, n: usize) -> usize {
        n.clamp(self.min_questions, self.max_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_question_count() {
        let config = Config::default();
        assert_eq!(config.clamp_question_count(1), 5);
        assert_eq!(config.clamp_question_count(20), 20);
        assert_eq!(config.clamp_question_count(100), 50);
    }
}
