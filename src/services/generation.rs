//! 出题服务 - 业务能力层
//!
//! 只负责"调用 LLM 生成题目"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）
//!
//! 每次调用针对一个题型：传入正规化文本的有界前缀、题型名称、
//! 数量、难度和起始ID，返回的记录会按起始ID重新连续编号。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::question::QuestionRecord;
use crate::models::question_type::QuestionType;

/// 出题服务
///
/// 职责：
/// - 调用 LLM API 按题型生成题目
/// - 提供通用的 LLM 调用接口
/// - 只处理单次生成调用
/// - 不关心题型分布，也不关心流程顺序
pub struct GenerationService {
    client: Client<OpenAIConfig>,
    model: String,
    prompt_max_chars: usize,
    batch_size: usize,
}

impl GenerationService {
    /// 创建新的出题服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model: config.gen_model.clone(),
            prompt_max_chars: config.prompt_max_chars,
            batch_size: config.gen_batch_size,
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// 这是最基础的 LLM 调用接口，其他所有生成功能都基于此函数。
    /// 强制 JSON 响应格式，返回 LLM 的响应内容（字符串）。
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::llm_api_failed(&self.model, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .temperature(0.7)
            .max_tokens(4096u32)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: self.model.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }

    /// 为单个题型生成一批题目
    ///
    /// 返回的记录ID从 `start_id` 开始连续编号，type 字段缺失时
    /// 补上题型名称，数量超出时截断到 `count`。
    pub async fn generate_for_type(
        &self,
        text: &str,
        question_type: &str,
        count: usize,
        difficulty: &str,
        start_id: u32,
    ) -> AppResult<Vec<QuestionRecord>> {
        debug!(
            "开始生成: 题型={}, 数量={}, 难度={}, 起始ID={}",
            question_type, count, difficulty, start_id
        );

        let (system_message, user_message) =
            self.build_typed_messages(text, question_type, count, difficulty, start_id);

        let response = self.send_to_llm(&user_message, Some(&system_message)).await?;

        let mut records = self.parse_questions(&response)?;
        for (i, q) in records.iter_mut().enumerate() {
            q.id = start_id + i as u32;
            // type 字段缺失补上请求的题型，写法不规范时归一到标准名称
            q.question_type = if q.question_type.is_empty() {
                question_type.to_string()
            } else {
                QuestionType::find(&q.question_type).name().to_string()
            };
        }
        records.truncate(count);

        debug!("生成完成: 题型={}, 实际数量={}", question_type, records.len());
        Ok(records)
    }

    /// 单一题型模式：分批生成直到凑够数量
    ///
    /// 单批失败只告警并继续下一批（部分结果优于全无）；
    /// 某批少给时光标按实际收到的数量推进。
    pub async fn generate_simple(
        &self,
        text: &str,
        question_type: &str,
        num_questions: usize,
        difficulty: &str,
    ) -> Vec<QuestionRecord> {
        let mut all_questions: Vec<QuestionRecord> = Vec::new();
        let num_batches = (num_questions + self.batch_size - 1) / self.batch_size;

        for _ in 0..num_batches {
            let (start_id, count) =
                match next_batch(num_questions, all_questions.len(), self.batch_size) {
                    Some(plan) => plan,
                    None => break,
                };

            match self
                .generate_for_type(text, question_type, count, difficulty, start_id)
                .await
            {
                Ok(batch) => all_questions.extend(batch),
                Err(e) => {
                    warn!("单批生成失败，跳过本批: {}", e);
                    continue;
                }
            }
        }

        all_questions.truncate(num_questions);
        all_questions
    }

    /// 构建按题型出题的消息
    ///
    /// 返回 (system_message, user_message)
    fn build_typed_messages(
        &self,
        text: &str,
        question_type: &str,
        count: usize,
        difficulty: &str,
        start_id: u32,
    ) -> (String, String) {
        let system_message = format!(
            "당신은 자격증 시험 문제 출제 전문가입니다.\n\
             \"{question_type}\" 유형의 문제를 {difficulty} 난이도로 정확히 {count}개 생성하세요.\n\
             각 문제는 4지선다(①~④) 또는 적절한 형식을 따르며 \"정답\"과 \"해설\"을 반드시 포함하세요.\n\
             문제 본문에 코드가 있으면 원문 개행을 유지하고, 가능하면 코드 블록을 사용하세요.\n\
             반드시 JSON으로만 응답하세요."
        );

        let clipped = clip_chars(text, self.prompt_max_chars);
        let user_message = format!(
            r#"학습 자료(전처리됨):
{clipped}

JSON 스키마:
{{
  "questions": [
    {{
      "id": {start_id},
      "type": "{question_type}",
      "question": "질문 내용(필요 시 코드 포함)",
      "options": ["① 보기1", "② 보기2", "③ 보기3", "④ 보기4"],
      "answer": "정답",
      "explanation": "해설"
    }}
  ]
}}"#
        );

        (system_message, user_message)
    }

    /// 解析生成结果 JSON
    ///
    /// 容错策略：去掉可能的 ```json 围栏后解析顶层对象，取
    /// `questions` 数组；解析失败的单条记录告警后跳过，不让
    /// 整批报废。
    fn parse_questions(&self, response: &str) -> AppResult<Vec<QuestionRecord>> {
        let payload = extract_json_object(response);
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| AppError::llm_parse_failed(crate::utils::logging::truncate_text(response, 200), e))?;

        let items = match value.get("questions") {
            Some(serde_json::Value::Array(items)) => items.clone(),
            // 个别模型会直接返回数组
            _ if value.is_array() => value.as_array().cloned().unwrap_or_default(),
            _ => Vec::new(),
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<QuestionRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("跳过无法解析的题目记录: {}", e),
            }
        }
        Ok(records)
    }
}

/// 计算下一批的 (起始ID, 数量)
///
/// 起始ID由已收到的题目数决定，不假设之前每批都给满；
/// 凑够数量后返回 `None`。
fn next_batch(num_questions: usize, collected: usize, batch_size: usize) -> Option<(u32, usize)> {
    if collected >= num_questions {
        return None;
    }
    let start_id = collected as u32 + 1;
    let count = batch_size.min(num_questions - collected);
    Some((start_id, count))
}

/// 截取字符前缀（按字符数而不是字节数，避免切坏多字节文本）
fn clip_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// 去掉响应外层可能的 ```json 围栏 / 多余文字，定位 JSON 对象本体
fn extract_json_object(response: &str) -> &str {
    let trimmed = response.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => &trimmed[s..=e],
        _ => trimmed,
    }
}
