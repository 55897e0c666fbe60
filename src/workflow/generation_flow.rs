//! 出题流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整出题流程
//!
//! 流程顺序：
//! 1. 文本正规化（可配置关闭）
//! 2. 题型权重分析 → 题量分配
//! 3. 逐题型调用 LLM 生成
//! 4. 后处理清洗 → 打乱重编号
//! 5. 启发式质量评估 → 组装报告

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::question::{
    type_stats, GenerationReport, QualityScores, QuestionRecord, SourceDocument,
};
use crate::models::question_type::QuestionType;
use crate::services::{
    allocate, GenerationService, QualityEvaluator, QuestionPostprocessor, TextNormalizer,
    TypeClassifier,
};
use crate::workflow::generation_ctx::GenerationCtx;

/// 出题流程
///
/// - 编排完整的单文档出题流程
/// - 决定何时正规化、何时分配、何时评估
/// - 不做文件 I/O，输入文档、输出报告
/// - 只依赖业务能力（services）
pub struct GenerationFlow {
    normalizer: TextNormalizer,
    classifier: TypeClassifier,
    generation: GenerationService,
    postprocessor: QuestionPostprocessor,
    evaluator: QualityEvaluator,
    question_type: String,
    preprocess_enabled: bool,
    verbose_logging: bool,
}

impl GenerationFlow {
    /// 创建新的出题流程
    pub fn new(config: &Config) -> Self {
        Self {
            normalizer: TextNormalizer::new(config),
            classifier: TypeClassifier::new(config),
            generation: GenerationService::new(config),
            postprocessor: QuestionPostprocessor::new(),
            evaluator: QualityEvaluator::new(),
            question_type: config.question_type.clone(),
            preprocess_enabled: config.preprocess_enabled,
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(
        &self,
        document: &SourceDocument,
        ctx: &GenerationCtx,
    ) -> AppResult<GenerationReport> {
        // ========== 流程 1: 文本正规化 ==========
        let text = if self.preprocess_enabled {
            info!("[文档 {}] 🧹 正在正规化文本...", ctx.doc_index);
            self.normalizer.normalize(&document.text)
        } else {
            document.text.clone()
        };

        if text.trim().is_empty() {
            warn!("[文档 {}] ⚠️ 文本为空，跳过出题", ctx.doc_index);
            return Ok(empty_report(&document.name));
        }

        // ========== 流程 2/3: 题型分析、题量分配与生成 ==========
        let questions = if self.question_type == "mixed" {
            self.generate_mixed(&text, ctx).await
        } else {
            self.generate_single(&text, ctx).await
        };

        // ========== 流程 4: 后处理与定稿 ==========
        let questions = self.postprocessor.postprocess(questions);
        let questions = finalize_questions(questions, ctx.num_questions);

        // ========== 流程 5: 质量评估与报告组装 ==========
        let scores = if questions.is_empty() {
            warn!("[文档 {}] ⚠️ 没有生成任何题目，评分记为 0", ctx.doc_index);
            QualityScores::zeroed()
        } else {
            self.evaluator.evaluate(&questions, &text)
        };

        info!(
            "[文档 {}] 🏁 出题完成: {} 题, 평균 점수 {:.3} ({})",
            ctx.doc_index,
            questions.len(),
            scores.average(),
            scores.grade()
        );

        Ok(build_report(&document.name, questions, scores))
    }

    /// 混合模式：按关键词分析的权重分布逐题型生成
    async fn generate_mixed(&self, text: &str, ctx: &GenerationCtx) -> Vec<QuestionRecord> {
        let ratios = self.classifier.classify(text);
        let distribution = allocate(ctx.num_questions, &ratios);

        if self.verbose_logging {
            for (qtype, ratio) in &ratios {
                info!("[文档 {}]   题型 {} 权重 {:.3}", ctx.doc_index, qtype, ratio);
            }
        }
        info!(
            "[文档 {}] 📊 题量分配: {}",
            ctx.doc_index,
            distribution
                .iter()
                .map(|(t, c)| format!("{}={}", t, c))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut questions: Vec<QuestionRecord> = Vec::with_capacity(ctx.num_questions);

        for (qtype, count) in &distribution {
            let start_id = questions.len() as u32 + 1;
            match self
                .generation
                .generate_for_type(text, qtype.name(), *count, &ctx.difficulty, start_id)
                .await
            {
                Ok(batch) => {
                    info!(
                        "[文档 {}] ✓ 题型 {} 生成 {}/{} 题",
                        ctx.doc_index,
                        qtype,
                        batch.len(),
                        count
                    );
                    questions.extend(batch);
                }
                // 单题型失败不拖垮整个文档，继续下一题型
                Err(e) => {
                    warn!("[文档 {}] ⚠️ 题型 {} 生成失败: {}", ctx.doc_index, qtype, e);
                }
            }
        }

        questions
    }

    /// 单一题型模式：跳过分类与分配，按配置的题型分批生成
    async fn generate_single(&self, text: &str, ctx: &GenerationCtx) -> Vec<QuestionRecord> {
        let qtype = QuestionType::find(&self.question_type);
        info!(
            "[文档 {}] 📊 单一题型模式: {} × {}",
            ctx.doc_index, qtype, ctx.num_questions
        );

        self.generation
            .generate_simple(text, qtype.name(), ctx.num_questions, &ctx.difficulty)
            .await
    }
}

/// 定稿处理：打乱顺序、截断到目标数量、从 1 开始重新编号
pub fn finalize_questions(
    mut questions: Vec<QuestionRecord>,
    num_questions: usize,
) -> Vec<QuestionRecord> {
    use rand::seq::SliceRandom;

    questions.shuffle(&mut rand::thread_rng());
    questions.truncate(num_questions);
    for (i, q) in questions.iter_mut().enumerate() {
        q.id = i as u32 + 1;
    }
    questions
}

fn build_report(
    source: &str,
    questions: Vec<QuestionRecord>,
    scores: QualityScores,
) -> GenerationReport {
    GenerationReport {
        source: source.to_string(),
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        type_stats: type_stats(&questions),
        average_score: scores.average(),
        quality_scores: scores,
        questions,
    }
}

fn empty_report(source: &str) -> GenerationReport {
    build_report(source, Vec::new(), QualityScores::zeroed())
}
