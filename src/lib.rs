//! # Exam Gen
//!
//! 一个面向资格证考试的批量出题 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 数据结构与文档加载
//! - `QuestionRecord` - 生成的题目记录（容忍字段缺失、透传未知字段）
//! - `loaders/text_loader` - 扫描并加载已抽取文本的源文档
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次调用
//! - `TextNormalizer` - 文本正规化能力
//! - `TypeClassifier` / `allocator` - 题型权重分析与题量分配能力
//! - `GenerationService` - LLM 出题能力
//! - `QuestionPostprocessor` - 生成结果清洗能力
//! - `QualityEvaluator` - 启发式质量评估能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整出题流程
//! - `GenerationCtx` - 上下文封装（doc_index + num_questions + difficulty）
//! - `GenerationFlow` - 流程编排（normalize → classify → allocate → generate → postprocess → evaluate）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发和全局统计
//! - `orchestrator/document_processor` - 单个文档处理器，落盘 JSON 报告
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::question::{GenerationReport, QualityScores, QuestionRecord, SourceDocument};
pub use models::question_type::QuestionType;
pub use orchestrator::{process_document, App};
pub use workflow::{GenerationCtx, GenerationFlow};
