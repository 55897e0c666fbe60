//! 业务能力层
//!
//! 描述"我能做什么"，每个服务只处理单次调用，不关心流程顺序：
//!
//! - `TextNormalizer` - 上传文本正规化能力
//! - `TypeClassifier` - 题型权重分析能力
//! - `allocator` - 题量分配能力
//! - `GenerationService` - LLM 出题能力
//! - `QuestionPostprocessor` - 生成结果清洗能力
//! - `QualityEvaluator` - 启发式质量评估能力

pub mod allocator;
pub mod classifier;
pub mod evaluator;
pub mod generation;
pub mod lang;
pub mod normalizer;
pub mod postprocess;

pub use allocator::{allocate, Distribution};
pub use classifier::{TypeClassifier, TypeRatio};
pub use evaluator::QualityEvaluator;
pub use generation::GenerationService;
pub use lang::LangGuesser;
pub use normalizer::TextNormalizer;
pub use postprocess::QuestionPostprocessor;
