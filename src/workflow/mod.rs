//! 流程层
//!
//! 定义"一个文档"的完整出题流程
//!
//! - `GenerationCtx` - 上下文封装（doc_index + num_questions + difficulty）
//! - `GenerationFlow` - 流程编排（normalize → classify → allocate → generate → postprocess → evaluate）

pub mod generation_ctx;
pub mod generation_flow;

pub use generation_ctx::GenerationCtx;
pub use generation_flow::{finalize_questions, GenerationFlow};
