//! 编排层
//!
//! - `batch_processor` - 批量文档处理器，管理并发和全局统计
//! - `document_processor` - 单个文档处理器，驱动出题流程并落盘报告

pub mod batch_processor;
pub mod document_processor;

pub use batch_processor::App;
pub use document_processor::process_document;
