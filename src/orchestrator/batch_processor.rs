//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和并发控制。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志文件、记录配置
//! 2. **批量加载**：扫描并加载所有待处理的文档（`Vec<SourceDocument>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有文档的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **并发安全**：通过 Semaphore 和 tokio::spawn 实现并发
//! - **向下委托**：委托 document_processor 处理单个文档

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::loaders::load_all_documents;
use crate::models::question::SourceDocument;
use crate::orchestrator::document_processor;
use crate::utils::logging::init_log_file;

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待处理的文档
        let all_documents = self.load_documents().await?;

        if all_documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return Ok(());
        }

        let total_documents = all_documents.len();
        log_documents_loaded(total_documents, self.config.max_concurrent_docs);

        // 处理所有文档
        let stats = self.process_all_documents(all_documents).await?;

        // 输出最终统计
        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 加载文档
    async fn load_documents(&self) -> Result<Vec<SourceDocument>> {
        info!("\n📁 正在扫描待处理的文档...");
        Ok(load_all_documents(&self.config.docs_folder).await?)
    }

    /// 处理所有文档
    async fn process_all_documents(
        &self,
        all_documents: Vec<SourceDocument>,
    ) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_docs));
        let total_documents = all_documents.len();
        let mut stats = ProcessingStats {
            total: total_documents,
            ..Default::default()
        };

        let mut documents = all_documents.into_iter();

        // 分批处理
        for batch_start in (0..total_documents).step_by(self.config.max_concurrent_docs) {
            let batch_end = (batch_start + self.config.max_concurrent_docs).min(total_documents);
            let batch_docs: Vec<SourceDocument> =
                documents.by_ref().take(batch_end - batch_start).collect();
            let batch_num = (batch_start / self.config.max_concurrent_docs) + 1;
            let total_batches = (total_documents + self.config.max_concurrent_docs - 1)
                / self.config.max_concurrent_docs;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_end,
                total_documents,
            );

            // 处理本批
            let batch_result = self
                .process_batch(batch_docs, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            log_batch_complete(batch_num, &batch_result);
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_docs: Vec<SourceDocument>,
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        // 为本批创建并发任务
        for (idx, document) in batch_docs.into_iter().enumerate() {
            let doc_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let config_clone = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match document_processor::process_document(document, doc_index, &config_clone)
                    .await
                {
                    Ok(true) => Ok(true),
                    Ok(false) => Ok(false),
                    Err(e) => {
                        error!("[文档 {}] ❌ 处理过程中发生错误: {}", doc_index, e);
                        Err(e)
                    }
                }
            });
            batch_handles.push((doc_index, handle));
        }

        // 等待本批所有任务完成
        let mut result = BatchResult::default();

        for (doc_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(true)) => {
                    result.success += 1;
                }
                Ok(Ok(false)) | Ok(Err(_)) => {
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", doc_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量文档出题模式");
    info!("📊 最大并发数: {}", config.max_concurrent_docs);
    info!("📝 单文档出题数: {}", config.default_num_questions);
    info!("🤖 生成模型: {}", config.gen_model);
    info!("{}", "=".repeat(60));
}

fn log_documents_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的文档", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
    info!("💡 每批完成后再开始下一批\n");
}

fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批文档: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(batch_num: usize, result: &BatchResult) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 批完成: 成功 {}/{}",
        batch_num,
        result.success,
        result.success + result.failed
    );
    info!("{}", "─".repeat(60));
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
