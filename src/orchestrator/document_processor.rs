//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个文档的完整出题，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **流程调度**：创建并驱动 `GenerationFlow`
//! 2. **报告落盘**：把 `GenerationReport` 写成 JSON 文件
//! 3. **统计输出**：记录题数和平均分

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::question::{GenerationReport, SourceDocument};
use crate::workflow::{GenerationCtx, GenerationFlow};

/// 处理单个文档
///
/// # 参数
/// - `document`: 源文档（文本已抽取）
/// - `doc_index`: 文档索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回是否成功生成了题目
pub async fn process_document(
    document: SourceDocument,
    doc_index: usize,
    config: &Config,
) -> Result<bool> {
    log_document_start(doc_index, &document.name, document.text.chars().count());

    // 创建流程对象（只创建一次，复用）
    let generation_flow = GenerationFlow::new(config);

    let ctx = GenerationCtx::new(
        doc_index,
        document.name.clone(),
        config.clamp_question_count(config.default_num_questions),
        config.difficulty.clone(),
    );

    // 执行流程（委托给 GenerationFlow）
    let report = generation_flow.run(&document, &ctx).await?;

    if report.questions.is_empty() {
        warn!("[文档 {}] ⚠️ 没有生成任何题目，不写报告", doc_index);
        return Ok(false);
    }

    // 报告落盘
    let output_path = write_report(&report, &document.name, config).await?;

    log_document_complete(doc_index, &report, &output_path);
    Ok(true)
}

/// 把报告写入输出目录
///
/// 文件名取源文档名去掉扩展名后加 `_questions.json`。
async fn write_report(
    report: &GenerationReport,
    doc_name: &str,
    config: &Config,
) -> Result<String> {
    tokio::fs::create_dir_all(&config.output_folder)
        .await
        .with_context(|| format!("无法创建输出目录: {}", config.output_folder))?;

    let stem = Path::new(doc_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| doc_name.to_string());
    let output_path = format!("{}/{}_questions.json", config.output_folder, stem);

    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(&output_path, json)
        .await
        .map_err(|e| AppError::file_write_failed(&output_path, e))?;

    Ok(output_path)
}

// ========== 日志辅助函数 ==========

fn log_document_start(doc_index: usize, name: &str, text_chars: usize) {
    info!("[文档 {}] 开始处理", doc_index);
    info!("[文档 {}] 名称: {}", doc_index, name);
    info!("[文档 {}] 文本长度: {} 字符", doc_index, text_chars);
}

fn log_document_complete(doc_index: usize, report: &GenerationReport, output_path: &str) {
    info!(
        "[文档 {}] 题目统计: 共 {} 题, 평균 점수 {:.3}",
        doc_index,
        report.questions.len(),
        report.average_score
    );
    for (qtype, count) in &report.type_stats {
        info!("[文档 {}]   {} × {}", doc_index, qtype, count);
    }
    info!("[文档 {}] ✓ 报告已保存: {}", doc_index, output_path);
    info!("\n[文档 {}] ✅ 文档处理完成\n", doc_index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{type_stats, QualityScores, QuestionRecord};

    fn sample_report() -> GenerationReport {
        let questions = vec![QuestionRecord {
            id: 1,
            question_type: "data_structure".to_string(),
            question: "스택의 특징은?".to_string(),
            answer: "LIFO".to_string(),
            ..Default::default()
        }];
        GenerationReport {
            source: "study.txt".to_string(),
            generated_at: "2026-01-01 00:00:00".to_string(),
            type_stats: type_stats(&questions),
            quality_scores: QualityScores::zeroed(),
            average_score: 0.0,
            questions,
        }
    }

    #[tokio::test]
    async fn test_write_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_folder: dir.path().join("out").to_string_lossy().to_string(),
            ..Default::default()
        };

        let path = write_report(&sample_report(), "study.txt", &config)
            .await
            .unwrap();
        assert!(path.ends_with("study_questions.json"));

        let json = std::fs::read_to_string(&path).unwrap();
        let parsed: GenerationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.source, "study.txt");
    }

    #[tokio::test]
    async fn test_write_report_failure_uses_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_folder: dir.path().to_string_lossy().to_string(),
            ..Default::default()
        };
        // 目标路径被同名目录占住，写入必然失败
        std::fs::create_dir(dir.path().join("study_questions.json")).unwrap();

        let err = write_report(&sample_report(), "study.txt", &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("写入文件失败"), "实际错误: {}", err);
    }
}
