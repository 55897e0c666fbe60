use crate::error::{AppError, AppResult, FileError};
use crate::models::question::SourceDocument;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从单个文本文件加载 SourceDocument 对象
pub async fn load_document(file_path: &Path) -> AppResult<SourceDocument> {
    let text = fs::read_to_string(file_path)
        .await
        .map_err(|e| AppError::file_read_failed(file_path.display().to_string(), e))?;

    let name = file_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(SourceDocument {
        name,
        path: file_path.to_string_lossy().to_string(),
        text,
    })
}

/// 从文件夹中加载所有文本文档（.txt / .md）
pub async fn load_all_documents(folder_path: &str) -> AppResult<Vec<SourceDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str());
        if matches!(ext, Some("txt") | Some("md")) {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_document(&path).await {
                Ok(doc) => {
                    tracing::info!("成功加载 {} 个字符", doc.text.chars().count());
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(documents)
}
