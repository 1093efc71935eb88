use crate::error::{AppError, AppResult};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// 从磁盘加载 JSON 模板文件
///
/// 模板只作为示例嵌入提示词，这里只要求它是合法 JSON
pub async fn load_schema_template(path: &Path) -> AppResult<Value> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        AppError::configuration(path.display().to_string(), format!("无法读取模板文件: {}", e))
    })?;

    let template: Value = serde_json::from_str(&content).map_err(|e| {
        AppError::configuration(path.display().to_string(), format!("无法解析模板文件: {}", e))
    })?;

    tracing::debug!("已加载模板: {}", path.display());

    Ok(template)
}

/// 生成提示词所需的模板集合
#[derive(Debug, Clone)]
pub struct SchemaTemplates {
    /// 单道题目的结构示例
    pub response: Value,
    /// 评审结果的结构示例（仅在启用评审时加载）
    pub evaluation: Option<Value>,
}

impl SchemaTemplates {
    pub async fn load(
        response_path: &Path,
        evaluation_path: Option<&Path>,
    ) -> AppResult<Self> {
        let response = load_schema_template(response_path).await?;
        let evaluation = match evaluation_path {
            Some(path) => Some(load_schema_template(path).await?),
            None => None,
        };

        Ok(Self {
            response,
            evaluation,
        })
    }
}
