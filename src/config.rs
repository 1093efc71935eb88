use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// 凭证所在的环境变量名
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub temperature: f32,
    /// 每 1K 输入 token 的价格（美元）
    pub prompt_price_per_1k: f64,
    /// 每 1K 输出 token 的价格（美元）
    pub completion_price_per_1k: f64,
    // --- 模板文件 ---
    pub response_schema_path: String,
    pub evaluation_schema_path: String,
    /// 是否在生成后追加一次评审调用
    pub evaluate: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            prompt_price_per_1k: 0.0005,
            completion_price_per_1k: 0.0015,
            response_schema_path: "schemas/response.json".to_string(),
            evaluation_schema_path: "schemas/evaluation_response.json".to_string(),
            evaluate: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，环境变量仍然优先
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::configuration(path.display().to_string(), format!("无法读取配置文件: {}", e))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::configuration(path.display().to_string(), format!("无法解析配置文件: {}", e))
        })?;
        Ok(config.with_env_overrides())
    }

    /// 根据可选的配置文件路径加载配置
    ///
    /// 未传入路径时读取 `MCQ_CONFIG` 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match std::env::var("MCQ_CONFIG") {
                Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path)),
                _ => Ok(Self::from_env()),
            },
        }
    }

    fn with_env_overrides(self) -> Self {
        Self {
            llm_api_key: std::env::var(API_KEY_VAR).ok().or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.temperature),
            prompt_price_per_1k: self.prompt_price_per_1k,
            completion_price_per_1k: self.completion_price_per_1k,
            response_schema_path: std::env::var("RESPONSE_SCHEMA_PATH").unwrap_or(self.response_schema_path),
            evaluation_schema_path: std::env::var("EVALUATION_SCHEMA_PATH").unwrap_or(self.evaluation_schema_path),
            evaluate: std::env::var("MCQ_EVALUATE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.evaluate),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }
}
