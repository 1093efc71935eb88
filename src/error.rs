use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 不支持的文件格式（只接受 .pdf / .txt）
    #[error("不支持的文件格式: {path}，请上传 PDF 或 TXT 文件")]
    UnsupportedFormat { path: String },

    /// 文本提取失败
    #[error("读取文件失败 ({path}): {source}")]
    Extraction {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 配置错误（模板文件缺失、配置文件无法解析等）
    #[error("配置错误 ({path}): {message}")]
    Configuration { path: String, message: String },

    /// 未配置 LLM 凭证
    #[error("未配置 LLM 凭证: 请设置 {var_name}（环境变量或 .env 文件）")]
    Credential { var_name: String },

    /// LLM 服务调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    Backend {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM 返回内容中没有 JSON 对象
    #[error("LLM 返回内容中未找到 JSON 对象")]
    NoJsonFound,

    /// 找到的 JSON 片段无法解析
    #[error("JSON解析失败: {source}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
    },

    /// 题目结构不符合要求
    #[error("题目结构校验失败 [{}]: {reason}", location(.question))]
    SchemaValidation {
        /// 出错的题号，None 表示整份试卷层面的问题
        question: Option<String>,
        reason: String,
    },

    /// 重试次数用尽
    #[error("生成失败，已尝试 {attempts} 次: {source}")]
    GenerationFailed {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// 请求参数无效
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),
}

fn location(question: &Option<String>) -> String {
    match question {
        Some(index) => format!("题目 {}", index),
        None => "试卷".to_string(),
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedJson { source: err }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn extraction_failed(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Extraction {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 创建配置错误
    pub fn configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// 创建 LLM API 调用错误
    pub fn backend_failed(
        model: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Backend {
            model: model.into(),
            source: source.into(),
        }
    }

    /// 创建单道题目的结构错误
    pub fn invalid_question(index: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::SchemaValidation {
            question: Some(index.into()),
            reason: reason.into(),
        }
    }

    /// 创建试卷层面的结构错误
    pub fn invalid_quiz(reason: impl Into<String>) -> Self {
        AppError::SchemaValidation {
            question: None,
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
