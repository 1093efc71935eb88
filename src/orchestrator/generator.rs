//! 出题生成器 - 编排层
//!
//! 对外的唯一入口：`generate(文件, 题数, 科目, 语气)`
//!
//! 1. 校验题数
//! 2. 加载 JSON 模板
//! 3. 提取文档文本（格式不支持时在这里失败，不会调用 LLM）
//! 4. 交给 `QuizFlow` 带重试地生成
//! 5. 汇总 token 用量

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Evaluation, Pricing, Quiz, SchemaTemplates, TokenInfo};
use crate::services::text_extractor::extract_text;
use crate::services::{CompletionClient, LlmService};
use crate::utils::logging::log_token_usage;
use crate::workflow::{QuizFlow, QuizRequest};

/// 单次请求允许的题目数量范围
pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 50;

/// 一次生成的完整结果
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub quiz: Quiz,
    pub token_info: TokenInfo,
    /// 实际尝试次数（1 或 2）
    pub attempts: u32,
    /// 启用评审时的评审结论
    pub evaluation: Option<Evaluation>,
    /// 最终采纳的回复 JSON，试卷部分为校验后的规范形式
    pub raw_json: Value,
}

/// 出题生成器
pub struct McqGenerator<C: CompletionClient> {
    client: C,
    config: Config,
}

impl McqGenerator<LlmService> {
    /// 使用配置中的凭证创建生成器
    pub fn from_config(config: Config) -> AppResult<Self> {
        let client = LlmService::new(&config)?;
        Ok(Self::with_client(client, config))
    }
}

impl<C: CompletionClient> McqGenerator<C> {
    pub fn with_client(client: C, config: Config) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn generate(
        &self,
        file_path: &Path,
        count: u32,
        subject: &str,
        tone: &str,
    ) -> AppResult<GenerationOutput> {
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
            return Err(AppError::InvalidRequest(format!(
                "题目数量必须在 {} 到 {} 之间，实际为 {}",
                MIN_QUESTIONS, MAX_QUESTIONS, count
            )));
        }

        let evaluation_path = self
            .config
            .evaluate
            .then(|| Path::new(&self.config.evaluation_schema_path));
        let templates =
            SchemaTemplates::load(Path::new(&self.config.response_schema_path), evaluation_path)
                .await?;

        let text = extract_text(file_path)?;
        info!("📄 已读取文档 {}", file_path.display());

        let request = QuizRequest::new(text, count, subject, tone);
        let pricing = Pricing {
            prompt_per_1k: self.config.prompt_price_per_1k,
            completion_per_1k: self.config.completion_price_per_1k,
        };

        let flow = QuizFlow::new(&self.client, &templates, pricing);
        let result = flow.run(&request).await;
        let token_info = flow.token_info();
        log_token_usage(&token_info);

        let attempted = result?;
        info!(
            "✅ 生成完成: {} 道题，尝试 {} 次 (模型: {})",
            attempted.value.quiz.len(),
            attempted.attempts,
            self.client.model_name()
        );

        Ok(GenerationOutput {
            quiz: attempted.value.quiz,
            token_info,
            attempts: attempted.attempts,
            evaluation: attempted.value.evaluation,
            raw_json: attempted.value.raw_json,
        })
    }
}

/// 按配置创建 LLM 客户端并生成试卷
///
/// 凭证在调用时读取，缺失时返回 `AppError::Credential`
///
/// # 参数
/// - `config`: 运行配置（凭证、模型、模板路径）
/// - `file_path`: 输入文档（.pdf 或 .txt）
/// - `count`: 题目数量，1 到 50
/// - `subject`: 科目
/// - `tone`: 语气
///
/// # 返回
/// 试卷、token 用量和尝试次数
pub async fn generate(
    config: &Config,
    file_path: &Path,
    count: u32,
    subject: &str,
    tone: &str,
) -> AppResult<GenerationOutput> {
    McqGenerator::from_config(config.clone())?
        .generate(file_path, count, subject, tone)
        .await
}
