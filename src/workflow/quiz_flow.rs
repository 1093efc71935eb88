//! 出题流程 - 流程层
//!
//! 核心职责：定义"一次出题尝试"的完整步骤
//!
//! 流程顺序：
//! 1. 填充出题提示词 → LLM → 解析校验
//! 2. （可选）填充评审提示词 → LLM → 解析校验 final_quiz
//!
//! 整个流程交给重试控制执行，失败时原样再跑一遍

use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::{Evaluation, Pricing, Quiz, SchemaTemplates, TokenInfo};
use crate::services::quiz_parser::{parse_json_reply, validate_evaluation, validate_quiz};
use crate::services::{Completion, CompletionClient, PromptTemplate};
use crate::utils::logging::truncate_text;
use crate::workflow::quiz_request::QuizRequest;
use crate::workflow::retry::{with_retry, Attempted};

/// 一次成功尝试的产物
#[derive(Debug, Clone)]
pub struct FlowOutput {
    pub quiz: Quiz,
    pub evaluation: Option<Evaluation>,
    /// 最终被采纳的那次回复中的 JSON 对象，试卷部分已换成校验后的规范形式
    pub raw_json: Value,
}

/// 出题流程
///
/// - 不持有任何资源，只借用补全客户端和模板
/// - 累计所有调用的 token 用量（包括失败的尝试）
pub struct QuizFlow<'a, C: CompletionClient + ?Sized> {
    client: &'a C,
    templates: &'a SchemaTemplates,
    pricing: Pricing,
    usage: Mutex<TokenInfo>,
}

impl<'a, C: CompletionClient + ?Sized> QuizFlow<'a, C> {
    pub fn new(client: &'a C, templates: &'a SchemaTemplates, pricing: Pricing) -> Self {
        Self {
            client,
            templates,
            pricing,
            usage: Mutex::new(TokenInfo::default()),
        }
    }

    /// 带重试地执行完整流程
    pub async fn run(&self, request: &QuizRequest) -> AppResult<Attempted<FlowOutput>> {
        info!("{} 开始生成", request);
        with_retry(move |attempt| self.attempt(request, attempt)).await
    }

    /// 目前为止累计的 token 用量
    pub fn token_info(&self) -> TokenInfo {
        self.usage
            .lock()
            .map(|usage| usage.clone())
            .unwrap_or_default()
    }

    async fn attempt(&self, request: &QuizRequest, attempt: u32) -> AppResult<FlowOutput> {
        debug!("{} 第 {} 次尝试", request, attempt);

        let response_json = self.templates.response.to_string();
        let prompt = PromptTemplate::quiz_generation().fill(&request.generation_values(&response_json));

        let completion = self.complete(&prompt).await?;
        let reply_json = parse_json_reply(&completion.content)?;
        let quiz = validate_quiz(&reply_json, request.count)?;
        info!("✓ 出题结果校验通过，共 {} 道题", quiz.len());

        match &self.templates.evaluation {
            Some(schema) => self.evaluate(request, &quiz, schema).await,
            None => Ok(FlowOutput {
                raw_json: quiz.to_json(),
                quiz,
                evaluation: None,
            }),
        }
    }

    /// 评审并采用修订后的试卷
    async fn evaluate(
        &self,
        request: &QuizRequest,
        quiz: &Quiz,
        schema: &Value,
    ) -> AppResult<FlowOutput> {
        info!("🔍 正在评审试卷...");

        let prompt = PromptTemplate::quiz_evaluation().fill(
            &request.evaluation_values(&quiz.to_json().to_string(), &schema.to_string()),
        );

        let completion = self.complete(&prompt).await?;
        let mut raw_json = parse_json_reply(&completion.content)?;
        let (final_quiz, evaluation) = validate_evaluation(&raw_json, request.count)?;
        raw_json["final_quiz"] = final_quiz.to_json();

        info!(
            "✓ 评审完成 (合适: {}): {}",
            evaluation.is_appropriate,
            truncate_text(&evaluation.complexity_analysis, 80)
        );

        Ok(FlowOutput {
            quiz: final_quiz,
            evaluation: Some(evaluation),
            raw_json,
        })
    }

    async fn complete(&self, prompt: &str) -> AppResult<Completion> {
        let completion = self.client.complete(prompt).await?;

        if let Some(usage) = &completion.usage {
            if let Ok(mut total) = self.usage.lock() {
                total.record(usage, &self.pricing);
            }
        }
        debug!("LLM 回复: {}", truncate_text(&completion.content, 200));

        Ok(completion)
    }
}
