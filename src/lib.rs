//! # MCQ Generator
//!
//! 根据 PDF / TXT 文档，调用 LLM 生成多项选择题试卷
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力互不依赖
//! - `text_extractor` - 从 PDF / TXT 中提取文本
//! - `PromptTemplate` - 填充提示词模板
//! - `LlmService` - 调用 OpenAI 兼容接口（`CompletionClient` 的实现）
//! - `quiz_parser` - 从回复中提取 JSON 并校验试卷结构
//! - `table_projector` - 把试卷展开为表格行
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一次出题"的完整流程
//! - `QuizRequest` - 请求封装（文本 + 题数 + 科目 + 语气）
//! - `QuizFlow` - 流程编排（提示词 → LLM → 校验 → 可选评审）
//! - `retry` - 固定两次的重试控制
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/generator` - 对外入口 `generate()`，加载模板、提取文本、汇总用量
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{OptionLabel, Options, Question, Quiz, TableRow, TokenInfo};
pub use orchestrator::{generate, GenerationOutput, McqGenerator};
pub use services::{to_table, Completion, CompletionClient, LlmService};
