//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::McqGenerator (文件 → 试卷)
//!     ↓
//! workflow::QuizFlow (一次出题尝试 + 重试)
//!     ↓
//! services (能力层：文本提取 / 提示词 / LLM / 解析校验 / 表格)
//! ```
//!
//! 编排层只做加载、调度和统计，不做具体的解析判断

pub mod generator;

pub use generator::{generate, GenerationOutput, McqGenerator, MAX_QUESTIONS, MIN_QUESTIONS};
