pub mod llm_service;
pub mod prompt;
pub mod quiz_parser;
pub mod table_projector;
pub mod text_extractor;

pub use llm_service::{Completion, CompletionClient, LlmService};
pub use prompt::PromptTemplate;
pub use quiz_parser::{extract_json_span, parse_quiz, validate_quiz};
pub use table_projector::to_table;
pub use text_extractor::extract_text;
