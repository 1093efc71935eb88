pub mod quiz_flow;
pub mod quiz_request;
pub mod retry;

pub use quiz_flow::{FlowOutput, QuizFlow};
pub use quiz_request::QuizRequest;
pub use retry::{with_retry, Attempted, MAX_ATTEMPTS};
