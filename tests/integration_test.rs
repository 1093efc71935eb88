use async_trait::async_trait;
use mcq_generator::models::TokenUsage;
use mcq_generator::{
    to_table, AppError, AppResult, Completion, CompletionClient, Config, McqGenerator,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// 按顺序返回预设回复的补全客户端，同时记录收到的提示词
struct ScriptedClient {
    replies: Mutex<VecDeque<AppResult<Completion>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(replies: Vec<AppResult<Completion>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> AppResult<Completion> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::backend_failed("scripted", "no more replies")))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn manifest_path(relative: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(relative)
        .to_string_lossy()
        .to_string()
}

fn test_config(evaluate: bool) -> Config {
    Config {
        llm_api_key: Some("sk-test".to_string()),
        response_schema_path: manifest_path("schemas/response.json"),
        evaluation_schema_path: manifest_path("schemas/evaluation_response.json"),
        evaluate,
        prompt_price_per_1k: 0.001,
        completion_price_per_1k: 0.002,
        ..Config::default()
    }
}

fn text_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn quiz_value(keys: &[u32]) -> Value {
    let mut map = serde_json::Map::new();
    for key in keys {
        map.insert(
            key.to_string(),
            json!({
                "mcq": format!("What is concept {}?", key),
                "options": {"a": "X", "b": "Y", "c": "Z", "d": "W"},
                "correct": "b",
            }),
        );
    }
    Value::Object(map)
}

fn quiz_reply(keys: &[u32]) -> String {
    format!("Here is the quiz:\n{}\n", quiz_value(keys))
}

fn reply(content: impl Into<String>) -> AppResult<Completion> {
    Ok(Completion::new(content).with_usage(TokenUsage {
        prompt_tokens: 100,
        completion_tokens: 50,
        total_tokens: 150,
    }))
}

fn backend_error() -> AppResult<Completion> {
    Err(AppError::backend_failed("scripted", "connection reset"))
}

#[tokio::test]
async fn test_generate_first_attempt() {
    let client = ScriptedClient::new(vec![reply(quiz_reply(&[1, 2, 3]))]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("Neural networks learn weights by backpropagation.");

    let output = generator
        .generate(input.path(), 3, "Machine Learning", "educational")
        .await
        .unwrap();

    assert_eq!(output.attempts, 1);
    assert_eq!(output.quiz.len(), 3);
    assert!(output.evaluation.is_none());
    assert_eq!(output.raw_json["2"]["correct"], "b");
    assert_eq!(output.token_info.total_tokens, 150);
    assert_eq!(output.token_info.prompt_tokens, 100);
    assert_eq!(output.token_info.completion_tokens, 50);
    assert!((output.token_info.total_cost_usd - 0.0002).abs() < 1e-12);

    let rows = to_table(&output.quiz);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].mcq, "What is concept 1?");
    assert_eq!(rows[0].choices, "a) X.||.b) Y.||.c) Z.||.d) W");
    assert_eq!(rows[0].correct, "b");
}

#[tokio::test]
async fn test_prompt_carries_request_inputs() {
    let client = ScriptedClient::new(vec![reply(quiz_reply(&[1, 2]))]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("The mitochondria is the powerhouse of the cell.");

    generator
        .generate(input.path(), 2, "Biology", "casual")
        .await
        .unwrap();

    let prompt = generator.client().prompt(0);
    assert!(prompt.contains("The mitochondria is the powerhouse of the cell."));
    assert!(prompt.contains("Generate exactly 2 MCQs for Biology students in a casual tone."));
    assert!(prompt.contains("\"options\""));
}

#[tokio::test]
async fn test_backend_failure_then_success() {
    let client = ScriptedClient::new(vec![backend_error(), reply(quiz_reply(&[1, 2]))]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("Some text.");

    let output = generator
        .generate(input.path(), 2, "Physics", "formal")
        .await
        .unwrap();

    assert_eq!(output.attempts, 2);
    assert_eq!(generator.client().calls(), 2);
    // 失败的那次没有返回用量
    assert_eq!(output.token_info.total_tokens, 150);
    // 重试使用完全相同的提示词
    assert_eq!(generator.client().prompt(0), generator.client().prompt(1));
}

#[tokio::test]
async fn test_invalid_reply_then_success_counts_both_usages() {
    let client = ScriptedClient::new(vec![
        reply("I cannot produce JSON today."),
        reply(quiz_reply(&[1])),
    ]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("Some text.");

    let output = generator
        .generate(input.path(), 1, "History", "educational")
        .await
        .unwrap();

    assert_eq!(output.attempts, 2);
    assert_eq!(output.token_info.total_tokens, 300);
}

#[tokio::test]
async fn test_two_failures_give_generation_failed() {
    let client = ScriptedClient::new(vec![backend_error(), backend_error(), reply(quiz_reply(&[1]))]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("Some text.");

    let err = generator
        .generate(input.path(), 1, "History", "educational")
        .await
        .unwrap_err();

    match err {
        AppError::GenerationFailed { attempts, source } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*source, AppError::Backend { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }
    // 第三条回复不会被使用
    assert_eq!(generator.client().calls(), 2);
}

#[tokio::test]
async fn test_missing_question_key_fails_validation() {
    let client = ScriptedClient::new(vec![reply(quiz_reply(&[1, 3])), reply(quiz_reply(&[1, 3]))]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("Some text.");

    let err = generator
        .generate(input.path(), 3, "Chemistry", "educational")
        .await
        .unwrap_err();

    match err {
        AppError::GenerationFailed { attempts, source } => {
            assert_eq!(attempts, 2);
            assert!(matches!(
                *source,
                AppError::SchemaValidation { question: None, .. }
            ));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_unsupported_format_never_calls_backend() {
    let client = ScriptedClient::new(vec![reply(quiz_reply(&[1]))]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();

    let err = generator
        .generate(input.path(), 1, "History", "educational")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnsupportedFormat { .. }));
    assert_eq!(generator.client().calls(), 0);
}

#[tokio::test]
async fn test_missing_schema_template() {
    let config = Config {
        response_schema_path: "no/such/response.json".to_string(),
        ..test_config(false)
    };
    let generator = McqGenerator::with_client(ScriptedClient::new(vec![]), config);
    let input = text_file("Some text.");

    let err = generator
        .generate(input.path(), 1, "History", "educational")
        .await
        .unwrap_err();

    match err {
        AppError::Configuration { path, .. } => assert_eq!(path, "no/such/response.json"),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(generator.client().calls(), 0);
}

#[tokio::test]
async fn test_question_count_bounds() {
    let generator = McqGenerator::with_client(ScriptedClient::new(vec![]), test_config(false));
    let input = text_file("Some text.");

    for count in [0, 51] {
        let err = generator
            .generate(input.path(), count, "History", "educational")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)), "{}", count);
    }
    assert_eq!(generator.client().calls(), 0);
}

#[tokio::test]
async fn test_evaluation_replaces_quiz() {
    let mut revised = quiz_value(&[1, 2]);
    revised["2"]["mcq"] = json!("Revised question?");
    revised["2"]["correct"] = json!("d");
    let evaluation_reply = json!({
        "complexity_analysis": "Question 2 was ambiguous and has been rewritten.",
        "is_appropriate": false,
        "final_quiz": revised,
    })
    .to_string();

    let client = ScriptedClient::new(vec![reply(quiz_reply(&[1, 2])), reply(evaluation_reply)]);
    let generator = McqGenerator::with_client(client, test_config(true));
    let input = text_file("Some text.");

    let output = generator
        .generate(input.path(), 2, "Machine Learning", "educational")
        .await
        .unwrap();

    assert_eq!(output.attempts, 1);
    assert_eq!(generator.client().calls(), 2);
    assert_eq!(output.token_info.total_tokens, 300);

    let evaluation = output.evaluation.unwrap();
    assert!(!evaluation.is_appropriate);
    assert_eq!(output.quiz.get(2).unwrap().mcq, "Revised question?");
    assert_eq!(to_table(&output.quiz)[1].correct, "d");
    assert!(output.raw_json.get("final_quiz").is_some());

    // 评审提示词中带有第一次生成的试卷
    let evaluation_prompt = generator.client().prompt(1);
    assert!(evaluation_prompt.contains("What is concept 2?"));
    assert!(evaluation_prompt.contains("complexity_analysis"));
}

#[tokio::test]
async fn test_evaluation_failure_retries_whole_attempt() {
    let client = ScriptedClient::new(vec![
        reply(quiz_reply(&[1])),
        reply("{\"complexity_analysis\": \"ok\"}"),
        reply(quiz_reply(&[1])),
        reply(json!({"is_appropriate": true, "final_quiz": quiz_value(&[1])}).to_string()),
    ]);
    let generator = McqGenerator::with_client(client, test_config(true));
    let input = text_file("Some text.");

    let output = generator
        .generate(input.path(), 1, "Machine Learning", "educational")
        .await
        .unwrap();

    assert_eq!(output.attempts, 2);
    assert_eq!(generator.client().calls(), 4);
    assert_eq!(output.evaluation.unwrap().complexity_analysis, "");
}

#[tokio::test]
async fn test_generate_requires_credential() {
    let config = Config {
        llm_api_key: None,
        ..test_config(false)
    };
    let input = text_file("Some text.");

    let err = mcq_generator::generate(&config, input.path(), 1, "History", "educational")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Credential { .. }));
}

#[tokio::test]
async fn test_raw_json_uses_normalised_answers() {
    let mut loose = quiz_value(&[1, 2]);
    loose["1"]["correct"] = json!(" C ");
    loose["2"]["options"] = json!({"d": "W", "c": "Z", "b": "Y", "a": "X"});
    let client = ScriptedClient::new(vec![reply(loose.to_string())]);
    let generator = McqGenerator::with_client(client, test_config(false));
    let input = text_file("Some text.");

    let output = generator
        .generate(input.path(), 2, "Machine Learning", "educational")
        .await
        .unwrap();

    assert_eq!(output.raw_json["1"]["correct"], "c");
    assert_eq!(output.raw_json, output.quiz.to_json());
}

#[tokio::test]
async fn test_evaluation_raw_json_uses_normalised_final_quiz() {
    let mut revised = quiz_value(&[1]);
    revised["1"]["correct"] = json!("D ");
    let evaluation_reply = json!({
        "complexity_analysis": "Fine.",
        "is_appropriate": true,
        "final_quiz": revised,
    })
    .to_string();
    let client = ScriptedClient::new(vec![reply(quiz_reply(&[1])), reply(evaluation_reply)]);
    let generator = McqGenerator::with_client(client, test_config(true));
    let input = text_file("Some text.");

    let output = generator
        .generate(input.path(), 1, "Machine Learning", "educational")
        .await
        .unwrap();

    assert_eq!(output.raw_json["final_quiz"]["1"]["correct"], "d");
    assert_eq!(output.raw_json["complexity_analysis"], "Fine.");
}
