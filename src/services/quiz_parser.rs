//! 试卷解析与校验
//!
//! 从 LLM 的自由文本回复中取出 JSON 对象，并按试卷结构逐题校验。
//! 纯函数，不调用 LLM。

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AppError, AppResult};
use crate::models::{Evaluation, OptionLabel, Options, Question, Quiz};

/// 取出回复中第一个 `{` 到最后一个 `}` 之间的片段（含两端）
///
/// 模型偶尔会在 JSON 前后附加说明文字或代码块标记，这里直接截掉
pub fn extract_json_span(text: &str) -> AppResult<&str> {
    let start = text.find('{').ok_or(AppError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(AppError::NoJsonFound)?;

    if end < start {
        return Err(AppError::NoJsonFound);
    }

    Ok(&text[start..=end])
}

/// 提取并解析回复中的 JSON 对象
pub fn parse_json_reply(text: &str) -> AppResult<Value> {
    let span = extract_json_span(text)?;
    Ok(serde_json::from_str(span)?)
}

/// 解析并校验出题结果
///
/// # 参数
/// - `text`: LLM 的原始回复
/// - `expected_count`: 请求的题目数量 N
///
/// # 返回
/// 题号恰好为 1..N 的试卷
pub fn parse_quiz(text: &str, expected_count: u32) -> AppResult<Quiz> {
    let value = parse_json_reply(text)?;
    validate_quiz(&value, expected_count)
}

/// 解析评审结果，返回修订后的试卷和评审结论
pub fn parse_evaluation(text: &str, expected_count: u32) -> AppResult<(Quiz, Evaluation)> {
    let value = parse_json_reply(text)?;
    validate_evaluation(&value, expected_count)
}

/// 校验评审结果：final_quiz 按试卷规则校验，其余字段缺失时取默认值
pub fn validate_evaluation(value: &Value, expected_count: u32) -> AppResult<(Quiz, Evaluation)> {
    let final_quiz = value
        .get("final_quiz")
        .ok_or_else(|| AppError::invalid_quiz("评审结果缺少字段 final_quiz"))?;
    let quiz = validate_quiz(final_quiz, expected_count)?;

    let evaluation = Evaluation {
        complexity_analysis: value
            .get("complexity_analysis")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        is_appropriate: value
            .get("is_appropriate")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    };

    Ok((quiz, evaluation))
}

/// 校验试卷结构
///
/// - 题号集合必须恰好是 "1".."N"
/// - 每道题必须包含 mcq / options / correct
/// - options 必须恰好包含 a、b、c、d
/// - correct 必须是 a、b、c、d 之一
pub fn validate_quiz(value: &Value, expected_count: u32) -> AppResult<Quiz> {
    let object = value
        .as_object()
        .ok_or_else(|| AppError::invalid_quiz("顶层必须是 JSON 对象"))?;

    let expected: BTreeSet<String> = (1..=expected_count).map(|i| i.to_string()).collect();
    let actual: BTreeSet<String> = object.keys().cloned().collect();

    if expected != actual {
        let missing: Vec<&str> = expected.difference(&actual).map(String::as_str).collect();
        let unexpected: Vec<&str> = actual.difference(&expected).map(String::as_str).collect();
        return Err(AppError::invalid_quiz(format!(
            "题号应为 1..{}，缺少 {:?}，多余 {:?}",
            expected_count, missing, unexpected
        )));
    }

    let mut questions = BTreeMap::new();
    for (key, item) in object {
        let index: u32 = key
            .parse()
            .map_err(|_| AppError::invalid_question(key, "题号不是数字"))?;
        questions.insert(index, validate_question(key, item)?);
    }

    Ok(Quiz::from_questions(questions))
}

fn validate_question(key: &str, value: &Value) -> AppResult<Question> {
    let object = value
        .as_object()
        .ok_or_else(|| AppError::invalid_question(key, "题目必须是 JSON 对象"))?;

    let mcq = required(object, key, "mcq")?
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::invalid_question(key, "字段 mcq 必须是非空字符串"))?
        .to_string();

    let options = validate_options(key, required(object, key, "options")?)?;

    let correct_value = required(object, key, "correct")?;
    let correct = correct_value
        .as_str()
        .and_then(OptionLabel::parse)
        .ok_or_else(|| {
            AppError::invalid_question(
                key,
                format!("字段 correct 必须是 a/b/c/d 之一，实际为 {}", correct_value),
            )
        })?;

    Ok(Question {
        mcq,
        options,
        correct,
    })
}

fn validate_options(key: &str, value: &Value) -> AppResult<Options> {
    let object = value
        .as_object()
        .ok_or_else(|| AppError::invalid_question(key, "字段 options 必须是对象"))?;

    if let Some(extra) = object
        .keys()
        .find(|k| !matches!(k.as_str(), "a" | "b" | "c" | "d"))
    {
        return Err(AppError::invalid_question(
            key,
            format!("options 含有多余选项 {}", extra),
        ));
    }

    let text = |label: OptionLabel| -> AppResult<String> {
        let option = object.get(label.as_str()).ok_or_else(|| {
            AppError::invalid_question(key, format!("options 缺少选项 {}", label))
        })?;
        option.as_str().map(str::to_string).ok_or_else(|| {
            AppError::invalid_question(key, format!("options.{} 必须是字符串", label))
        })
    };

    Ok(Options {
        a: text(OptionLabel::A)?,
        b: text(OptionLabel::B)?,
        c: text(OptionLabel::C)?,
        d: text(OptionLabel::D)?,
    })
}

fn required<'a>(object: &'a Map<String, Value>, key: &str, field: &str) -> AppResult<&'a Value> {
    object
        .get(field)
        .ok_or_else(|| AppError::invalid_question(key, format!("缺少字段 {}", field)))
}
