use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// 选项标签，固定为 a/b/c/d 四个
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "a",
            OptionLabel::B => "b",
            OptionLabel::C => "c",
            OptionLabel::D => "d",
        }
    }

    /// 解析标签，忽略首尾空白和大小写
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Some(OptionLabel::A),
            "b" => Some(OptionLabel::B),
            "c" => Some(OptionLabel::C),
            "d" => Some(OptionLabel::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一道题的四个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl Options {
    pub fn get(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
            OptionLabel::D => &self.d,
        }
    }

    /// 按 a → d 的顺序遍历选项
    pub fn iter(&self) -> impl Iterator<Item = (OptionLabel, &str)> + '_ {
        OptionLabel::ALL.into_iter().map(move |label| (label, self.get(label)))
    }
}

/// 单道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub mcq: String,
    pub options: Options,
    pub correct: OptionLabel,
}

impl Question {
    pub fn correct_text(&self) -> &str {
        self.options.get(self.correct)
    }
}

/// 一次生成得到的完整试卷
///
/// 题号按数字顺序保存，序列化时写回 `"1"`、`"2"` 这样的字符串键
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quiz {
    questions: BTreeMap<u32, Question>,
}

impl Quiz {
    pub(crate) fn from_questions(questions: BTreeMap<u32, Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Question> {
        self.questions.get(&index)
    }

    /// 按题号顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Question)> + '_ {
        self.questions.iter().map(|(index, question)| (*index, question))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// 单次调用返回的 token 用量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// token 单价（美元 / 1K token）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pricing {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

impl Pricing {
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        usage.prompt_tokens as f64 / 1000.0 * self.prompt_per_1k
            + usage.completion_tokens as f64 / 1000.0 * self.completion_per_1k
    }
}

/// 一次生成过程累计的 token 用量和费用
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenInfo {
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_cost_usd: f64,
}

impl TokenInfo {
    /// 累加一次调用的用量
    pub fn record(&mut self, usage: &TokenUsage, pricing: &Pricing) {
        self.total_tokens += usage.total_tokens;
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_cost_usd += pricing.cost(usage);
    }
}

/// 评审调用给出的结论
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub complexity_analysis: String,
    pub is_appropriate: bool,
}

/// 用于表格展示的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "MCQ")]
    pub mcq: String,
    #[serde(rename = "Choices")]
    pub choices: String,
    #[serde(rename = "Correct")]
    pub correct: String,
}
