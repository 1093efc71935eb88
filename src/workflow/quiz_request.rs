//! 出题请求
//!
//! 封装"用哪段文本、出几道题、什么科目和语气"这一信息

use std::collections::HashMap;
use std::fmt::Display;

/// 出题请求
#[derive(Debug, Clone)]
pub struct QuizRequest {
    /// 文档全文
    pub text: String,
    /// 题目数量
    pub count: u32,
    /// 科目
    pub subject: String,
    /// 语气
    pub tone: String,
}

impl QuizRequest {
    pub fn new(
        text: impl Into<String>,
        count: u32,
        subject: impl Into<String>,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            count,
            subject: subject.into(),
            tone: tone.into(),
        }
    }

    /// 出题提示词所需的变量
    pub fn generation_values(&self, response_json: &str) -> HashMap<&'static str, String> {
        HashMap::from([
            ("text", self.text.clone()),
            ("number", self.count.to_string()),
            ("subject", self.subject.clone()),
            ("tone", self.tone.clone()),
            ("response_json", response_json.to_string()),
        ])
    }

    /// 评审提示词所需的变量
    pub fn evaluation_values(
        &self,
        quiz_json: &str,
        evaluation_response_json: &str,
    ) -> HashMap<&'static str, String> {
        HashMap::from([
            ("subject", self.subject.clone()),
            ("quiz", quiz_json.to_string()),
            ("evaluation_response_json", evaluation_response_json.to_string()),
        ])
    }
}

impl Display for QuizRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[科目 {} | 语气 {} | 题数 {} | 文本 {} 字符]",
            self.subject,
            self.tone,
            self.count,
            self.text.chars().count()
        )
    }
}
