//! 提示词模板
//!
//! `{name}` 形式的占位符会被替换为对应的值，未知占位符原样保留

use std::collections::HashMap;

/// 出题提示词
pub const QUIZ_GENERATION_TEMPLATE: &str = r#"
You are an expert at creating multiple-choice questions (MCQs) for educational purposes.

Return ONLY valid JSON. No extra text, no markdown, no code fences.

Requirements:
- Generate exactly {number} MCQs for {subject} students in a {tone} tone.
- Use ONLY the provided text.
- Do not repeat questions.
- Use keys "1"..."{number}" exactly.
- Each question must include options a/b/c/d.
- "correct" must be one of: "a", "b", "c", "d".
- Distribute the correct answers across a/b/c/d instead of always using the same letter.

Text:
{text}

### RESPONSE_JSON (structure only, values are placeholders)
{response_json}
"#;

/// 评审提示词
pub const QUIZ_EVALUATION_TEMPLATE: &str = r#"
You are an expert in creating and evaluating multiple-choice questions (MCQs) for {subject} students.

Return ONLY valid JSON. No extra text, no markdown, no code fences.

Rules:
- complexity_analysis must be at most 50 words.
- is_appropriate must be a boolean.
- final_quiz must follow the quiz format shown in RESPONSE_JSON.
- If is_appropriate is true, final_quiz must be identical to the input quiz.
- If is_appropriate is false, revise only the questions that need it and keep the same keys.

Input Quiz (JSON):
{quiz}

### RESPONSE_JSON (structure only, values are placeholders)
{evaluation_response_json}
"#;

/// 提示词模板
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn quiz_generation() -> Self {
        Self::new(QUIZ_GENERATION_TEMPLATE)
    }

    pub fn quiz_evaluation() -> Self {
        Self::new(QUIZ_EVALUATION_TEMPLATE)
    }

    /// 替换模板中的占位符
    ///
    /// 只扫描一遍模板，替换进去的值不会再被当作模板解析
    ///
    /// # 参数
    /// - `values`: 占位符名 → 替换值，未提供的占位符原样保留
    ///
    /// # 返回
    /// 填充后的提示词
    pub fn fill(&self, values: &HashMap<&str, String>) -> String {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let replaced = after.find('}').and_then(|end| {
                let name = &after[..end];
                if is_placeholder_name(name) {
                    values.get(name).map(|value| (value, end))
                } else {
                    None
                }
            });

            match replaced {
                Some((value, end)) => {
                    output.push_str(value);
                    rest = &after[end + 1..];
                }
                None => {
                    output.push('{');
                    rest = after;
                }
            }
        }

        output.push_str(rest);
        output
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let template = PromptTemplate::new("keys 1..{number}, count {number}, tone {tone}");
        let filled = template.fill(&values(&[("number", "5"), ("tone", "formal")]));
        assert_eq!(filled, "keys 1..5, count 5, tone formal");
    }

    #[test]
    fn test_fill_keeps_unknown_and_literal_braces() {
        let template = PromptTemplate::new(r#"{missing} {"a": 1} {} {tone}"#);
        let filled = template.fill(&values(&[("tone", "casual")]));
        assert_eq!(filled, r#"{missing} {"a": 1} {} casual"#);
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let template = PromptTemplate::new("Text: {text}");
        let filled = template.fill(&values(&[("text", "{tone} stays"), ("tone", "formal")]));
        assert_eq!(filled, "Text: {tone} stays");
    }

    #[test]
    fn test_generation_template_uses_all_inputs() {
        let filled = PromptTemplate::quiz_generation().fill(&values(&[
            ("text", "Gradient descent minimises a loss."),
            ("number", "3"),
            ("subject", "Machine Learning"),
            ("tone", "educational"),
            ("response_json", r#"{"1": {}}"#),
        ]));

        assert!(filled.contains("Generate exactly 3 MCQs for Machine Learning students in a educational tone."));
        assert!(filled.contains(r#"Use keys "1"..."3" exactly."#));
        assert!(filled.contains("Gradient descent minimises a loss."));
        assert!(filled.contains(r#"{"1": {}}"#));
        assert!(!filled.contains("{text}"));
    }
}
