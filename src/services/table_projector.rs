use crate::models::{Quiz, TableRow};

/// 选项之间的分隔符
pub const CHOICE_DELIMITER: &str = ".||.";

/// 把试卷展开为表格行
///
/// 按题号顺序输出，选项拼成 `a) X.||.b) Y.||.c) Z.||.d) W`
///
/// # 参数
/// - `quiz`: 已通过校验的试卷
pub fn to_table(quiz: &Quiz) -> Vec<TableRow> {
    quiz.iter()
        .map(|(_, question)| TableRow {
            mcq: question.mcq.clone(),
            choices: question
                .options
                .iter()
                .map(|(label, text)| format!("{}) {}", label, text))
                .collect::<Vec<_>>()
                .join(CHOICE_DELIMITER),
            correct: question.correct.to_string(),
        })
        .collect()
}
