//! 文本提取 - 业务能力层
//!
//! 只负责"把文件变成文本"，支持 PDF 与 TXT 两种格式

use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use std::path::Path;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 支持的文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    /// 根据扩展名判断格式（不区分大小写）
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("txt") => Ok(DocumentFormat::Text),
            _ => Err(AppError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// 读取文档内容
///
/// - `.pdf`: 逐页提取文本，跳过没有文字的页面，页面之间用换行连接
/// - `.txt`: 按 UTF-8 读取全部内容
///
/// # 参数
/// - `path`: 文档路径，按扩展名判断格式
///
/// # 返回
/// 文档的纯文本；格式不支持时返回 `UnsupportedFormat`，读取失败时返回 `Extraction`
pub fn extract_text(path: &Path) -> AppResult<String> {
    let format = DocumentFormat::from_path(path)?;
    let path_label = path.display().to_string();

    let text = match format {
        DocumentFormat::Pdf => {
            let bytes =
                std::fs::read(path).map_err(|e| AppError::extraction_failed(&path_label, e))?;
            extract_pdf_text(&bytes)
                .map_err(|e| AppError::extraction_failed(&path_label, e.to_string()))?
        }
        DocumentFormat::Text => std::fs::read_to_string(path)
            .map_err(|e| AppError::extraction_failed(&path_label, e))?,
    };

    debug!("已读取 {}: {} 字符", path_label, text.chars().count());

    Ok(text)
}

/// TJ 数组中超过这个间距（千分之一字号）视为词间空格
const WORD_GAP_THRESHOLD: f32 = 100.0;

fn extract_pdf_text(data: &[u8]) -> Result<String, pdf::error::PdfError> {
    let file = FileOptions::cached().load(data)?;
    let resolver = file.resolver();
    let mut pages = Vec::new();

    for page_num in 0..file.num_pages() {
        let page = file.get_page(page_num)?;
        let mut page_text = String::new();

        if let Some(content) = &page.contents {
            for op in content.operations(&resolver)?.iter() {
                match op {
                    Op::TextDraw { text } => page_text.push_str(&text.to_string_lossy()),
                    Op::TextDrawAdjusted { array } => {
                        for item in array {
                            match item {
                                TextDrawAdjusted::Text(text) => {
                                    page_text.push_str(&text.to_string_lossy())
                                }
                                // 负值表示向右移动
                                TextDrawAdjusted::Spacing(gap) if -gap > WORD_GAP_THRESHOLD => {
                                    push_separator(&mut page_text, ' ')
                                }
                                TextDrawAdjusted::Spacing(_) => {}
                            }
                        }
                    }
                    Op::MoveTextPosition { .. }
                    | Op::TextNewline
                    | Op::SetTextMatrix { .. }
                    | Op::EndText => push_separator(&mut page_text, '\n'),
                    _ => {}
                }
            }
        }

        // 扫描件等没有文字的页面直接跳过
        let page_text = page_text.trim();
        if !page_text.is_empty() {
            pages.push(page_text.to_string());
        }
    }

    Ok(pages.join("\n"))
}

/// 追加空格或换行，连续的分隔符只保留一个
fn push_separator(text: &mut String, separator: char) {
    match text.chars().last() {
        None | Some('\n') => {}
        Some(' ') if separator == '\n' => {
            text.pop();
            text.push('\n');
        }
        Some(' ') => {}
        Some(_) => text.push(separator),
    }
}
