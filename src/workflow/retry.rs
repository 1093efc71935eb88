//! 重试控制
//!
//! 固定策略：最多执行两次，第二次使用完全相同的输入，不做退避

use std::future::Future;
use tracing::warn;

use crate::error::{AppError, AppResult};

/// 最大尝试次数（不可配置）
pub const MAX_ATTEMPTS: u32 = 2;

/// 成功结果以及实际尝试的次数
#[derive(Debug, Clone, PartialEq)]
pub struct Attempted<T> {
    pub value: T,
    pub attempts: u32,
}

/// 执行 `op`，失败时原样再执行一次
///
/// `op` 的参数是当前尝试序号（从 1 开始）。两次都失败时返回
/// `AppError::GenerationFailed`，其中包含最后一次的错误。
pub async fn with_retry<T, F, Fut>(mut op: F) -> AppResult<Attempted<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => {
                return Ok(Attempted {
                    value,
                    attempts: attempt,
                })
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!("第 {}/{} 次尝试失败: {}，立即重试", attempt, MAX_ATTEMPTS, e);
                attempt += 1;
            }
            Err(e) => {
                warn!("第 {}/{} 次尝试失败: {}", attempt, MAX_ATTEMPTS, e);
                return Err(AppError::GenerationFailed {
                    attempts: attempt,
                    source: Box::new(e),
                });
            }
        }
    }
}
