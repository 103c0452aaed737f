//! 领域模型错误定义
//!
//! `RepositoryError` 描述外部协作者（存储、状态解析器、联邦客户端）
//! 返回的失败，由上层原样传播。

use thiserror::Error;

/// 协作者错误
///
/// 必须可克隆：去重缓存会把同一个失败结果交给所有并发调用方。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 事件存储失败
    #[error("存储错误: {message}")]
    Storage { message: String },

    /// 房间状态解析失败
    #[error("状态解析失败: {message}")]
    StateResolution { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn state_resolution(message: impl Into<String>) -> Self {
        Self::StateResolution {
            message: message.into(),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
