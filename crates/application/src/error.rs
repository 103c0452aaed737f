use domain::RepositoryError;
use thiserror::Error;

use crate::cursor::CursorError;

/// 目录查询错误
///
/// 可克隆，去重缓存中失败的结果会原样交给每个等待者。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("游标格式错误: {0}")]
    MalformedCursor(String),
    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),
    #[error("服务器不存在: {0}")]
    ServerNotFound(String),
    #[error("游标编码失败: {0}")]
    CursorEncoding(String),
}

impl DirectoryError {
    /// 对应的 HTTP 状态码，供承载引擎的传输层使用
    pub fn status_code(&self) -> u16 {
        match self {
            DirectoryError::MalformedCursor(_) => 400,
            DirectoryError::ServerNotFound(_) => 404,
            DirectoryError::Repository(_) | DirectoryError::CursorEncoding(_) => 500,
        }
    }
}

impl From<CursorError> for DirectoryError {
    fn from(value: CursorError) -> Self {
        match value {
            CursorError::Encode(message) => DirectoryError::CursorEncoding(message),
            other => DirectoryError::MalformedCursor(other.to_string()),
        }
    }
}
