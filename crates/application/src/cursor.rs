//! 目录分页游标
//!
//! 游标是一个只有三个字段的定长记录：快照流位置 `s`、从排序头部起算的
//! 绝对偏移 `n`、遍历方向 `d`。编码为 MessagePack map 后再做 URL 安全、
//! 无填充的 base64，得到可直接放进查询参数的短令牌。

use data_encoding::BASE64URL_NOPAD;
use domain::StreamPosition;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 表示“首页、无游标”的字面令牌，调用方在解码前自行短路
pub const END_SENTINEL: &str = "END";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("游标不是合法的 base64: {0}")]
    Base64(String),
    #[error("游标内容格式错误: {0}")]
    Payload(String),
    #[error("游标编码失败: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListCursor {
    /// 首页请求时捕获的流位置
    #[serde(rename = "s")]
    pub stream_position: StreamPosition,
    /// 距排序序列头部的房间数
    #[serde(rename = "n")]
    pub offset: usize,
    /// 消费方是否在向后（next）方向遍历
    #[serde(rename = "d")]
    pub forward: bool,
}

impl RoomListCursor {
    pub fn new(stream_position: StreamPosition, offset: usize, forward: bool) -> Self {
        Self {
            stream_position,
            offset,
            forward,
        }
    }

    /// 同一位置、换一个方向
    pub fn with_direction(self, forward: bool) -> Self {
        Self { forward, ..self }
    }

    pub fn to_token(&self) -> Result<String, CursorError> {
        let bytes =
            rmp_serde::to_vec_named(self).map_err(|err| CursorError::Encode(err.to_string()))?;
        Ok(BASE64URL_NOPAD.encode(&bytes))
    }

    pub fn from_token(token: &str) -> Result<Self, CursorError> {
        let bytes = BASE64URL_NOPAD
            .decode(token.as_bytes())
            .map_err(|err| CursorError::Base64(err.to_string()))?;
        rmp_serde::from_slice(&bytes).map_err(|err| CursorError::Payload(err.to_string()))
    }

    /// 解析请求携带的 `since` 令牌；缺失、空串或 [`END_SENTINEL`] 都表示首页
    pub fn parse_since(since: Option<&str>) -> Result<Option<Self>, CursorError> {
        match since {
            None | Some("") | Some(END_SENTINEL) => Ok(None),
            Some(token) => Self::from_token(token).map(Some),
        }
    }
}
