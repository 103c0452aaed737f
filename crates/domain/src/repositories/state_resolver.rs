//! 房间状态解析接口定义

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::errors::RepositoryResult;
use crate::value_objects::{EventId, RoomId, StateKey, UserId};

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait StateResolver: Send + Sync {
    /// 以给定前向极值为准解析出的已加入成员
    async fn joined_members(
        &self,
        room_id: &RoomId,
        extremities: &[EventId],
    ) -> RepositoryResult<HashSet<UserId>>;

    /// 房间当前状态：状态槽位到事件ID的映射
    async fn current_state_ids(
        &self,
        room_id: &RoomId,
    ) -> RepositoryResult<HashMap<StateKey, EventId>>;
}
