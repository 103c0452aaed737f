//! 事件存储接口定义

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::StateEvent;
use crate::errors::RepositoryResult;
use crate::value_objects::{EventId, RoomId, StreamPosition};

/// 目录引擎使用的事件存储
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// 所有被标记为可公开列出的房间
    async fn public_room_ids(&self) -> RepositoryResult<Vec<RoomId>>;

    /// 当前全局最大流位置
    async fn max_stream_position(&self) -> RepositoryResult<StreamPosition>;

    /// 房间在指定流位置的前向极值事件；该位置房间尚无状态时返回空列表
    async fn forward_extremities(
        &self,
        room_id: &RoomId,
        at: StreamPosition,
    ) -> RepositoryResult<Vec<EventId>>;

    /// 批量加载事件，缺失的ID不出现在结果中
    async fn load_events(
        &self,
        event_ids: &[EventId],
    ) -> RepositoryResult<HashMap<EventId, StateEvent>>;

    /// 房间别名列表
    async fn aliases_for_room(&self, room_id: &RoomId) -> RepositoryResult<Vec<String>>;
}
