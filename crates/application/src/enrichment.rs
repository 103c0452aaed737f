//! 房间摘要加载
//!
//! 并发加载本页房间的展示状态并组装 `PublicRoomSummary`。房间可能在排序
//! 之后变为非公开，这里再校验一次加入规则，非公开的房间直接跳过。

use std::sync::Arc;

use domain::{
    DirectoryState, DirectoryStore, EventId, PublicRoomSummary, RepositoryResult, StateResolver,
    DIRECTORY_STATE_TYPES,
};
use tracing::debug;

use crate::fanout::concurrently_execute;
use crate::ranking::RankedRoom;

pub struct RoomEnricher {
    store: Arc<dyn DirectoryStore>,
    state_resolver: Arc<dyn StateResolver>,
    concurrency: usize,
}

impl RoomEnricher {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        state_resolver: Arc<dyn StateResolver>,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            state_resolver,
            concurrency,
        }
    }

    /// 组装摘要并按排序键重排；任一房间加载失败则整页失败
    pub async fn enrich(&self, rooms: &[RankedRoom]) -> RepositoryResult<Vec<PublicRoomSummary>> {
        let summaries = concurrently_execute(0..rooms.len(), self.concurrency, |index| {
            self.summarize(&rooms[index])
        })
        .await?;

        let mut chunk: Vec<PublicRoomSummary> = summaries.into_iter().flatten().collect();
        chunk.sort_by(|a, b| a.rank().cmp(&b.rank()));
        Ok(chunk)
    }

    async fn summarize(&self, room: &RankedRoom) -> RepositoryResult<Option<PublicRoomSummary>> {
        let state_ids = self.state_resolver.current_state_ids(&room.room_id).await?;
        let event_ids: Vec<EventId> = state_ids
            .into_iter()
            .filter(|(key, _)| DIRECTORY_STATE_TYPES.contains(&key.event_type.as_str()))
            .map(|(_, event_id)| event_id)
            .collect();

        let events = self.store.load_events(&event_ids).await?;
        let state = DirectoryState::from_events(events.into_values());

        if !state.is_publicly_joinable() {
            debug!("房间 {} 已不再公开，从目录中排除", room.room_id);
            return Ok(None);
        }

        let aliases = self.store.aliases_for_room(&room.room_id).await?;

        let mut summary = PublicRoomSummary::new(room.room_id.clone(), room.joined_members);
        summary.aliases = Some(aliases).filter(|aliases| !aliases.is_empty());
        summary.name = state.name().map(str::to_owned);
        summary.topic = state.topic().map(str::to_owned);
        summary.canonical_alias = state.canonical_alias().map(str::to_owned);
        summary.world_readable = state.is_world_readable();
        summary.guest_can_join = state.guest_can_join();
        summary.avatar_url = state.avatar_url().map(str::to_owned);
        Ok(Some(summary))
    }
}
