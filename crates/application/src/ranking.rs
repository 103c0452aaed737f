//! 房间排序
//!
//! 在给定快照流位置上解析每个候选房间的已加入成员数，排除没有状态或
//! 没有成员的房间，按成员数降序、房间ID升序给出完整的排序序列。

use std::sync::Arc;

use domain::{DirectoryStore, RepositoryResult, RoomId, RoomRank, StateResolver, StreamPosition};
use tracing::debug;

use crate::fanout::concurrently_execute;

/// 参与排序的房间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRoom {
    pub room_id: RoomId,
    pub joined_members: u64,
}

impl RankedRoom {
    pub fn new(room_id: impl Into<RoomId>, joined_members: u64) -> Self {
        Self {
            room_id: room_id.into(),
            joined_members,
        }
    }

    pub fn rank(&self) -> RoomRank<'_> {
        RoomRank::new(&self.room_id, self.joined_members)
    }
}

pub struct RoomRanker {
    store: Arc<dyn DirectoryStore>,
    state_resolver: Arc<dyn StateResolver>,
    concurrency: usize,
}

impl RoomRanker {
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

    /// 返回快照上的完整排序序列，不做分页截断
    pub async fn rank(
        &self,
        room_ids: Vec<RoomId>,
        at: StreamPosition,
    ) -> RepositoryResult<Vec<RankedRoom>> {
        let candidates = room_ids.len();
        let resolved = concurrently_execute(room_ids, self.concurrency, |room_id| {
            self.joined_count(room_id, at)
        })
        .await?;

        let mut ranked: Vec<RankedRoom> = resolved.into_iter().flatten().collect();
        ranked.sort_by(|a, b| a.rank().cmp(&b.rank()));

        debug!(
            "快照 {} 上 {} 个候选房间中 {} 个参与排序",
            at,
            candidates,
            ranked.len()
        );
        Ok(ranked)
    }

    async fn joined_count(
        &self,
        room_id: RoomId,
        at: StreamPosition,
    ) -> RepositoryResult<Option<RankedRoom>> {
        let extremities = self.store.forward_extremities(&room_id, at).await?;
        if extremities.is_empty() {
            return Ok(None);
        }

        let joined = self
            .state_resolver
            .joined_members(&room_id, &extremities)
            .await?;
        if joined.is_empty() {
            return Ok(None);
        }

        Ok(Some(RankedRoom {
            room_id,
            joined_members: joined.len() as u64,
        }))
    }
}
