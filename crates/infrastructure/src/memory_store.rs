//! 内存事件存储
//!
//! 只追加的状态事件日志。每个事件写入时分配一个递增的流位置，房间在某个
//! 流位置的前向极值是该位置之前（含）房间的最新事件；成员集合和当前状态
//! 都通过折叠日志得到。

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use domain::{
    event_types, DirectoryStore, EventId, RepositoryError, RepositoryResult, RoomId, StateEvent,
    StateKey, StateResolver, StreamPosition, UserId,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct RoomRecord {
    public: bool,
    aliases: Vec<String>,
}

#[derive(Debug, Default)]
struct StoreInner {
    position: StreamPosition,
    rooms: BTreeMap<RoomId, RoomRecord>,
    events: Vec<StateEvent>,
    by_id: HashMap<EventId, usize>,
}

impl StoreInner {
    fn room_mut(&mut self, room_id: &RoomId) -> RepositoryResult<&mut RoomRecord> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::storage(format!("房间不存在: {room_id}")))
    }

    fn room_events<'a>(&'a self, room_id: &'a RoomId) -> impl Iterator<Item = &'a StateEvent> {
        self.events.iter().filter(move |event| &event.room_id == room_id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRoomStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记房间；房间在写入第一个事件之前没有任何状态
    pub async fn create_room(&self, room_id: &RoomId, public: bool) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;
        if inner.rooms.contains_key(room_id) {
            return Err(RepositoryError::storage(format!("房间已存在: {room_id}")));
        }
        inner.rooms.insert(
            room_id.clone(),
            RoomRecord {
                public,
                ..RoomRecord::default()
            },
        );
        debug!("创建房间 {} (公开列出: {})", room_id, public);
        Ok(())
    }

    /// 修改房间是否出现在目录候选中
    pub async fn set_public(&self, room_id: &RoomId, public: bool) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;
        inner.room_mut(room_id)?.public = public;
        Ok(())
    }

    pub async fn add_alias(&self, room_id: &RoomId, alias: impl Into<String>) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;
        inner.room_mut(room_id)?.aliases.push(alias.into());
        Ok(())
    }

    /// 追加一个状态事件并推进流位置
    pub async fn send_state_event(
        &self,
        room_id: &RoomId,
        event_type: &str,
        state_key: &str,
        content: Value,
    ) -> RepositoryResult<EventId> {
        let mut inner = self.inner.write().await;
        inner.room_mut(room_id)?;

        let position = inner.position.next();
        let event_id = EventId::new(format!("${}", position.value()));
        let index = inner.events.len();
        inner.position = position;
        inner.by_id.insert(event_id.clone(), index);
        inner.events.push(StateEvent {
            event_id: event_id.clone(),
            room_id: room_id.clone(),
            event_type: event_type.to_string(),
            state_key: state_key.to_string(),
            content,
            stream_position: position,
        });
        Ok(event_id)
    }

    pub async fn join(&self, room_id: &RoomId, user_id: &UserId) -> RepositoryResult<EventId> {
        self.set_membership(room_id, user_id, "join").await
    }

    pub async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> RepositoryResult<EventId> {
        self.set_membership(room_id, user_id, "leave").await
    }

    async fn set_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        membership: &str,
    ) -> RepositoryResult<EventId> {
        self.send_state_event(
            room_id,
            event_types::MEMBER,
            user_id.as_str(),
            json!({ "membership": membership }),
        )
        .await
    }
}

#[async_trait]
impl DirectoryStore for InMemoryRoomStore {
    async fn public_room_ids(&self) -> RepositoryResult<Vec<RoomId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rooms
            .iter()
            .filter(|(_, room)| room.public)
            .map(|(room_id, _)| room_id.clone())
            .collect())
    }

    async fn max_stream_position(&self) -> RepositoryResult<StreamPosition> {
        Ok(self.inner.read().await.position)
    }

    async fn forward_extremities(
        &self,
        room_id: &RoomId,
        at: StreamPosition,
    ) -> RepositoryResult<Vec<EventId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .room_events(room_id)
            .filter(|event| event.stream_position <= at)
            .last()
            .map(|event| vec![event.event_id.clone()])
            .unwrap_or_default())
    }

    async fn load_events(
        &self,
        event_ids: &[EventId],
    ) -> RepositoryResult<HashMap<EventId, StateEvent>> {
        let inner = self.inner.read().await;
        Ok(event_ids
            .iter()
            .filter_map(|event_id| {
                let index = *inner.by_id.get(event_id)?;
                Some((event_id.clone(), inner.events[index].clone()))
            })
            .collect())
    }

    async fn aliases_for_room(&self, room_id: &RoomId) -> RepositoryResult<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rooms
            .get(room_id)
            .map(|room| room.aliases.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl StateResolver for InMemoryRoomStore {
    async fn joined_members(
        &self,
        room_id: &RoomId,
        extremities: &[EventId],
    ) -> RepositoryResult<HashSet<UserId>> {
        let inner = self.inner.read().await;

        let mut upto: Option<StreamPosition> = None;
        for event_id in extremities {
            let index = inner.by_id.get(event_id).ok_or_else(|| {
                RepositoryError::state_resolution(format!("未知的极值事件: {event_id}"))
            })?;
            let position = inner.events[*index].stream_position;
            upto = Some(upto.map_or(position, |current| current.max(position)));
        }
        let Some(upto) = upto else {
            return Ok(HashSet::new());
        };

        let mut memberships: HashMap<&str, &str> = HashMap::new();
        for event in inner
            .room_events(room_id)
            .filter(|event| event.stream_position <= upto)
            .filter(|event| event.event_type == event_types::MEMBER)
        {
            memberships.insert(&event.state_key, event.membership().unwrap_or_default());
        }

        Ok(memberships
            .into_iter()
            .filter(|(_, membership)| *membership == "join")
            .map(|(user_id, _)| UserId::new(user_id))
            .collect())
    }

    async fn current_state_ids(
        &self,
        room_id: &RoomId,
    ) -> RepositoryResult<HashMap<StateKey, EventId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .room_events(room_id)
            .map(|event| (event.key(), event.event_id.clone()))
            .collect())
    }
}
