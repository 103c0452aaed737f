//! 单元测试用的内存目录
//!
//! 每个房间只记录成员数和少量展示字段，事件ID形如 `{room}|{kind}`，
//! 加载事件时按需合成。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::{
    event_types, DirectoryStore, EventId, RepositoryResult, RoomId, StateEvent, StateKey,
    StateResolver, StreamPosition, UserId,
};
use serde_json::Value;

use crate::enrichment::RoomEnricher;
use crate::ranking::RoomRanker;
use crate::services::{RoomListService, RoomListServiceDependencies};

#[derive(Debug, Clone)]
pub struct FakeRoom {
    pub room_id: RoomId,
    pub members: usize,
    pub has_state: bool,
    pub join_rule: Option<String>,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub aliases: Vec<String>,
}

impl FakeRoom {
    fn new(room_id: &str, members: usize) -> Self {
        Self {
            room_id: RoomId::from(room_id),
            members,
            has_state: true,
            join_rule: Some("public".to_string()),
            name: None,
            topic: None,
            aliases: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    rooms: Mutex<Vec<FakeRoom>>,
    pub room_list_calls: AtomicUsize,
    pub state_loads: AtomicUsize,
}

impl FakeBackend {
    fn room(&self, room_id: &RoomId) -> Option<FakeRoom> {
        self.rooms
            .lock()
            .unwrap()
            .iter()
            .find(|room| &room.room_id == room_id)
            .cloned()
    }

    fn synthesize(&self, event_id: &EventId) -> Option<StateEvent> {
        let (room_id, kind) = event_id.as_str().split_once('|')?;
        let room = self.room(&RoomId::from(room_id))?;
        let (event_type, field, value) = match kind {
            "join_rules" => (event_types::JOIN_RULES, "join_rule", room.join_rule?),
            "name" => (event_types::NAME, "name", room.name?),
            "topic" => (event_types::TOPIC, "topic", room.topic?),
            _ => return None,
        };
        let mut content = serde_json::Map::new();
        content.insert(field.to_string(), Value::String(value));
        Some(StateEvent {
            event_id: event_id.clone(),
            room_id: room.room_id.clone(),
            event_type: event_type.to_string(),
            state_key: String::new(),
            content: Value::Object(content),
            stream_position: StreamPosition::new(1),
        })
    }
}

#[async_trait]
impl DirectoryStore for FakeBackend {
    async fn public_room_ids(&self) -> RepositoryResult<Vec<RoomId>> {
        self.room_list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self
            .rooms
            .lock()
            .unwrap()
            .iter()
            .map(|room| room.room_id.clone())
            .collect())
    }

    async fn max_stream_position(&self) -> RepositoryResult<StreamPosition> {
        Ok(FakeDirectory::POSITION)
    }

    async fn forward_extremities(
        &self,
        room_id: &RoomId,
        _at: StreamPosition,
    ) -> RepositoryResult<Vec<EventId>> {
        tokio::task::yield_now().await;
        Ok(match self.room(room_id) {
            Some(room) if room.has_state => vec![EventId::new(format!("{room_id}|extremity"))],
            _ => Vec::new(),
        })
    }

    async fn load_events(
        &self,
        event_ids: &[EventId],
    ) -> RepositoryResult<HashMap<EventId, StateEvent>> {
        Ok(event_ids
            .iter()
            .filter_map(|id| self.synthesize(id).map(|event| (id.clone(), event)))
            .collect())
    }

    async fn aliases_for_room(&self, room_id: &RoomId) -> RepositoryResult<Vec<String>> {
        Ok(self
            .room(room_id)
            .map(|room| room.aliases)
            .unwrap_or_default())
    }
}

#[async_trait]
impl StateResolver for FakeBackend {
    async fn joined_members(
        &self,
        room_id: &RoomId,
        _extremities: &[EventId],
    ) -> RepositoryResult<HashSet<UserId>> {
        let members = self.room(room_id).map_or(0, |room| room.members);
        Ok((0..members)
            .map(|i| UserId::new(format!("@user{i}:test")))
            .collect())
    }

    async fn current_state_ids(
        &self,
        room_id: &RoomId,
    ) -> RepositoryResult<HashMap<StateKey, EventId>> {
        self.state_loads.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let mut ids = HashMap::new();
        for (event_type, kind) in [
            (event_types::JOIN_RULES, "join_rules"),
            (event_types::NAME, "name"),
            (event_types::TOPIC, "topic"),
            (event_types::MEMBER, "member"),
        ] {
            ids.insert(
                StateKey::new(event_type, ""),
                EventId::new(format!("{room_id}|{kind}")),
            );
        }
        Ok(ids)
    }
}

#[derive(Clone, Default)]
pub struct FakeDirectory {
    pub backend: Arc<FakeBackend>,
}

impl FakeDirectory {
    pub const POSITION: StreamPosition = StreamPosition(100);

    pub fn new() -> Self {
        Self::default()
    }

    /// `count` 个房间，`!room01` 成员最多，依次递减
    pub fn numbered(count: usize) -> Self {
        (1..=count).fold(Self::new(), |directory, i| {
            directory.with_room(&format!("!room{i:02}"), count + 1 - i)
        })
    }

    pub fn with_room(self, room_id: &str, members: usize) -> Self {
        self.push(FakeRoom::new(room_id, members))
    }

    pub fn with_stateless_room(self, room_id: &str) -> Self {
        let mut room = FakeRoom::new(room_id, 0);
        room.has_state = false;
        self.push(room)
    }

    pub fn with_details(self, room_id: &str, members: usize, name: &str, topic: &str) -> Self {
        let mut room = FakeRoom::new(room_id, members);
        room.name = Some(name.to_string());
        room.topic = Some(topic.to_string());
        room.aliases = vec![format!("#{}:test", name.to_lowercase())];
        self.push(room)
    }

    pub fn with_join_rule(self, room_id: &str, members: usize, join_rule: &str) -> Self {
        let mut room = FakeRoom::new(room_id, members);
        room.join_rule = Some(join_rule.to_string());
        self.push(room)
    }

    fn push(self, room: FakeRoom) -> Self {
        self.backend.rooms.lock().unwrap().push(room);
        self
    }

    pub fn set_join_rule(&self, room_id: &str, join_rule: &str) {
        let mut rooms = self.backend.rooms.lock().unwrap();
        if let Some(room) = rooms
            .iter_mut()
            .find(|room| room.room_id.as_str() == room_id)
        {
            room.join_rule = Some(join_rule.to_string());
        }
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.backend
            .rooms
            .lock()
            .unwrap()
            .iter()
            .map(|room| room.room_id.clone())
            .collect()
    }

    pub fn position(&self) -> StreamPosition {
        Self::POSITION
    }

    pub fn clone_store(&self) -> Arc<dyn DirectoryStore> {
        self.backend.clone()
    }

    pub fn clone_resolver(&self) -> Arc<dyn StateResolver> {
        self.backend.clone()
    }

    pub fn ranker(&self) -> RoomRanker {
        RoomRanker::new(self.clone_store(), self.clone_resolver(), 10)
    }

    pub fn enricher(&self) -> RoomEnricher {
        RoomEnricher::new(self.clone_store(), self.clone_resolver(), 10)
    }

    pub fn room_list_calls(&self) -> usize {
        self.backend.room_list_calls.load(Ordering::SeqCst)
    }

    /// 摘要阶段加载当前状态的次数
    pub fn state_loads(&self) -> usize {
        self.backend.state_loads.load(Ordering::SeqCst)
    }

    pub fn dependencies(
        &self,
        federation_client: Arc<dyn domain::FederationClient>,
    ) -> RoomListServiceDependencies {
        RoomListServiceDependencies {
            store: self.clone_store(),
            state_resolver: self.clone_resolver(),
            federation_client,
        }
    }

    pub fn service(&self) -> RoomListService {
        let federation = Arc::new(domain::MockFederationClient::new());
        RoomListService::new(
            self.dependencies(federation),
            &config::DirectoryConfig::default(),
        )
    }
}
