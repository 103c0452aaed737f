//! 房间状态事件定义
//!
//! 目录只关心少数几类状态事件（加入规则、名称、话题、别名、历史可见性、
//! 访客访问、头像），`DirectoryState` 把它们按 `(类型, state_key)` 索引，
//! 并提供目录展示所需的字段读取方法。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{EventId, RoomId, StateKey, StreamPosition};

/// 状态事件类型
pub mod event_types {
    pub const JOIN_RULES: &str = "m.room.join_rules";
    pub const NAME: &str = "m.room.name";
    pub const TOPIC: &str = "m.room.topic";
    pub const CANONICAL_ALIAS: &str = "m.room.canonical_alias";
    pub const HISTORY_VISIBILITY: &str = "m.room.history_visibility";
    pub const GUEST_ACCESS: &str = "m.room.guest_access";
    pub const AVATAR: &str = "m.room.avatar";
    pub const MEMBER: &str = "m.room.member";
}

/// 目录展示需要加载的状态事件类型
pub const DIRECTORY_STATE_TYPES: [&str; 7] = [
    event_types::JOIN_RULES,
    event_types::NAME,
    event_types::TOPIC,
    event_types::CANONICAL_ALIAS,
    event_types::HISTORY_VISIBILITY,
    event_types::GUEST_ACCESS,
    event_types::AVATAR,
];

/// 房间加入规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinRule {
    Public,
    Invite,
    Knock,
    Private,
    Other(String),
}

impl JoinRule {
    pub fn parse(value: &str) -> Self {
        match value {
            "public" => Self::Public,
            "invite" => Self::Invite,
            "knock" => Self::Knock,
            "private" => Self::Private,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// 房间状态事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    pub event_id: EventId,
    pub room_id: RoomId,
    pub event_type: String,
    pub state_key: String,
    pub content: Value,
    /// 事件写入时的全局流位置
    pub stream_position: StreamPosition,
}

impl StateEvent {
    pub fn key(&self) -> StateKey {
        StateKey::new(self.event_type.clone(), self.state_key.clone())
    }

    /// 读取内容中的字符串字段，非字符串或缺失时返回 `None`
    pub fn content_str(&self, field: &str) -> Option<&str> {
        self.content.get(field).and_then(Value::as_str)
    }

    /// 成员事件的 `membership` 字段
    pub fn membership(&self) -> Option<&str> {
        if self.event_type != event_types::MEMBER {
            return None;
        }
        self.content_str("membership")
    }
}

/// 目录视角下的房间当前状态
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    events: HashMap<StateKey, StateEvent>,
}

impl DirectoryState {
    pub fn from_events(events: impl IntoIterator<Item = StateEvent>) -> Self {
        Self {
            events: events.into_iter().map(|event| (event.key(), event)).collect(),
        }
    }

    /// 取 state_key 为空的状态事件
    pub fn get(&self, event_type: &str) -> Option<&StateEvent> {
        self.events.get(&StateKey::new(event_type, ""))
    }

    /// 读取非空字符串字段
    fn non_empty(&self, event_type: &str, field: &str) -> Option<&str> {
        self.get(event_type)
            .and_then(|event| event.content_str(field))
            .filter(|value| !value.is_empty())
    }

    /// 字段缺失、为 null 或空串时视为没有规则；非字符串的值按未知规则处理
    pub fn join_rule(&self) -> Option<JoinRule> {
        let value = self.get(event_types::JOIN_RULES)?.content.get("join_rule")?;
        match value {
            Value::Null => None,
            Value::String(rule) if rule.is_empty() => None,
            Value::String(rule) => Some(JoinRule::parse(rule)),
            other => Some(JoinRule::Other(other.to_string())),
        }
    }

    /// 没有加入规则事件（或规则为空）时视为公开
    pub fn is_publicly_joinable(&self) -> bool {
        matches!(self.join_rule(), None | Some(JoinRule::Public))
    }

    pub fn name(&self) -> Option<&str> {
        self.non_empty(event_types::NAME, "name")
    }

    pub fn topic(&self) -> Option<&str> {
        self.non_empty(event_types::TOPIC, "topic")
    }

    pub fn canonical_alias(&self) -> Option<&str> {
        self.non_empty(event_types::CANONICAL_ALIAS, "alias")
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.non_empty(event_types::AVATAR, "url")
    }

    pub fn is_world_readable(&self) -> bool {
        self.get(event_types::HISTORY_VISIBILITY)
            .and_then(|event| event.content_str("history_visibility"))
            == Some("world_readable")
    }

    pub fn guest_can_join(&self) -> bool {
        self.get(event_types::GUEST_ACCESS)
            .and_then(|event| event.content_str("guest_access"))
            == Some("can_join")
    }
}
