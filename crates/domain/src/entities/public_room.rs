//! 公开房间目录实体

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::value_objects::RoomId;

/// 目录排序键：成员数降序，房间ID升序。
///
/// 不同房间之间不会出现相等的键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoomRank<'a> {
    joined_members: Reverse<u64>,
    room_id: &'a RoomId,
}

impl<'a> RoomRank<'a> {
    pub fn new(room_id: &'a RoomId, joined_members: u64) -> Self {
        Self {
            joined_members: Reverse(joined_members),
            room_id,
        }
    }
}

/// 公开房间摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRoomSummary {
    pub room_id: RoomId,
    pub num_joined_members: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_alias: Option<String>,
    pub world_readable: bool,
    pub guest_can_join: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl PublicRoomSummary {
    pub fn new(room_id: RoomId, num_joined_members: u64) -> Self {
        Self {
            room_id,
            num_joined_members,
            aliases: None,
            name: None,
            topic: None,
            canonical_alias: None,
            world_readable: false,
            guest_can_join: false,
            avatar_url: None,
        }
    }

    pub fn rank(&self) -> RoomRank<'_> {
        RoomRank::new(&self.room_id, self.num_joined_members)
    }
}

/// 目录分页结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRoomsPage {
    pub chunk: Vec<PublicRoomSummary>,
    /// 向后翻页游标
    #[serde(
        rename = "next_batch",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_cursor: Option<String>,
    /// 向前翻页游标
    #[serde(
        rename = "prev_batch",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub prev_cursor: Option<String>,
}
