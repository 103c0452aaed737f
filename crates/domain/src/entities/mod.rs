//! 领域实体定义
//!
//! 包含房间状态事件以及公开目录的摘要、分页实体。

pub mod public_room;
pub mod room_state;

// 重新导出核心实体
pub use public_room::{PublicRoomSummary, PublicRoomsPage, RoomRank};
pub use room_state::{event_types, DirectoryState, JoinRule, StateEvent, DIRECTORY_STATE_TYPES};
