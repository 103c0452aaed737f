//! 基础设施层实现。
//!
//! 提供领域层存储与状态解析接口的内存实现。

pub mod memory_store;

pub use memory_store::InMemoryRoomStore;
