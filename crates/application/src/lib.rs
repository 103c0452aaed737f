//! 应用层实现。
//!
//! 公开房间目录引擎：候选房间排序、双向游标分页、房间摘要并发加载，
//! 以及对相同请求做去重的响应缓存。存储与状态解析通过领域层接口注入。

pub mod cursor;
pub mod enrichment;
pub mod error;
pub mod fanout;
pub mod pagination;
pub mod ranking;
pub mod response_cache;
pub mod services;

#[cfg(test)]
mod test_support;

pub use cursor::{CursorError, RoomListCursor, END_SENTINEL};
pub use enrichment::RoomEnricher;
pub use error::DirectoryError;
pub use fanout::{concurrently_execute, DEFAULT_CONCURRENCY};
pub use pagination::{select_page, PageSelection};
pub use ranking::{RankedRoom, RoomRanker};
pub use response_cache::ResponseCache;
pub use services::{DirectoryAggregator, RoomListService, RoomListServiceDependencies};
