//! 公开房间目录服务
//!
//! `DirectoryAggregator` 负责一次完整的分页计算：解析游标、确定快照、
//! 排序、选页、加载摘要、签发游标。`RoomListService` 在其外层套上请求
//! 去重缓存，并提供查询其他服务器目录的透传接口。

use std::sync::Arc;

use config::DirectoryConfig;
use domain::{DirectoryStore, FederationClient, PublicRoomsPage, StateResolver};
use tracing::{debug, info, warn};

use crate::cursor::RoomListCursor;
use crate::enrichment::RoomEnricher;
use crate::error::DirectoryError;
use crate::pagination::select_page;
use crate::ranking::RoomRanker;
use crate::response_cache::ResponseCache;

/// 去重缓存键：`(limit, since)`
type PageKey = (Option<usize>, Option<String>);

pub struct RoomListServiceDependencies {
    pub store: Arc<dyn DirectoryStore>,
    pub state_resolver: Arc<dyn StateResolver>,
    pub federation_client: Arc<dyn FederationClient>,
}

pub struct DirectoryAggregator {
    store: Arc<dyn DirectoryStore>,
    ranker: RoomRanker,
    enricher: RoomEnricher,
}

impl DirectoryAggregator {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        state_resolver: Arc<dyn StateResolver>,
        concurrency: usize,
    ) -> Self {
        Self {
            ranker: RoomRanker::new(Arc::clone(&store), Arc::clone(&state_resolver), concurrency),
            enricher: RoomEnricher::new(Arc::clone(&store), state_resolver, concurrency),
            store,
        }
    }

    /// 计算一页公开房间列表，不经过缓存
    pub async fn public_room_list(
        &self,
        limit: Option<usize>,
        since: Option<&str>,
    ) -> Result<PublicRoomsPage, DirectoryError> {
        let cursor = RoomListCursor::parse_since(since)?;

        let room_ids = self.store.public_room_ids().await?;

        let stream_position = match cursor {
            Some(cursor) => cursor.stream_position,
            None => self.store.max_stream_position().await?,
        };
        debug!(
            "计算公开房间列表: 快照 {}, 候选房间 {} 个, limit {:?}",
            stream_position,
            room_ids.len(),
            limit
        );

        let ranked = self.ranker.rank(room_ids, stream_position).await?;
        let selection = select_page(&ranked, cursor, limit, stream_position);
        let chunk = self.enricher.enrich(&selection.rooms).await?;

        Ok(PublicRoomsPage {
            chunk,
            next_cursor: selection
                .next_cursor
                .map(|cursor| cursor.to_token())
                .transpose()?,
            prev_cursor: selection
                .prev_cursor
                .map(|cursor| cursor.to_token())
                .transpose()?,
        })
    }
}

pub struct RoomListService {
    aggregator: Arc<DirectoryAggregator>,
    federation_client: Arc<dyn FederationClient>,
    response_cache: ResponseCache<PageKey, PublicRoomsPage, DirectoryError>,
}

impl RoomListService {
    pub fn new(deps: RoomListServiceDependencies, config: &DirectoryConfig) -> Self {
        Self {
            aggregator: Arc::new(DirectoryAggregator::new(
                deps.store,
                deps.state_resolver,
                config.fanout_concurrency,
            )),
            federation_client: deps.federation_client,
            response_cache: ResponseCache::new(
                "room_list.public_rooms",
                config.response_cache_timeout(),
            ),
        }
    }

    /// 本服务器的公开房间列表；相同 `(limit, since)` 的并发请求共享一次计算
    pub async fn get_local_public_room_list(
        &self,
        limit: Option<usize>,
        since: Option<String>,
    ) -> Result<PublicRoomsPage, DirectoryError> {
        let aggregator = Arc::clone(&self.aggregator);
        let key = (limit, since.clone());
        self.response_cache
            .wrap(key, move || async move {
                aggregator.public_room_list(limit, since.as_deref()).await
            })
            .await
    }

    /// 其他服务器的公开房间列表，直接透传给联邦客户端
    pub async fn get_remote_public_room_list(
        &self,
        server_name: &str,
        limit: Option<usize>,
        since: Option<String>,
    ) -> Result<PublicRoomsPage, DirectoryError> {
        info!("查询服务器 {} 的公开房间列表", server_name);
        let mut pages = self
            .federation_client
            .public_rooms(vec![server_name.to_owned()], limit, since)
            .await?;

        pages.remove(server_name).ok_or_else(|| {
            warn!("服务器 {} 未返回公开房间列表", server_name);
            DirectoryError::ServerNotFound(server_name.to_owned())
        })
    }
}
