//! 联邦目录查询接口定义

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::PublicRoomsPage;
use crate::errors::RepositoryResult;

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait FederationClient: Send + Sync {
    /// 向目标服务器查询公开房间目录，结果按服务器名索引；
    /// 未响应的服务器不出现在结果中
    async fn public_rooms(
        &self,
        destinations: Vec<String>,
        limit: Option<usize>,
        since: Option<String>,
    ) -> RepositoryResult<HashMap<String, PublicRoomsPage>>;
}
