//! 外部协作者接口定义
//!
//! 目录引擎只通过这些接口访问事件存储、状态解析和联邦查询，
//! 内层定义接口，外层实现接口。

pub mod directory_store;
pub mod federation_client;
pub mod state_resolver;

// 重新导出所有协作者特征
pub use directory_store::DirectoryStore;
pub use federation_client::FederationClient;
pub use state_resolver::StateResolver;

#[cfg(feature = "testing")]
pub use directory_store::MockDirectoryStore;
#[cfg(feature = "testing")]
pub use federation_client::MockFederationClient;
#[cfg(feature = "testing")]
pub use state_resolver::MockStateResolver;
