//! 公开房间目录核心领域模型
//!
//! 包含房间、事件、流位置等标识类型，房间状态事件，目录摘要实体，
//! 以及目录引擎依赖的外部协作者接口（存储、状态解析、联邦查询）。

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use value_objects::*;
