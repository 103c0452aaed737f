//! 目录服务配置
//!
//! 加载顺序：内置默认值 -> 可选 TOML 文件（`ROOM_DIRECTORY_CONFIG_FILE`）
//! -> `ROOM_DIRECTORY_` 前缀的环境变量。

use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "ROOM_DIRECTORY_CONFIG_FILE";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ROOM_DIRECTORY_";

/// 并发扇出默认上限
pub const DEFAULT_FANOUT_CONCURRENCY: usize = 10;

/// 目录服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// 排序与摘要加载阶段同时进行的存储调用上限
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,
    /// 结果完成后在去重缓存中保留的毫秒数，0 表示完成即移除
    #[serde(default)]
    pub response_cache_timeout_ms: u64,
}

fn default_fanout_concurrency() -> usize {
    DEFAULT_FANOUT_CONCURRENCY
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            fanout_concurrency: DEFAULT_FANOUT_CONCURRENCY,
            response_cache_timeout_ms: 0,
        }
    }
}

impl DirectoryConfig {
    /// 从默认值、配置文件和环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        Self::extract(figment)
    }

    /// 从 TOML 字符串解析，未出现的字段取默认值
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(source));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .extract()
            .map_err(|err| ConfigError::Load(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fanout_concurrency == 0 {
            return Err(ConfigError::InvalidFanoutConcurrency(
                "fanout_concurrency 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn response_cache_timeout(&self) -> Duration {
        Duration::from_millis(self.response_cache_timeout_ms)
    }
}

/// 配置错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("配置加载失败: {0}")]
    Load(String),
    #[error("扇出并发数无效: {0}")]
    InvalidFanoutConcurrency(String),
}
