// Config Port
//
// 配置服务端口定义

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{BulkKeys, Mapping, Value};

/// 配置错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Type mismatch at '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot set '{key}': '{at}' holds a {found}")]
    PathConflict {
        key: String,
        at: String,
        found: &'static str,
    },

    #[error("Index {index} out of bounds at '{key}' (length {len})")]
    IndexOutOfBounds {
        key: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid configuration root: expected an object, found {0}")]
    InvalidRoot(&'static str),

    #[error("Opaque value cannot be converted at '{0}'")]
    OpaqueValue(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::SerializationError(err.to_string())
    }
}

/// 配置端口 - 可跨任务共享的异步读写接口
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// 检查键是否存在（值为 Null 也算存在）
    async fn has(&self, key: &str) -> bool;

    /// 获取配置值，缺失时返回 Null
    async fn get(&self, key: &str) -> Value;

    /// 获取配置值，缺失时返回默认值
    async fn get_or(&self, key: &str, default: Value) -> Value;

    /// 批量获取
    async fn get_many(&self, keys: BulkKeys) -> Mapping;

    /// 设置配置值
    async fn set(&self, key: &str, value: Value) -> Result<(), ConfigError>;

    /// 批量设置
    async fn set_many(&self, values: Mapping) -> Result<(), ConfigError>;

    /// 在序列头部插入
    async fn prepend(&self, key: &str, value: Value) -> Result<(), ConfigError>;

    /// 在序列尾部追加
    async fn push(&self, key: &str, value: Value) -> Result<(), ConfigError>;

    /// 删除顶层键，返回旧值
    async fn remove(&self, key: &str) -> Option<Value>;

    /// 获取全部配置的快照
    async fn all(&self) -> Mapping;
}
