// Config Domain Events
//
// 配置领域事件定义

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value::Value;

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Set,
    Removed,
}

/// 配置变更事件
///
/// `Set` 事件携带新值，`Removed` 事件携带被删除的旧值
#[derive(Debug, Clone, Serialize)]
pub struct ConfigChangedEvent {
    pub key: String,
    pub kind: ChangeKind,
    pub value: Value,
    pub timestamp: DateTime<Utc>,
}

impl ConfigChangedEvent {
    pub fn set(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            kind: ChangeKind::Set,
            value,
            timestamp: Utc::now(),
        }
    }

    pub fn removed(key: impl Into<String>, previous: Value) -> Self {
        Self {
            key: key.into(),
            kind: ChangeKind::Removed,
            value: previous,
            timestamp: Utc::now(),
        }
    }
}
