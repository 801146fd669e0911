// In-Memory Config Repository
//
// 基于内存的配置仓储实现

use crate::domain::key::{index_segment, is_nested, segments, SEPARATOR};
use crate::domain::{Mapping, Query, Value};
use crate::ports::{ConfigError, ConfigRepository};

/// 内存配置仓储
///
/// 单线程、同步、无 I/O。需要跨任务共享时使用 `ConfigService`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryConfigRepository {
    items: Mapping,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Mapping) -> Self {
        Self { items }
    }

    /// 从 JSON 对象创建
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        match Value::from(value) {
            Value::Mapping(items) => Ok(Self::with_items(items)),
            other => Err(ConfigError::InvalidRoot(other.type_name())),
        }
    }

    /// 从 JSON 文本创建
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// 获取配置值
    ///
    /// 单个键返回其值（缺失时为 Null）；一组键返回与 `get_many` 相同的映射
    pub fn get(&self, query: impl Into<Query>) -> Value {
        match query.into() {
            Query::Key(key) => self.get_or(&key, Value::Null),
            Query::Many(keys) => Value::Mapping(self.get_many(&keys)),
        }
    }

    pub fn get_ref(&self, key: &str) -> Option<&Value> {
        resolve(&self.items, key)
    }

    /// 缺失时才计算默认值
    pub fn get_or_else(&self, key: &str, default: impl FnOnce() -> Value) -> Value {
        self.get_ref(key).cloned().unwrap_or_else(default)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_inner(self) -> Mapping {
        self.items
    }
}

impl From<Mapping> for InMemoryConfigRepository {
    fn from(items: Mapping) -> Self {
        Self::with_items(items)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for InMemoryConfigRepository {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_items(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl ConfigRepository for InMemoryConfigRepository {
    fn lookup(&self, key: &str) -> Option<&Value> {
        resolve(&self.items, key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        match assign(&mut self.items, key, value) {
            Ok(()) => {
                tracing::debug!("[ConfigRepository] Set '{}'", key);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[ConfigRepository] Failed to set '{}': {}", key, e);
                Err(e)
            }
        }
    }

    fn all(&self) -> &Mapping {
        &self.items
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.items.shift_remove(key);
        if removed.is_some() {
            tracing::debug!("[ConfigRepository] Removed '{}'", key);
        }
        removed
    }
}

/// 解析键路径
///
/// 完整的键作为顶层键存在时直接返回，优先于按点拆分
fn resolve<'a>(items: &'a Mapping, key: &str) -> Option<&'a Value> {
    if let Some(value) = items.get(key) {
        return Some(value);
    }
    if !is_nested(key) {
        return None;
    }

    let mut parts = segments(key);
    let mut current = items.get(parts.next()?)?;
    for segment in parts {
        current = match current {
            Value::Mapping(map) => map.get(segment)?,
            Value::Sequence(seq) => seq.get(index_segment(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// 按键路径赋值
///
/// 失败时不修改存储：冲突只可能出现在已有的值上，
/// 而新建的中间映射之后不会再有已有的值
fn assign(items: &mut Mapping, key: &str, value: Value) -> Result<(), ConfigError> {
    let mut parts = segments(key);
    let first = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let Some((last, middle)) = rest.split_last() else {
        items.insert(key.to_string(), value);
        return Ok(());
    };

    let mut current = items
        .entry(first.to_string())
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    let mut depth = first.len();

    for segment in middle {
        current = slot(current, key, depth, segment, Value::Mapping(Mapping::new()))?;
        depth += SEPARATOR.len_utf8() + segment.len();
    }

    *slot(current, key, depth, last, Value::Null)? = value;
    Ok(())
}

/// 定位容器中某一段的槽位，缺失时填入 `vacant`
///
/// `depth` 是容器自身路径在 `key` 中的长度
fn slot<'a>(
    container: &'a mut Value,
    key: &str,
    depth: usize,
    segment: &str,
    vacant: Value,
) -> Result<&'a mut Value, ConfigError> {
    let conflict = |found: &'static str| ConfigError::PathConflict {
        key: key.to_string(),
        at: key[..depth].to_string(),
        found,
    };

    match container {
        Value::Mapping(map) => Ok(map.entry(segment.to_string()).or_insert(vacant)),
        Value::Sequence(seq) => {
            let index = index_segment(segment).ok_or_else(|| conflict("sequence"))?;
            let len = seq.len();
            if index == len {
                seq.push(vacant);
            }
            seq.get_mut(index).ok_or(ConfigError::IndexOutOfBounds {
                key: key.to_string(),
                index,
                len,
            })
        }
        other => Err(conflict(other.type_name())),
    }
}
