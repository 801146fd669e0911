// Config Keys
//
// 点分隔键路径与批量查询键定义

use super::value::{Mapping, Value};

/// 键路径分隔符
pub const SEPARATOR: char = '.';

/// 按分隔符拆分键路径
pub fn segments(key: &str) -> std::str::Split<'_, char> {
    key.split(SEPARATOR)
}

pub fn is_nested(key: &str) -> bool {
    key.contains(SEPARATOR)
}

/// 将路径段解析为序列下标
///
/// 只接受规范的十进制形式：`"0"`、`"12"` 可以，`"01"`、`"+1"` 不行
pub fn index_segment(segment: &str) -> Option<usize> {
    let index: usize = segment.parse().ok()?;
    (index.to_string() == segment).then_some(index)
}

/// 批量查询键
///
/// 每个键带有自己的默认值；裸键的默认值为 `Null`。
/// 重复的键保留首次出现的位置，默认值取最后一次
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkKeys {
    entries: Mapping,
}

impl BulkKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加裸键（默认值为 Null）
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), Value::Null);
        self
    }

    /// 添加带默认值的键
    pub fn with_default(mut self, key: impl Into<String>, default: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), default.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, default)| (key.as_str(), default))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> From<[&str; N]> for BulkKeys {
    fn from(keys: [&str; N]) -> Self {
        keys.into_iter().fold(Self::new(), |bulk, key| bulk.key(key))
    }
}

impl From<&[&str]> for BulkKeys {
    fn from(keys: &[&str]) -> Self {
        keys.iter().copied().fold(Self::new(), |bulk, key| bulk.key(key))
    }
}

impl From<Vec<&str>> for BulkKeys {
    fn from(keys: Vec<&str>) -> Self {
        keys.into_iter().fold(Self::new(), |bulk, key| bulk.key(key))
    }
}

impl From<Vec<String>> for BulkKeys {
    fn from(keys: Vec<String>) -> Self {
        keys.into_iter().fold(Self::new(), |bulk, key| bulk.key(key))
    }
}

/// 映射形式：键 => 默认值
impl From<Mapping> for BulkKeys {
    fn from(entries: Mapping) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BulkKeys {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |bulk, (key, default)| bulk.with_default(key, default))
    }
}

/// 取值请求：单个键或一组键
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Key(String),
    Many(BulkKeys),
}

impl From<&str> for Query {
    fn from(key: &str) -> Self {
        Query::Key(key.to_string())
    }
}

impl From<String> for Query {
    fn from(key: String) -> Self {
        Query::Key(key)
    }
}

impl From<&String> for Query {
    fn from(key: &String) -> Self {
        Query::Key(key.clone())
    }
}

impl From<BulkKeys> for Query {
    fn from(keys: BulkKeys) -> Self {
        Query::Many(keys)
    }
}

/// 映射形式：键 => 默认值
impl From<Mapping> for Query {
    fn from(defaults: Mapping) -> Self {
        Query::Many(defaults.into())
    }
}

impl<const N: usize> From<[&str; N]> for Query {
    fn from(keys: [&str; N]) -> Self {
        Query::Many(keys.into())
    }
}

impl From<&[&str]> for Query {
    fn from(keys: &[&str]) -> Self {
        Query::Many(keys.into())
    }
}

impl From<Vec<&str>> for Query {
    fn from(keys: Vec<&str>) -> Self {
        Query::Many(keys.into())
    }
}

impl From<Vec<String>> for Query {
    fn from(keys: Vec<String>) -> Self {
        Query::Many(keys.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_segment() {
        assert_eq!(index_segment("0"), Some(0));
        assert_eq!(index_segment("12"), Some(12));
        assert_eq!(index_segment("01"), None);
        assert_eq!(index_segment("+1"), None);
        assert_eq!(index_segment("-1"), None);
        assert_eq!(index_segment("x"), None);
        assert_eq!(index_segment(""), None);
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("a.b.c").collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(segments("plain").collect::<Vec<_>>(), vec!["plain"]);
        assert!(is_nested("x.z"));
        assert!(!is_nested("x"));
    }

    #[test]
    fn test_bulk_keys_mixed_defaults() {
        let keys = BulkKeys::new()
            .with_default("x.y", "default")
            .key("baz");

        let entries: Vec<(&str, &Value)> = keys.iter().collect();
        assert_eq!(
            entries,
            vec![("x.y", &Value::from("default")), ("baz", &Value::Null)]
        );
    }

    #[test]
    fn test_bulk_keys_duplicate_keeps_position() {
        let keys = BulkKeys::new()
            .key("a")
            .key("b")
            .with_default("a", 1);

        let entries: Vec<(&str, &Value)> = keys.iter().collect();
        assert_eq!(entries, vec![("a", &Value::from(1)), ("b", &Value::Null)]);
    }

    #[test]
    fn test_query_from() {
        assert_eq!(Query::from("foo"), Query::Key("foo".to_string()));
        let owned = "x.z".to_string();
        assert_eq!(Query::from(&owned), Query::Key("x.z".to_string()));
        assert_eq!(
            Query::from(["foo", "bar"]),
            Query::Many(BulkKeys::new().key("foo").key("bar"))
        );
    }

    #[test]
    fn test_query_from_mapping_of_defaults() {
        let mut defaults = Mapping::new();
        defaults.insert("x.y".to_string(), Value::from("default"));
        defaults.insert("foo".to_string(), Value::Null);

        assert_eq!(
            Query::from(defaults),
            Query::Many(BulkKeys::new().with_default("x.y", "default").key("foo"))
        );
    }
}
