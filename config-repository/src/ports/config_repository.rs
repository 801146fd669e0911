// Config Repository Port
//
// 配置仓储端口定义

use super::ConfigError;
use crate::domain::{BulkKeys, Mapping, Value};

/// 配置仓储端口
///
/// 实现者只需提供 `lookup`、`set`、`all` 和 `remove`，
/// 其余操作都建立在这四个之上
pub trait ConfigRepository: Send + Sync {
    /// 解析点分隔路径，返回对应的值
    fn lookup(&self, key: &str) -> Option<&Value>;

    /// 按点分隔路径设置值，缺失的中间层会创建为空映射
    fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError>;

    /// 全部顶层配置
    fn all(&self) -> &Mapping;

    /// 删除顶层键
    fn remove(&mut self, key: &str) -> Option<Value>;

    fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn get_or(&self, key: &str, default: Value) -> Value {
        self.lookup(key).cloned().unwrap_or(default)
    }

    /// 批量获取，结果保持传入键的顺序
    fn get_many(&self, keys: &BulkKeys) -> Mapping {
        keys.iter()
            .map(|(key, default)| (key.to_string(), self.get_or(key, default.clone())))
            .collect()
    }

    /// 按映射的迭代顺序逐项设置
    ///
    /// 出错时停止，已设置的条目保留
    fn set_many(&mut self, values: Mapping) -> Result<(), ConfigError> {
        for (key, value) in values {
            self.set(&key, value)?;
        }
        Ok(())
    }

    fn prepend(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut items = current_sequence(self, key)?;
        items.insert(0, value);
        self.set(key, Value::Sequence(items))
    }

    fn push(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut items = current_sequence(self, key)?;
        items.push(value);
        self.set(key, Value::Sequence(items))
    }

    // 数组下标风格的访问，与具名方法语义一致

    fn offset_exists(&self, key: &str) -> bool {
        self.has(key)
    }

    fn offset_get(&self, key: &str) -> Value {
        self.get_or(key, Value::Null)
    }

    fn offset_set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.set(key, value)
    }

    fn offset_unset(&mut self, key: &str) {
        self.remove(key);
    }
}

/// 读取键当前的序列值，缺失视为空序列
fn current_sequence<R>(repository: &R, key: &str) -> Result<Vec<Value>, ConfigError>
where
    R: ConfigRepository + ?Sized,
{
    match repository.lookup(key) {
        None => Ok(Vec::new()),
        Some(Value::Sequence(items)) => Ok(items.clone()),
        Some(other) => {
            tracing::warn!(
                "[ConfigRepository] Rejecting sequence update on '{}': found {}",
                key,
                other.type_name()
            );
            Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: "sequence",
                found: other.type_name(),
            })
        }
    }
}
