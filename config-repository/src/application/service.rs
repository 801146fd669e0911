// Config Service
//
// 配置服务门面，提供可共享的异步 API

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::domain::{BulkKeys, ConfigChangedEvent, Mapping, Value};
use crate::ports::{ConfigError, ConfigPort, ConfigRepository};

/// 事件通道容量
const EVENT_CAPACITY: usize = 100;

/// 配置服务实现
///
/// 用读写锁包装仓储，克隆后共享同一份存储和事件通道
#[derive(Clone)]
pub struct ConfigService {
    repository: Arc<RwLock<Box<dyn ConfigRepository>>>,
    sender: broadcast::Sender<ConfigChangedEvent>,
}

impl ConfigService {
    pub fn new(repository: impl ConfigRepository + 'static) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        tracing::info!(
            "[ConfigService] Created with {} top-level keys",
            repository.all().len()
        );
        Self {
            repository: Arc::new(RwLock::new(Box::new(repository))),
            sender,
        }
    }

    /// 订阅配置变更事件
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChangedEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: ConfigChangedEvent) {
        tracing::debug!(
            "[ConfigService] Publishing {:?} for '{}'",
            event.kind,
            event.key
        );
        // 没有订阅者时发送失败，忽略即可
        let _ = self.sender.send(event);
    }
}

#[async_trait]
impl ConfigPort for ConfigService {
    async fn has(&self, key: &str) -> bool {
        self.repository.read().await.has(key)
    }

    async fn get(&self, key: &str) -> Value {
        self.repository.read().await.get_or(key, Value::Null)
    }

    async fn get_or(&self, key: &str, default: Value) -> Value {
        self.repository.read().await.get_or(key, default)
    }

    async fn get_many(&self, keys: BulkKeys) -> Mapping {
        self.repository.read().await.get_many(&keys)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.repository.write().await.set(key, value.clone())?;
        self.publish(ConfigChangedEvent::set(key, value));
        Ok(())
    }

    async fn set_many(&self, values: Mapping) -> Result<(), ConfigError> {
        let mut repository = self.repository.write().await;
        for (key, value) in values {
            repository.set(&key, value.clone())?;
            self.publish(ConfigChangedEvent::set(key, value));
        }
        Ok(())
    }

    async fn prepend(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut repository = self.repository.write().await;
        repository.prepend(key, value)?;
        let current = repository.get_or(key, Value::Null);
        self.publish(ConfigChangedEvent::set(key, current));
        Ok(())
    }

    async fn push(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut repository = self.repository.write().await;
        repository.push(key, value)?;
        let current = repository.get_or(key, Value::Null);
        self.publish(ConfigChangedEvent::set(key, current));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Option<Value> {
        let removed = self.repository.write().await.remove(key);
        if let Some(previous) = &removed {
            self.publish(ConfigChangedEvent::removed(key, previous.clone()));
        }
        removed
    }

    async fn all(&self) -> Mapping {
        self.repository.read().await.all().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChangeKind;
    use crate::infrastructure::InMemoryConfigRepository;
    use serde_json::json;

    fn service() -> ConfigService {
        let repo = InMemoryConfigRepository::from_json(json!({
            "foo": "bar",
            "array": ["aaa", "zzz"],
            "x": { "z": "zoo" }
        }))
        .unwrap();
        ConfigService::new(repo)
    }

    #[tokio::test]
    async fn test_config_service_get_set() {
        let service = service();

        // 设置值
        service.set("custom.key", "test_value".into()).await.unwrap();

        // 获取值
        assert_eq!(service.get("custom.key").await, Value::from("test_value"));
        assert!(service.has("custom.key").await);
        assert_eq!(
            service.get_or("custom.missing", "default".into()).await,
            Value::from("default")
        );

        // 删除值
        assert!(service.remove("custom").await.is_some());
        assert!(!service.has("custom.key").await);
    }

    #[tokio::test]
    async fn test_config_service_get_many() {
        let service = service();
        let result = service
            .get_many(BulkKeys::new().with_default("x.y", "default").key("x.z"))
            .await;

        assert_eq!(result["x.y"], Value::from("default"));
        assert_eq!(result["x.z"], Value::from("zoo"));
    }

    #[tokio::test]
    async fn test_config_service_publishes_events() {
        let service = service();
        let mut events = service.subscribe();

        service.set("foo", "baz".into()).await.unwrap();
        service.push("array", "xxx".into()).await.unwrap();
        service.remove("x").await;
        // 不存在的键不发布事件
        service.remove("missing").await;

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Set);
        assert_eq!(event.key, "foo");
        assert_eq!(event.value, Value::from("baz"));

        let event = events.recv().await.unwrap();
        assert_eq!(event.key, "array");
        assert_eq!(event.value, Value::from(json!(["aaa", "zzz", "xxx"])));

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Removed);
        assert_eq!(event.value, Value::from(json!({ "z": "zoo" })));

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_config_service_failed_update_publishes_nothing() {
        let service = service();
        let mut events = service.subscribe();

        let err = service.prepend("foo", "xxx".into()).await.unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
        assert!(service.set("foo.bar", 1.into()).await.is_err());

        assert!(events.try_recv().is_err());
        assert_eq!(service.get("foo").await, Value::from("bar"));
    }

    #[tokio::test]
    async fn test_config_service_shared_between_tasks() {
        let service = service();
        let writer = service.clone();

        let handle = tokio::spawn(async move {
            for i in 0..10 {
                writer.push("counter", i.into()).await.unwrap();
            }
        });
        handle.await.unwrap();

        let all = service.all().await;
        assert_eq!(all["counter"].as_sequence().unwrap().len(), 10);
        assert_eq!(service.get("counter.9").await, Value::from(9));
    }
}
