// Config Repository
//
// 内存配置仓储，支持点分隔键路径访问
//
// 层次结构:
// - domain: 领域层，包含配置值、键路径和领域事件
// - ports: 端口层，定义仓储契约和服务接口
// - infrastructure: 基础设施层，内存仓储实现
// - application: 应用层，可跨任务共享的配置服务

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{
    BulkKeys, Callback, ChangeKind, ConfigChangedEvent, Mapping, Opaque, Query, Value,
};

// Ports
pub use ports::{ConfigError, ConfigPort, ConfigRepository};

// Infrastructure
pub use infrastructure::InMemoryConfigRepository;

// Application
pub use application::ConfigService;

use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 过滤规则取自 `RUST_LOG`，未设置时为 `info`。重复调用无副作用
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    service: ConfigService,
}

impl ConfigModule {
    /// 使用空的内存仓储创建
    pub fn new_in_memory() -> Self {
        Self::with_repository(InMemoryConfigRepository::new())
    }

    /// 使用初始配置创建
    pub fn with_items(items: Mapping) -> Self {
        Self::with_repository(InMemoryConfigRepository::with_items(items))
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: impl ConfigRepository + 'static) -> Self {
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 获取配置服务
    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    /// 获取单个配置值
    pub async fn get(&self, key: &str) -> Value {
        self.service.get(key).await
    }

    /// 设置单个配置值
    pub async fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.service.set(key, value.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_config_module_integration() {
        init_tracing();
        let module = ConfigModule::new_in_memory();

        // 空仓储
        assert!(module.service().all().await.is_empty());

        module.set("general.theme", "dark").await.unwrap();
        module.set("general.auto_start", true).await.unwrap();

        assert_eq!(module.get("general.theme").await, Value::from("dark"));
        assert_eq!(
            module.get("general").await,
            Value::from(json!({ "theme": "dark", "auto_start": true }))
        );
    }

    #[tokio::test]
    async fn test_config_module_with_items() {
        let repo = InMemoryConfigRepository::from_json(json!({ "foo": "bar" })).unwrap();
        let module = ConfigModule::with_items(repo.into_inner());

        assert!(module.service().has("foo").await);
        assert_eq!(module.get("foo").await, Value::from("bar"));
    }
}
