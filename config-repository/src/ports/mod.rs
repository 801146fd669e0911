// Config Ports Layer
//
// 定义配置模块的端口（接口）

pub mod config_port;
pub mod config_repository;

pub use config_port::*;
pub use config_repository::*;
