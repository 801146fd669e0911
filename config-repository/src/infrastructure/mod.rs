// Config Infrastructure Layer
//
// 配置模块的基础设施实现

pub mod memory_repository;

pub use memory_repository::*;
