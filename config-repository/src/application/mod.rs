// Config Application Layer
//
// 应用层：对外提供可共享的配置服务

pub mod service;

pub use service::*;
