// Config Domain Layer
//
// 领域层定义配置值、键路径和领域事件

pub mod events;
pub mod key;
pub mod value;

pub use events::*;
pub use key::{BulkKeys, Query};
pub use value::*;
