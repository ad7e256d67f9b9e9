//! 应用层装配（util-application）
//!
//! - `container`：按作用域解析服务的依赖注入容器，作用域结束时释放资源；
//! - `persistence`：将存储、工作单元与仓储注册到容器的配置模块；
//! - `error`：应用层错误。
//!
pub mod container;
pub mod error;
pub mod persistence;

pub use container::{Container, Dispose, Lifetime, Module, Scope};
pub use persistence::PersistenceModule;
