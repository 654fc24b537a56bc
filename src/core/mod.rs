//! 配置状态引擎

pub mod compose;
pub mod env_store;
pub mod profiles;
pub mod route;

pub use compose::ComposeCommand;
pub use env_store::EnvStore;
pub use profiles::ProfileSet;
pub use route::RouteDiscovery;
