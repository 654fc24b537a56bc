//! server - 容器化服务栈命令行
//!
//! 配置状态引擎（env 文件、profile 集合、路由发现）在 `core`，
//! 命令表与分发在 `commands`，外部进程统一经过 `utils::executor`。

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use error::{Result, ServerError};
pub use types::{RouteFact, ServerPaths};
