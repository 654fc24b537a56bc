//! 日志初始化
//!
//! 日志统一写到 stderr，不干扰命令输出。`RUST_LOG` 优先，
//! 否则 `--verbose` 为 debug，默认只输出 warn 以上。

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "server_cli=debug" } else { "warn" }
}

/// 初始化日志（重复调用无副作用）
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
