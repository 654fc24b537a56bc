//! 根目录下可选的 `server.toml`
//!
//! ```toml
//! [paths]
//! env_file = "docker/.env"
//! compose_file = "docker/compose/main.yaml"
//!
//! [containers]
//! tools = "SERVER_TOOLS"
//! ```
//!
//! 相对路径均以根目录为基准，未给出的字段沿用默认布局。

use crate::error::{Result, ServerError};
use crate::types::ServerPaths;
use crate::utils::paths::read_optional;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub containers: ContainerSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    pub env_file: Option<PathBuf>,
    pub compose_file: Option<PathBuf>,
    pub utilities_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSettings {
    pub tools: Option<String>,
}

impl Settings {
    /// 解析 TOML 文本
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ServerError::Config(format!("{} 格式错误: {}", SETTINGS_FILE, e)))
    }

    /// 从根目录加载，文件不存在时返回默认值
    pub fn load(root: &Path) -> Result<Self> {
        match read_optional(&root.join(SETTINGS_FILE))? {
            Some(content) => Self::parse(&content),
            None => Ok(Self::default()),
        }
    }

    /// 把配置叠加到默认布局上
    pub fn resolve(&self, root: &Path) -> ServerPaths {
        let mut paths = ServerPaths::from_root(root);
        let under_root = |p: &PathBuf| root.join(p);

        if let Some(p) = &self.paths.env_file {
            paths.env_file = under_root(p);
        }
        if let Some(p) = &self.paths.compose_file {
            paths.compose_file = under_root(p);
        }
        if let Some(p) = &self.paths.utilities_dir {
            paths.utilities_dir = under_root(p);
        }
        if let Some(p) = &self.paths.bin_dir {
            paths.bin_dir = under_root(p);
        }
        if let Some(p) = &self.paths.config_dir {
            paths.config_dir = under_root(p);
        }
        if let Some(tools) = &self.containers.tools {
            paths.tools_container = tools.clone();
        }
        paths
    }
}

/// 确定根目录：显式参数（含 SERVER_ROOT）优先，否则为可执行文件所在目录
pub fn resolve_root(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(crate::utils::paths::exe_dir)
}

/// 加载完整的路径配置
pub fn load_paths(explicit_root: Option<PathBuf>) -> Result<ServerPaths> {
    let root = resolve_root(explicit_root);
    let settings = Settings::load(&root)?;
    tracing::debug!(root = %root.display(), "已加载配置");
    Ok(settings.resolve(&root))
}
