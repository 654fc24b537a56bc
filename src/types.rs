//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)

use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 激活 profile 所在的键
pub const PROFILES_KEY: &str = "COMPOSE_PROFILES";

/// 运行期配置 (支持详细/安静模式切换)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub verbose: bool,
}

/// 服务器根目录下各个路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerPaths {
    /// 根目录 (compose 的 project directory)
    pub root: PathBuf,
    /// docker/.env
    pub env_file: PathBuf,
    /// docker/compose/main.yaml
    pub compose_file: PathBuf,
    /// docker/utilities
    pub utilities_dir: PathBuf,
    /// bin/ 透传脚本目录
    pub bin_dir: PathBuf,
    /// configuration/ (nginx/apache/rootCA)
    pub config_dir: PathBuf,
    /// 工具容器名
    pub tools_container: String,
}

impl ServerPaths {
    /// 按默认布局从根目录推导
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let docker = root.join("docker");
        Self {
            env_file: docker.join(".env"),
            compose_file: docker.join("compose").join("main.yaml"),
            utilities_dir: docker.join("utilities"),
            bin_dir: root.join("bin"),
            config_dir: root.join("configuration"),
            tools_container: "SERVER_TOOLS".to_string(),
            root,
        }
    }

    pub fn nginx_dir(&self) -> PathBuf {
        self.config_dir.join("nginx")
    }

    pub fn apache_dir(&self) -> PathBuf {
        self.config_dir.join("apache")
    }

    pub fn root_ca(&self) -> PathBuf {
        self.config_dir.join("rootCA").join("rootCA.pem")
    }
}

/// profile 集合的修改动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    Add,
    Remove,
}

impl ProfileAction {
    /// 从字符串转换，只接受 add/remove
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(ProfileAction::Add),
            "remove" => Ok(ProfileAction::Remove),
            other => Err(ServerError::InvalidArgument(format!(
                "不支持的 profile 操作: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProfileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileAction::Add => write!(f, "add"),
            ProfileAction::Remove => write!(f, "remove"),
        }
    }
}

/// 路由事实：处理某个虚拟主机 PHP 请求的容器及其文档根目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFact {
    pub container_name: String,
    pub document_root: String,
}

/// env 文件中的一条有效赋值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Env,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}
