//! 虚拟主机路由发现
//!
//! 从 nginx（必需）与 apache（补缺）的站点配置中找出处理 PHP 的容器
//! 以及站点文档根目录。每种方言的抽取规则是一张声明式的表。

use crate::error::{Result, ServerError};
use crate::types::{RouteFact, ServerPaths};
use crate::utils::paths::read_optional;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// 没有 root 指令时的默认文档根目录
pub const DEFAULT_DOCUMENT_ROOT: &str = "/app";

/// 文档根目录末尾会被去掉的目录名
pub const PUBLIC_ALIASES: [&str; 3] = ["public", "dist", "public_html"];

/// 一种配置方言的抽取规则
#[derive(Debug, Clone)]
pub struct DialectRules {
    pub name: &'static str,
    pub dir: PathBuf,
    /// 捕获组 1 为容器名
    pub forward: &'static Regex,
    /// 捕获组 1 为文档根目录
    pub root: &'static Regex,
}

fn nginx_forward() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"fastcgi_pass ([^:]+):9000").expect("静态正则"))
}

fn nginx_root() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"root ([^;]+)").expect("静态正则"))
}

fn apache_forward() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"proxy:fcgi://([^:]+):9000").expect("静态正则"))
}

fn apache_root() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"DocumentRoot ([^ ]+)").expect("静态正则"))
}

impl DialectRules {
    /// 方言 A：nginx
    pub fn nginx(dir: PathBuf) -> Self {
        Self {
            name: "nginx",
            dir,
            forward: nginx_forward(),
            root: nginx_root(),
        }
    }

    /// 方言 B：apache
    pub fn apache(dir: PathBuf) -> Self {
        Self {
            name: "apache",
            dir,
            forward: apache_forward(),
            root: apache_root(),
        }
    }

    pub fn config_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.conf", domain))
    }

    /// 读取某个域名的配置；不存在时返回 None
    fn load(&self, domain: &str) -> Result<Option<String>> {
        read_optional(&self.config_path(domain))
    }

    /// 逐行抽取，每个字段只取第一次匹配，已有值的字段不覆盖
    fn fill(&self, text: &str, container: &mut Option<String>, root: &mut Option<String>) {
        for line in text.lines() {
            if container.is_none() {
                *container = first_capture(self.forward, line);
            }
            if root.is_none() {
                *root = first_capture(self.root, line);
            }
        }
    }
}

fn first_capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 路由发现：主方言必须存在，副方言只用来补缺
#[derive(Debug, Clone)]
pub struct RouteDiscovery {
    primary: DialectRules,
    fallback: DialectRules,
}

impl RouteDiscovery {
    pub fn new(primary: DialectRules, fallback: DialectRules) -> Self {
        Self { primary, fallback }
    }

    pub fn from_paths(paths: &ServerPaths) -> Self {
        Self::new(
            DialectRules::nginx(paths.nginx_dir()),
            DialectRules::apache(paths.apache_dir()),
        )
    }

    /// 解析域名对应的路由事实（每次都重新读取配置文件）
    pub fn resolve(&self, domain: &str) -> Result<RouteFact> {
        validate_domain(domain)?;

        let primary = self.primary.load(domain)?.ok_or_else(|| {
            ServerError::NotFound(format!("{} 没有 {} 配置", domain, self.primary.name))
        })?;

        let mut container = None;
        let mut root = None;
        self.primary.fill(&primary, &mut container, &mut root);

        if container.is_none()
            && let Some(fallback) = self.fallback.load(domain)?
        {
            tracing::debug!(domain, dialect = self.fallback.name, "主配置缺少容器，尝试补缺");
            self.fallback.fill(&fallback, &mut container, &mut root);
        }

        let container_name = container.ok_or_else(|| {
            ServerError::NotFound(format!("无法检测 {} 的 PHP 容器", domain))
        })?;
        let document_root =
            normalize_document_root(root.as_deref().unwrap_or(DEFAULT_DOCUMENT_ROOT));

        tracing::debug!(domain, container = %container_name, root = %document_root, "已检测路由");
        Ok(RouteFact {
            container_name,
            document_root,
        })
    }
}

/// 去掉末尾一个 `public`/`dist`/`public_html` 目录（只处理一次）
///
/// 别名前必须有 `/` 且之前还有内容，所以 `/public` 原样保留。
pub fn normalize_document_root(root: &str) -> String {
    for alias in PUBLIC_ALIASES {
        if root.len() > alias.len() + 1
            && let Some(head) = root.strip_suffix(alias)
            && let Some(stripped) = head.strip_suffix('/')
        {
            return stripped.to_string();
        }
    }
    root.to_string()
}

/// 域名直接拼进文件路径，不允许路径分隔符与上级目录
fn validate_domain(domain: &str) -> Result<()> {
    let bad = domain.is_empty()
        || domain.contains('/')
        || domain.contains('\\')
        || domain.contains("..")
        || Path::new(domain).is_absolute();
    if bad {
        return Err(ServerError::InvalidArgument(format!("无效的域名: '{}'", domain)));
    }
    Ok(())
}
