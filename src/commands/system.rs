//! 需要 root 权限的系统操作：权限修复与根证书安装

use super::CommandContext;
use crate::error::{Result, ServerError};
use crate::utils::executor::Invocation;
use crate::utils::paths::file_exists;
use std::path::Path;

/// 系统 CA 目录中的目标文件
pub const CA_DESTINATION: &str = "/usr/local/share/ca-certificates/rootCA.crt";

/// 当前是否为 root（通过 `id -u` 判断）
fn is_root(ctx: &CommandContext) -> bool {
    ctx.runner
        .capture(&Invocation::new("id", ["-u"]))
        .map(|uid| uid.trim() == "0")
        .unwrap_or(false)
}

fn quote(path: &Path) -> String {
    format!("'{}'", path.display())
}

/// 按目录约定修复文件与目录权限
pub fn fix_permissions(ctx: &CommandContext) -> Result<i32> {
    if cfg!(windows) {
        println!("Windows 上跳过权限修复。");
        return Ok(0);
    }
    if !is_root(ctx) {
        return Err(ServerError::PermissionDenied("请使用 sudo 运行".to_string()));
    }

    let root = &ctx.paths.root;
    let configuration = quote(&ctx.paths.config_dir);
    let docker = quote(&root.join("docker"));
    let data = quote(&root.join("data"));
    let logs = quote(&root.join("logs"));
    let bin = quote(&ctx.paths.bin_dir);
    let server = quote(&root.join("server"));
    let owner = ctx.vars.var("SUDO_USER").unwrap_or_else(|| "root".to_string());

    let commands = [
        format!("chmod 755 {}", quote(root)),
        format!("chmod 2775 {}", configuration),
        format!("find {} -type f ! -perm 664 -exec chmod 664 {{}} +", configuration),
        format!("chmod 755 {}", docker),
        format!("find {} -type f ! -perm 644 -exec chmod 644 {{}} +", docker),
        format!("chmod 2777 {}", data),
        format!("find {} -mindepth 1 -maxdepth 1 -type d -exec chmod 2777 {{}} +", data),
        format!("find {} -type f -exec chmod 666 {{}} +", data),
        format!("chmod -R 777 {}", logs),
        format!("chown -R '{}:docker' {} || true", owner, logs),
        format!("chmod 755 {}", bin),
        format!("find {} -type f ! -name '*.bat' -exec chmod 744 {{}} +", bin),
        format!("chmod 744 {} 2>/dev/null || true", server),
        format!("ln -fs {} /usr/local/bin/server", server),
    ];

    for command in &commands {
        let rc = ctx
            .runner
            .run(&Invocation::shell(format!("{} >/dev/null 2>&1", command)))?;
        if rc != 0 {
            tracing::debug!(rc, command = %command, "权限命令返回非零");
        }
    }

    println!("权限已设置。");
    Ok(0)
}

/// 把 configuration/rootCA/rootCA.pem 安装到系统信任库
pub fn install_certificate(ctx: &CommandContext) -> Result<i32> {
    let source = ctx.paths.root_ca();

    if cfg!(windows) {
        eprintln!(
            "Windows 上不支持自动安装根证书，请手动导入 {}",
            source.display()
        );
        return Ok(if source.exists() { 0 } else { 1 });
    }
    if !is_root(ctx) {
        return Err(ServerError::PermissionDenied(
            "install certificate 需要 sudo".to_string(),
        ));
    }
    if !file_exists(&source) {
        return Err(ServerError::FileNotFound(source));
    }

    std::fs::copy(&source, CA_DESTINATION)?;
    ctx.runner
        .run(&Invocation::new("update-ca-certificates", Vec::<String>::new()))?;
    ctx.runner
        .run(&Invocation::shell("trust extract-compat >/dev/null 2>&1 || true"))?;

    println!("根证书已安装 → {}", CA_DESTINATION);
    Ok(0)
}
