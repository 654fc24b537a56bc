//! 服务栈生命周期：up/start/stop/restart/rebuild/config 与 HTTP 重载

use super::CommandContext;
use crate::error::Result;
use crate::utils::executor::Invocation;

/// 前台启动
pub fn up(ctx: &CommandContext) -> Result<i32> {
    ctx.run_compose(&["up"], &[])
}

/// 后台启动
pub fn start(ctx: &CommandContext) -> Result<i32> {
    ctx.run_compose(&["up", "-d"], &[])
}

pub fn stop(ctx: &CommandContext) -> Result<i32> {
    ctx.run_compose(&["down"], &[])
}

/// down → up -d → HTTP 重载，任一步非零即停止
pub fn restart(ctx: &CommandContext) -> Result<i32> {
    let rc = stop(ctx)?;
    if rc != 0 {
        return Ok(rc);
    }
    let rc = start(ctx)?;
    if rc != 0 {
        return Ok(rc);
    }
    http_reload(ctx)
}

pub fn rebuild(ctx: &CommandContext, services: &[String]) -> Result<i32> {
    ctx.run_compose(&["build", "--no-cache", "--pull"], services)
}

pub fn config(ctx: &CommandContext) -> Result<i32> {
    ctx.run_compose(&["config"], &[])
}

/// 只重载正在运行的 Nginx/Apache 容器，结果总是成功
pub fn http_reload(ctx: &CommandContext) -> Result<i32> {
    println!("正在重载 HTTP…");

    let scripts = [
        "docker ps -qf name=NGINX >/dev/null 2>&1 && docker exec NGINX nginx -s reload || true",
        "docker ps -qf name=APACHE >/dev/null 2>&1 && docker exec APACHE apachectl graceful || true",
    ];
    for script in scripts {
        let rc = ctx.runner.run(&Invocation::shell(script))?;
        if rc != 0 {
            tracing::warn!(rc, script, "HTTP 重载命令返回非零");
        }
    }

    println!("HTTP 已重载");
    Ok(0)
}
