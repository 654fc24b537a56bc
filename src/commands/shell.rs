//! 进入容器的交互式 shell 与 bin/ 透传脚本

use super::CommandContext;
use crate::error::{Result, ServerError};
use crate::utils::executor::Invocation;
use crate::utils::paths::file_exists;

/// 在站点的 PHP 容器中、站点根目录下打开登录 shell
pub fn core(ctx: &CommandContext, domain: &str) -> Result<i32> {
    let route = ctx.routes().resolve(domain)?;
    tracing::info!(domain, container = %route.container_name, root = %route.document_root, "进入 PHP 容器");

    let script = format!("cd '{}' && exec bash", route.document_root);
    ctx.runner.run(&ctx.docker([
        "exec",
        "-it",
        route.container_name.as_str(),
        "bash",
        "--login",
        "-c",
        script.as_str(),
    ]))
}

pub fn tools(ctx: &CommandContext) -> Result<i32> {
    ctx.runner.run(&ctx.docker([
        "exec",
        "-it",
        ctx.paths.tools_container.as_str(),
        "bash",
    ]))
}

pub fn lazydocker(ctx: &CommandContext) -> Result<i32> {
    ctx.runner.run(&ctx.docker([
        "exec",
        "-it",
        ctx.paths.tools_container.as_str(),
        "lazydocker",
    ]))
}

/// 执行 bin/<script>，参数原样传递
pub fn passthrough(ctx: &CommandContext, script: &str, args: &[String]) -> Result<i32> {
    let path = ctx.paths.bin_dir.join(script);
    if !file_exists(&path) {
        return Err(ServerError::NotFound(format!("脚本不存在: {}", path.display())));
    }
    ctx.runner
        .run(&Invocation::new(path.display().to_string(), args.iter().cloned()))
}
