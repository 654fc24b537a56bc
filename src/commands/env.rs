//! docker/.env 相关命令

use super::CommandContext;
use crate::error::{Result, ServerError};
use crate::types::OutputFormat;
use crate::utils::executor::Invocation;
use std::io::{BufRead, Write};

/// 交互式询问，空输入取默认值
pub trait Prompter {
    fn ask(&self, question: &str, default: &str) -> Result<String>;
}

/// 从标准输入读取回答
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&self, question: &str, default: &str) -> Result<String> {
        print!("{} [默认: {}]: ", question, default);
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let answer = line.trim();

        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }
}

/// 环境变量查询 (USER/TZ/EDITOR/SUDO_USER 等默认值来源)
pub trait VarSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// 读取当前进程的环境变量
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessVars;

impl VarSource for ProcessVars {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// 询问 TZ/USER/UID/GID 并写入 docker/.env
pub fn init(ctx: &CommandContext) -> Result<i32> {
    println!("正在初始化环境默认值…");

    let tz = ctx.prompter.ask("时区 (TZ)", &detect_timezone(ctx))?;
    let user_default = ctx.vars.var("USER").unwrap_or_else(|| "user".to_string());
    let user = ctx.prompter.ask("用户", &user_default)?;
    let uid = ctx.prompter.ask("用户 UID", &id_of(ctx, "-u"))?;
    let gid = ctx.prompter.ask("用户 GID", &id_of(ctx, "-g"))?;

    let store = ctx.store();
    for (key, value) in [("TZ", &tz), ("USER", &user), ("UID", &uid), ("GID", &gid)] {
        store.upsert(key, value)?;
    }

    println!("默认值已保存!");
    Ok(0)
}

/// 用 $EDITOR（默认 nano）打开 env 文件
pub fn edit(ctx: &CommandContext) -> Result<i32> {
    if cfg!(windows) {
        return Err(ServerError::InvalidArgument(
            "Windows 上不支持 `env edit`".to_string(),
        ));
    }

    let editor = ctx
        .vars
        .var("EDITOR")
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "nano".to_string());

    let mut parts = editor.split_whitespace().map(str::to_string);
    let program = parts.next().unwrap_or_else(|| "nano".to_string());
    let mut args: Vec<String> = parts.collect();
    args.push(ctx.paths.env_file.display().to_string());

    ctx.runner.run(&Invocation::new(program, args))
}

pub fn get(ctx: &CommandContext, key: &str) -> Result<i32> {
    match ctx.store().read(key)? {
        Some(value) => {
            println!("{}", value);
            Ok(0)
        }
        None => Err(ServerError::NotFound(key.to_string())),
    }
}

pub fn set(ctx: &CommandContext, key: &str, value: &str) -> Result<i32> {
    ctx.store().upsert(key, value)?;
    if ctx.verbose {
        println!("✓ 已设置变量 {} = {}", key, value);
    }
    Ok(0)
}

pub fn list(ctx: &CommandContext, format: OutputFormat) -> Result<i32> {
    let entries = ctx.store().entries()?;
    match format {
        OutputFormat::Env => {
            for entry in &entries {
                println!("{}={}", entry.key, entry.value);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(0)
}

/// 本机时区：timedatectl → $TZ → /etc/timezone → UTC
pub fn detect_timezone(ctx: &CommandContext) -> String {
    if cfg!(windows) {
        return "UTC".to_string();
    }

    let has_timedatectl = ctx
        .runner
        .run(&Invocation::shell("timedatectl >/dev/null 2>&1"))
        .map(|rc| rc == 0)
        .unwrap_or(false);
    if has_timedatectl
        && let Ok(tz) = ctx.runner.capture(&Invocation::new(
            "timedatectl",
            ["show", "-p", "Timezone", "--value"],
        ))
        && !tz.trim().is_empty()
    {
        return tz.trim().to_string();
    }

    if let Some(tz) = ctx.vars.var("TZ")
        && !tz.is_empty()
    {
        return tz;
    }

    if let Ok(content) = std::fs::read_to_string("/etc/timezone")
        && let Some(first) = content.lines().next()
        && !first.trim().is_empty()
    {
        return first.trim().to_string();
    }

    "UTC".to_string()
}

/// `id -u` / `id -g`，取不到时为 0
fn id_of(ctx: &CommandContext, flag: &str) -> String {
    if cfg!(windows) {
        return "0".to_string();
    }
    ctx.runner
        .capture(&Invocation::new("id", [flag]))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Action;
    use crate::test_utils::ServerFixture;

    #[test]
    fn test_set_then_get() {
        let fx = ServerFixture::new();
        fx.dispatch(Action::EnvSet {
            key: "TZ".into(),
            value: "UTC".into(),
        })
        .unwrap();

        assert_eq!(fx.store().read("TZ").unwrap(), Some("UTC".into()));
        assert_eq!(fx.dispatch(Action::EnvGet { key: "TZ".into() }).unwrap(), 0);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let fx = ServerFixture::new();
        let err = fx.dispatch(Action::EnvGet { key: "TZ".into() }).unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
    }

    #[test]
    fn test_init_writes_answers() {
        let fx = ServerFixture::new().with_answers(&["Europe/Oslo", "dev", "1001", "1002"]);
        fx.write_env("# stack\nTZ=UTC\nCOMPOSE_PROFILES=php83\n");

        assert_eq!(fx.dispatch(Action::EnvInit).unwrap(), 0);

        assert_eq!(
            fx.read_env(),
            "# stack\nTZ=Europe/Oslo\nCOMPOSE_PROFILES=php83\nUSER=dev\nUID=1001\nGID=1002\n"
        );
    }

    #[test]
    fn test_init_defaults_come_from_environment() {
        let fx = ServerFixture::new().with_vars(&[("USER", "alice"), ("TZ", "Asia/Tokyo")]);
        fx.runner.exit_with("timedatectl", 1);
        fx.runner.output("id -u", "501");
        fx.runner.output("id -g", "20");

        fx.dispatch(Action::EnvInit).unwrap();

        let store = fx.store();
        assert_eq!(store.read("TZ").unwrap(), Some("Asia/Tokyo".into()));
        assert_eq!(store.read("USER").unwrap(), Some("alice".into()));
        assert_eq!(store.read("UID").unwrap(), Some("501".into()));
        assert_eq!(store.read("GID").unwrap(), Some("20".into()));
    }

    #[test]
    fn test_timezone_prefers_timedatectl() {
        let fx = ServerFixture::new();
        fx.runner.output("timedatectl show", "America/Chicago");
        assert_eq!(detect_timezone(&fx.ctx()), "America/Chicago");
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_uses_editor_variable() {
        let fx = ServerFixture::new().with_vars(&[("EDITOR", "vim -n")]);
        fx.dispatch(Action::EnvEdit).unwrap();

        let calls = fx.runner.calls();
        assert_eq!(calls[0].program, "vim");
        assert_eq!(
            calls[0].args,
            vec!["-n".to_string(), fx.paths.env_file.display().to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_defaults_to_nano() {
        let fx = ServerFixture::new().with_vars(&[("EDITOR", "  ")]);
        fx.dispatch(Action::EnvEdit).unwrap();

        assert_eq!(fx.runner.calls()[0].program, "nano");
    }
}
