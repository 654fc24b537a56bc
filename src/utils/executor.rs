//! 外部进程执行器
//!
//! 所有对 docker、shell、编辑器等外部工具的调用都经过 [`ProcessRunner`]，
//! 命令层只负责构造 [`Invocation`]。子进程继承父进程的 stdin/stdout/stderr。

use crate::error::{Result, ServerError};
use std::fmt;
use std::process::{Command, Stdio};

/// 一次外部命令调用：程序名 + 参数，不经过 shell 拼接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 通过 `sh -c` 执行一段脚本（需要管道、`||` 等 shell 语法时使用）
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("sh", ["-c".to_string(), script.into()])
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// 外部进程执行接口
pub trait ProcessRunner {
    /// 执行并等待，返回退出码
    fn run(&self, invocation: &Invocation) -> Result<i32>;

    /// 执行并捕获标准输出（去掉换行）
    fn capture(&self, invocation: &Invocation) -> Result<String>;
}

/// 真正启动子进程的实现
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd
    }

    fn not_found(invocation: &Invocation, e: std::io::Error) -> ServerError {
        ServerError::CommandNotFound(format!(
            "{}: {} (请确保命令在 PATH 中或使用完整路径)",
            invocation.program, e
        ))
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        tracing::debug!(command = %invocation, "执行外部命令");

        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Self::not_found(invocation, e))?;

        // 被信号终止时没有退出码
        Ok(status.code().unwrap_or(1))
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        tracing::debug!(command = %invocation, "捕获外部命令输出");

        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Self::not_found(invocation, e))?;

        if !output.status.success() {
            return Err(ServerError::CommandExecutionFailed(format!(
                "{} 退出码 {}",
                invocation,
                output.status.code().unwrap_or(1)
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.replace(['\n', '\r'], ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let inv = Invocation::new("docker", ["exec", "-c", "cd '/app' && exec bash"]);
        assert_eq!(inv.to_string(), "docker exec -c 'cd '/app' && exec bash'");
    }

    #[test]
    fn test_shell_invocation() {
        let inv = Invocation::shell("true || false");
        assert_eq!(inv.program, "sh");
        assert_eq!(inv.args, vec!["-c", "true || false"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_exit_code() {
        let code = SystemRunner.run(&Invocation::shell("exit 3")).unwrap();
        assert_eq!(code, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_capture_strips_newlines() {
        let out = SystemRunner
            .capture(&Invocation::new("printf", ["php83\\n"]))
            .unwrap();
        assert_eq!(out, "php83");
    }

    #[test]
    fn test_missing_program() {
        let err = SystemRunner
            .run(&Invocation::new("definitely-not-a-real-program-xyz", Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, ServerError::CommandNotFound(_)));
    }
}
