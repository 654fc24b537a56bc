//! 测试工具模块
//!
//! 提供统一的测试环境管理：临时服务栈根目录、记录外部调用的执行器、
//! 预设回答的询问器，以及替代进程环境的变量表。

use crate::commands::{Action, CommandContext, Dispatcher, Prompter, VarSource};
use crate::core::{ComposeCommand, EnvStore, RouteDiscovery};
use crate::error::{Result, ServerError};
use crate::types::ServerPaths;
use crate::utils::executor::{Invocation, ProcessRunner};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use tempfile::TempDir;

/// 预设的环境变量表，不读写进程环境
#[derive(Default)]
pub struct MapVars {
    vars: RefCell<HashMap<String, String>>,
}

impl VarSource for MapVars {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.borrow().get(key).cloned()
    }
}

/// 记录调用、不启动任何进程的执行器
///
/// `run` 默认返回 0；`capture` 只对预设了输出的调用成功。
/// 匹配规则是调用的显示文本包含给定片段。
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    exits: RefCell<Vec<(String, i32)>>,
    outputs: RefCell<Vec<(String, String)>>,
}

impl RecordingRunner {
    pub fn exit_with(&self, pattern: &str, code: i32) {
        self.exits.borrow_mut().push((pattern.to_string(), code));
    }

    pub fn output(&self, pattern: &str, output: &str) {
        self.outputs
            .borrow_mut()
            .push((pattern.to_string(), output.to_string()));
    }

    /// 所有 `run` 调用，按发生顺序
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        self.calls.borrow_mut().push(invocation.clone());
        let text = invocation.to_string();
        Ok(self
            .exits
            .borrow()
            .iter()
            .find(|(pattern, _)| text.contains(pattern.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0))
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        let text = invocation.to_string();
        self.outputs
            .borrow()
            .iter()
            .find(|(pattern, _)| text.contains(pattern.as_str()))
            .map(|(_, out)| out.replace(['\n', '\r'], ""))
            .ok_or_else(|| ServerError::CommandExecutionFailed(format!("{} 未预设输出", text)))
    }
}

/// 按顺序给出预设回答，用完后取默认值
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, _question: &str, default: &str) -> Result<String> {
        Ok(self
            .answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }
}

/// 临时服务栈根目录
pub struct ServerFixture {
    _dir: TempDir,
    pub paths: ServerPaths,
    pub runner: RecordingRunner,
    pub prompter: ScriptedPrompter,
    pub vars: MapVars,
}

impl Default for ServerFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let paths = ServerPaths::from_root(dir.path());
        Self {
            _dir: dir,
            paths,
            runner: RecordingRunner::default(),
            prompter: ScriptedPrompter::default(),
            vars: MapVars::default(),
        }
    }

    pub fn with_answers(self, answers: &[&str]) -> Self {
        self.prompter
            .answers
            .borrow_mut()
            .extend(answers.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_vars(self, vars: &[(&str, &str)]) -> Self {
        self.vars
            .vars
            .borrow_mut()
            .extend(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn ctx(&self) -> CommandContext<'_> {
        CommandContext {
            paths: self.paths.clone(),
            runner: &self.runner,
            prompter: &self.prompter,
            vars: &self.vars,
            verbose: false,
        }
    }

    pub fn dispatch(&self, action: Action) -> Result<i32> {
        Dispatcher::new(self.ctx()).dispatch(action)
    }

    pub fn store(&self) -> EnvStore {
        EnvStore::new(self.paths.env_file.clone())
    }

    pub fn compose(&self) -> ComposeCommand {
        ComposeCommand::from_paths(&self.paths)
    }

    pub fn routes(&self) -> RouteDiscovery {
        RouteDiscovery::from_paths(&self.paths)
    }

    /// 写入根目录下的相对路径
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.paths.root.join(relative);
        fs::create_dir_all(path.parent().expect("有父目录")).expect("创建目录");
        fs::write(path, content).expect("写入文件");
    }

    pub fn nginx(&self, domain: &str, content: &str) {
        self.write_file(&format!("configuration/nginx/{}.conf", domain), content);
    }

    pub fn apache(&self, domain: &str, content: &str) {
        self.write_file(&format!("configuration/apache/{}.conf", domain), content);
    }

    pub fn write_env(&self, content: &str) {
        self.write_file("docker/.env", content);
    }

    pub fn read_env(&self) -> String {
        fs::read_to_string(&self.paths.env_file).expect("读取 env 文件")
    }
}
