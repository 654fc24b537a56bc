//! 命令分发
//!
//! [`Action`] 是全部命令的静态表，[`Dispatcher`] 把每个变体交给对应模块执行。
//! 每个处理函数返回进程退出码：外部进程的退出码原样透传，其余成功为 0。

use crate::core::{ComposeCommand, EnvStore, RouteDiscovery};
use crate::error::Result;
use crate::types::{OutputFormat, ProfileAction, ServerPaths};
use crate::utils::executor::{Invocation, ProcessRunner};

pub mod env;
pub mod profile;
pub mod route;
pub mod shell;
pub mod stack;
pub mod system;

pub use env::{ProcessVars, Prompter, StdinPrompter, VarSource};

/// bin/ 下允许透传的脚本
pub const PASSTHROUGH_SCRIPTS: [&str; 10] = [
    "php",
    "mariadb",
    "mariadb-dump",
    "mysql",
    "mysql-dump",
    "psql",
    "pg_dump",
    "pg_restore",
    "redis",
    "composer",
];

/// 全部可执行的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Start,
    Stop,
    Restart,
    Rebuild { services: Vec<String> },
    ComposeConfig,
    HttpReload,
    Core { domain: String },
    Tools,
    LazyDocker,
    FixPermissions,
    SetupDomain,
    SetupProfiles,
    EnvInit,
    EnvEdit,
    EnvGet { key: String },
    EnvSet { key: String, value: String },
    EnvList { format: OutputFormat },
    Profiles { action: ProfileAction, names: Vec<String> },
    ProfileList,
    Route { domain: String, format: OutputFormat },
    InstallCertificate,
    Passthrough { script: String, args: Vec<String> },
    Unknown(String),
}

impl Action {
    /// 外部子命令：已知脚本透传，其它视为未知命令
    pub fn from_external(mut args: Vec<String>) -> Self {
        if args.is_empty() {
            return Action::Unknown(String::new());
        }
        let name = args.remove(0);
        if PASSTHROUGH_SCRIPTS.contains(&name.as_str()) {
            Action::Passthrough { script: name, args }
        } else {
            Action::Unknown(name)
        }
    }
}

/// 命令上下文
pub struct CommandContext<'a> {
    pub paths: ServerPaths,
    pub runner: &'a dyn ProcessRunner,
    pub prompter: &'a dyn Prompter,
    pub vars: &'a dyn VarSource,
    pub verbose: bool,
}

impl CommandContext<'_> {
    pub fn store(&self) -> EnvStore {
        EnvStore::new(self.paths.env_file.clone())
    }

    pub fn compose(&self) -> ComposeCommand {
        ComposeCommand::from_paths(&self.paths)
    }

    pub fn routes(&self) -> RouteDiscovery {
        RouteDiscovery::from_paths(&self.paths)
    }

    /// 构造并执行 compose 调用
    pub fn run_compose(&self, sub: &[&str], extra: &[String]) -> Result<i32> {
        self.runner.run(&self.compose().build(sub, extra))
    }

    /// `docker <args...>`
    pub fn docker<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new("docker", args)
    }
}

/// 命令分发器
pub struct Dispatcher<'a> {
    ctx: CommandContext<'a>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(ctx: CommandContext<'a>) -> Self {
        Self { ctx }
    }

    /// 执行命令，返回退出码
    pub fn dispatch(&self, action: Action) -> Result<i32> {
        let ctx = &self.ctx;
        tracing::debug!(?action, "分发命令");

        match action {
            Action::Up => stack::up(ctx),
            Action::Start => stack::start(ctx),
            Action::Stop => stack::stop(ctx),
            Action::Restart => stack::restart(ctx),
            Action::Rebuild { services } => stack::rebuild(ctx, &services),
            Action::ComposeConfig => stack::config(ctx),
            Action::HttpReload => stack::http_reload(ctx),
            Action::Core { domain } => shell::core(ctx, &domain),
            Action::Tools => shell::tools(ctx),
            Action::LazyDocker => shell::lazydocker(ctx),
            Action::FixPermissions => system::fix_permissions(ctx),
            Action::SetupDomain => profile::setup_domain(ctx),
            Action::SetupProfiles => profile::setup_profiles(ctx),
            Action::EnvInit => env::init(ctx),
            Action::EnvEdit => env::edit(ctx),
            Action::EnvGet { key } => env::get(ctx, &key),
            Action::EnvSet { key, value } => env::set(ctx, &key, &value),
            Action::EnvList { format } => env::list(ctx, format),
            Action::Profiles { action, names } => profile::modify(ctx, action, &names),
            Action::ProfileList => profile::list(ctx),
            Action::Route { domain, format } => route::show(ctx, &domain, format),
            Action::InstallCertificate => system::install_certificate(ctx),
            Action::Passthrough { script, args } => shell::passthrough(ctx, &script, &args),
            Action::Unknown(name) => Err(crate::error::ServerError::InvalidArgument(format!(
                "未知命令: {}",
                name
            ))),
        }
    }
}
