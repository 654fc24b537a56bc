//! CLI 参数定义

use crate::commands::Action;
use crate::types::{OutputFormat, ProfileAction};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// server - 容器化服务栈命令行
#[derive(Parser, Debug)]
#[command(
    name = "server",
    version,
    about = "容器化服务栈命令行",
    long_about = "把简单的子命令翻译成 docker compose 调用，维护 docker/.env，并从虚拟主机配置中检测 PHP 容器"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 服务栈根目录（默认为可执行文件所在目录）
    #[arg(long, global = true, env = "SERVER_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 前台启动服务栈
    Up,

    /// 后台启动服务栈
    Start,

    /// 停止服务栈
    #[command(alias = "down")]
    Stop,

    /// 重启服务栈并重载 HTTP
    #[command(alias = "restart")]
    Reload,

    /// 重新构建镜像（不使用缓存）
    Rebuild {
        /// 指定服务
        services: Vec<String>,
    },

    /// 校验 compose 文件
    Config,

    /// HTTP 服务器操作
    #[command(subcommand)]
    Http(HttpCommands),

    /// 在站点的 PHP 容器中打开 bash
    Core {
        /// 虚拟主机域名
        domain: String,
    },

    /// 进入工具容器
    Tools,

    /// 在工具容器中运行 lazydocker
    #[command(name = "lzd", alias = "lazydocker")]
    Lazydocker,

    /// 初始化操作
    #[command(subcommand)]
    Setup(SetupCommands),

    /// docker/.env 管理
    #[command(subcommand)]
    Env(EnvCommands),

    /// COMPOSE_PROFILES 管理
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// 显示域名对应的 PHP 容器与文档根目录
    Route {
        /// 虚拟主机域名
        domain: String,
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 安装操作
    #[command(subcommand)]
    Install(InstallCommands),

    /// bin/ 下的透传脚本 (php, composer, mysql ...)
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Subcommand, Debug)]
pub enum HttpCommands {
    /// 重载 Nginx/Apache
    Reload,
}

#[derive(Subcommand, Debug)]
pub enum SetupCommands {
    /// 修复文件/目录权限 (POSIX)
    #[command(alias = "permission", alias = "perms", alias = "perm")]
    Permissions,
    /// 运行 mkhost 并同步 profile
    Domain,
    /// 运行 utilities/profiles 脚本
    #[command(alias = "profile")]
    Profiles,
}

#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// 初始化 TZ/USER/UID/GID
    #[command(alias = "boot")]
    Init,
    /// 用 $EDITOR 打开 docker/.env
    Edit,
    /// 读取变量
    Get {
        /// 变量名称
        key: String,
    },
    /// 写入变量
    Set {
        /// 变量名称
        key: String,
        /// 变量值
        value: String,
    },
    /// 列出变量
    List {
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// 激活 profile
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// 取消 profile
    Remove {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// 列出激活的 profile
    List,
}

#[derive(Subcommand, Debug)]
pub enum InstallCommands {
    /// 安装项目根证书
    Certificate,
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Up => Action::Up,
            Commands::Start => Action::Start,
            Commands::Stop => Action::Stop,
            Commands::Reload => Action::Restart,
            Commands::Rebuild { services } => Action::Rebuild { services },
            Commands::Config => Action::ComposeConfig,
            Commands::Http(HttpCommands::Reload) => Action::HttpReload,
            Commands::Core { domain } => Action::Core { domain },
            Commands::Tools => Action::Tools,
            Commands::Lazydocker => Action::LazyDocker,
            Commands::Setup(SetupCommands::Permissions) => Action::FixPermissions,
            Commands::Setup(SetupCommands::Domain) => Action::SetupDomain,
            Commands::Setup(SetupCommands::Profiles) => Action::SetupProfiles,
            Commands::Env(EnvCommands::Init) => Action::EnvInit,
            Commands::Env(EnvCommands::Edit) => Action::EnvEdit,
            Commands::Env(EnvCommands::Get { key }) => Action::EnvGet { key },
            Commands::Env(EnvCommands::Set { key, value }) => Action::EnvSet { key, value },
            Commands::Env(EnvCommands::List { format }) => Action::EnvList {
                format: OutputFormat::from(format.as_str()),
            },
            Commands::Profile(ProfileCommands::Add { names }) => Action::Profiles {
                action: ProfileAction::Add,
                names,
            },
            Commands::Profile(ProfileCommands::Remove { names }) => Action::Profiles {
                action: ProfileAction::Remove,
                names,
            },
            Commands::Profile(ProfileCommands::List) => Action::ProfileList,
            Commands::Route { domain, format } => Action::Route {
                domain,
                format: OutputFormat::from(format.as_str()),
            },
            Commands::Install(InstallCommands::Certificate) => Action::InstallCertificate,
            Commands::External(args) => Action::from_external(args),
        }
    }
}

/// 带二级子命令的命令族
const NESTED_COMMANDS: [&str; 5] = ["http", "setup", "env", "profile", "install"];

/// 命令名不区分大小写：把第一个位置参数转成小写；
/// 命令族（如 `setup`）的二级子命令名同样转成小写
///
/// `--root` 的值、子命令之后的参数与 `--` 之后的内容不受影响。
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut iter = args.into_iter();
    if let Some(bin) = iter.next() {
        out.push(bin);
    }

    let mut skip_value = false;
    let mut seen_command = false;
    let mut done = false;
    for arg in iter {
        if done || skip_value {
            skip_value = false;
            out.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("--") => done = true,
            Some("--root") => skip_value = true,
            Some(s) if s.starts_with('-') => {}
            Some(s) => {
                let lower = s.to_lowercase();
                done = seen_command || !NESTED_COMMANDS.contains(&lower.as_str());
                seen_command = true;
                out.push(OsString::from(lower));
                continue;
            }
            None => done = true,
        }
        out.push(arg);
    }
    out
}
