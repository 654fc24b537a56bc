//! server 主程序入口
//!
//! 设计原则：
//! - 模块化：入口代码简洁，逻辑委托给各模块
//! - 退出码：外部命令的退出码原样透传，已处理的错误统一为 1
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use clap::{CommandFactory, Parser};
use server_cli::cli::{self, Cli};
use server_cli::commands::{Action, CommandContext, Dispatcher, ProcessVars, StdinPrompter};
use server_cli::config::settings;
use server_cli::types::Config;
use server_cli::utils::executor::SystemRunner;

fn main() {
    let cli = match Cli::try_parse_from(cli::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            // --help/--version 正常退出，其余参数错误统一返回 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = init_config(&cli);
    server_cli::logging::init(config.verbose);

    let Some(command) = cli.command else {
        print_usage();
        return;
    };

    let action = Action::from(command);
    if let Action::Unknown(name) = &action {
        eprintln!("未知命令: {}\n", name);
        print_usage_to_stderr();
        std::process::exit(1);
    }

    let paths = match settings::load_paths(cli.root) {
        Ok(paths) => paths,
        Err(e) => {
            e.report(config.verbose);
            std::process::exit(1);
        }
    };

    let runner = SystemRunner;
    let prompter = StdinPrompter;
    let vars = ProcessVars;
    let dispatcher = Dispatcher::new(CommandContext {
        paths,
        runner: &runner,
        prompter: &prompter,
        vars: &vars,
        verbose: config.verbose,
    });

    match dispatcher.dispatch(action) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            e.report(config.verbose);
            std::process::exit(1);
        }
    }
}

/// 初始化配置
fn init_config(cli: &Cli) -> Config {
    Config {
        verbose: cli.verbose,
    }
}

fn print_usage() {
    let _ = Cli::command().print_help();
}

fn print_usage_to_stderr() {
    eprintln!("{}", Cli::command().render_help());
}
