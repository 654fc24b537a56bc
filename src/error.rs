//! 错误处理模块 (修复原则：明确抛出异常)

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("文件不存在: {0}")]
    FileNotFound(PathBuf),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("命令执行失败: {0}")]
    CommandExecutionFailed(String),
}

impl ServerError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("❌ 错误: {}", self);

            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            match self {
                ServerError::NotFound(what) => eprintln!("未找到: {}", what),
                ServerError::Io(err) => eprintln!("文件错误: {}", err),
                ServerError::PermissionDenied(msg) => eprintln!("权限被拒绝: {}", msg),
                ServerError::InvalidArgument(msg) => eprintln!("无效参数: {}", msg),
                ServerError::FileNotFound(path) => eprintln!("文件不存在: {}", path.display()),
                _ => eprintln!("错误: {}", self),
            }
        }
    }

    /// 是否属于"未找到"一类（与 IO 失败区分）
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServerError::NotFound(_) | ServerError::FileNotFound(_))
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
