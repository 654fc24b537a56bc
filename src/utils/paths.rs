//! 跨平台路径处理工具 (传统原则：常识性接口设计)

use crate::error::{Result, ServerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 可执行文件所在目录，失败时退回当前目录
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 检查文件是否存在
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// 读取文件内容，返回错误时提供详细信息
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ServerError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| {
        ServerError::Io(std::io::Error::new(
            e.kind(),
            format!("读取文件 {} 失败: {}", path.display(), e),
        ))
    })
}

/// 读取文件，不存在时返回 None
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    read_file(path).map(Some)
}

/// 确保文件存在 (幂等操作，缺失的父目录一并创建)
pub fn ensure_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ServerError::Io(std::io::Error::new(
                e.kind(),
                format!("创建目录 {} 失败: {}", parent.display(), e),
            ))
        })?;
    }
    std::fs::File::create(path)?;
    Ok(())
}

/// 安全写入文件 (同目录唯一临时文件 + 原子替换)
///
/// 符号链接写穿到真实目标，目标原有的权限位保留。
pub fn write_file_safe(path: &Path, content: &str) -> Result<()> {
    let target = if path.exists() {
        std::fs::canonicalize(path)?
    } else {
        path.to_path_buf()
    };
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        std::fs::create_dir_all(parent)?;
    }

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    if let Ok(meta) = std::fs::metadata(&target) {
        temp.as_file().set_permissions(meta.permissions())?;
    }

    // 失败时临时文件随 PersistError 一起被删除
    temp.persist(&target).map_err(|e| ServerError::Io(e.error))?;
    Ok(())
}
