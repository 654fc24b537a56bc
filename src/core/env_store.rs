//! 环境文件存储引擎
//!
//! 没有内存缓存：每次调用都重新读取文件，写入时整体重写
//! （临时文件 + 原子替换）。多个进程并发写同一文件时可能丢失更新。

use crate::config::format::dotenv::{EnvDocument, validate_key, validate_value};
use crate::error::Result;
use crate::types::EnvEntry;
use crate::utils::paths::{ensure_file, read_optional, write_file_safe};
use std::path::{Path, PathBuf};

/// 单个 .env 文件上的键值存储
#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
}

impl EnvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载文档；文件不存在视为空文档
    pub fn load(&self) -> Result<EnvDocument> {
        Ok(read_optional(&self.path)?
            .map(|content| EnvDocument::parse(&content))
            .unwrap_or_default())
    }

    /// 写入 `key=value`，保证之后文件中恰好一条有效赋值
    pub fn upsert(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        validate_value(value)?;
        ensure_file(&self.path)?;
        let mut doc = self.load()?;
        doc.upsert(key, value)?;
        write_file_safe(&self.path, &doc.serialize())?;

        tracing::debug!(file = %self.path.display(), key, value, "已写入环境变量");
        Ok(())
    }

    /// 读取某个键的值
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).map(str::to_string))
    }

    /// 所有有效赋值，按文件顺序
    pub fn entries(&self) -> Result<Vec<EnvEntry>> {
        Ok(self
            .load()?
            .assignments()
            .map(|(k, v)| EnvEntry::new(k, v))
            .collect())
    }
}
