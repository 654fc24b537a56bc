//! .env 格式文档 (简单原则：透明的文本解析)
//!
//! 与常规 dotenv 解析器不同，这里保留每一行的原始文本，
//! 只改写与目标键匹配的行，注释、空行和其它键保持原样与原顺序。

use crate::error::{Result, ServerError};
use regex::Regex;
use std::sync::OnceLock;

fn key_syntax() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("静态正则"))
}

fn active_assignment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("静态正则"))
}

/// 校验键名：必须是标识符
pub fn validate_key(key: &str) -> Result<()> {
    if key_syntax().is_match(key) {
        Ok(())
    } else {
        Err(ServerError::InvalidArgument(format!("无效的键名: '{}'", key)))
    }
}

/// 校验值：不支持换行（不做引号/转义处理）
pub fn validate_value(value: &str) -> Result<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(ServerError::InvalidArgument("值不能包含换行".to_string()));
    }
    Ok(())
}

/// 匹配某个键的行：可选的禁用标记 `#`，允许前后空白，
/// 键后必须紧跟 `=`，所以 `USER` 不会匹配 `USERNAME=`。
fn key_line_pattern(key: &str) -> Result<Regex> {
    Regex::new(&format!(r"^\s*#?\s*{}=.*$", regex::escape(key)))
        .map_err(|e| ServerError::Parse(format!("键 {} 的匹配规则无效: {}", key, e)))
}

/// 按行保存的 .env 文档
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDocument {
    lines: Vec<String>,
}

impl EnvDocument {
    /// 解析 .env 文件内容（不会失败：未知格式的行原样保留）
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 写入 `key=value`
    ///
    /// 第一条匹配行（包括被 `#` 禁用的）原地改写为规范形式，
    /// 之后再匹配到的同键行一并清除，保证只剩一条有效赋值；
    /// 没有匹配行时追加到末尾。
    pub fn upsert(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        validate_value(value)?;

        let pattern = key_line_pattern(key)?;
        let canonical = format!("{}={}", key, value);
        let mut matched = false;
        let mut rewritten = Vec::with_capacity(self.lines.len() + 1);

        for line in self.lines.drain(..) {
            if pattern.is_match(&line) {
                if !matched {
                    rewritten.push(canonical.clone());
                    matched = true;
                }
            } else {
                rewritten.push(line);
            }
        }

        if !matched {
            rewritten.push(canonical);
        }

        self.lines = rewritten;
        Ok(())
    }

    /// 读取某个键的有效值；多条有效行时以最后一条为准（与 shell source 一致）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.assignments()
            .filter(|(k, _)| *k == key)
            .last()
            .map(|(_, v)| v)
    }

    /// 按文件顺序列出所有有效赋值
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| {
            let caps = active_assignment().captures(line)?;
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some((key, value))
        })
    }

    /// 某个键的有效赋值行数
    pub fn active_count(&self, key: &str) -> usize {
        self.assignments().filter(|(k, _)| *k == key).count()
    }

    /// 序列化：每行以 `\n` 结尾
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
