//! `COMPOSE_PROFILES` 上的集合运算
//!
//! 值按字典序序列化（BTreeSet），重复名称自动去重。

use crate::core::env_store::EnvStore;
use crate::error::{Result, ServerError};
use crate::types::{PROFILES_KEY, ProfileAction};
use std::collections::BTreeSet;

pub struct ProfileSet<'a> {
    store: &'a EnvStore,
}

impl<'a> ProfileSet<'a> {
    pub fn new(store: &'a EnvStore) -> Self {
        Self { store }
    }

    /// 当前激活的 profile
    pub fn current(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .store
            .read(PROFILES_KEY)?
            .map(|value| parse(&value))
            .unwrap_or_default())
    }

    /// 按字符串动作修改，只接受 `add`/`remove`
    pub fn modify_str(&self, action: &str, names: &[String]) -> Result<BTreeSet<String>> {
        self.modify(ProfileAction::parse(action)?, names)
    }

    /// 并入或移除一组名称，返回修改后的集合
    ///
    /// 移除不存在的名称不是错误；集合为空时写入空值，键仍然保留。
    pub fn modify(&self, action: ProfileAction, names: &[String]) -> Result<BTreeSet<String>> {
        let names = validate_names(names)?;
        let mut set = self.current()?;

        match action {
            ProfileAction::Add => set.extend(names),
            ProfileAction::Remove => {
                for name in &names {
                    set.remove(name);
                }
            }
        }

        self.store.upsert(PROFILES_KEY, &serialize(&set))?;
        tracing::info!(%action, profiles = %serialize(&set), "已更新 compose profiles");
        Ok(set)
    }
}

/// 按 `,` 切分，丢弃空段
pub fn parse(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn serialize(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn validate_names(names: &[String]) -> Result<Vec<String>> {
    names
        .iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() || trimmed.contains(',') {
                Err(ServerError::InvalidArgument(format!(
                    "无效的 profile 名称: '{}'",
                    name
                )))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
