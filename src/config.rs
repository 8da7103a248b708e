use std::{env, path::Path};

use serde::Deserialize;

use crate::{api::ResourceLayout, error::Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub const ENV_CONFIG: &str = "ARTICLE_EDITOR_CONFIG";
pub const ENV_API_URL: &str = "ARTICLE_EDITOR_API_URL";
pub const ENV_TOKEN: &str = "ARTICLE_EDITOR_TOKEN";
pub const ENV_LAYOUT: &str = "ARTICLE_EDITOR_LAYOUT";

/// 编辑器配置。
///
/// ```toml
/// layout = "uniform"
///
/// [api]
/// base_url = "https://admin.example.org"
/// token = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub layout: ResourceLayout,
}

/// 后端接口配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 读取配置文件（如果有），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// 用 `lookup` 返回的值覆盖配置，空字符串视为未设置
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.api.token = Some(token);
        }
        if let Some(layout) = lookup(ENV_LAYOUT) {
            self.layout = layout.parse()?;
        }
        Ok(())
    }
}
