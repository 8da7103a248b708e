use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    content::BlockKind,
    error::{Error, Result},
};

/// 块类型到服务端子资源的映射。
///
/// - [`ResourceLayout::Uniform`]：每种块都有自己的子资源
/// - [`ResourceLayout::Legacy`]（默认）：只有 image、key-takeaways、reflection、link
///   四种块有子资源，其余类型保存时不发请求
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceLayout {
    Uniform,
    #[default]
    Legacy,
}

impl ResourceLayout {
    /// 块类型对应的子资源名，没有对应资源时返回 `None`
    pub fn segment(&self, kind: BlockKind) -> Option<&'static str> {
        let segment = match kind {
            BlockKind::Image => "images",
            BlockKind::KeyTakeaways => "key-takeaways",
            BlockKind::Reflection => "reflections",
            BlockKind::Link => "links",
            BlockKind::Section => "sections",
            BlockKind::BulletList => "bullet-lists",
            BlockKind::Spacer => "spacers",
        };

        match (self, kind) {
            (
                ResourceLayout::Legacy,
                BlockKind::Section | BlockKind::BulletList | BlockKind::Spacer,
            ) => None,
            _ => Some(segment),
        }
    }
}

impl FromStr for ResourceLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(ResourceLayout::Uniform),
            "legacy" => Ok(ResourceLayout::Legacy),
            _ => Err(Error::FormatError("layout must be `uniform` or `legacy`")),
        }
    }
}

/// 接口路径
pub mod paths {
    pub fn article(article_id: &str) -> String {
        format!("/api/articles/{article_id}")
    }

    pub fn blocks(article_id: &str) -> String {
        format!("/api/articles/{article_id}/blocks")
    }

    /// 创建块时使用的集合路径，不带块 id
    pub fn block_collection(article_id: &str, segment: &str) -> String {
        format!("/api/articles/{article_id}/blocks/{segment}")
    }

    pub fn block(article_id: &str, segment: &str, block_id: &str) -> String {
        format!("/api/articles/{article_id}/blocks/{segment}/{block_id}")
    }

    pub fn categories() -> String {
        "/api/categories".to_string()
    }
}
