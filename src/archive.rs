use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    content::{ArticleMetadata, Block, BlockBody, BlockId, DEFAULT_READ_TIME, Document},
    error::Result,
};

/// 文章文件：元数据加块列表，用于导出和推送。
///
/// `.json` 扩展名使用 JSON，其余使用 YAML：
///
/// ```yaml
/// title: Box breathing
/// category: Stress
/// readTime: 3
/// author: Ana
/// blocks:
///   - id: "17"
///     type: section
///     title: Steps
///     content: Inhale for four.
///   - type: key-takeaways
///     items: [Slow down, Count]
/// ```
///
/// 没有 `id` 的块视为新块。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFile {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_read_time")]
    pub read_time: u32,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    #[serde(default)]
    pub blocks: Vec<FileBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: BlockBody,
}

fn default_read_time() -> u32 {
    DEFAULT_READ_TIME
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

impl ArticleFile {
    pub fn from_editor(meta: &ArticleMetadata, doc: &Document) -> Self {
        Self {
            title: meta.title.clone(),
            category: meta.category.clone(),
            description: meta.description.clone(),
            read_time: meta.read_time_minutes(),
            author: meta.author.clone(),
            header_image: meta.header_image.clone(),
            blocks: doc
                .blocks()
                .iter()
                .map(|b| FileBlock {
                    id: Some(b.id().to_string()),
                    body: b.body().clone(),
                })
                .collect(),
        }
    }

    /// 拆分为元数据和文档，没有 id 的块分配临时 id
    pub fn into_parts(self) -> (ArticleMetadata, Document) {
        let meta = ArticleMetadata {
            title: self.title,
            category: self.category,
            description: self.description,
            read_time: self.read_time.to_string(),
            author: self.author,
            header_image: self.header_image.filter(|s| !s.is_empty()),
        };

        let blocks = self
            .blocks
            .into_iter()
            .map(|b| {
                let id = b.id.map(BlockId::parse).unwrap_or_else(BlockId::pending);
                Block::new(id, b.body)
            })
            .collect();

        (meta, Document::from_blocks(blocks))
    }

    pub fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }

    pub fn to_text(&self, json: bool) -> Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_yaml::to_string(self)?)
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::parse(&std::fs::read_to_string(path)?, is_json(path))
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_text(is_json(path))?)?;
        Ok(())
    }
}
