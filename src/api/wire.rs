//! 接口的 JSON 形状。
//!
//! 服务端返回的文章字段形状不统一（分类和简介可能是字符串也可能是对象，作者可能在
//! `authorName` 或 `author` 下），这里一次性转换为 [`ArticleMetadata`]，
//! 上层不再关心原始形状。

use serde::{Deserialize, Serialize};

use crate::content::{ArticleMetadata, Block, BlockBody, BlockId, Category};

/// 创建或更新块时发送的请求体：块字段加上 `order`
#[derive(Debug, Serialize)]
pub struct BlockPayload<'a> {
    #[serde(flatten)]
    pub body: &'a BlockBody,
    pub order: usize,
}

impl<'a> BlockPayload<'a> {
    pub fn new(block: &'a Block, order: usize) -> Self {
        Self {
            body: block.body(),
            order,
        }
    }
}

/// 字符串或数字形式的 id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// 服务端返回的块
#[derive(Debug, Deserialize)]
pub struct BlockRecord {
    pub id: RawId,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        Block::new(BlockId::Persisted(record.id.into_string()), record.body)
    }
}

/// 创建块后返回的数据，只关心 id
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: RawId,
}

/// 字符串，或带 `text` / `title` / `name` 的对象
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Text(String),
    Object {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl TextField {
    fn into_text(self) -> Option<String> {
        match self {
            TextField::Text(s) => Some(s),
            TextField::Object { text, title, name } => text.or(title).or(name),
        }
    }
}

/// 数字或字符串
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

/// 服务端返回的文章
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<TextField>,
    #[serde(default)]
    pub description: Option<TextField>,
    #[serde(default)]
    pub intro: Option<TextField>,
    #[serde(default)]
    pub read_time: Option<NumberOrText>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author: Option<TextField>,
    #[serde(default)]
    pub header_image: Option<String>,
}

impl From<ArticleRecord> for ArticleMetadata {
    fn from(record: ArticleRecord) -> Self {
        let read_time = match record.read_time {
            Some(NumberOrText::Number(n)) => n.to_string(),
            Some(NumberOrText::Text(s)) => s,
            None => String::new(),
        };

        ArticleMetadata {
            title: record.title.unwrap_or_default(),
            category: record
                .category
                .and_then(TextField::into_text)
                .unwrap_or_default(),
            description: record
                .description
                .and_then(TextField::into_text)
                .or_else(|| record.intro.and_then(TextField::into_text))
                .unwrap_or_default(),
            read_time,
            author: record
                .author_name
                .or_else(|| record.author.and_then(TextField::into_text))
                .unwrap_or_default(),
            header_image: record.header_image.filter(|s| !s.is_empty()),
        }
    }
}

/// 更新文章时发送的请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate<'a> {
    pub title: &'a str,
    pub category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<&'a str>,
    pub description: &'a str,
    pub read_time: u32,
    pub author_name: &'a str,
    pub header_image: &'a str,
}

impl<'a> ArticleUpdate<'a> {
    /// 根据元数据构造请求体，分类能在目录中找到时使用目录中的名称和 id
    pub fn new(meta: &'a ArticleMetadata, catalog: &'a [Category]) -> Self {
        let matched = crate::content::reconcile_category(&meta.category, catalog);

        Self {
            title: &meta.title,
            category: matched.map(|c| c.name.as_str()).unwrap_or(meta.category.as_str()),
            category_id: matched.map(|c| c.id.as_str()),
            description: &meta.description,
            read_time: meta.read_time_minutes(),
            author_name: &meta.author,
            header_image: meta.header_image_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::content::{BlockKind, BlockPatch, create_block};

    #[test]
    fn test_block_payload_keeps_empty_items() {
        let mut block = create_block(BlockKind::BulletList);
        BlockPatch::new()
            .title("Groceries")
            .items(["", "Buy milk", ""])
            .apply(&mut block);

        let json = serde_json::to_value(BlockPayload::new(&block, 3)).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "bullet-list",
                "title": "Groceries",
                "items": ["", "Buy milk", ""],
                "order": 3
            })
        );
    }

    #[test]
    fn test_spacer_payload() {
        let block = create_block(BlockKind::Spacer);
        let json = serde_json::to_value(BlockPayload::new(&block, 0)).unwrap();
        assert_eq!(json, json!({"type": "spacer", "order": 0}));
    }

    #[test]
    fn test_block_record() {
        let record: BlockRecord = serde_json::from_value(json!({
            "id": 17,
            "type": "reflection",
            "heading": "Notice",
            "content": "What did you feel?",
            "order": 2,
            "articleId": "a1"
        }))
        .unwrap();
        let block = Block::from(record);

        assert_eq!(block.id(), &BlockId::Persisted("17".to_string()));
        assert_eq!(block.kind(), BlockKind::Reflection);
    }

    #[test]
    fn test_article_record_shapes() {
        let flat: ArticleRecord = serde_json::from_value(json!({
            "title": "Sleep hygiene",
            "category": "Sleep",
            "description": "Why rest matters",
            "readTime": 8,
            "authorName": "Dr. Lee",
            "headerImage": null
        }))
        .unwrap();
        let meta = ArticleMetadata::from(flat);
        assert_eq!(meta.category, "Sleep");
        assert_eq!(meta.author, "Dr. Lee");
        assert_eq!(meta.read_time, "8");
        assert_eq!(meta.header_image, None);

        let nested: ArticleRecord = serde_json::from_value(json!({
            "title": "Grounding",
            "category": {"id": "c1", "title": "Anxiety"},
            "intro": "Five senses",
            "readTime": "abc",
            "author": {"name": "Sam"},
            "headerImage": ""
        }))
        .unwrap();
        let meta = ArticleMetadata::from(nested);
        assert_eq!(meta.category, "Anxiety");
        assert_eq!(meta.description, "Five senses");
        assert_eq!(meta.author, "Sam");
        assert_eq!(meta.read_time_minutes(), 5);
        assert_eq!(meta.header_image, None);

        let text_first: ArticleRecord =
            serde_json::from_value(json!({"category": {"text": "Mood", "title": "ignored"}}))
                .unwrap();
        assert_eq!(ArticleMetadata::from(text_first).category, "Mood");

        let object_description: ArticleRecord = serde_json::from_value(json!({
            "title": "Sleep",
            "description": {"text": "Why rest matters"},
            "authorName": "Dr. Lee"
        }))
        .unwrap();
        let meta = ArticleMetadata::from(object_description);
        assert_eq!(meta.title, "Sleep");
        assert_eq!(meta.description, "Why rest matters");
        assert_eq!(meta.author, "Dr. Lee");

        let object_intro: ArticleRecord =
            serde_json::from_value(json!({"intro": {"text": "Five senses"}})).unwrap();
        assert_eq!(ArticleMetadata::from(object_intro).description, "Five senses");
    }

    #[test]
    fn test_article_update() {
        let meta = ArticleMetadata {
            title: "Breathing".to_string(),
            category: "stress".to_string(),
            description: "Box breathing".to_string(),
            read_time: "12".to_string(),
            author: "Ana".to_string(),
            header_image: None,
        };
        let catalog = vec![Category {
            id: "stress".to_string(),
            name: "Stress".to_string(),
        }];

        let json = serde_json::to_value(ArticleUpdate::new(&meta, &catalog)).unwrap();
        assert_eq!(
            json,
            json!({
                "title": "Breathing",
                "category": "Stress",
                "categoryId": "stress",
                "description": "Box breathing",
                "readTime": 12,
                "authorName": "Ana",
                "headerImage": ""
            })
        );

        let json = serde_json::to_value(ArticleUpdate::new(&meta, &[])).unwrap();
        assert_eq!(json["category"], "stress");
        assert!(json.get("categoryId").is_none());
    }
}
