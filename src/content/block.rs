use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// 临时 id 的前缀，表示块尚未保存到服务端
pub const TEMP_PREFIX: &str = "temp-";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// 块的类型。
///
/// 类型在块创建后不会再改变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Section,
    BulletList,
    Image,
    KeyTakeaways,
    Spacer,
    Reflection,
    Link,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Section,
        BlockKind::BulletList,
        BlockKind::Image,
        BlockKind::KeyTakeaways,
        BlockKind::Spacer,
        BlockKind::Reflection,
        BlockKind::Link,
    ];

    /// 块类型在接口中的名称，如 `bullet-list`
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Section => "section",
            BlockKind::BulletList => "bullet-list",
            BlockKind::Image => "image",
            BlockKind::KeyTakeaways => "key-takeaways",
            BlockKind::Spacer => "spacer",
            BlockKind::Reflection => "reflection",
            BlockKind::Link => "link",
        }
    }

    /// 是否是带 `items` 列表的类型
    pub fn has_items(&self) -> bool {
        matches!(self, BlockKind::BulletList | BlockKind::KeyTakeaways)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BlockKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(Error::FormatError("unknown block type"))
    }
}

/// 块的标识。
///
/// - [`BlockId::Pending`]：客户端生成的临时 id，块还没有保存过
/// - [`BlockId::Persisted`]：服务端分配的 id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockId {
    Pending(String),
    Persisted(String),
}

impl BlockId {
    /// 生成一个新的临时 id，形如 `temp-<毫秒时间戳>-<序号>`
    pub fn pending() -> Self {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        BlockId::Pending(format!(
            "{TEMP_PREFIX}{}-{seq}",
            Local::now().timestamp_millis()
        ))
    }

    /// 从外部输入（命令行、文章文件）的原始字符串解析 id。
    ///
    /// 以 [`TEMP_PREFIX`] 开头的视为临时 id。
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with(TEMP_PREFIX) {
            BlockId::Pending(raw)
        } else {
            BlockId::Persisted(raw)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockId::Pending(id) | BlockId::Persisted(id) => id,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, BlockId::Pending(_))
    }

    /// 服务端 id，临时 id 返回 `None`
    pub fn server_id(&self) -> Option<&str> {
        match self {
            BlockId::Persisted(id) => Some(id),
            BlockId::Pending(_) => None,
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 各类型块的字段。
///
/// 序列化为接口使用的 JSON 形状：`type` 字段区分类型，字段名为 camelCase。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockBody {
    Section {
        #[serde(default, deserialize_with = "null_as_default")]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        content: String,
    },
    BulletList {
        #[serde(default, deserialize_with = "null_as_default")]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
    },
    Image {
        #[serde(default)]
        src: Option<String>,
        #[serde(default, rename = "altText", deserialize_with = "null_as_default")]
        alt_text: String,
    },
    KeyTakeaways {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
    },
    Spacer {},
    Reflection {
        #[serde(default, deserialize_with = "null_as_default")]
        heading: String,
        #[serde(default, deserialize_with = "null_as_default")]
        content: String,
    },
    Link {
        #[serde(default, deserialize_with = "null_as_default")]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        url: String,
        #[serde(default, deserialize_with = "null_as_default")]
        description: String,
    },
}

/// 缺失和 `null` 都取默认值
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BlockBody {
    /// 指定类型的空字段。
    ///
    /// 列表类型带一个空字符串项，图片没有 `src`。
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Section => BlockBody::Section {
                title: String::new(),
                content: String::new(),
            },
            BlockKind::BulletList => BlockBody::BulletList {
                title: String::new(),
                items: vec![String::new()],
            },
            BlockKind::Image => BlockBody::Image {
                src: None,
                alt_text: String::new(),
            },
            BlockKind::KeyTakeaways => BlockBody::KeyTakeaways {
                items: vec![String::new()],
            },
            BlockKind::Spacer => BlockBody::Spacer {},
            BlockKind::Reflection => BlockBody::Reflection {
                heading: String::new(),
                content: String::new(),
            },
            BlockKind::Link => BlockBody::Link {
                title: String::new(),
                url: String::new(),
                description: String::new(),
            },
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::Section { .. } => BlockKind::Section,
            BlockBody::BulletList { .. } => BlockKind::BulletList,
            BlockBody::Image { .. } => BlockKind::Image,
            BlockBody::KeyTakeaways { .. } => BlockKind::KeyTakeaways,
            BlockBody::Spacer {} => BlockKind::Spacer,
            BlockBody::Reflection { .. } => BlockKind::Reflection,
            BlockBody::Link { .. } => BlockKind::Link,
        }
    }

    /// 列表项，仅 bullet-list 与 key-takeaways 有
    pub fn items(&self) -> Option<&[String]> {
        match self {
            BlockBody::BulletList { items, .. } | BlockBody::KeyTakeaways { items } => Some(items),
            _ => None,
        }
    }

    pub(crate) fn items_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            BlockBody::BulletList { items, .. } | BlockBody::KeyTakeaways { items } => Some(items),
            _ => None,
        }
    }
}

/// 文章内容中的一个块。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    body: BlockBody,
}

impl Block {
    pub fn new(id: BlockId, body: BlockBody) -> Self {
        Self { id, body }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    pub fn body(&self) -> &BlockBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut BlockBody {
        &mut self.body
    }

    pub(crate) fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }
}

/// 根据类型创建一个空块，带新的临时 id。
///
/// 创建时不做任何校验。
pub fn create_block(kind: BlockKind) -> Block {
    Block::new(BlockId::pending(), BlockBody::empty(kind))
}

/// 块字段的部分更新。
///
/// 只有与块类型相符的字段会生效，其余字段被忽略，类型本身不会改变。
///
/// ```
/// # use article_editor::content::{BlockPatch, BlockKind, create_block};
/// let mut block = create_block(BlockKind::Link);
/// BlockPatch::new().title("Breathing").url("https://example.org").apply(&mut block);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub items: Option<Vec<String>>,
    pub src: Option<Option<String>>,
    pub alt_text: Option<String>,
    pub heading: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl BlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = Some(items.into_iter().map(Into::into).collect());
        self
    }

    pub fn src(mut self, src: Option<String>) -> Self {
        self.src = Some(src);
        self
    }

    pub fn alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 把补丁合并到块上
    pub fn apply(self, block: &mut Block) {
        self.apply_to(block.body_mut())
    }

    pub(crate) fn apply_to(self, body: &mut BlockBody) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        match body {
            BlockBody::Section { title, content } => {
                set(title, self.title);
                set(content, self.content);
            }
            BlockBody::BulletList { title, items } => {
                set(title, self.title);
                set(items, self.items);
            }
            BlockBody::Image { src, alt_text } => {
                set(src, self.src);
                set(alt_text, self.alt_text);
            }
            BlockBody::KeyTakeaways { items } => set(items, self.items),
            BlockBody::Spacer {} => {}
            BlockBody::Reflection { heading, content } => {
                set(heading, self.heading);
                set(content, self.content);
            }
            BlockBody::Link {
                title,
                url,
                description,
            } => {
                set(title, self.title);
                set(url, self.url);
                set(description, self.description);
            }
        }
    }
}
