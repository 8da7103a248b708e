use serde::{Deserialize, Serialize};

/// 阅读时间无法解析时使用的默认值（分钟）
pub const DEFAULT_READ_TIME: u32 = 5;

/// 文章级别的字段，与块列表分开保存。
///
/// 字段保存编辑中的原始输入，例如 `read_time` 是输入框里的文本，
/// 只在发送给服务端前才解析。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: String,
    /// 自由文本，保存时再与分类目录比对
    pub category: String,
    pub description: String,
    pub read_time: String,
    pub author: String,
    /// 头图，data URL 或远程地址
    pub header_image: Option<String>,
}

impl ArticleMetadata {
    /// 解析后的阅读时间
    pub fn read_time_minutes(&self) -> u32 {
        parse_read_time(&self.read_time)
    }

    /// 发送给服务端的头图，没有时为空字符串而不是 null
    pub fn header_image_value(&self) -> &str {
        self.header_image.as_deref().unwrap_or_default()
    }
}

/// 解析阅读时间。
///
/// 取开头的数字部分（`"12 min"` 解析为 12），解析失败或小于 1 时返回
/// [`DEFAULT_READ_TIME`]。
pub fn parse_read_time(input: &str) -> u32 {
    let input = input.trim_start();
    let end = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(input.len());

    match input[..end].parse::<u32>() {
        Ok(minutes) if minutes >= 1 => minutes,
        _ => DEFAULT_READ_TIME,
    }
}

/// 分类目录中的一项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// 在分类目录中查找与自由文本匹配的分类。
///
/// 去掉首尾空白后忽略大小写，与分类名或 id 比较。
pub fn reconcile_category<'a>(text: &str, catalog: &'a [Category]) -> Option<&'a Category> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    catalog
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(text) || c.id.eq_ignore_ascii_case(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_time() {
        let cases = [
            ("abc", 5),
            ("12", 12),
            ("", 5),
            ("  7", 7),
            ("12 min", 12),
            ("0", 5),
            ("-3", 5),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_read_time(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_header_image_never_null() {
        let mut meta = ArticleMetadata::default();
        assert_eq!(meta.header_image_value(), "");

        meta.header_image = Some("data:image/png;base64,AAAA".to_string());
        assert_eq!(meta.header_image_value(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_reconcile_category() {
        let catalog = vec![
            Category {
                id: "stress".to_string(),
                name: "Stress & Anxiety".to_string(),
            },
            Category {
                id: "sleep".to_string(),
                name: "Sleep".to_string(),
            },
        ];

        assert_eq!(
            reconcile_category("  stress & anxiety ", &catalog).map(|c| c.id.as_str()),
            Some("stress")
        );
        assert_eq!(
            reconcile_category("SLEEP", &catalog).map(|c| c.name.as_str()),
            Some("Sleep")
        );
        assert!(reconcile_category("Friendship", &catalog).is_none());
        assert!(reconcile_category("", &catalog).is_none());
    }
}
