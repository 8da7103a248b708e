use std::fmt::Write;

use crate::content::{ArticleMetadata, BlockBody, Document};

/// 只读展示时的列表项，去掉空白项，其余项原样保留。
///
/// 文档本身保留空项，保存时原样发送。
pub fn visible_items(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// 将文章渲染为只读的 Markdown 预览
pub fn markdown(meta: &ArticleMetadata, doc: &Document) -> String {
    let mut out = String::new();

    if !meta.title.is_empty() {
        let _ = writeln!(out, "# {}\n", meta.title);
    }

    let mut byline = Vec::new();
    if !meta.author.is_empty() {
        byline.push(meta.author.clone());
    }
    if !meta.category.is_empty() {
        byline.push(meta.category.clone());
    }
    byline.push(format!("{} min read", meta.read_time_minutes()));
    let _ = writeln!(out, "_{}_\n", byline.join(" · "));

    if !meta.description.is_empty() {
        let _ = writeln!(out, "{}\n", meta.description);
    }

    for block in doc.blocks() {
        render_block(&mut out, block.body());
    }

    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

fn render_block(out: &mut String, body: &BlockBody) {
    match body {
        BlockBody::Section { title, content } => {
            if !title.is_empty() {
                let _ = writeln!(out, "## {title}\n");
            }
            if !content.is_empty() {
                let _ = writeln!(out, "{content}\n");
            }
        }
        BlockBody::BulletList { title, items } => {
            if !title.is_empty() {
                let _ = writeln!(out, "### {title}\n");
            }
            render_list(out, items);
        }
        BlockBody::KeyTakeaways { items } => {
            let _ = writeln!(out, "### Key takeaways\n");
            render_list(out, items);
        }
        BlockBody::Image { src, alt_text } => {
            // 没有图片地址时不输出
            if let Some(src) = src.as_deref().filter(|s| !s.is_empty()) {
                let _ = writeln!(out, "![{alt_text}]({src})\n");
            }
        }
        BlockBody::Spacer {} => {
            let _ = writeln!(out, "---\n");
        }
        BlockBody::Reflection { heading, content } => {
            if !heading.is_empty() {
                let _ = writeln!(out, "### {heading}\n");
            }
            for line in content.lines() {
                let _ = writeln!(out, "> {line}");
            }
            out.push('\n');
        }
        BlockBody::Link {
            title,
            url,
            description,
        } => {
            let label = if title.is_empty() { url } else { title };
            let _ = writeln!(out, "[{label}]({url})\n");
            if !description.is_empty() {
                let _ = writeln!(out, "{description}\n");
            }
        }
    }
}

fn render_list(out: &mut String, items: &[String]) {
    let items = visible_items(items);
    if items.is_empty() {
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}
