//! HTML fallback for block containers that hold raw HTML blocks.
//!
//! The subtree is serialized back to HTML with [`to_html`] and handed to an [`HtmlRenderer`].
//! [`LiteralHtmlRenderer`] (the default) keeps the markup as text; [`PlainTextHtmlRenderer`]
//! strips it.

use richrun_core::AttributeSet;
use richrun_core::LINE_SEPARATOR;
use richrun_core::PARAGRAPH_SEPARATOR;
use richrun_core::RichText;

use crate::error::HtmlRenderError;
use crate::tree::ListKind;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::Tree;

/// Host service turning HTML into styled text.
pub trait HtmlRenderer {
    fn render(&self, html: &str, base: &AttributeSet) -> Result<RichText, HtmlRenderError>;
}

/// Emits the HTML source itself as one run carrying the base attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralHtmlRenderer;

impl HtmlRenderer for LiteralHtmlRenderer {
    fn render(&self, html: &str, base: &AttributeSet) -> Result<RichText, HtmlRenderError> {
        Ok(RichText::styled(html, base.clone()))
    }
}

/// Drops tags and keeps the text, breaking blocks at block-level closing tags and lines at
/// `<br>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextHtmlRenderer;

const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "ul",
    "ol",
    "blockquote",
    "pre",
    "hr",
    "table",
    "tr",
];

impl HtmlRenderer for PlainTextHtmlRenderer {
    fn render(&self, html: &str, base: &AttributeSet) -> Result<RichText, HtmlRenderError> {
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = html.char_indices();

        while let Some((start, ch)) = chars.next() {
            if ch != '<' || !starts_tag(&html[start + 1..]) {
                current.push(ch);
                continue;
            }
            let Some((end, _)) = chars.by_ref().find(|&(_, c)| c == '>') else {
                return Err(HtmlRenderError::new(format!(
                    "unterminated tag at byte {start}"
                )));
            };
            let tag = &html[start + 1..end];
            let closing = tag.starts_with('/');
            let name: String = tag
                .trim_start_matches('/')
                .chars()
                .take_while(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect();

            if name == "br" {
                current.push_str(LINE_SEPARATOR);
            } else if BLOCK_TAGS.contains(&name.as_str()) && (closing || name == "hr") {
                flush_block(&mut blocks, &mut current);
            }
        }
        flush_block(&mut blocks, &mut current);

        Ok(RichText::styled(blocks.join(PARAGRAPH_SEPARATOR), base.clone()))
    }
}

/// A `<` opens a tag only when followed by `/`, `!` or a letter.
fn starts_tag(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| c == '/' || c == '!' || c.is_ascii_alphabetic())
}

fn flush_block(blocks: &mut Vec<String>, current: &mut String) {
    let text = std::mem::take(current);
    let block = text
        .split(LINE_SEPARATOR)
        .map(|line| normalize_whitespace(&decode_basic_html_entities(line)))
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);
    if !block.trim_matches(|c: char| c.is_whitespace()).is_empty() {
        blocks.push(block);
    }
}

fn decode_basic_html_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn normalize_whitespace(s: &str) -> String {
    let mut out = String::new();
    let mut last_was_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_was_ws {
                out.push(' ');
                last_was_ws = true;
            }
        } else {
            out.push(ch);
            last_was_ws = false;
        }
    }
    out.trim().to_string()
}

/// Serializes the subtree rooted at `id` to CommonMark-style HTML.
pub fn to_html(tree: &Tree, id: NodeId) -> String {
    let mut out = String::with_capacity(256);
    write_node(tree, id, false, &mut out);
    out
}

fn write_children(tree: &Tree, id: NodeId, tight: bool, out: &mut String) {
    for &child in tree.children(id) {
        write_node(tree, child, tight, out);
    }
}

fn write_node(tree: &Tree, id: NodeId, tight: bool, out: &mut String) {
    match tree.kind(id) {
        NodeKind::Document | NodeKind::Unsupported { .. } => write_children(tree, id, tight, out),
        NodeKind::BlockQuote => {
            out.push_str("<blockquote>\n");
            write_children(tree, id, false, out);
            out.push_str("</blockquote>\n");
        }
        NodeKind::Paragraph if tight => write_children(tree, id, false, out),
        NodeKind::Paragraph => {
            out.push_str("<p>");
            write_children(tree, id, false, out);
            out.push_str("</p>\n");
        }
        NodeKind::Heading { level } => {
            out.push_str(&format!("<h{level}>"));
            write_children(tree, id, false, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        NodeKind::CodeBlock { info, literal } => {
            match info.split_whitespace().next() {
                Some(lang) => {
                    out.push_str("<pre><code class=\"language-");
                    escape_into(lang, out);
                    out.push_str("\">");
                }
                None => out.push_str("<pre><code>"),
            }
            escape_into(literal, out);
            out.push_str("</code></pre>\n");
        }
        NodeKind::HtmlBlock { literal } => out.push_str(literal),
        NodeKind::List { kind, start, tight } => {
            let tag = match kind {
                ListKind::Bullet => "ul",
                ListKind::Ordered => "ol",
            };
            if *kind == ListKind::Ordered && *start != 1 {
                out.push_str(&format!("<ol start=\"{start}\">\n"));
            } else {
                out.push_str(&format!("<{tag}>\n"));
            }
            write_children(tree, id, *tight, out);
            out.push_str(&format!("</{tag}>\n"));
        }
        NodeKind::Item => {
            out.push_str("<li>");
            for (i, &child) in tree.children(id).iter().enumerate() {
                let inline_para = tight && matches!(tree.kind(child), NodeKind::Paragraph);
                if (i > 0 || !inline_para) && !out.ends_with('\n') {
                    out.push('\n');
                }
                write_node(tree, child, tight, out);
            }
            out.push_str("</li>\n");
        }
        NodeKind::ThematicBreak => out.push_str("<hr />\n"),
        NodeKind::Text(text) => escape_into(text, out),
        NodeKind::Code(code) => {
            out.push_str("<code>");
            escape_into(code, out);
            out.push_str("</code>");
        }
        NodeKind::InlineHtml(html) => out.push_str(html),
        NodeKind::Emphasis => {
            out.push_str("<em>");
            write_children(tree, id, false, out);
            out.push_str("</em>");
        }
        NodeKind::Strong => {
            out.push_str("<strong>");
            write_children(tree, id, false, out);
            out.push_str("</strong>");
        }
        NodeKind::Link { url, title } => {
            out.push_str("<a href=\"");
            escape_into(url, out);
            out.push('"');
            if !title.is_empty() {
                out.push_str(" title=\"");
                escape_into(title, out);
                out.push('"');
            }
            out.push('>');
            write_children(tree, id, false, out);
            out.push_str("</a>");
        }
        NodeKind::Image { url, title, alt } => {
            out.push_str("<img src=\"");
            escape_into(url, out);
            out.push_str("\" alt=\"");
            escape_into(alt, out);
            out.push('"');
            if !title.is_empty() {
                out.push_str(" title=\"");
                escape_into(title, out);
                out.push('"');
            }
            out.push_str(" />");
        }
        NodeKind::SoftBreak => out.push('\n'),
        NodeKind::HardBreak => out.push_str("<br />\n"),
    }
}

fn escape_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
