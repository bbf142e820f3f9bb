//! Builds a [`Tree`] from `pulldown-cmark` events.

use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;

use crate::tree::ListKind;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::Tree;

/// Parser extensions. The default is plain CommonMark.
///
/// Constructs enabled here that the compiler does not style (tables, footnotes, ...) end up as
/// [`NodeKind::Unsupported`] nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub task_lists: bool,
    pub smart_punctuation: bool,
}

impl ParseOptions {
    fn to_cmark(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_TASKLISTS, self.task_lists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options
    }
}

impl Tree {
    /// Parses `source` into a tree rooted at a [`NodeKind::Document`].
    pub fn parse(source: &str, options: &ParseOptions) -> Tree {
        let mut builder = Builder::new();
        for event in Parser::new_ext(source, options.to_cmark()) {
            builder.event(event);
        }
        builder.tree
    }
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    id: NodeId,
    /// Paragraph synthesized around inline content of a tight list item. The parser never sends
    /// an end event for it.
    implicit: bool,
}

struct Builder {
    tree: Tree,
    stack: Vec<Frame>,
    /// Tags opened inside an image's alt text.
    suppressed: usize,
}

impl Builder {
    fn new() -> Self {
        Self {
            tree: Tree::new(NodeKind::Document),
            stack: Vec::new(),
            suppressed: 0,
        }
    }

    fn top(&self) -> NodeId {
        self.stack
            .last()
            .map(|frame| frame.id)
            .unwrap_or_else(|| self.tree.root())
    }

    fn in_image(&self) -> bool {
        matches!(self.tree.kind(self.top()), NodeKind::Image { .. })
    }

    fn open(&mut self, kind: NodeKind) {
        let id = self.tree.push(self.top(), kind);
        self.stack.push(Frame {
            id,
            implicit: false,
        });
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.tree.push(self.top(), kind);
    }

    fn close_implicit(&mut self) {
        if self.stack.last().is_some_and(|frame| frame.implicit) {
            self.stack.pop();
        }
    }

    /// Items hold blocks; inline content arriving directly in an item gets a paragraph.
    fn ensure_inline_parent(&mut self) {
        let top = self.top();
        if matches!(self.tree.kind(top), NodeKind::Item) {
            let id = self.tree.push(top, NodeKind::Paragraph);
            self.stack.push(Frame { id, implicit: true });
        }
    }

    fn mark_loose(&mut self) {
        let top = self.top();
        if !matches!(self.tree.kind(top), NodeKind::Item) {
            return;
        }
        if let Some(list) = self.tree.parent(top)
            && let NodeKind::List { tight, .. } = self.tree.kind_mut(list)
        {
            *tight = false;
        }
    }

    fn push_alt(&mut self, text: &str) {
        let top = self.top();
        if let NodeKind::Image { alt, .. } = self.tree.kind_mut(top) {
            alt.push_str(text);
        }
    }

    fn text(&mut self, text: &str) {
        let top = self.top();
        match self.tree.kind_mut(top) {
            NodeKind::CodeBlock { literal, .. } | NodeKind::HtmlBlock { literal } => {
                literal.push_str(text);
                return;
            }
            NodeKind::Image { alt, .. } => {
                alt.push_str(text);
                return;
            }
            _ => {}
        }

        self.ensure_inline_parent();
        let top = self.top();
        if let Some(&last) = self.tree.children(top).last()
            && let NodeKind::Text(existing) = self.tree.kind_mut(last)
        {
            existing.push_str(text);
            return;
        }
        self.leaf(NodeKind::Text(text.to_string()));
    }

    fn inline_leaf(&mut self, kind: NodeKind) {
        self.ensure_inline_parent();
        self.leaf(kind);
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                if self.in_image() {
                    self.suppressed += 1;
                    return;
                }
                if is_inline_tag(&tag) {
                    self.ensure_inline_parent();
                } else {
                    self.close_implicit();
                }
                if matches!(tag, Tag::Paragraph) {
                    self.mark_loose();
                }
                self.open(node_kind_for_tag(tag));
            }
            Event::End(_) => {
                if self.in_image() && self.suppressed > 0 {
                    self.suppressed -= 1;
                    return;
                }
                self.close_implicit();
                self.stack.pop();
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.in_image() {
                    self.push_alt(&code);
                } else {
                    self.inline_leaf(NodeKind::Code(code.to_string()));
                }
            }
            Event::Html(html) => {
                if matches!(self.tree.kind(self.top()), NodeKind::HtmlBlock { .. }) {
                    self.text(&html);
                } else {
                    self.inline_leaf(NodeKind::InlineHtml(html.to_string()));
                }
            }
            Event::InlineHtml(html) => self.inline_leaf(NodeKind::InlineHtml(html.to_string())),
            Event::SoftBreak | Event::HardBreak if self.in_image() => self.push_alt(" "),
            Event::SoftBreak => self.inline_leaf(NodeKind::SoftBreak),
            Event::HardBreak => self.inline_leaf(NodeKind::HardBreak),
            Event::Rule => {
                self.close_implicit();
                self.leaf(NodeKind::ThematicBreak);
            }
            Event::FootnoteReference(_) => self.inline_leaf(NodeKind::Unsupported {
                name: "footnote_reference",
            }),
            Event::TaskListMarker(_) => self.inline_leaf(NodeKind::Unsupported {
                name: "task_list_marker",
            }),
            _ => self.inline_leaf(NodeKind::Unsupported { name: "math" }),
        }
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn node_kind_for_tag(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: heading_level(level),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => info.to_string(),
                CodeBlockKind::Indented => String::new(),
            },
            literal: String::new(),
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock {
            literal: String::new(),
        },
        Tag::List(start) => NodeKind::List {
            kind: if start.is_some() {
                ListKind::Ordered
            } else {
                ListKind::Bullet
            },
            start: start.unwrap_or(1),
            tight: true,
        },
        Tag::Item => NodeKind::Item,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Link {
            dest_url, title, ..
        } => NodeKind::Link {
            url: dest_url.to_string(),
            title: title.to_string(),
        },
        Tag::Image {
            dest_url, title, ..
        } => NodeKind::Image {
            url: dest_url.to_string(),
            title: title.to_string(),
            alt: String::new(),
        },
        Tag::Strikethrough => NodeKind::Unsupported {
            name: "strikethrough",
        },
        Tag::FootnoteDefinition(_) => NodeKind::Unsupported {
            name: "footnote_definition",
        },
        Tag::Table(_) => NodeKind::Unsupported { name: "table" },
        Tag::TableHead => NodeKind::Unsupported { name: "table_head" },
        Tag::TableRow => NodeKind::Unsupported { name: "table_row" },
        Tag::TableCell => NodeKind::Unsupported { name: "table_cell" },
        _ => NodeKind::Unsupported { name: "extension" },
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
