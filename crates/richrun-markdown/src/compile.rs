//! The run compiler: a depth-first walk turning a [`Tree`] into [`RichText`].

use richrun_core::AttachmentMap;
use richrun_core::AttributeSet;
use richrun_core::LINE_SEPARATOR;
use richrun_core::PARAGRAPH_SEPARATOR;
use richrun_core::RichText;
use richrun_core::Run;
use tracing::debug;
use tracing::trace;
use url::Url;

use crate::error::CompileError;
use crate::error::Result;
use crate::html::to_html;
use crate::options::CompileOptions;
use crate::resolve::AttributeResolver;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::Tree;

/// Compiles `tree` with default [`CompileOptions`].
pub fn compile_document(
    tree: &Tree,
    base: &AttributeSet,
    attachments: &AttachmentMap,
) -> Result<RichText> {
    compile_document_with(tree, base, attachments, &CompileOptions::default())
}

pub fn compile_document_with(
    tree: &Tree,
    base: &AttributeSet,
    attachments: &AttachmentMap,
    options: &CompileOptions,
) -> Result<RichText> {
    debug!(
        nodes = tree.len(),
        attachments = attachments.len(),
        "compiling document"
    );
    let text = Compiler::new(tree, attachments, options).compile(tree.root(), base)?;
    debug!(runs = text.runs().len(), bytes = text.len(), "compiled document");
    Ok(text)
}

pub struct Compiler<'a> {
    pub(crate) tree: &'a Tree,
    pub(crate) options: &'a CompileOptions,
    attachments: &'a AttachmentMap,
    resolver: AttributeResolver<'a>,
}

impl<'a> Compiler<'a> {
    pub fn new(tree: &'a Tree, attachments: &'a AttachmentMap, options: &'a CompileOptions) -> Self {
        let base_url = options.base_url.as_deref().and_then(|base| match Url::parse(base) {
            Ok(url) => Some(url),
            Err(err) => {
                debug!(base, %err, "ignoring unparseable base url");
                None
            }
        });
        Self {
            tree,
            options,
            attachments,
            resolver: AttributeResolver::new(options.fonts.as_ref(), base_url),
        }
    }

    /// Compiles the subtree at `id` under the inherited `attributes`.
    pub fn compile(&self, id: NodeId, attributes: &AttributeSet) -> Result<RichText> {
        let kind = self.tree.kind(id);
        match kind {
            NodeKind::SoftBreak => Ok(RichText::styled(" ", attributes.clone())),
            NodeKind::HardBreak | NodeKind::ThematicBreak => {
                Ok(RichText::styled(LINE_SEPARATOR, attributes.clone()))
            }
            NodeKind::Text(_)
            | NodeKind::Code(_)
            | NodeKind::InlineHtml(_)
            | NodeKind::CodeBlock { .. }
            | NodeKind::HtmlBlock { .. } => {
                let attributes = self.resolver.resolve(kind, attributes);
                Ok(RichText::styled(
                    kind.literal().unwrap_or_default(),
                    attributes,
                ))
            }
            NodeKind::Document | NodeKind::BlockQuote | NodeKind::Item => {
                let attributes = self.resolver.resolve(kind, attributes);
                if self.has_html_block(id) {
                    return self.render_html(id, &attributes);
                }
                self.compile_children(id, &attributes, Some(PARAGRAPH_SEPARATOR))
            }
            NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Link { .. } => {
                let attributes = self.resolver.resolve(kind, attributes);
                self.compile_children(id, &attributes, None)
            }
            NodeKind::List { .. } => {
                let attributes = self.resolver.resolve(kind, attributes);
                let items = self
                    .tree
                    .children(id)
                    .iter()
                    .enumerate()
                    .map(|(position, &item)| self.format_item(item, id, position, &attributes))
                    .collect::<Result<Vec<_>>>()?;
                Ok(RichText::joined(items, Some(PARAGRAPH_SEPARATOR)))
            }
            NodeKind::Image { url, .. } => self.image(url, attributes),
            NodeKind::Unsupported { name } => {
                trace!(name, "skipping unsupported node");
                Ok(RichText::new())
            }
        }
    }

    /// Compiles every child of `id` and joins the results.
    pub(crate) fn compile_children(
        &self,
        id: NodeId,
        attributes: &AttributeSet,
        separator: Option<&str>,
    ) -> Result<RichText> {
        let parts = self
            .tree
            .children(id)
            .iter()
            .map(|&child| self.compile(child, attributes))
            .collect::<Result<Vec<_>>>()?;
        Ok(RichText::joined(parts, separator))
    }

    fn has_html_block(&self, id: NodeId) -> bool {
        self.tree
            .children(id)
            .iter()
            .any(|&child| matches!(self.tree.kind(child), NodeKind::HtmlBlock { .. }))
    }

    fn render_html(&self, id: NodeId, attributes: &AttributeSet) -> Result<RichText> {
        let html = to_html(self.tree, id);
        trace!(bytes = html.len(), "rendering block container as HTML");
        Ok(self.options.html_renderer.render(&html, attributes)?)
    }

    fn image(&self, url: &str, attributes: &AttributeSet) -> Result<RichText> {
        if url.is_empty() {
            return Ok(RichText::new());
        }
        let Some(attachment) = self.attachments.get(url) else {
            debug!(key = url, "image attachment missing");
            return Err(CompileError::AttachmentMissing {
                key: url.to_string(),
            });
        };
        Ok(RichText::from(Run::attachment(
            attachment.clone(),
            attributes,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HtmlRenderError;
    use crate::html::HtmlRenderer;
    use crate::html::PlainTextHtmlRenderer;
    use crate::parse::ParseOptions;
    use ratatui::style::Color;
    use richrun_core::Attachment;
    use richrun_core::AttributeKey;
    use richrun_core::Font;
    use richrun_core::LinkTarget;
    use std::sync::Arc;

    fn base() -> AttributeSet {
        AttributeSet::new()
            .with(AttributeKey::Font, Font::new("Helvetica", 24.0))
            .with(AttributeKey::ForegroundColor, Color::Blue)
    }

    fn compile_md(md: &str) -> Result<RichText> {
        let tree = Tree::parse(md, &ParseOptions::default());
        compile_document(&tree, &base(), &AttachmentMap::new())
    }

    fn texts(text: &RichText) -> Vec<&str> {
        text.runs().iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn literal_yields_exactly_one_run() {
        let mut tree = Tree::new(NodeKind::Document);
        let text = tree.push(tree.root(), NodeKind::Text("T".to_string()));
        let options = CompileOptions::default();
        let attachments = AttachmentMap::new();
        let compiler = Compiler::new(&tree, &attachments, &options);
        let out = compiler.compile(text, &base());
        assert_eq!(out, Ok(RichText::styled("T", base())));
    }

    #[test]
    fn empty_literal_is_an_empty_run_not_nothing() {
        let tree = Tree::new(NodeKind::Code(String::new()));
        let out = compile_document(&tree, &base(), &AttachmentMap::new());
        let out = out.map(|t| (t.runs().len(), t.string()));
        assert_eq!(out, Ok((1, String::new())));
    }

    #[test]
    fn block_children_are_separated() {
        let mut tree = Tree::new(NodeKind::Document);
        for word in ["a", "b", "c"] {
            let para = tree.push(tree.root(), NodeKind::Paragraph);
            tree.push(para, NodeKind::Text(word.to_string()));
        }
        let out = compile_document(&tree, &base(), &AttachmentMap::new());
        let runs = out.map(|t| t.into_runs());
        let Ok(runs) = runs else {
            panic!("compile failed: {runs:?}");
        };
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            ["a", PARAGRAPH_SEPARATOR, "b", PARAGRAPH_SEPARATOR, "c"]
        );
    }

    #[test]
    fn empty_document_compiles_to_empty_text() {
        let tree = Tree::new(NodeKind::Document);
        let out = compile_document(&tree, &base(), &AttachmentMap::new());
        assert_eq!(out.map(|t| t.string()), Ok(String::new()));
    }

    #[test]
    fn breaks_and_rules() {
        let out = compile_md("a\nb  \nc\n\n***").map(|t| t.string());
        assert_eq!(out, Ok("a b\u{2028}c\u{2029}\u{2028}".to_string()));
    }

    #[test]
    fn readme_example_keeps_text_and_styles() {
        let out = compile_md("A *bold* way to add __emphasis__ to your `code`");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert_eq!(out.string(), "A bold way to add emphasis to your code");

        let font_of = |needle: &str| {
            out.runs()
                .iter()
                .find(|r| r.text == needle)
                .and_then(|r| r.attributes.font().cloned())
        };
        assert!(font_of("bold").is_some_and(|f| f.is_italic() && !f.is_bold()));
        assert!(font_of("emphasis").is_some_and(|f| f.is_bold() && !f.is_italic()));
        assert!(font_of("code").is_some_and(|f| f.is_monospace()));
        assert!(font_of("A ").is_some_and(|f| f == Font::new("Helvetica", 24.0)));
        assert!(
            out.runs()
                .iter()
                .all(|r| r.attributes.color(&AttributeKey::ForegroundColor) == Some(Color::Blue))
        );
    }

    #[test]
    fn inline_key_markup_passes_through_and_tags_itself() {
        let out = compile_md("A *bold* <key skeleton/> way to add __emphasis__ to your `code`");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert_eq!(
            out.string(),
            "A bold <key skeleton/> way to add emphasis to your code"
        );
        let tagged = out.runs().iter().find(|r| r.text == "<key skeleton/>");
        assert_eq!(
            tagged.and_then(|r| r.attributes.text(&AttributeKey::ObjectValueKey)),
            Some("skeleton")
        );
        assert!(
            out.runs()
                .iter()
                .filter(|r| r.text != "<key skeleton/>")
                .all(|r| !r.attributes.contains(&AttributeKey::ObjectValueKey))
        );
    }

    #[test]
    fn malformed_inline_markup_is_plain_text() {
        let out = compile_md("line<br/>break").map(|t| {
            t.runs()
                .iter()
                .find(|r| r.text == "<br/>")
                .map(|r| r.attributes == base())
        });
        assert_eq!(out, Ok(Some(true)));
    }

    #[test]
    fn heading_uses_level_size_and_bold() {
        let out = compile_md("# Universal Declaration\n\n## Article 1.\n\nAll human beings.");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert!(out.string().starts_with("Universal Declaration"));
        let sizes: Vec<f32> = out
            .runs()
            .iter()
            .filter(|r| r.text != PARAGRAPH_SEPARATOR)
            .filter_map(|r| r.attributes.font().map(|f| f.size))
            .collect();
        assert_eq!(sizes, [48.0, 36.0, 24.0]);
    }

    #[test]
    fn link_sets_target_and_tooltip() {
        let out = compile_md("[here](https://example.com \"Example\")");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        let run = &out.runs()[0];
        assert_eq!(run.text, "here");
        assert_eq!(
            run.attributes.link().map(LinkTarget::as_str),
            Some("https://example.com/")
        );
        assert_eq!(run.attributes.text(&AttributeKey::ToolTip), Some("Example"));
    }

    #[test]
    fn relative_links_are_kept_without_a_base() {
        let out = compile_md("[intro](docs/intro.md) and [top](#top)");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        let link_of = |needle: &str| {
            out.runs()
                .iter()
                .find(|r| r.text == needle)
                .and_then(|r| r.attributes.link().cloned())
        };
        assert_eq!(
            link_of("intro"),
            Some(LinkTarget::Relative("docs/intro.md".to_string()))
        );
        assert_eq!(link_of("top"), Some(LinkTarget::Relative("#top".to_string())));
        assert_eq!(link_of(" and "), None);

        let tree = Tree::parse("[top](#top)", &ParseOptions::default());
        let options = CompileOptions {
            base_url: Some("https://example.com/guide/".to_string()),
            ..CompileOptions::default()
        };
        let out = compile_document_with(&tree, &base(), &AttachmentMap::new(), &options);
        let link = out.ok().and_then(|t| t.runs()[0].attributes.link().cloned());
        assert_eq!(
            link.as_ref().and_then(LinkTarget::url).map(Url::as_str),
            Some("https://example.com/guide/#top")
        );
    }

    #[test]
    fn missing_attachment_aborts_compilation() {
        let out = compile_md("before\n\n![cat](cat.png)\n\nafter");
        assert_eq!(
            out,
            Err(CompileError::AttachmentMissing {
                key: "cat.png".to_string()
            })
        );
    }

    #[test]
    fn present_attachment_is_a_zero_length_run() {
        let tree = Tree::parse("see ![cat](cat.png)", &ParseOptions::default());
        let attachments =
            AttachmentMap::from([("cat.png".to_string(), Attachment::new("cat.png"))]);
        let out = compile_document(&tree, &base(), &attachments);
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert_eq!(out.string(), "see ");
        let image = &out.runs()[1];
        assert!(image.text.is_empty());
        assert_eq!(image.attributes.attachment(), Some(&Attachment::new("cat.png")));
        assert_eq!(
            image.attributes.color(&AttributeKey::ForegroundColor),
            Some(Color::Blue)
        );
    }

    #[test]
    fn html_block_sends_container_through_renderer() {
        let md = "Intro *here*\n\n<div>\nraw\n</div>\n";
        let out = compile_md(md).map(|t| t.string());
        assert_eq!(
            out,
            Ok("<p>Intro <em>here</em></p>\n<div>\nraw\n</div>\n".to_string())
        );

        let tree = Tree::parse(md, &ParseOptions::default());
        let options = CompileOptions {
            html_renderer: Arc::new(PlainTextHtmlRenderer),
            ..CompileOptions::default()
        };
        let out = compile_document_with(&tree, &base(), &AttachmentMap::new(), &options);
        assert_eq!(
            out.map(|t| t.string()),
            Ok("Intro here\u{2029}raw".to_string())
        );
    }

    #[test]
    fn html_renderer_errors_surface() {
        struct Broken;
        impl HtmlRenderer for Broken {
            fn render(
                &self,
                _html: &str,
                _base: &AttributeSet,
            ) -> std::result::Result<RichText, HtmlRenderError> {
                Err(HtmlRenderError::new("no engine"))
            }
        }

        let tree = Tree::parse("<div>x</div>\n", &ParseOptions::default());
        let options = CompileOptions {
            html_renderer: Arc::new(Broken),
            ..CompileOptions::default()
        };
        let out = compile_document_with(&tree, &base(), &AttachmentMap::new(), &options);
        assert_eq!(
            out,
            Err(CompileError::HtmlRender(HtmlRenderError::new("no engine")))
        );
    }

    #[test]
    fn unsupported_nodes_vanish() {
        let tree = Tree::parse(
            "a ~~b~~ c",
            &ParseOptions {
                strikethrough: true,
                ..ParseOptions::default()
            },
        );
        let out = compile_document(&tree, &base(), &AttachmentMap::new());
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert_eq!(texts(&out), ["a ", " c"]);
    }

    #[test]
    fn block_quote_italicizes_contents() {
        let out = compile_md("> quoted");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert_eq!(out.string(), "quoted");
        assert!(out.runs()[0].attributes.font().is_some_and(Font::is_italic));
    }

    #[test]
    fn code_block_is_monospace_verbatim() {
        let out = compile_md("```\nlet x = *y*;\n```\n");
        let Ok(out) = out else {
            panic!("compile failed: {out:?}");
        };
        assert_eq!(texts(&out), ["let x = *y*;\n"]);
        assert!(out.runs()[0].attributes.font().is_some_and(Font::is_monospace));
    }
}
