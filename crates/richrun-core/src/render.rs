//! Render core: turn runs into `ratatui` text.
//!
//! Lines break on `\n`, [`LINE_SEPARATOR`] and [`PARAGRAPH_SEPARATOR`]. Tabs expand to
//! [`Theme::tab_width`] spaces. Attachments have no terminal representation, so they are drawn as
//! `[name]` in the muted style.

use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;
use unicode_width::UnicodeWidthStr;

use crate::attributes::AttributeKey;
use crate::attributes::AttributeSet;
use crate::text::LINE_SEPARATOR;
use crate::text::PARAGRAPH_SEPARATOR;
use crate::text::RichText;
use crate::theme::Theme;

#[derive(Clone, Debug, Default)]
pub struct RenderedRichText {
    text: Text<'static>,
    content_width: u16,
    content_height: u32,
}

impl RenderedRichText {
    pub fn text(&self) -> &Text<'static> {
        &self.text
    }

    pub fn into_text(self) -> Text<'static> {
        self.text
    }

    /// Widest line, in terminal cells.
    pub fn content_width(&self) -> u16 {
        self.content_width
    }

    pub fn content_height(&self) -> u32 {
        self.content_height
    }
}

impl RichText {
    pub fn render(&self, theme: &Theme) -> RenderedRichText {
        let tab = " ".repeat(theme.tab_width as usize);
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut current: Vec<Span<'static>> = Vec::new();

        for run in self.runs() {
            let style = style_for_attributes(theme, &run.attributes);
            if let Some(attachment) = run.attributes.attachment() {
                current.push(Span::styled(
                    format!("[{}]", attachment.name()),
                    theme.text_muted,
                ));
            }

            let mut pieces = run.text.split(is_line_break).peekable();
            while let Some(piece) = pieces.next() {
                if !piece.is_empty() {
                    current.push(Span::styled(piece.replace('\t', &tab), style));
                }
                if pieces.peek().is_some() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
            }
        }
        lines.push(Line::from(current));

        let content_width = lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(0)
            .min(u16::MAX as usize) as u16;
        let content_height = lines.len() as u32;

        RenderedRichText {
            text: Text::from(lines),
            content_width,
            content_height,
        }
    }

    pub fn to_text(&self, theme: &Theme) -> Text<'static> {
        self.render(theme).into_text()
    }
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || LINE_SEPARATOR.contains(ch) || PARAGRAPH_SEPARATOR.contains(ch)
}

/// Maps an attribute set onto a terminal style.
pub fn style_for_attributes(theme: &Theme, attributes: &AttributeSet) -> Style {
    let mut style = theme.text_primary;

    if let Some(font) = attributes.font() {
        if font.is_monospace() {
            style = style.patch(theme.code_inline);
        }
        if font.is_bold() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if font.is_italic() {
            style = style.add_modifier(Modifier::ITALIC);
        }
    }
    if attributes.link().is_some() {
        style = style.patch(theme.link);
    }
    if let Some(fg) = attributes.color(&AttributeKey::ForegroundColor) {
        style = style.fg(fg);
    }
    if let Some(bg) = attributes.color(&AttributeKey::BackgroundColor) {
        style = style.bg(bg);
    }

    style
}
