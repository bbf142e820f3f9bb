//! Attribute resolution: what a node changes in the attribute set it inherits.

use richrun_core::AttributeKey;
use richrun_core::AttributeSet;
use richrun_core::Font;
use richrun_core::FontProvider;
use richrun_core::FontTraits;
use richrun_core::LinkTarget;
use url::Url;

use crate::tree::NodeKind;

/// Font size multiplier for a heading level. Levels outside 1..=6 keep the body size.
pub fn heading_size_multiplier(level: u8) -> f32 {
    match level {
        1 => 2.00,
        2 => 1.50,
        3 => 1.17,
        4 => 1.00,
        5 => 0.83,
        6 => 0.67,
        _ => 1.00,
    }
}

/// Parses `<key name/>`-style inline markup into an attribute override.
///
/// Angle brackets and slashes are dropped and the rest must split into exactly two words: a
/// name and a value. `value` and `key` map onto the template variable keys, any other name is
/// used as a custom key.
pub fn parse_raw_markup(literal: &str) -> Option<(AttributeKey, String)> {
    let stripped: String = literal
        .chars()
        .filter(|c| !matches!(c, '<' | '/' | '>'))
        .collect();
    let mut words = stripped.split_whitespace();
    let (Some(name), Some(value), None) = (words.next(), words.next(), words.next()) else {
        return None;
    };
    let key = match name {
        "value" => AttributeKey::ObjectValue,
        "key" => AttributeKey::ObjectValueKey,
        other => AttributeKey::custom(other),
    };
    Some((key, value.to_string()))
}

pub struct AttributeResolver<'a> {
    fonts: &'a dyn FontProvider,
    base_url: Option<Url>,
}

impl<'a> AttributeResolver<'a> {
    /// `base_url` resolves relative link destinations; without it they are kept as written.
    pub fn new(fonts: &'a dyn FontProvider, base_url: Option<Url>) -> Self {
        Self { fonts, base_url }
    }

    /// The attributes `kind` applies to its own content and passes to its children.
    pub fn resolve(&self, kind: &NodeKind, inherited: &AttributeSet) -> AttributeSet {
        let mut attributes = inherited.clone();
        match kind {
            NodeKind::BlockQuote | NodeKind::Emphasis => {
                let font = self.fonts.adding_traits(&self.font(inherited), FontTraits::ITALIC);
                attributes.insert(AttributeKey::Font, font);
            }
            NodeKind::Strong => {
                let font = self.fonts.adding_traits(&self.font(inherited), FontTraits::BOLD);
                attributes.insert(AttributeKey::Font, font);
            }
            NodeKind::Heading { level } => {
                let font = self.font(inherited);
                let size = font.size * heading_size_multiplier(*level);
                let font = self
                    .fonts
                    .adding_traits(&self.fonts.resized(&font, size), FontTraits::BOLD);
                attributes.insert(AttributeKey::Font, font);
            }
            NodeKind::CodeBlock { .. } | NodeKind::Code(_) => {
                let font = self.fonts.monospaced(&self.font(inherited));
                attributes.insert(AttributeKey::Font, font);
            }
            NodeKind::Link { url, title } => {
                if let Some(url) = self.link_target(url) {
                    attributes.insert(AttributeKey::Link, url);
                }
                if !title.is_empty() {
                    attributes.insert(AttributeKey::ToolTip, title.as_str());
                }
            }
            NodeKind::InlineHtml(literal) => {
                if let Some((key, value)) = parse_raw_markup(literal) {
                    attributes.insert(key, value);
                }
            }
            _ => {}
        }
        attributes
    }

    fn font(&self, attributes: &AttributeSet) -> Font {
        attributes
            .font()
            .cloned()
            .unwrap_or_else(|| self.fonts.default_font())
    }

    fn link_target(&self, url: &str) -> Option<LinkTarget> {
        if url.is_empty() {
            return None;
        }
        match Url::parse(url) {
            Ok(url) => Some(LinkTarget::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let resolved = self.base_url.as_ref().and_then(|base| base.join(url).ok());
                Some(match resolved {
                    Some(url) => LinkTarget::Absolute(url),
                    None => LinkTarget::Relative(url.to_string()),
                })
            }
            Err(_) => None,
        }
    }
}
