use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use ratatui::style::Color;
use url::Url;

use crate::attachment::Attachment;
use crate::font::Font;

/// Semantic style keys shared between the compiler and the host.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKey {
    Font,
    ForegroundColor,
    BackgroundColor,
    Link,
    ToolTip,
    Attachment,
    /// The current value of a template variable.
    ObjectValue,
    /// The name of a template variable.
    ObjectValueKey,
    Custom(String),
}

impl AttributeKey {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Font => "font",
            Self::ForegroundColor => "foregroundColor",
            Self::BackgroundColor => "backgroundColor",
            Self::Link => "link",
            Self::ToolTip => "toolTip",
            Self::Attachment => "attachment",
            Self::ObjectValue => "ObjectValue",
            Self::ObjectValueKey => "ObjectValueKey",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a link points. Relative references stay as written when there is no base to resolve
/// them against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    Absolute(Url),
    Relative(String),
}

impl LinkTarget {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(reference) => reference,
        }
    }

    /// The resolved URL, if the target is absolute.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Absolute(url) => Some(url),
            Self::Relative(_) => None,
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Font(Font),
    Color(Color),
    Link(LinkTarget),
    Text(String),
    Attachment(Attachment),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Font> for AttributeValue {
    fn from(value: Font) -> Self {
        Self::Font(value)
    }
}

impl From<Color> for AttributeValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<LinkTarget> for AttributeValue {
    fn from(value: LinkTarget) -> Self {
        Self::Link(value)
    }
}

impl From<Url> for AttributeValue {
    fn from(value: Url) -> Self {
        Self::Link(LinkTarget::Absolute(value))
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Attachment> for AttributeValue {
    fn from(value: Attachment) -> Self {
        Self::Attachment(value)
    }
}

/// A mapping from style keys to style values. Keys are unique.
///
/// Attribute sets are plain values: a node that overrides a key clones its inherited set and
/// changes the copy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSet {
    entries: BTreeMap<AttributeKey, AttributeValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Self {
        self.entries.insert(key, value.into());
        self
    }

    pub fn insert(
        &mut self,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.entries.insert(key, value.into())
    }

    pub fn remove(&mut self, key: &AttributeKey) -> Option<AttributeValue> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &AttributeKey) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &AttributeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AttributeKey, AttributeValue> {
        self.entries.iter()
    }

    pub fn font(&self) -> Option<&Font> {
        match self.get(&AttributeKey::Font)? {
            AttributeValue::Font(font) => Some(font),
            _ => None,
        }
    }

    pub fn color(&self, key: &AttributeKey) -> Option<Color> {
        match self.get(key)? {
            AttributeValue::Color(color) => Some(*color),
            _ => None,
        }
    }

    pub fn link(&self) -> Option<&LinkTarget> {
        match self.get(&AttributeKey::Link)? {
            AttributeValue::Link(target) => Some(target),
            _ => None,
        }
    }

    pub fn text(&self, key: &AttributeKey) -> Option<&str> {
        self.get(key)?.as_text()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self.get(&AttributeKey::Attachment)? {
            AttributeValue::Attachment(attachment) => Some(attachment),
            _ => None,
        }
    }
}

impl FromIterator<(AttributeKey, AttributeValue)> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = (AttributeKey, AttributeValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = (&'a AttributeKey, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, AttributeKey, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
