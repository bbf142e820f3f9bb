//! List item formatting: indentation, markers and numbering.

use richrun_core::AttributeSet;
use richrun_core::PARAGRAPH_SEPARATOR;
use richrun_core::RichText;
use tracing::trace;

use crate::compile::Compiler;
use crate::error::Result;
use crate::options::ListMarkers;
use crate::tree::ListKind;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::Tree;

/// Number of lists enclosing the items of `list`, counting `list` itself.
pub fn nesting_level(tree: &Tree, list: NodeId) -> usize {
    tree.ancestors(list)
        .filter(|&id| tree.kind(id).list_kind().is_some())
        .count()
}

/// Like [`nesting_level`], but only counts lists of the same kind as `list`.
pub fn marker_tier(tree: &Tree, list: NodeId) -> usize {
    let Some(kind) = tree.kind(list).list_kind() else {
        return 0;
    };
    tree.ancestors(list)
        .filter(|&id| tree.kind(id).list_kind() == Some(kind))
        .count()
}

/// The marker text for the `number`th item of a list at `tier`.
pub fn list_marker(kind: ListKind, tier: usize, number: u64, markers: ListMarkers) -> String {
    match (markers, kind) {
        (ListMarkers::Plain, ListKind::Bullet) => "•".to_string(),
        (ListMarkers::Plain, ListKind::Ordered) => format!("{number}."),
        (ListMarkers::Tiered, ListKind::Bullet) => match tier {
            0 | 1 => "•",
            2 => "◦",
            _ => "▪",
        }
        .to_string(),
        (ListMarkers::Tiered, ListKind::Ordered) => match tier {
            0 | 1 => format!("{number}."),
            2 => format!("{}.", alphabetic(number)),
            _ => format!("{}.", roman(number)),
        },
    }
}

/// `1 -> a`, `26 -> z`, `27 -> aa`.
fn alphabetic(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

fn roman(mut n: u64) -> String {
    const NUMERALS: [(u64, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    if n == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

impl Compiler<'_> {
    /// Compiles the item at `position` within `list`, prefixed by its indentation and marker.
    pub(crate) fn format_item(
        &self,
        item: NodeId,
        list: NodeId,
        position: usize,
        attributes: &AttributeSet,
    ) -> Result<RichText> {
        let (kind, start) = match self.tree.kind(list) {
            NodeKind::List { kind, start, .. } => (*kind, *start),
            _ => (ListKind::Bullet, 1),
        };
        let number = if self.options.respect_list_start {
            start.saturating_add(position as u64)
        } else {
            position as u64 + 1
        };
        let nesting = nesting_level(self.tree, list);
        let tier = marker_tier(self.tree, list);
        let marker = list_marker(kind, tier, number, self.options.list_markers);
        trace!(nesting, tier, %marker, "formatting list item");

        let prefix = format!("{}{marker} ", self.options.indent.repeat(nesting));
        let mut text = RichText::styled(prefix, attributes.clone());
        text.append(self.compile_children(item, attributes, Some(PARAGRAPH_SEPARATOR))?);
        Ok(text)
    }
}
