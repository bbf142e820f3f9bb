//! Arena-backed Markdown node tree.
//!
//! Nodes own nothing: the [`Tree`] owns every node, children are listed by [`NodeId`], and the
//! parent link is a plain id used only to count enclosing lists.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    BlockQuote,
    Paragraph,
    Heading {
        level: u8,
    },
    CodeBlock {
        info: String,
        literal: String,
    },
    HtmlBlock {
        literal: String,
    },
    List {
        kind: ListKind,
        start: u64,
        tight: bool,
    },
    Item,
    ThematicBreak,

    Text(String),
    Code(String),
    InlineHtml(String),
    Emphasis,
    Strong,
    Link {
        url: String,
        title: String,
    },
    /// `alt` is only kept for HTML serialization.
    Image {
        url: String,
        title: String,
        alt: String,
    },
    SoftBreak,
    HardBreak,

    /// Parser constructs this crate does not style (tables, footnotes, ...).
    Unsupported {
        name: &'static str,
    },
}

impl NodeKind {
    /// The literal text of leaf nodes that carry one.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Code(s) | Self::InlineHtml(s) => Some(s),
            Self::CodeBlock { literal, .. } | Self::HtmlBlock { literal } => Some(literal),
            _ => None,
        }
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Self::List { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only a root of `kind`.
    pub fn new(root: NodeKind) -> Self {
        Self {
            nodes: vec![Node {
                kind: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new last child of `parent`.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Panics if `id` comes from another tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// `id` followed by its parent, grandparent, and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_links_parent_and_child() {
        let mut tree = Tree::new(NodeKind::Document);
        let para = tree.push(tree.root(), NodeKind::Paragraph);
        let text = tree.push(para, NodeKind::Text("hi".to_string()));

        assert_eq!(tree.children(tree.root()), &[para]);
        assert_eq!(tree.parent(text), Some(para));
        assert_eq!(tree.kind(text).literal(), Some("hi"));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn ancestors_include_self_and_end_at_root() {
        let mut tree = Tree::new(NodeKind::Document);
        let quote = tree.push(tree.root(), NodeKind::BlockQuote);
        let para = tree.push(quote, NodeKind::Paragraph);

        let chain: Vec<NodeId> = tree.ancestors(para).collect();
        assert_eq!(chain, [para, quote, tree.root()]);
    }

    #[test]
    fn literal_is_absent_on_containers() {
        assert_eq!(NodeKind::Emphasis.literal(), None);
        assert_eq!(
            NodeKind::CodeBlock {
                info: "rs".to_string(),
                literal: "fn main() {}\n".to_string(),
            }
            .literal(),
            Some("fn main() {}\n")
        );
    }
}
