//! Compile CommonMark documents into [`richrun_core::RichText`].
//!
//! ## Pipeline
//!
//! - [`tree::Tree::parse`]: `pulldown-cmark` events folded into an arena tree.
//! - [`resolve::AttributeResolver`]: what each node kind changes in the attributes it inherits.
//! - [`compile::Compiler`]: depth-first walk emitting runs, with [`list`] formatting and the
//!   [`html`] fallback for containers holding raw HTML blocks.
//!
//! Most callers only need [`FromCommonMark::from_commonmark`] or [`compile_document_with`].
//!
//! ```rust
//! use richrun_core::{AttachmentMap, AttributeSet, RichText};
//! use richrun_markdown::FromCommonMark;
//!
//! let text = RichText::from_commonmark("Some *emphasis*", &AttributeSet::new(), &AttachmentMap::new())?;
//! assert_eq!(text.string(), "Some emphasis");
//! # Ok::<(), richrun_markdown::CompileError>(())
//! ```
pub mod compile;
pub mod error;
pub mod html;
pub mod list;
pub mod options;
pub mod parse;
pub mod resolve;
pub mod tree;

use richrun_core::AttachmentMap;
use richrun_core::AttributeSet;
use richrun_core::RichText;

pub use compile::compile_document;
pub use compile::compile_document_with;
pub use error::CompileError;
pub use error::HtmlRenderError;
pub use html::HtmlRenderer;
pub use html::LiteralHtmlRenderer;
pub use html::PlainTextHtmlRenderer;
pub use options::CompileOptions;
pub use options::ListMarkers;
pub use parse::ParseOptions;
pub use tree::Tree;

/// Builds rich text straight from Markdown source.
pub trait FromCommonMark: Sized {
    fn from_commonmark(
        source: &str,
        base: &AttributeSet,
        attachments: &AttachmentMap,
    ) -> error::Result<Self>;
}

impl FromCommonMark for RichText {
    fn from_commonmark(
        source: &str,
        base: &AttributeSet,
        attachments: &AttachmentMap,
    ) -> error::Result<Self> {
        let tree = Tree::parse(source, &ParseOptions::default());
        compile_document(&tree, base, attachments)
    }
}
