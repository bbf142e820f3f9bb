//! `richrun-core` provides the host-independent rich-text model used by `richrun-markdown`.
//!
//! A rich text value is a flat sequence of [`text::Run`]s: each run is a string plus an
//! [`attributes::AttributeSet`] describing how it should be styled (font, colors, link target,
//! inline attachments, template variables). Consumers concatenate the run texts and apply the
//! attribute sets as ranges.
//!
//! ## Design goals
//!
//! - Immutable values: attribute sets are cloned and overridden while walking a document, never
//!   shared mutably.
//! - Host fonts stay behind a trait: [`font::FontProvider`] owns trait toggling and monospace
//!   lookup, the model only stores the resulting [`font::Font`].
//! - Rendering is an adapter: [`render`] turns runs into `ratatui` text, but nothing in the model
//!   depends on a terminal.
//!
//! Useful entry points:
//! - [`text::RichText::joined`]: concatenation with optional separator runs.
//! - [`text::RichText::template`] and the variable helpers in [`variables`].
//! - [`text::RichText::render`]: render core for custom layouts.
pub mod attachment;
pub mod attributes;
pub mod font;

pub mod text;
pub mod variables;

pub mod render;
pub mod theme;

pub use attachment::Attachment;
pub use attachment::AttachmentMap;
pub use attributes::AttributeKey;
pub use attributes::AttributeSet;
pub use attributes::AttributeValue;
pub use attributes::LinkTarget;
pub use font::Font;
pub use font::FontProvider;
pub use font::FontTraits;
pub use font::SystemFonts;
pub use text::LINE_SEPARATOR;
pub use text::PARAGRAPH_SEPARATOR;
pub use text::RichText;
pub use text::Run;
