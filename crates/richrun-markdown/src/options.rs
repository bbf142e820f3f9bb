use std::fmt;
use std::sync::Arc;

use richrun_core::FontProvider;
use richrun_core::SystemFonts;

use crate::html::HtmlRenderer;
use crate::html::LiteralHtmlRenderer;

/// How list markers are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListMarkers {
    /// Marker style depends on how many lists of the same kind enclose the item:
    /// `•`/`◦`/`▪` for bullets, `1.`/`a.`/`i.` for ordered lists.
    #[default]
    Tiered,
    /// For hosts without marker formatting: `•` for every bullet, `1.` for every ordinal.
    Plain,
}

/// Compiler configuration.
///
/// ```rust
/// use richrun_markdown::CompileOptions;
///
/// let options = CompileOptions {
///     base_url: Some("https://example.com/docs/".to_string()),
///     indent: "  ".to_string(),
///     ..CompileOptions::default()
/// };
/// # let _ = options;
/// ```
#[derive(Clone)]
pub struct CompileOptions {
    /// Base for relative link destinations. Without one they are kept as written.
    pub base_url: Option<String>,
    /// Indentation unit repeated once per enclosing list.
    pub indent: String,
    pub list_markers: ListMarkers,
    /// Number ordered lists from their source start number instead of 1.
    pub respect_list_start: bool,
    pub fonts: Arc<dyn FontProvider + Send + Sync>,
    /// Renderer for block containers holding raw HTML blocks.
    pub html_renderer: Arc<dyn HtmlRenderer + Send + Sync>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            indent: "\t".to_string(),
            list_markers: ListMarkers::Tiered,
            respect_list_start: false,
            fonts: Arc::new(SystemFonts::default()),
            html_renderer: Arc::new(LiteralHtmlRenderer),
        }
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("base_url", &self.base_url)
            .field("indent", &self.indent)
            .field("list_markers", &self.list_markers)
            .field("respect_list_start", &self.respect_list_start)
            .finish_non_exhaustive()
    }
}
