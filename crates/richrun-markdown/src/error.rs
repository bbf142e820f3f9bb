/// Failure reported by an [`crate::html::HtmlRenderer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not render HTML: {message}")]
pub struct HtmlRenderError {
    pub message: String,
}

impl HtmlRenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that abort a compilation. No partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("missing attachment for image `{key}`")]
    AttachmentMissing { key: String },

    #[error(transparent)]
    HtmlRender(#[from] HtmlRenderError),
}

pub type Result<T> = std::result::Result<T, CompileError>;
