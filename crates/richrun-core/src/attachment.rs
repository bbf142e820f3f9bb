use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Attachments keyed by the URL string an image node refers to.
pub type AttachmentMap = HashMap<String, Attachment>;

/// An opaque inline attachment handle (typically an image).
///
/// The model never looks inside the payload; it only carries the handle through to the runs so a
/// host can draw the attachment in place. Two handles are equal when they have the same name and
/// point at the same payload allocation.
#[derive(Clone)]
pub struct Attachment {
    name: String,
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl Attachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_payload<T: Any + Send + Sync>(name: impl Into<String>, payload: T) -> Self {
        Self {
            name: name.into(),
            payload: Some(Arc::new(payload)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the payload if it was stored as a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }
}

impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        let same_payload = match (&self.payload, &other.payload) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_payload && self.name == other.name
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pixels(u32, u32);

    #[test]
    fn payload_downcasts_to_stored_type() {
        let attachment = Attachment::with_payload("cat.png", Pixels(4, 3));
        assert_eq!(attachment.payload::<Pixels>(), Some(&Pixels(4, 3)));
        assert_eq!(attachment.payload::<String>(), None);
    }

    #[test]
    fn clones_are_equal_but_fresh_payloads_are_not() {
        let a = Attachment::with_payload("cat.png", Pixels(1, 1));
        let b = a.clone();
        let c = Attachment::with_payload("cat.png", Pixels(1, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(Attachment::new("x"), Attachment::new("x"));
    }
}
