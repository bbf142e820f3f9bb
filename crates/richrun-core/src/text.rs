use std::fmt;
use std::ops::Range;

use crate::attachment::Attachment;
use crate::attributes::AttributeKey;
use crate::attributes::AttributeSet;

/// Line boundary inside a block (hard breaks, thematic breaks).
pub const LINE_SEPARATOR: &str = "\u{2028}";

/// Boundary between sibling blocks.
pub const PARAGRAPH_SEPARATOR: &str = "\u{2029}";

/// A contiguous span of text sharing one attribute set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub attributes: AttributeSet,
}

impl Run {
    pub fn new(text: impl Into<String>, attributes: AttributeSet) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// A run with no attributes.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, AttributeSet::new())
    }

    /// A zero-length run referencing an inline attachment.
    pub fn attachment(attachment: Attachment, attributes: &AttributeSet) -> Self {
        let attributes = attributes
            .clone()
            .with(AttributeKey::Attachment, attachment);
        Self::new(String::new(), attributes)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An ordered sequence of runs.
///
/// Offsets exposed by this type are byte offsets into [`RichText::string`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichText {
    runs: Vec<Run>,
}

impl RichText {
    /// A value with no runs at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single run carrying `attributes`.
    pub fn styled(text: impl Into<String>, attributes: AttributeSet) -> Self {
        Self::from(Run::new(text, attributes))
    }

    /// Concatenates `parts`, inserting `separator` as its own unstyled run between each adjacent
    /// pair.
    ///
    /// An empty input yields one empty run; a single part is returned unchanged.
    pub fn joined<I>(parts: I, separator: Option<&str>) -> Self
    where
        I: IntoIterator<Item = RichText>,
    {
        let mut parts = parts.into_iter();
        let Some(first) = parts.next() else {
            return Self::from(Run::default());
        };
        parts.fold(first, |mut acc, part| {
            if let Some(separator) = separator {
                acc.push(Run::plain(separator));
            }
            acc.append(part);
            acc
        })
    }

    pub fn push(&mut self, run: Run) {
        self.runs.push(run);
    }

    pub fn append(&mut self, other: RichText) {
        self.runs.extend(other.runs);
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<Run> {
        self.runs
    }

    /// Total text length in bytes.
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// The concatenated text of every run.
    pub fn string(&self) -> String {
        let mut out = String::with_capacity(self.len());
        for run in &self.runs {
            out.push_str(&run.text);
        }
        out
    }

    /// Runs paired with their byte ranges.
    pub fn ranges(&self) -> impl Iterator<Item = (Range<usize>, &Run)> {
        self.runs.iter().scan(0usize, |offset, run| {
            let start = *offset;
            *offset += run.len();
            Some((start..*offset, run))
        })
    }

    /// The run covering byte `offset`, skipping zero-length runs.
    pub fn run_at(&self, offset: usize) -> Option<&Run> {
        self.ranges()
            .find(|(range, _)| range.contains(&offset))
            .map(|(_, run)| run)
    }

    /// Merges adjacent runs with equal attributes.
    ///
    /// Zero-length runs are kept when they carry an attachment, since that is their whole point.
    pub fn coalesced(&self) -> RichText {
        let mut runs: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            if run.is_empty() && run.attributes.attachment().is_none() {
                continue;
            }
            match runs.last_mut() {
                Some(last)
                    if last.attributes == run.attributes
                        && last.attributes.attachment().is_none() =>
                {
                    last.text.push_str(&run.text);
                }
                _ => runs.push(run.clone()),
            }
        }
        RichText { runs }
    }
}

impl From<Run> for RichText {
    fn from(run: Run) -> Self {
        Self { runs: vec![run] }
    }
}

impl From<Vec<Run>> for RichText {
    fn from(runs: Vec<Run>) -> Self {
        Self { runs }
    }
}

impl FromIterator<Run> for RichText {
    fn from_iter<T: IntoIterator<Item = Run>>(iter: T) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}
