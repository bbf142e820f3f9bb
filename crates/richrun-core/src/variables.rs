//! Template variables carried in rich text.
//!
//! A variable is a span of text whose runs carry [`AttributeKey::ObjectValueKey`] (the variable
//! name) and optionally [`AttributeKey::ObjectValue`] (its current value). Markdown sources
//! produce them with inline markup such as `<key name/>`; code can build them with
//! [`RichText::template`].
//!
//! All ranges are byte ranges into [`RichText::string`].

use std::collections::HashMap;
use std::ops::Range;

use crate::attributes::AttributeKey;
use crate::attributes::AttributeSet;
use crate::text::RichText;
use crate::text::Run;

/// A maximal span of non-empty runs sharing the same variable name.
#[derive(Clone, Debug, PartialEq, Eq)]
struct VariableSpan {
    key: String,
    range: Range<usize>,
    /// Index range into the run list.
    runs: Range<usize>,
}

impl RichText {
    /// One run holding `value`, tagged as the variable `variable`.
    pub fn template(value: impl Into<String>, variable: impl Into<String>) -> RichText {
        let value = value.into();
        let attributes = AttributeSet::new()
            .with(AttributeKey::ObjectValue, value.clone())
            .with(AttributeKey::ObjectValueKey, variable.into());
        RichText::styled(value, attributes)
    }

    pub fn has_variables(&self) -> bool {
        !self.variable_spans().is_empty()
    }

    /// Variable names mapped to the text currently shown for them.
    ///
    /// Spans are clipped to `range` when one is given. When a name appears more than once, the
    /// last occurrence wins.
    pub fn variables(&self, range: Option<Range<usize>>) -> HashMap<String, String> {
        let text = self.string();
        let range = range.unwrap_or(0..text.len());
        let mut values = HashMap::new();
        for span in self.variable_spans() {
            let start = span.range.start.max(range.start);
            let end = span.range.end.min(range.end);
            if start >= end {
                continue;
            }
            if let Some(shown) = text.get(start..end) {
                values.insert(span.key, shown.to_string());
            }
        }
        values
    }

    /// The first variable overlapping `from..`, or with `reverse`, the last one overlapping
    /// `..from`. A variable under the cursor counts in both directions.
    ///
    /// Yields the variable name and its [`AttributeKey::ObjectValue`], falling back to the shown
    /// text, clipped to the searched range, when no value is stored.
    pub fn next_variable(&self, from: usize, reverse: bool) -> Option<(String, String)> {
        let spans = self.variable_spans();
        let (span, clip) = if reverse {
            let span = spans.into_iter().rev().find(|s| s.range.start < from)?;
            let clip = span.range.start..span.range.end.min(from);
            (span, clip)
        } else {
            let span = spans.into_iter().find(|s| s.range.end > from)?;
            let clip = span.range.start.max(from)..span.range.end;
            (span, clip)
        };

        let stored = self
            .run_at(clip.start)
            .and_then(|run| run.attributes.text(&AttributeKey::ObjectValue))
            .map(str::to_string);
        let value = match stored {
            Some(value) => value,
            None => self.string().get(clip)?.to_string(),
        };
        Some((span.key, value))
    }

    /// Replaces the text of every variable named in `values` with its new value and records that
    /// value as [`AttributeKey::ObjectValue`].
    ///
    /// Variables are clipped to `range`: only the overlapping part is replaced, and it becomes one
    /// run styled like the run it started in.
    pub fn update_variables(
        &mut self,
        values: &HashMap<String, String>,
        range: Option<Range<usize>>,
    ) {
        let range = range.unwrap_or(0..self.len());
        let mut edits = self
            .variable_spans()
            .into_iter()
            .filter_map(|span| {
                let clip = span.range.start.max(range.start)..span.range.end.min(range.end);
                let value = values.get(&span.key)?;
                (clip.start < clip.end).then(|| (clip, value.clone()))
            })
            .peekable();
        if edits.peek().is_none() {
            return;
        }

        let old = std::mem::take(self).into_runs();
        let mut offset = 0;
        for run in old {
            let run_range = offset..offset + run.len();
            offset = run_range.end;
            if run.is_empty() {
                self.push(run);
                continue;
            }

            let mut cursor = run_range.start;
            while let Some((clip, value)) = edits.peek() {
                if clip.start >= run_range.end {
                    break;
                }
                if clip.start >= cursor {
                    self.push_slice(&run, run_range.start, cursor..clip.start);
                    let attributes = run
                        .attributes
                        .clone()
                        .with(AttributeKey::ObjectValue, value.clone());
                    self.push(Run::new(value.clone(), attributes));
                }
                cursor = cursor.max(clip.end.min(run_range.end));
                if clip.end > run_range.end {
                    break;
                }
                edits.next();
            }
            self.push_slice(&run, run_range.start, cursor..run_range.end);
        }
    }

    /// Pushes the part of `run` (which starts at `base`) covering `range`, if any.
    fn push_slice(&mut self, run: &Run, base: usize, range: Range<usize>) {
        if let Some(text) = run.text.get(range.start - base..range.end - base)
            && !text.is_empty()
        {
            self.push(Run::new(text, run.attributes.clone()));
        }
    }

    fn variable_spans(&self) -> Vec<VariableSpan> {
        let mut spans: Vec<VariableSpan> = Vec::new();
        let mut offset = 0;
        for (index, run) in self.runs().iter().enumerate() {
            let start = offset;
            offset += run.len();
            if run.is_empty() {
                continue;
            }
            let key = run.attributes.text(&AttributeKey::ObjectValueKey);
            match (key, spans.last_mut()) {
                (Some(key), Some(span)) if span.key == key && span.range.end == start => {
                    span.range.end = offset;
                    span.runs.end = index + 1;
                }
                (Some(key), _) => spans.push(VariableSpan {
                    key: key.to_string(),
                    range: start..offset,
                    runs: index..index + 1,
                }),
                (None, _) => {}
            }
        }
        spans
    }
}
