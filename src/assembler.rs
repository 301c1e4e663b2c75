//! Serialization of merged documents back to text
//!
//! Depth-first: start marker, head content, children, tail content, end
//! marker, with root-level pass-through text at its original relative
//! position. The line editor chain runs over the serialized text, and the
//! result is compared byte-for-byte against the original input so callers
//! can skip writes that would only churn timestamps.

use crate::line_editors::LineEditorChain;
use crate::models::{Document, DocumentItem, Region};

/// Serialized output plus the change signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledOutput {
    /// Final merged text after line editing
    pub text: String,
    /// Whether `text` differs from the original input
    pub changed: bool,
}

/// Serializes a merged document and applies the line editor chain
pub struct OutputAssembler<'a> {
    editors: &'a LineEditorChain,
}

impl<'a> OutputAssembler<'a> {
    /// Create an assembler over an editor chain
    pub fn new(editors: &'a LineEditorChain) -> Self {
        Self { editors }
    }

    /// Serialize `document`, post-process it, and diff it against `original`
    pub fn assemble(&self, document: &Document, original: &str) -> AssembledOutput {
        let serialized = serialize(document);
        let text = self.editors.apply(&serialized);
        let changed = text != original;
        AssembledOutput { text, changed }
    }
}

/// Serialize a document tree without post-processing
pub fn serialize(document: &Document) -> String {
    let mut out = String::new();
    for item in &document.items {
        match item {
            DocumentItem::Text(text) => out.push_str(text),
            DocumentItem::Region(region) => serialize_region(region, &mut out),
        }
    }
    out
}

fn serialize_region(region: &Region, out: &mut String) {
    push_line(out, &region.start_marker);
    out.push_str(&region.head_content);
    for child in &region.children {
        serialize_region(child, out);
    }
    out.push_str(&region.tail_content);
    push_line(out, &region.end_marker);
}

// Markers are whole lines. Content that arrives without a final newline (a
// rendered template, a file ending mid-line) must not swallow the marker
// that follows it.
fn push_line(out: &mut String, line: &str) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
}
