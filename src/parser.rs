//! Region parser: raw artifact text to a document tree
//!
//! Scans the input line by line with a stack of currently open regions. A
//! start marker pushes a region; an end marker pops it and attaches it to
//! the new stack top, or to the root item list when the stack runs empty.
//! Any other line accumulates into the open region's head until its first
//! child closes, into its tail afterwards. Lines outside every region are
//! kept as pass-through text and re-emitted verbatim.

use crate::error::MergeError;
use crate::models::{Document, DocumentItem, MarkerLine, MarkerSyntax, Region};

/// Parses artifact text into a [`Document`] using a marker syntax
pub struct RegionParser<'a> {
    syntax: &'a MarkerSyntax,
}

impl<'a> RegionParser<'a> {
    /// Create a parser over the given marker syntax
    pub fn new(syntax: &'a MarkerSyntax) -> Self {
        Self { syntax }
    }

    /// Parse raw artifact text into a document tree
    ///
    /// Empty input parses to an empty document. A malformed file cannot be
    /// merged safely, so an end marker with no open region, a region left
    /// open at end of input, or two siblings sharing a name are all fatal.
    pub fn parse(&self, text: &str) -> Result<Document, MergeError> {
        let mut items: Vec<DocumentItem> = Vec::new();
        let mut stack: Vec<Region> = Vec::new();
        let mut line_no = 0usize;

        for raw in text.split_inclusive('\n') {
            line_no += 1;
            match self.syntax.classify(raw) {
                Some(MarkerLine::Start(name)) => {
                    let duplicate = match stack.last() {
                        Some(open) => open.children.iter().any(|c| c.name == name),
                        None => items.iter().any(
                            |item| matches!(item, DocumentItem::Region(r) if r.name == name),
                        ),
                    };
                    if duplicate {
                        return Err(MergeError::DuplicateRegionName { name });
                    }
                    stack.push(Region::open(name, raw));
                }
                Some(MarkerLine::End) => {
                    let mut region =
                        stack.pop().ok_or_else(|| MergeError::UnbalancedMarkers {
                            line: line_no,
                            message: "end marker without a matching start".to_string(),
                        })?;
                    region.end_marker = raw.to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(region),
                        None => items.push(DocumentItem::Region(region)),
                    }
                }
                None => match stack.last_mut() {
                    Some(open) => {
                        if open.children.is_empty() {
                            open.head_content.push_str(raw);
                        } else {
                            open.tail_content.push_str(raw);
                        }
                    }
                    None => match items.last_mut() {
                        Some(DocumentItem::Text(run)) => run.push_str(raw),
                        _ => items.push(DocumentItem::Text(raw.to_string())),
                    },
                },
            }
        }

        if let Some(open) = stack.last() {
            return Err(MergeError::UnbalancedMarkers {
                line: line_no,
                message: format!("region '{}' is never closed", open.name),
            });
        }

        Ok(Document { items })
    }
}
