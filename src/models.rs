//! Core data models for the merge engine

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const START_TOKEN: &str = "SECTION-START[";
const END_TOKEN: &str = "SECTION-END";

/// Marker grammar configuration
///
/// A start marker is a single line of leading indentation, a language
/// specific line-comment prefix, and `SECTION-START[<name>]`; an end marker
/// is indentation, the prefix, and `SECTION-END`. The classifier tolerates
/// extra whitespace around the tokens; synthesized markers are emitted in
/// canonical form with a single space after the prefix. Reading and writing
/// live on the same type so the two sides of the grammar cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSyntax {
    /// Line-comment prefix of the target language (e.g. `//`, `#`, `--`)
    pub comment_prefix: String,
    /// Indentation emitted per `indentation_level` step of a synthesized marker
    pub indent_unit: String,
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        Self {
            comment_prefix: "//".to_string(),
            indent_unit: "    ".to_string(),
        }
    }
}

/// Classification of an input line against the marker grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerLine {
    /// Start marker carrying the region name
    Start(String),
    /// End marker
    End,
}

impl MarkerSyntax {
    /// Classify a raw input line as a start marker, an end marker, or
    /// neither (`None`)
    pub fn classify(&self, line: &str) -> Option<MarkerLine> {
        let body = line.trim_end().trim_start();
        let rest = body.strip_prefix(self.comment_prefix.as_str())?;
        let rest = rest.trim_start();
        if let Some(inner) = rest.strip_prefix(START_TOKEN) {
            let name = inner.strip_suffix(']')?;
            if name.is_empty() {
                return None;
            }
            Some(MarkerLine::Start(name.to_string()))
        } else if rest == END_TOKEN {
            Some(MarkerLine::End)
        } else {
            None
        }
    }

    /// Indentation string for a marker at `level`
    pub fn indent(&self, level: usize) -> String {
        self.indent_unit.repeat(level)
    }

    /// Canonical start marker line for a synthesized region
    pub fn start_marker(&self, name: &str, level: usize) -> String {
        format!(
            "{}{} {}{}]\n",
            self.indent(level),
            self.comment_prefix,
            START_TOKEN,
            name
        )
    }

    /// Canonical end marker line for a synthesized region
    pub fn end_marker(&self, level: usize) -> String {
        format!("{}{} {}\n", self.indent(level), self.comment_prefix, END_TOKEN)
    }
}

/// A named, marker-delimited span of parsed text
///
/// A region's extent is exactly `start_marker + head_content + children +
/// tail_content + end_marker`. Marker lines are stored as found in (or
/// synthesized into) the text, indentation and terminator included, so an
/// untouched region serializes back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region name, unique among siblings
    pub name: String,
    /// Raw start marker line
    pub start_marker: String,
    /// Raw end marker line
    pub end_marker: String,
    /// Text between the start marker and the first child
    pub head_content: String,
    /// Text between the last child and the end marker
    pub tail_content: String,
    /// Nested regions, in input order
    pub children: Vec<Region>,
}

impl Region {
    /// A region just opened by the parser; the end marker is filled in when
    /// the region closes
    pub(crate) fn open(name: String, start_marker: &str) -> Self {
        Self {
            name,
            start_marker: start_marker.to_string(),
            end_marker: String::new(),
            head_content: String::new(),
            tail_content: String::new(),
            children: Vec::new(),
        }
    }

    /// A region synthesized from a spec entry, with canonical markers and
    /// empty content
    pub(crate) fn synthesized(name: &str, syntax: &MarkerSyntax, level: usize) -> Self {
        Self {
            name: name.to_string(),
            start_marker: syntax.start_marker(name, level),
            end_marker: syntax.end_marker(level),
            head_content: String::new(),
            tail_content: String::new(),
            children: Vec::new(),
        }
    }
}

/// One root-level item of a parsed artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentItem {
    /// Pass-through text outside any region, preserved verbatim
    Text(String),
    /// A root-level region
    Region(Region),
}

/// A parsed artifact: root-level regions interleaved with pass-through text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Root-level items in input order
    pub items: Vec<DocumentItem>,
}

impl Document {
    /// Look up a root-level region by name
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.items.iter().find_map(|item| match item {
            DocumentItem::Region(region) if region.name == name => Some(region),
            _ => None,
        })
    }
}

/// Declarative description of one expected region
///
/// Supplied by the caller as a tree, read-only during a merge. Sibling
/// names must be unique and a child's `indentation_level` must be at least
/// its parent's; see [`crate::validation::validate_specs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    /// Region name, unique among sibling specs
    pub name: String,
    /// Whether the region may be absent from the output
    #[serde(default)]
    pub optional: bool,
    /// Whether hand-written content in the region is preserved
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Marker indentation depth for synthesized markers
    #[serde(default)]
    pub indentation_level: usize,
    /// Template rendered into the head slot, if any
    #[serde(default)]
    pub head_template: Option<String>,
    /// Template rendered into the tail slot, if any
    #[serde(default)]
    pub tail_template: Option<String>,
    /// Expected nested regions, in output order
    #[serde(default)]
    pub children: Vec<RegionSpec>,
}

fn default_editable() -> bool {
    true
}

impl RegionSpec {
    /// A required, editable spec with no templates, no children, and
    /// indentation level zero
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            editable: true,
            indentation_level: 0,
            head_template: None,
            tail_template: None,
            children: Vec::new(),
        }
    }

    /// Whether either content slot carries a template reference
    pub fn has_template(&self) -> bool {
        self.head_template.is_some() || self.tail_template.is_some()
    }
}

/// Opaque key-value context handed through to the template renderer
///
/// Typically the model object the artifact is generated from, flattened to
/// named values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Named values available to templates
    pub values: HashMap<String, serde_json::Value>,
}

impl RenderContext {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }
}

/// Result of one merge invocation
///
/// Diagnostics are freshly built per call and returned by value; the engine
/// retains nothing between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    /// Final serialized output
    pub merged_text: String,
    /// Slash-joined paths of required regions synthesized during the merge
    pub added_regions: Vec<String>,
    /// Slash-joined paths of input regions with no spec entry, preserved in place
    pub unknown_regions: Vec<String>,
    /// Whether `merged_text` differs from the original input
    pub changed: bool,
}
