//! Composable line-level post-processing for merged output
//!
//! Editors are pure and stateless per call, and the chain applies them in
//! registration order to every line of the serialized text. They run after
//! serialization and before the change check, so cosmetic cleanup takes
//! part in the write-if-changed decision.

use std::fmt;

/// A pure transform applied to one line at a time, without its terminator
pub trait LineEditor: Send + Sync {
    /// Transform a single line
    fn edit(&self, line: &str) -> String;
}

/// Ordered chain of line editors
#[derive(Default)]
pub struct LineEditorChain {
    editors: Vec<Box<dyn LineEditor>>,
}

impl LineEditorChain {
    /// An empty chain; applying it is the identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an editor to the end of the chain
    pub fn push<E: LineEditor + 'static>(&mut self, editor: E) {
        self.editors.push(Box::new(editor));
    }

    /// Whether the chain holds no editors
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Apply the chain to every line of `text`, preserving line terminators
    pub fn apply(&self, text: &str) -> String {
        if self.editors.is_empty() {
            return text.to_string();
        }
        let mut result = String::with_capacity(text.len());
        for raw in text.split_inclusive('\n') {
            let (line, terminator) = match raw.strip_suffix('\n') {
                Some(line) => (line, "\n"),
                None => (raw, ""),
            };
            let mut edited = line.to_string();
            for editor in &self.editors {
                edited = editor.edit(&edited);
            }
            result.push_str(&edited);
            result.push_str(terminator);
        }
        result
    }
}

impl fmt::Debug for LineEditorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineEditorChain")
            .field("editors", &self.editors.len())
            .finish()
    }
}

/// Strips trailing whitespace from every line
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimTrailingWhitespace;

impl LineEditor for TrimTrailingWhitespace {
    fn edit(&self, line: &str) -> String {
        line.trim_end().to_string()
    }
}

/// Replaces every tab with a fixed number of spaces
#[derive(Debug, Clone, Copy)]
pub struct TabsToSpaces {
    /// Spaces substituted per tab
    pub width: usize,
}

impl Default for TabsToSpaces {
    fn default() -> Self {
        Self { width: 4 }
    }
}

impl LineEditor for TabsToSpaces {
    fn edit(&self, line: &str) -> String {
        line.replace('\t', &" ".repeat(self.width))
    }
}
