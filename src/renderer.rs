//! Template renderer collaborator interface

use std::collections::HashMap;

use crate::error::RenderError;
use crate::models::RenderContext;

/// Renders a named template against a caller-supplied context
///
/// The engine treats implementations as opaque synchronous dependencies;
/// they may perform blocking IO such as template lookup. A failure aborts
/// the merge of the current artifact.
pub trait TemplateRenderer {
    /// Render the template identified by `template` with `context`
    fn render(&self, template: &str, context: &RenderContext) -> Result<String, RenderError>;
}

/// Lookup-table renderer serving fixed template bodies
///
/// Useful in tests and for callers whose snippets are precomputed rather
/// than rendered from a model.
#[derive(Debug, Clone, Default)]
pub struct StaticRenderer {
    templates: HashMap<String, String>,
}

impl StaticRenderer {
    /// An empty renderer; every lookup fails until bodies are registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template body under an identifier
    pub fn insert(&mut self, template: impl Into<String>, body: impl Into<String>) {
        self.templates.insert(template.into(), body.into());
    }
}

impl TemplateRenderer for StaticRenderer {
    fn render(&self, template: &str, _context: &RenderContext) -> Result<String, RenderError> {
        self.templates
            .get(template)
            .cloned()
            .ok_or_else(|| RenderError::new(format!("Template not found: {}", template)))
    }
}
