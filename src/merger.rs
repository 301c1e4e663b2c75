//! High-level merge entry point

use tracing::debug;

use crate::assembler::OutputAssembler;
use crate::error::MergeError;
use crate::line_editors::{LineEditor, LineEditorChain};
use crate::models::{MarkerSyntax, MergeResult, RegionSpec, RenderContext};
use crate::parser::RegionParser;
use crate::reconciler::Reconciler;
use crate::renderer::TemplateRenderer;
use crate::validation::validate_specs;

/// Merges artifact text against region specs, one artifact per call
///
/// The merger holds configuration only (marker syntax, renderer, line
/// editors); every call builds its diagnostics from scratch, so one
/// instance can serve many artifacts in sequence, or from several threads
/// when the renderer allows it.
pub struct SourceMerger<R: TemplateRenderer> {
    syntax: MarkerSyntax,
    renderer: R,
    editors: LineEditorChain,
}

impl<R: TemplateRenderer> SourceMerger<R> {
    /// Create a merger with the default marker syntax and no line editors
    pub fn new(renderer: R) -> Self {
        Self::with_syntax(renderer, MarkerSyntax::default())
    }

    /// Create a merger with a custom marker syntax
    pub fn with_syntax(renderer: R, syntax: MarkerSyntax) -> Self {
        Self {
            syntax,
            renderer,
            editors: LineEditorChain::new(),
        }
    }

    /// Append a line editor to the post-processing chain
    pub fn add_editor<E: LineEditor + 'static>(&mut self, editor: E) {
        self.editors.push(editor);
    }

    /// The marker syntax this merger reads and writes
    pub fn syntax(&self) -> &MarkerSyntax {
        &self.syntax
    }

    /// Merge `input` against `specs`
    ///
    /// # Arguments
    /// * `input` - Current artifact text; empty for an artifact that does
    ///   not exist yet
    /// * `specs` - Expected root-level regions, in output order
    /// * `context` - Values handed through to the template renderer
    ///
    /// # Returns
    /// The complete merge result, or the first fatal error; there is no
    /// partial output.
    pub fn merge(
        &self,
        input: &str,
        specs: &[RegionSpec],
        context: &RenderContext,
    ) -> Result<MergeResult, MergeError> {
        validate_specs(specs)?;
        let document = RegionParser::new(&self.syntax).parse(input)?;
        let reconciled =
            Reconciler::new(&self.renderer, &self.syntax).reconcile(document, specs, context)?;
        let output = OutputAssembler::new(&self.editors).assemble(&reconciled.document, input);
        debug!(
            "Merged artifact: {} added, {} unknown, changed: {}",
            reconciled.added_regions.len(),
            reconciled.unknown_regions.len(),
            output.changed
        );
        Ok(MergeResult {
            merged_text: output.text,
            added_regions: reconciled.added_regions,
            unknown_regions: reconciled.unknown_regions,
            changed: output.changed,
        })
    }
}
