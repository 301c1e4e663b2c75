#![warn(missing_docs)]

//! Protected-region source merge engine
//!
//! Keeps generated source artifacts synchronized with a declarative region
//! model while preserving the spans a developer has hand-edited. An
//! artifact is parsed into a tree of named regions framed by marker comment
//! lines, reconciled against a declarative region spec (missing regions are
//! synthesized, generated content is refreshed from templates, hand-edited
//! content is left alone, unrecognized regions are kept and reported), and
//! serialized back together with a change signal so callers only write
//! artifacts that actually differ.

pub mod assembler;
pub mod error;
pub mod line_editors;
pub mod merger;
pub mod models;
pub mod output_writer;
pub mod parser;
pub mod reconciler;
pub mod renderer;
pub mod validation;

// Re-export public API
pub use assembler::{serialize, AssembledOutput, OutputAssembler};
pub use error::{MergeError, RenderError};
pub use line_editors::{LineEditor, LineEditorChain, TabsToSpaces, TrimTrailingWhitespace};
pub use merger::SourceMerger;
pub use models::{
    Document, DocumentItem, MarkerLine, MarkerSyntax, MergeResult, Region, RegionSpec,
    RenderContext,
};
pub use output_writer::{
    BatchOutcome, FileMergeFailure, FileMergeOutcome, MergeJob, OutputWriter, OutputWriterConfig,
};
pub use parser::RegionParser;
pub use reconciler::{Reconciled, Reconciler};
pub use renderer::{StaticRenderer, TemplateRenderer};
pub use validation::validate_specs;
