//! Artifact-level merge driver
//!
//! Implements the write contract around the merge engine: read the artifact
//! (a missing file merges as empty input, so every required region is
//! synthesized from scratch), merge, and write back only when the result
//! differs, so untouched artifacts keep their timestamps. Supports dry-run
//! previews and optional backups of overwritten files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::MergeError;
use crate::merger::SourceMerger;
use crate::models::{RegionSpec, RenderContext};
use crate::renderer::TemplateRenderer;

/// Configuration for artifact writing
#[derive(Debug, Clone, Default)]
pub struct OutputWriterConfig {
    /// Preview without touching the filesystem
    pub dry_run: bool,
    /// Back up a pre-existing artifact to `<path>.bak` before overwriting
    pub create_backups: bool,
}

/// Outcome of merging a single artifact on disk
#[derive(Debug, Clone)]
pub struct FileMergeOutcome {
    /// Artifact path
    pub path: PathBuf,
    /// Whether the merged text differed from the input
    pub changed: bool,
    /// Whether the artifact was written
    pub written: bool,
    /// Whether this merge created the artifact
    pub created: bool,
    /// Backup path, when one was made
    pub backup_path: Option<PathBuf>,
    /// Required regions synthesized during the merge
    pub added_regions: Vec<String>,
    /// Input regions that had no spec entry
    pub unknown_regions: Vec<String>,
}

/// One artifact in a batch merge
#[derive(Debug, Clone)]
pub struct MergeJob {
    /// Artifact path
    pub path: PathBuf,
    /// Expected root-level regions for this artifact
    pub specs: Vec<RegionSpec>,
    /// Render context for this artifact
    pub context: RenderContext,
}

/// A batch entry that failed; the rest of the batch still runs
#[derive(Debug)]
pub struct FileMergeFailure {
    /// Artifact path
    pub path: PathBuf,
    /// The error that aborted this artifact
    pub error: MergeError,
}

/// Aggregate outcome of a batch merge
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Per-artifact outcomes, in job order
    pub files: Vec<FileMergeOutcome>,
    /// Artifacts that failed, with their errors
    pub failures: Vec<FileMergeFailure>,
    /// Number of artifacts actually written
    pub files_written: usize,
}

/// Writes merged artifacts according to the write-if-changed contract
pub struct OutputWriter {
    config: OutputWriterConfig,
}

impl OutputWriter {
    /// Create a writer with default configuration
    pub fn new() -> Self {
        Self {
            config: OutputWriterConfig::default(),
        }
    }

    /// Create a writer with custom configuration
    pub fn with_config(config: OutputWriterConfig) -> Self {
        Self { config }
    }

    /// Merge one artifact on disk
    ///
    /// # Arguments
    /// * `merger` - The configured merge engine
    /// * `path` - Artifact path; a missing file merges as empty input
    /// * `specs` - Expected root-level regions
    /// * `context` - Values handed through to the template renderer
    ///
    /// # Returns
    /// The file outcome, or the error that aborted this artifact.
    pub fn merge_file<R: TemplateRenderer>(
        &self,
        merger: &SourceMerger<R>,
        path: &Path,
        specs: &[RegionSpec],
        context: &RenderContext,
    ) -> Result<FileMergeOutcome, MergeError> {
        let existing = match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(MergeError::Io(err)),
        };
        let created = existing.is_none();
        let input = existing.unwrap_or_default();

        let result = merger.merge(&input, specs, context)?;
        for name in &result.unknown_regions {
            warn!("Unknown region '{}' preserved in {}", name, path.display());
        }

        let written = result.changed && !self.config.dry_run;
        let mut backup_path = None;
        if written {
            if self.config.create_backups && !created {
                let backup = backup_path_for(path);
                fs::write(&backup, &input)?;
                backup_path = Some(backup);
            }
            fs::write(path, &result.merged_text)?;
            info!("Wrote merged artifact: {}", path.display());
        } else if result.changed {
            debug!("Dry-run, skipping write: {}", path.display());
        } else {
            debug!("Artifact unchanged, skipping write: {}", path.display());
        }

        Ok(FileMergeOutcome {
            path: path.to_path_buf(),
            changed: result.changed,
            written,
            created: created && written,
            backup_path,
            added_regions: result.added_regions,
            unknown_regions: result.unknown_regions,
        })
    }

    /// Merge a batch of independent artifacts
    ///
    /// Artifacts are independent, so a failure is recorded with its path
    /// and the batch continues.
    pub fn merge_files<R: TemplateRenderer>(
        &self,
        merger: &SourceMerger<R>,
        jobs: &[MergeJob],
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for job in jobs {
            match self.merge_file(merger, &job.path, &job.specs, &job.context) {
                Ok(file) => {
                    if file.written {
                        outcome.files_written += 1;
                    }
                    outcome.files.push(file);
                }
                Err(error) => {
                    warn!("Merge failed for {}: {}", job.path.display(), error);
                    outcome.failures.push(FileMergeFailure {
                        path: job.path.clone(),
                        error,
                    });
                }
            }
        }
        outcome
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}
