//! Build orchestration.
//! Validates a build session, clears the output root and mirrors the source
//! tree into it.

use log::{debug, info};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::classifier::PathClassifier;
use crate::error::{Error, Result};
use crate::ioutils::reset_dir;
use crate::processor::{FileOperation, Processor};
use crate::renderer::TemplateRenderer;

/// Roots of one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSession {
    base_dir: PathBuf,
    source_root: PathBuf,
    output_root: PathBuf,
    /// Set when the output root lies inside the source root
    prune_output: bool,
}

impl BuildSession {
    /// Resolves `source` and `output` against `base_dir` and validates them.
    ///
    /// Nothing on disk is modified.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the source is missing or not a directory, or if
    ///   clearing the output root would remove the source tree or the base directory
    pub fn new<B, S, O>(base_dir: B, source: S, output: O) -> Result<Self>
    where
        B: AsRef<Path>,
        S: AsRef<Path>,
        O: AsRef<Path>,
    {
        let base_dir = base_dir.as_ref();
        let base_dir = base_dir.canonicalize().map_err(|e| {
            Error::ConfigError(format!("invalid working directory '{}': {e}", base_dir.display()))
        })?;
        let source_root = normalize(&base_dir.join(source.as_ref()));
        let output_root = normalize(&base_dir.join(output.as_ref()));

        if !source_root.is_dir() {
            return Err(Error::ConfigError(format!(
                "source directory '{}' does not exist or is not a directory",
                source.as_ref().display()
            )));
        }
        if output_root == base_dir {
            return Err(Error::ConfigError(
                "output directory cannot be the working directory".to_string(),
            ));
        }
        if source_root.starts_with(&output_root) {
            return Err(Error::ConfigError(format!(
                "output directory '{}' would remove the source directory '{}'",
                output.as_ref().display(),
                source.as_ref().display()
            )));
        }
        let prune_output = output_root.starts_with(&source_root);

        Ok(Self { base_dir, source_root, output_root, prune_output })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Path of `source` as an include helper would name it.
    pub fn relative_to_base<'p>(&self, source: &'p Path) -> &'p Path {
        source.strip_prefix(&self.base_dir).unwrap_or(source)
    }

    /// Mirrored location of a source entry inside the output root.
    pub fn target_for(&self, source: &Path) -> Result<PathBuf> {
        let relative = source.strip_prefix(&self.source_root).map_err(|_| {
            Error::ConfigError(format!(
                "'{}' is outside the source directory '{}'",
                source.display(),
                self.source_root.display()
            ))
        })?;
        Ok(self.output_root.join(relative))
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Counts of what a build produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub written: usize,
    pub copied: usize,
    pub directories: usize,
    pub excluded: usize,
}

impl BuildReport {
    fn record(&mut self, operation: &FileOperation) {
        match operation {
            FileOperation::CreateDirectory { .. } => self.directories += 1,
            FileOperation::Write { .. } => self.written += 1,
            FileOperation::Copy { .. } => self.copied += 1,
            FileOperation::Exclude { .. } => self.excluded += 1,
        }
    }
}

impl std::fmt::Display for BuildReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} templated, {} copied, {} directories, {} excluded",
            self.written, self.copied, self.directories, self.excluded
        )
    }
}

/// Runs one build: clears the output root, then mirrors the source tree.
///
/// Entries are visited depth first in file name order and processed one at a
/// time. The first failing entry aborts the build.
///
/// # Arguments
/// * `session` - Validated roots of the build
/// * `engine` - Evaluator for templated files
/// * `classifier` - Decides how each entry is handled
///
/// # Returns
/// * `Result<BuildReport>` - Counts of the operations performed
pub fn build(
    session: &BuildSession,
    engine: &dyn TemplateRenderer,
    classifier: &PathClassifier,
) -> Result<BuildReport> {
    debug!(
        "Building '{}' into '{}'",
        session.source_root().display(),
        session.output_root().display()
    );
    reset_dir(session.output_root())?;

    let processor = Processor::new(engine, classifier, session);
    let mut report = BuildReport::default();

    let mut entries = WalkDir::new(session.source_root())
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(session.prune_output && entry.path() == session.output_root()));

    while let Some(entry) = entries.next() {
        let entry = entry?;
        let is_dir = entry.file_type().is_dir();
        let operation = processor.process(entry.path(), is_dir)?;

        if is_dir && matches!(operation, FileOperation::Exclude { .. }) {
            entries.skip_current_dir();
        }
        operation.apply()?;
        debug!("{}: '{}'", operation.action(), operation.path().display());
        report.record(&operation);
    }

    info!("Built '{}': {}", session.output_root().display(), report);
    Ok(report)
}
