//! Per-entry processing of the source tree.
//! Turns one source entry into the file operation that mirrors it into the
//! output tree.

use log::debug;
use std::path::{Path, PathBuf};

use crate::builder::BuildSession;
use crate::classifier::{EntryKind, PathClassifier};
use crate::error::{Error, Result};
use crate::ioutils::{copy_file, create_dir_all, write_file};
use crate::renderer::{Namespace, TemplateRenderer};

/// What has to happen in the output tree for one source entry.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOperation {
    CreateDirectory { target: PathBuf },
    /// Write evaluated template output
    Write { target: PathBuf, content: String },
    /// Copy an opaque file verbatim
    Copy { source: PathBuf, target: PathBuf },
    /// Leave the entry out; directories are pruned
    Exclude { source: PathBuf },
}

impl FileOperation {
    pub fn action(&self) -> &'static str {
        match self {
            FileOperation::CreateDirectory { .. } => "Creating",
            FileOperation::Write { .. } => "Writing",
            FileOperation::Copy { .. } => "Copying",
            FileOperation::Exclude { .. } => "Skipping",
        }
    }

    /// Performs the operation against the filesystem.
    pub fn apply(&self) -> Result<()> {
        match self {
            FileOperation::CreateDirectory { target } => create_dir_all(target),
            FileOperation::Write { target, content } => write_file(content, target),
            FileOperation::Copy { source, target } => copy_file(source, target),
            FileOperation::Exclude { .. } => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileOperation::CreateDirectory { target }
            | FileOperation::Write { target, .. }
            | FileOperation::Copy { target, .. } => target,
            FileOperation::Exclude { source } => source,
        }
    }
}

pub struct Processor<'a> {
    /// Dependencies
    engine: &'a dyn TemplateRenderer,
    classifier: &'a PathClassifier,

    session: &'a BuildSession,
}

impl<'a> Processor<'a> {
    pub fn new(
        engine: &'a dyn TemplateRenderer,
        classifier: &'a PathClassifier,
        session: &'a BuildSession,
    ) -> Self {
        Self { engine, classifier, session }
    }

    /// Determines the operation for a source entry.
    ///
    /// Templated files are read and fully evaluated here, so nothing is written
    /// for a file whose evaluation fails.
    ///
    /// # Arguments
    /// * `source` - Path of the entry inside the source root
    /// * `is_dir` - Whether the entry is a directory
    ///
    /// # Errors
    /// * `Error::IoError` if a templated file cannot be read
    /// * `Error::NotFound` if an include target is missing
    /// * `Error::EvaluationError` if an expression fails
    pub fn process(&self, source: &Path, is_dir: bool) -> Result<FileOperation> {
        let name = source.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let kind = self.classifier.classify(&name, is_dir);
        debug!("Classified '{}' as {}", source.display(), kind);

        let operation = match kind {
            EntryKind::Excluded => FileOperation::Exclude { source: source.to_path_buf() },
            EntryKind::Directory => {
                FileOperation::CreateDirectory { target: self.session.target_for(source)? }
            }
            EntryKind::Opaque => FileOperation::Copy {
                source: source.to_path_buf(),
                target: self.session.target_for(source)?,
            },
            EntryKind::Templated => {
                let display_path = self.session.relative_to_base(source);
                let raw = self.engine.read(source).map_err(|e| Error::io("read", source, e))?;
                let namespace = Namespace::for_file(display_path);
                let content = self
                    .engine
                    .render(&raw, &namespace)
                    .map_err(|e| Error::evaluation(display_path, e))?;

                FileOperation::Write { target: self.session.target_for(source)?, content }
            }
        };

        Ok(operation)
    }
}
