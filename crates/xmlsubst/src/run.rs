//! per-file orchestration
//!
//! Files are processed one after another. Problems with a single file (missing, not
//! well-formed xml) are logged as warnings and recorded in the [Summary]; they never
//! stop the run. Only [RunError]s do.
use crate::document::{ConfigDocument, DocumentError};
use crate::environment::EnvironmentMap;
use crate::resolver;
use crate::substitute::{substitute, Change};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, derive_new::new)]
pub struct Options {
    /// glob patterns, relative to the working directory
    pub patterns: Vec<String>,
    /// sections below `<configuration>` whose `<add>` nodes get substituted
    pub sections: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub unmatched_patterns: Vec<String>,
    pub files: Vec<FileReport>,
}

impl Summary {
    pub fn updated_count(&self) -> usize {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, Outcome::Updated { .. }))
            .count()
    }
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    Updated { changes: Vec<Change> },
    Unchanged,
    NoAddNodes,
    Skipped { reason: String },
}

/// Resolve `options.patterns` and substitute every file found
pub fn run(options: &Options, environment: &EnvironmentMap) -> Result<Summary, RunError> {
    tracing::info!("starting xml substitution based on `key` and `name` attributes");

    if options.patterns.is_empty() {
        return Err(RunError::NoPatterns);
    }

    let resolved = resolver::resolve(&options.patterns);
    if resolved.files.is_empty() {
        return Err(RunError::NoFilesResolved);
    }

    let mut summary = Summary {
        unmatched_patterns: resolved.unmatched,
        files: Vec::with_capacity(resolved.files.len()),
    };

    for path in resolved.files {
        let outcome = match process_file(&path, environment, &options.sections) {
            Ok(outcome) => outcome,
            Err(FileError::Skip(reason)) => {
                tracing::warn!(path=%path.display(), %reason, "skipping file");
                Outcome::Skipped {
                    reason: reason.to_string(),
                }
            }
            Err(FileError::Fatal(err)) => return Err(err),
        };
        summary.files.push(FileReport { path, outcome });
    }

    tracing::info!(
        files = summary.files.len(),
        updated = summary.updated_count(),
        "xml substitution complete"
    );
    Ok(summary)
}

/// Substitute a single file and write it back when anything changed
pub fn process_file<S: AsRef<str>>(
    path: &Path,
    environment: &EnvironmentMap,
    sections: &[S],
) -> Result<Outcome, FileError> {
    if !path.is_file() {
        return Err(SkipReason::NotFound.into());
    }

    let bytes = std::fs::read(path).map_err(|source| RunError::Read {
        path: path.to_owned(),
        source,
    })?;

    let mut document = ConfigDocument::parse(bytes).map_err(SkipReason::Parse)?;

    let substitution = substitute(&mut document, environment, sections);
    if !substitution.found_add_nodes {
        tracing::info!(path=%path.display(), "no <add> nodes found");
        return Ok(Outcome::NoAddNodes);
    }

    if !substitution.changed() {
        tracing::info!(path=%path.display(), "no substitutions needed");
        return Ok(Outcome::Unchanged);
    }

    let xml = document.to_xml().map_err(|source| RunError::Serialize {
        path: path.to_owned(),
        source,
    })?;
    std::fs::write(path, xml).map_err(|source| RunError::Write {
        path: path.to_owned(),
        source,
    })?;
    tracing::info!(path=%path.display(), changes = substitution.changes().len(), "saved");

    Ok(Outcome::Updated {
        changes: substitution.changes().to_vec(),
    })
}

/// Stops the whole run
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("No glob patterns given (pass them as arguments or via --files/INPUT_FILES)")]
    NoPatterns,
    #[error("No valid files found")]
    NoFilesResolved,
    #[error("Unable to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to serialize {}", path.display())]
    Serialize {
        path: PathBuf,
        source: DocumentError,
    },
    #[error("Unable to write {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Stops processing of one file
#[derive(thiserror::Error, Debug)]
pub enum SkipReason {
    #[error("file not found")]
    NotFound,
    #[error(transparent)]
    Parse(DocumentError),
}

#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Skip(#[from] SkipReason),
    #[error(transparent)]
    Fatal(#[from] RunError),
}
