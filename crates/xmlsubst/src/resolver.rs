//! glob pattern expansion
//!
//! Patterns are expanded in the order given. Every file is kept once, at the position
//! where it was first seen. Patterns that match nothing are not an error, they are
//! collected in [Resolved::unmatched] so the caller can warn about them.
use indexmap::IndexSet;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Resolved {
    pub files: IndexSet<PathBuf>,
    pub unmatched: Vec<String>,
}

/// Split newline separated pattern input
///
/// Accepts `\n` and `\r\n`. Lines are trimmed and empty lines are dropped.
pub fn split_patterns(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn resolve<S: AsRef<str>>(patterns: &[S]) -> Resolved {
    let mut resolved = Resolved::default();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matched = resolve_pattern(pattern, &mut resolved.files);
        if matched == 0 {
            tracing::warn!(pattern, "no matches found for pattern");
            resolved.unmatched.push(pattern.to_string());
        }
    }

    resolved
}

/// Returns the number of files matched by `pattern`, including ones already in `files`
fn resolve_pattern(pattern: &str, files: &mut IndexSet<PathBuf>) -> usize {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(err) => {
            tracing::warn!(pattern, %err, "invalid glob pattern");
            return 0;
        }
    };

    let mut matched = 0;
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(path=%err.path().display(), error=%err.error(), "unable to read glob entry");
                continue;
            }
        };

        if !path.is_file() {
            tracing::debug!(path=%path.display(), "not a file");
            continue;
        }

        matched += 1;
        if files.insert(path.clone()) {
            tracing::info!(path=%path.display(), "found");
        }
    }

    matched
}
