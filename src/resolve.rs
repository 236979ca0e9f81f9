//! Turns a raw argument into its effective content.
//!
//! An argument naming an existing regular file is replaced by the lines of
//! that file, anything else is taken literally. Leading and trailing white
//! space is removed in both cases.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Error, Result};

/// How many effective values a slot may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// only the first line of a file is used
    Single,
    /// every line of a file is used
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedField {
    /// a trimmed literal, or the first line of a file
    Single(String),
    /// the trimmed lines of a file, in file order
    Lines(Vec<String>),
}

impl ResolvedField {
    pub fn is_empty(&self) -> bool {
        match self {
            ResolvedField::Single(value) => value.is_empty(),
            ResolvedField::Lines(lines) => lines.iter().all(String::is_empty),
        }
    }

    /// the single effective value, the first line when resolved from a file
    pub fn into_single(self) -> String {
        match self {
            ResolvedField::Single(value) => value,
            ResolvedField::Lines(lines) => lines.into_iter().next().unwrap_or_default(),
        }
    }

    /// the effective values as a sequence, a literal becomes a one element
    /// sequence and an empty literal an empty one
    pub fn into_lines(self) -> Vec<String> {
        match self {
            ResolvedField::Single(value) if value.is_empty() => Vec::new(),
            ResolvedField::Single(value) => vec![value],
            ResolvedField::Lines(lines) => lines,
        }
    }
}

/// resolve a raw argument into a single value or a sequence of lines
pub fn resolve(value: &str, cardinality: Cardinality) -> Result<ResolvedField> {
    let path = Path::new(value);

    if !value.is_empty() && path.is_file() {
        let lines = read_lines(path)?;

        debug!("Resolved {} line(s) from {}", lines.len(), path.display());

        return match cardinality {
            Cardinality::Single => lines
                .into_iter()
                .next()
                .map(ResolvedField::Single)
                .ok_or_else(|| Error::EmptyFile(path.to_path_buf())),
            Cardinality::Multiple => Ok(ResolvedField::Lines(lines)),
        };
    }

    Ok(ResolvedField::Single(value.trim().to_owned()))
}

// files are expected to be small, so they are read in one go
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: PathBuf::from(path),
        source,
    })?;

    Ok(content.lines().map(|line| line.trim().to_owned()).collect())
}
