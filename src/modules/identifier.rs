//! Canonical module identity and source positions.
//!
//! This module provides the two value types everything else is keyed on:
//!
//! - [`ModuleIdentifier`] - the canonical dotted-path name of a source unit
//!   (e.g. `pkg.sub.mod`), with structural equality and hashing
//! - [`SourceLocation`] - the position of an import statement, attached to
//!   every edge in the graph for diagnostics
//!
//! # Identity Derivation
//!
//! An identifier can be derived two ways:
//!
//! - From a dotted string: `"a.b.c"` splits into `["a", "b", "c"]`.
//! - From a file path, by the package ancestry walk-up: starting at the file's
//!   parent directory, every ancestor that contains the package marker file
//!   (`__init__.py`) contributes its name as a leading segment; the walk stops
//!   at the first directory without a marker. The file's own stem is appended
//!   unless the file *is* the marker - a package's identifier is its directory's
//!   identifier, not `<dir>.__init__`.
//!
//! # Equality Semantics
//!
//! Two identifiers are equal iff their segment sequences are equal element-wise,
//! and equal identifiers hash identically, so a set of identifiers de-duplicates
//! structurally. This is what makes identifiers usable as graph keys.

use std::{
    collections::VecDeque,
    fmt,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// File whose presence marks a directory as a package.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Stem of the package marker file.
const PACKAGE_MARKER_STEM: &str = "__init__";

/// Canonical dotted-path identity of a module.
///
/// An ordered, non-empty sequence of name segments. Immutable value type:
/// every operation returns a new identifier and never mutates the receiver.
///
/// # Examples
///
/// ```rust,ignore
/// use modscope::modules::ModuleIdentifier;
///
/// let id = ModuleIdentifier::from_dotted("pkg.sub.mod");
/// assert_eq!(id.segments(), &["pkg", "sub", "mod"]);
/// assert_eq!(id.resolve_levels_up(1).to_string(), "pkg.sub");
/// assert_eq!(id.to_string(), "pkg.sub.mod");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentifier {
    segments: Vec<String>,
}

impl ModuleIdentifier {
    /// Separator between segments in the dotted textual form.
    pub const SEP: &'static str = ".";

    /// Create an identifier from pre-split segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Create an identifier from a dotted string.
    ///
    /// Splits on [`ModuleIdentifier::SEP`]; no validation beyond that. The textual
    /// form round-trips: `ModuleIdentifier::from_dotted(s).to_string() == s` for any
    /// valid dotted string.
    #[must_use]
    pub fn from_dotted(dotted: &str) -> Self {
        Self {
            segments: dotted.split(Self::SEP).map(str::to_owned).collect(),
        }
    }

    /// Derive an identifier from a source file path via the package ancestry walk-up.
    ///
    /// Walks upward from the file's parent directory while each directory contains
    /// the package marker, collecting directory names as leading segments. The leaf
    /// file's stem is appended unless the file is itself the package marker.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the path has no file name component, or an
    /// I/O error if the path cannot be made absolute.
    pub fn from_file_path(path: &Path) -> Result<Self> {
        let path = std::path::absolute(path)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidPath(path.clone()))?
            .to_owned();

        let mut segments: VecDeque<String> = VecDeque::new();
        let mut current = path.parent();

        while let Some(dir) = current {
            if !dir.join(PACKAGE_MARKER).is_file() {
                break;
            }

            match dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => segments.push_front(name.to_owned()),
                None => break,
            }

            current = dir.parent();
        }

        if stem != PACKAGE_MARKER_STEM {
            segments.push_back(stem);
        }

        Ok(Self {
            segments: segments.into(),
        })
    }

    /// The ordered name segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the identifier has no segments.
    ///
    /// An empty identifier is never a valid module name; it only occurs transiently
    /// while resolving relative imports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Return a new identifier with the last `levels` segments removed.
    ///
    /// `resolve_levels_up(0)` returns an identifier equal to the original. Callers
    /// must bound `levels` by [`ModuleIdentifier::len`] first; exceeding it is a
    /// caller error.
    #[must_use]
    pub fn resolve_levels_up(&self, levels: usize) -> Self {
        debug_assert!(levels <= self.segments.len());

        Self {
            segments: self.segments[..self.segments.len().saturating_sub(levels)].to_vec(),
        }
    }

    /// Return a new identifier with one segment appended.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Self { segments }
    }

    /// Return a new identifier with another identifier's segments appended.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(Self::SEP))
    }
}

/// Position of an import statement, attached to every edge for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// File containing the import statement
    pub file: PathBuf,
    /// 1-based line number
    pub line: u32,
    /// 0-based column offset
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
