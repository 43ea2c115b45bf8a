//! Record types crossing the parse / resolve / insert boundaries.
//!
//! The pipeline moves three shapes of data between its stages:
//!
//! - [`RawImport`] - one import statement as the parser front-end saw it,
//!   before any name resolution
//! - [`Importer`] - the identity and location of the module doing the
//!   importing, which relative resolution is anchored on
//! - [`ResolvedImport`] - one resolved outgoing edge, carrying the canonical
//!   target identity, the target's probed file location, and the position of
//!   the originating statement
//!
//! All of these are plain immutable records. Workers produce them in parallel
//! and nothing here is shared mutable state, which is what keeps the parallel
//! stage of the pipeline lock-free.

use std::path::{Path, PathBuf};

use crate::modules::{ModuleIdentifier, SourceLocation};

/// A single raw import statement, position-tagged, before resolution.
///
/// The shapes produced by the parser front-end:
///
/// | Statement                  | `segments`     | `level` | `names`        |
/// |----------------------------|----------------|---------|----------------|
/// | `import a.b`               | `["a", "b"]`   | 0       | `[]`           |
/// | `from a.b import X, Y`     | `["a", "b"]`   | 0       | `["X", "Y"]`   |
/// | `from ..sub import X`      | `["sub"]`      | 2       | `["X"]`        |
/// | `from . import mod`        | `[]`           | 1       | `["mod"]`      |
/// | `from a import *`          | `["a"]`        | 0       | `[]`           |
///
/// Aliases (`as` clauses) are discarded: they rename the binding inside the
/// importer, not the module being depended on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// Dotted target path segments (may be empty for `from . import x`)
    pub segments: Vec<String>,
    /// Relative level: count of "steps up" encoded by leading dots; 0 for absolute imports
    pub level: u32,
    /// Imported names; empty for plain `import` statements and star imports
    pub names: Vec<String>,
    /// 1-based line of the statement
    pub line: u32,
    /// 0-based column of the statement
    pub column: u32,
}

/// Identity and location of the module whose imports are being resolved.
///
/// Relative imports are anchored on this: `is_package` distinguishes a package
/// (its file is the package marker) from a plain module, because a package's
/// level-1 relative imports are anchored at the package itself rather than at
/// its parent.
#[derive(Debug, Clone, Copy)]
pub struct Importer<'a> {
    /// Canonical identity of the importing module
    pub name: &'a ModuleIdentifier,
    /// Source file of the importing module
    pub file: &'a Path,
    /// Whether the importing file is a package marker file
    pub is_package: bool,
}

/// One resolved outgoing edge: a canonical target plus where the import was written.
///
/// Hashable so that duplicate imports of the same target at the same position
/// de-duplicate in sets, matching the set semantics of the graph's edge stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedImport {
    /// Canonical identity of the imported module
    pub target: ModuleIdentifier,
    /// Probed file location of the imported module
    pub target_path: PathBuf,
    /// Position of the import statement in the importing file
    pub location: SourceLocation,
}
