use std::path::PathBuf;

use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into three propagation classes, and keeping them apart is load-bearing
/// for the build pipeline:
///
/// # File-local errors
/// - [`Error::InvalidPath`] - A file path cannot be converted to a module identifier
/// - [`Error::Syntax`] - An import statement could not be parsed
/// - [`Error::Io`] - A single source file could not be read
///
/// These exclude one file from the graph; the build continues and reports the skip.
///
/// # Edge-local errors
/// - [`Error::ModuleNotFound`] - One import statement's target does not exist anywhere on the
///   configured search paths
///
/// This drops a single edge; sibling imports in the same file are still resolved.
///
/// # Fatal errors
/// - [`Error::Resolution`] - The module-location probe itself failed, which indicates a broken
///   search configuration rather than missing data
/// - [`Error::Pool`] - The worker pool could not be created
///
/// These abort the whole build, since continuing would silently produce an incomplete graph.
#[derive(Error, Debug)]
pub enum Error {
    /// A file path has no usable name component and cannot become a module identifier.
    ///
    /// Fatal to that file only; the file is skipped and counted in the build report.
    #[error("Cannot derive a module identifier from '{0}'")]
    InvalidPath(PathBuf),

    /// An import statement is malformed.
    ///
    /// Carries the position of the offending statement. The builder treats this as
    /// skip-and-continue at file granularity, matching how a host-language syntax
    /// error excludes the whole file as an importer.
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the statement that failed to parse
        line: u32,
        /// 0-based column of the statement that failed to parse
        column: u32,
        /// Description of what was malformed
        message: String,
    },

    /// An import target could not be located, even after the module-vs-attribute fallback.
    ///
    /// Carries the originally attempted dotted path for diagnostics. Non-fatal: optional
    /// and conditional imports legitimately produce this, so only the one edge is dropped.
    #[error("Could not find module '{0}' under the configured search paths")]
    ModuleNotFound(String),

    /// The module-location probe reported an error distinct from plain absence.
    ///
    /// This is a configuration or environment problem (e.g. malformed search paths), not a
    /// per-file data problem. It must never be conflated with [`Error::ModuleNotFound`]:
    /// the attribute-import fallback is only valid for genuine absence.
    #[error("Module lookup failed: {0}")]
    Resolution(String),

    /// The worker pool backing the parallel parse stage could not be created.
    #[error("Failed to create worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// File I/O error while reading a source file.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
