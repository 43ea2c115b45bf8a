//! Module identity, resolution, and graph construction.
//!
//! This is the crate's domain root. The pieces compose into one pipeline:
//!
//! 1. [`SourceFinder`] discovers candidate source files under the scan roots
//! 2. [`ImportParser`] extracts raw, position-tagged import records per file
//! 3. [`NameResolver`] maps each record to canonical [`ModuleIdentifier`]s,
//!    probing existence through a [`ModuleLocator`]
//! 4. [`ImportFilter`] suppresses edges the caller does not care about
//! 5. [`GraphBuilder`] runs steps 2-4 in parallel per file and serializes the
//!    results into one [`ModuleGraph`]
//!
//! Steps 1-4 are pure per-file work; only step 5's final insertion touches
//! shared state, and it does so from a single thread.

pub mod builder;
pub mod filter;
pub mod finder;
pub mod graph;
pub mod identifier;
pub mod locator;
pub mod parser;
pub mod resolver;
pub mod types;

pub use builder::{BuildReport, GraphBuilder};
pub use filter::ImportFilter;
pub use finder::SourceFinder;
pub use graph::{ImportContext, ModuleGraph, ModuleNode, NodeId};
pub use identifier::{ModuleIdentifier, SourceLocation, PACKAGE_MARKER};
pub use locator::{ModuleLocator, SearchPathLocator};
pub use parser::ImportParser;
pub use resolver::NameResolver;
pub use types::{Importer, RawImport, ResolvedImport};
