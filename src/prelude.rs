//! # modscope Prelude
//!
//! Convenient re-exports of the most commonly used types. Import this module
//! to get quick access to the essentials for building and querying module
//! import graphs.

/// The main error type for all modscope operations
pub use crate::Error;

/// The result type used throughout modscope
pub use crate::Result;

/// Main entry point: the parallel graph-construction pipeline
pub use crate::modules::{BuildReport, GraphBuilder};

/// Module identity and source positions
pub use crate::modules::{ModuleIdentifier, SourceLocation};

/// The graph and its node/edge types
pub use crate::modules::{ImportContext, ModuleGraph, ModuleNode, NodeId};

/// The module-location probe seam and its search-path implementation
pub use crate::modules::{ModuleLocator, SearchPathLocator};

/// Edge filtering policies
pub use crate::modules::ImportFilter;
