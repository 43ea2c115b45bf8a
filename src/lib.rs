// Copyright 2026 The modscope authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # modscope
//!
//! A framework for scanning Python source trees, extracting their import
//! statements, resolving each statement to the canonical identity of the module
//! it refers to, and assembling a bidirectional dependency graph
//! (who-imports-whom / who-is-imported-by-whom). Useful for dependency
//! analysis, dead-code detection, and architectural-boundary enforcement over
//! large source trees.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use modscope::prelude::*;
//!
//! let root = std::path::PathBuf::from("/project/src");
//! let locator = Arc::new(SearchPathLocator::new(vec![root.clone()]));
//! let report = GraphBuilder::new(locator).build(&[root.join("app")])?;
//!
//! println!(
//!     "{} modules ({} external), {} files skipped, {} edges dropped",
//!     report.graph.len(),
//!     report.graph.unmet_count(),
//!     report.skipped_files,
//!     report.dropped_edges,
//! );
//!
//! if let Some(module) = report.graph.get("app.models") {
//!     println!("app.models is imported {} times", module.imported_by().len());
//! }
//! # Ok::<(), modscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`modules::ModuleIdentifier`] - canonical dotted module identity with
//!   package-ancestry derivation from file paths
//! - [`modules::NameResolver`] - replicates the host language's name-resolution
//!   rules (absolute and relative imports, module-vs-attribute disambiguation)
//!   against an injectable [`modules::ModuleLocator`] probe
//! - [`modules::ModuleGraph`] - node/edge store supporting out-of-order
//!   insertion with forward-reference reconciliation
//! - [`modules::GraphBuilder`] - parallel per-file processing with a single
//!   serialized insertion point
//!
//! Files are parsed and resolved concurrently on a bounded worker pool; the
//! graph is written from exactly one thread. The insertion protocol is
//! commutative, so the resulting graph is deterministic regardless of the
//! order in which files finish processing.
//!
//! ## Error Handling
//!
//! Per-file problems (unparseable or unreadable files) and per-edge problems
//! (imports of modules that do not exist) are recovered locally, logged, and
//! surfaced as counts on [`modules::BuildReport`]. Errors that mean the
//! resolver itself cannot function - a broken search configuration, a worker
//! pool that will not start - abort the build. See [`Error`] for the full
//! taxonomy.

pub mod modules;
pub mod prelude;

mod error;

pub use error::Error;

/// The result type used throughout modscope.
pub type Result<T> = std::result::Result<T, Error>;
