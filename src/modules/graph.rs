//! Bidirectional module dependency graph with forward-reference reconciliation.
//!
//! The graph accepts per-file results in whatever order the workers finish and
//! still produces the same structure, because a module referenced before its
//! own file has been processed exists as an *unmet* placeholder node that
//! accumulates incoming edges. When the defining file arrives the placeholder
//! is promoted in place - never replaced - so edges recorded early are kept.
//!
//! # Architecture
//!
//! All nodes live in one arena ([`Vec<ModuleNode>`]) addressed by [`NodeId`].
//! Three key tables reference into it:
//!
//! - `by_name` - resolved modules by canonical identifier
//! - `by_path` - resolved modules by source file path
//! - `unmet` - placeholders by identifier, transient until promoted
//!
//! A module reachable through any table resolves to the same arena slot, which
//! makes the single-instance invariant structural rather than something the
//! insertion code has to re-establish.
//!
//! # Concurrency
//!
//! None, deliberately. [`ModuleGraph::insert`] takes `&mut self`; the build
//! pipeline funnels all results through a single writer, and that discipline -
//! not locking - is the entire concurrency-safety argument for the graph.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::modules::{ModuleIdentifier, ResolvedImport, SourceLocation};

/// Index of a node in the graph's arena.
///
/// Stable for the lifetime of the graph; nodes are never removed during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One endpoint of an edge: the module on the other side plus where the import
/// statement was written.
///
/// The same location appears in the importer's outgoing set and the target's
/// incoming set - edge symmetry holds immediately after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportContext {
    /// The module on the other side of the edge
    pub module: NodeId,
    /// Position of the import statement
    pub location: SourceLocation,
}

/// A single module observed anywhere in the graph, as importer or as target.
#[derive(Debug)]
pub struct ModuleNode {
    name: ModuleIdentifier,
    path: Option<PathBuf>,
    imports: Option<HashSet<ImportContext>>,
    imported_by: HashSet<ImportContext>,
}

impl ModuleNode {
    fn new(name: ModuleIdentifier, path: Option<PathBuf>) -> Self {
        Self {
            name,
            path,
            imports: None,
            imported_by: HashSet::new(),
        }
    }

    /// Canonical identity of this module.
    #[must_use]
    pub fn name(&self) -> &ModuleIdentifier {
        &self.name
    }

    /// File path, known once the module has been discovered or probed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Outgoing edges: modules directly imported by this one.
    ///
    /// `None` means the module's own file has not been processed yet - distinct
    /// from `Some` of an empty set, which means processed and importing nothing.
    #[must_use]
    pub fn imports(&self) -> Option<&HashSet<ImportContext>> {
        self.imports.as_ref()
    }

    /// Incoming edges: modules that import this one. Always present; grows
    /// monotonically as other modules are discovered.
    #[must_use]
    pub fn imported_by(&self) -> &HashSet<ImportContext> {
        &self.imported_by
    }

    /// Whether this node is still an unmet placeholder.
    #[must_use]
    pub fn is_unmet(&self) -> bool {
        self.imports.is_none()
    }
}

/// Module import graph.
///
/// Built once per run from scratch; no state persists across builds.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    nodes: Vec<ModuleNode>,
    by_path: HashMap<PathBuf, NodeId>,
    by_name: HashMap<ModuleIdentifier, NodeId>,
    unmet: HashMap<ModuleIdentifier, NodeId>,
}

impl ModuleGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one processed module and its resolved outgoing edges.
    ///
    /// The insertion protocol is commutative for mutually importing modules:
    /// whichever arrives first, both end up with symmetric edge sets, because an
    /// unmet placeholder keeps accumulating incoming edges and is promoted -
    /// never replaced - when its own file arrives.
    ///
    /// Steps:
    /// 1. Look up or create the importer's node, promoting an unmet placeholder
    ///    (with its accumulated incoming edges) if one exists.
    /// 2. For each edge, look up or create the target (resolved table first,
    ///    then unmet, else a fresh placeholder) and mirror the edge into the
    ///    target's incoming set.
    /// 3. Commit the importer's outgoing set - this is what marks the importer
    ///    resolved, even when the set is empty.
    /// 4. Register the importer under both its path and identifier keys.
    pub fn insert(
        &mut self,
        name: ModuleIdentifier,
        path: PathBuf,
        imports: &HashSet<ResolvedImport>,
    ) {
        let importer = match self.unmet.remove(&name) {
            Some(id) => {
                self.nodes[id.0].path = Some(path.clone());
                id
            }
            None => match self.by_name.get(&name) {
                // Same identifier seen from two files (e.g. duplicated roots):
                // reuse the node rather than violating the single-instance rule.
                Some(&id) => id,
                None => self.push_node(name.clone(), Some(path.clone())),
            },
        };

        let mut outgoing = HashSet::with_capacity(imports.len());
        for import in imports {
            let target = self.intern_target(importer, import);

            self.nodes[target.0].imported_by.insert(ImportContext {
                module: importer,
                location: import.location.clone(),
            });

            outgoing.insert(ImportContext {
                module: target,
                location: import.location.clone(),
            });
        }

        let node = &mut self.nodes[importer.0];
        match &mut node.imports {
            Some(existing) => existing.extend(outgoing),
            None => node.imports = Some(outgoing),
        }

        self.by_path.insert(path, importer);
        self.by_name.insert(name, importer);
    }

    /// Find or create the node for an edge target.
    fn intern_target(&mut self, importer: NodeId, import: &ResolvedImport) -> NodeId {
        if self.nodes[importer.0].name == import.target {
            // self-import; the importer is its own target
            return importer;
        }

        if let Some(&id) = self
            .by_name
            .get(&import.target)
            .or_else(|| self.unmet.get(&import.target))
        {
            return id;
        }

        let id = self.push_node(import.target.clone(), Some(import.target_path.clone()));
        self.unmet.insert(import.target.clone(), id);
        id
    }

    fn push_node(&mut self, name: ModuleIdentifier, path: Option<PathBuf>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ModuleNode::new(name, path));
        id
    }

    /// Look up a module by dotted name, falling back to a path lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ModuleNode> {
        self.get_by_name(&ModuleIdentifier::from_dotted(key))
            .or_else(|| self.get_by_path(Path::new(key)))
    }

    /// Look up a module by canonical identifier, resolved or unmet.
    #[must_use]
    pub fn get_by_name(&self, name: &ModuleIdentifier) -> Option<&ModuleNode> {
        self.by_name
            .get(name)
            .or_else(|| self.unmet.get(name))
            .map(|id| &self.nodes[id.0])
    }

    /// Look up a resolved module by its source file path.
    #[must_use]
    pub fn get_by_path(&self, path: &Path) -> Option<&ModuleNode> {
        self.by_path.get(path).map(|id| &self.nodes[id.0])
    }

    /// Resolve an edge endpoint to its node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ModuleNode {
        &self.nodes[id.0]
    }

    /// Total node count: resolved plus still-unmet.
    ///
    /// Stable regardless of the order files were inserted in.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len() + self.unmet.len()
    }

    /// Whether the graph holds no modules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of modules whose own file has been processed.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.by_name.len()
    }

    /// Number of placeholder nodes still awaiting their defining file.
    ///
    /// After a complete build these are external modules: targets referenced
    /// from the scanned tree but defined outside it.
    #[must_use]
    pub fn unmet_count(&self) -> usize {
        self.unmet.len()
    }

    /// Iterate over every node, resolved and unmet.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.nodes.iter()
    }
}
