//! Parallel graph construction pipeline.
//!
//! Orchestrates the whole flow: discover source files, then in parallel derive
//! each file's identity, parse its import statements and resolve them, and
//! finally apply every per-file result to the graph from a single point.
//!
//! # Concurrency Model
//!
//! A bounded worker pool runs the parse-and-resolve step per file. Each unit of
//! work is self-contained - it reads one file and produces one immutable result
//! record - so the parallel stage needs no locks. Results are drained from a
//! channel in completion order (not submission order) and applied one at a time
//! by the calling thread, which is the graph's single writer. The commutative
//! insertion protocol in [`ModuleGraph`] is what makes completion order
//! irrelevant to the final structure.
//!
//! # Failure Policy
//!
//! - a file that cannot be named, read, or parsed is skipped and counted
//! - an import that cannot be located is dropped and counted
//! - a probe error or a pool that cannot be created aborts the whole build
//!
//! The returned [`BuildReport`] always carries the skip and drop counts next to
//! the graph, so silently-incomplete results are observable.

use std::{collections::HashSet, fs, path::PathBuf, sync::Arc};

use log::{debug, warn};
use rayon::ThreadPoolBuilder;

use crate::{
    modules::{
        identifier::PACKAGE_MARKER, ImportFilter, ImportParser, Importer, ModuleGraph,
        ModuleIdentifier, ModuleLocator, NameResolver, ResolvedImport, SourceFinder,
    },
    Error, Result,
};

/// Default worker count for the parse-and-resolve stage.
const DEFAULT_WORKERS: usize = 5;

/// Outcome of a completed build: the graph plus what was left out of it.
#[derive(Debug)]
pub struct BuildReport {
    /// The assembled module import graph
    pub graph: ModuleGraph,
    /// Files excluded entirely (unnameable, unreadable, or syntactically broken)
    pub skipped_files: usize,
    /// Individual import statements whose target could not be located
    pub dropped_edges: usize,
}

/// Per-file result record delivered to the single insertion point.
enum FileOutcome {
    Processed {
        name: ModuleIdentifier,
        path: PathBuf,
        imports: HashSet<ResolvedImport>,
        dropped_edges: usize,
    },
    Skipped,
    Fatal(Error),
}

/// Configurable pipeline that assembles a [`ModuleGraph`] from source roots.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use modscope::modules::{GraphBuilder, SearchPathLocator};
///
/// let locator = Arc::new(SearchPathLocator::new(vec!["/project/src".into()]));
/// let report = GraphBuilder::new(locator).with_workers(8).build(&["/project/src/app".into()])?;
/// println!(
///     "{} modules, {} files skipped, {} edges dropped",
///     report.graph.len(),
///     report.skipped_files,
///     report.dropped_edges,
/// );
/// # Ok::<(), modscope::Error>(())
/// ```
pub struct GraphBuilder {
    locator: Arc<dyn ModuleLocator>,
    filter: ImportFilter,
    workers: usize,
    follow_links: bool,
}

impl GraphBuilder {
    /// Create a builder with the default worker count and a default filter
    /// (standard-library edges dropped, no third-party roots configured).
    #[must_use]
    pub fn new(locator: Arc<dyn ModuleLocator>) -> Self {
        Self {
            locator,
            filter: ImportFilter::new(Vec::new()),
            workers: DEFAULT_WORKERS,
            follow_links: false,
        }
    }

    /// Set the worker count bounding concurrent file processing.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Replace the edge filter.
    #[must_use]
    pub fn with_filter(mut self, filter: ImportFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Follow directory symlinks during discovery.
    #[must_use]
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Build the import graph for everything under the given roots.
    ///
    /// # Errors
    /// Returns [`Error::Pool`] if the worker pool cannot be created, or
    /// [`Error::Resolution`] (and other probe errors) if module lookup itself is
    /// broken. Per-file and per-edge problems never fail the build; they are
    /// recovered locally and reported in the [`BuildReport`] counts.
    pub fn build(&self, roots: &[PathBuf]) -> Result<BuildReport> {
        let files = SourceFinder::new().follow_links(self.follow_links).find(roots);
        debug!("discovered {} source files", files.len());

        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        let (sender, receiver) = crossbeam_channel::unbounded();

        for file in files {
            let sender = sender.clone();
            let locator = Arc::clone(&self.locator);
            let filter = self.filter.clone();

            pool.spawn(move || {
                let outcome = process_file(file, &*locator, &filter);
                // the receiver only disconnects when the build has already failed
                let _ = sender.send(outcome);
            });
        }
        drop(sender);

        let mut graph = ModuleGraph::new();
        let mut skipped_files = 0;
        let mut dropped_edges = 0;

        for outcome in receiver {
            match outcome {
                FileOutcome::Processed {
                    name,
                    path,
                    imports,
                    dropped_edges: dropped,
                } => {
                    dropped_edges += dropped;
                    graph.insert(name, path, &imports);
                }
                FileOutcome::Skipped => skipped_files += 1,
                FileOutcome::Fatal(e) => return Err(e),
            }
        }

        Ok(BuildReport {
            graph,
            skipped_files,
            dropped_edges,
        })
    }
}

/// Process one source file into its result record.
///
/// Runs on a worker thread; touches no shared mutable state.
fn process_file(path: PathBuf, locator: &dyn ModuleLocator, filter: &ImportFilter) -> FileOutcome {
    debug!("processing {}", path.display());

    let name = match ModuleIdentifier::from_file_path(&path) {
        Ok(name) => name,
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            return FileOutcome::Skipped;
        }
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            return FileOutcome::Skipped;
        }
    };

    let records = match ImportParser::new().parse(&content) {
        Ok(records) => records,
        Err(Error::Syntax {
            line,
            column,
            message,
        }) => {
            warn!(
                "syntax error in {} at {line}:{column}: {message}",
                path.display()
            );
            return FileOutcome::Skipped;
        }
        Err(e) => return FileOutcome::Fatal(e),
    };

    let is_package = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == PACKAGE_MARKER);
    let importer = Importer {
        name: &name,
        file: &path,
        is_package,
    };
    let resolver = NameResolver::new(locator);

    let mut imports = HashSet::new();
    let mut dropped_edges = 0;

    for record in &records {
        match resolver.resolve(&importer, record) {
            Ok(resolved) => imports.extend(resolved),
            Err(Error::ModuleNotFound(attempted)) => {
                // optional/conditional import; drop this edge, keep the rest
                debug!(
                    "dropping unresolved import '{attempted}' at {}:{}:{}",
                    path.display(),
                    record.line,
                    record.column
                );
                dropped_edges += 1;
            }
            Err(e) => return FileOutcome::Fatal(e),
        }
    }

    FileOutcome::Processed {
        name,
        path,
        imports: filter.apply(imports),
        dropped_edges,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::modules::SearchPathLocator;

    fn write(path: &std::path::Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    /// The three-module fixture: a package whose members import each other.
    fn fixture() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write(&app.join(PACKAGE_MARKER), "");
        write(&app.join("a.py"), "import app.b\n");
        write(&app.join("b.py"), "from . import a\n");
        root
    }

    fn builder(root: &tempfile::TempDir) -> GraphBuilder {
        let locator = Arc::new(SearchPathLocator::new(vec![root.path().to_path_buf()]));
        GraphBuilder::new(locator).with_workers(2)
    }

    #[test]
    fn test_end_to_end_three_module_package() {
        let root = fixture();
        let report = builder(&root).build(&[root.path().join("app")]).unwrap();

        assert_eq!(report.graph.len(), 3);
        assert_eq!(report.skipped_files, 0);
        assert_eq!(report.dropped_edges, 0);

        let graph = &report.graph;
        let a = graph.get("app.a").unwrap();
        let b = graph.get("app.b").unwrap();

        let a_out: Vec<String> = a
            .imports()
            .unwrap()
            .iter()
            .map(|e| graph.node(e.module).name().to_string())
            .collect();
        assert_eq!(a_out, vec!["app.b"]);

        let b_out: Vec<String> = b
            .imports()
            .unwrap()
            .iter()
            .map(|e| graph.node(e.module).name().to_string())
            .collect();
        assert_eq!(b_out, vec!["app.a"]);

        assert_eq!(a.imported_by().len(), 1);
        assert_eq!(b.imported_by().len(), 1);
    }

    #[test]
    fn test_deterministic_across_worker_counts() {
        let root = fixture();
        for workers in [1, 4] {
            let report = builder(&root)
                .with_workers(workers)
                .build(&[root.path().join("app")])
                .unwrap();
            assert_eq!(report.graph.len(), 3);
            assert_eq!(report.graph.unmet_count(), 0);
        }
    }

    #[test]
    fn test_syntax_error_skips_file_but_keeps_it_as_target() {
        let root = fixture();
        let app = root.path().join("app");
        write(&app.join("broken.py"), "import a..b\n");
        write(&app.join("c.py"), "import app.broken\n");

        let report = builder(&root).build(&[app]).unwrap();

        assert_eq!(report.skipped_files, 1);
        // broken.py is excluded as an importer but c.py still references it
        let broken = report.graph.get("app.broken").unwrap();
        assert!(broken.is_unmet());
        assert_eq!(broken.imported_by().len(), 1);
    }

    #[test]
    fn test_unresolvable_import_drops_single_edge() {
        let root = fixture();
        let app = root.path().join("app");
        write(&app.join("c.py"), "import no_such_module\nimport app.a\n");

        let report = builder(&root).build(&[app]).unwrap();

        assert_eq!(report.dropped_edges, 1);
        let c = report.graph.get("app.c").unwrap();
        assert_eq!(c.imports().unwrap().len(), 1);
    }

    #[test]
    fn test_stdlib_edges_filtered_by_default() {
        let root = tempfile::tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write(&app.join(PACKAGE_MARKER), "");
        // `os` resolves against the scan root only if present; fake one out
        write(&root.path().join("os.py"), "");
        write(&app.join("main.py"), "import os\n");

        let report = builder(&root).build(&[app]).unwrap();

        let main = report.graph.get("app.main").unwrap();
        assert_eq!(main.imports().unwrap().len(), 0);
        assert!(report.graph.get("os").is_none());
    }

    #[test]
    fn test_broken_probe_aborts_build() {
        struct BrokenLocator;
        impl ModuleLocator for BrokenLocator {
            fn locate(&self, _: &ModuleIdentifier) -> Result<Option<PathBuf>> {
                Err(Error::Resolution("search path misconfigured".to_string()))
            }
        }

        let root = fixture();
        let builder = GraphBuilder::new(Arc::new(BrokenLocator)).with_workers(2);
        let err = builder.build(&[root.path().join("app")]).unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[test]
    fn test_empty_roots_build_empty_graph() {
        let root = fixture();
        let report = builder(&root).build(&[]).unwrap();
        assert!(report.graph.is_empty());
        assert_eq!(report.skipped_files, 0);
    }
}
