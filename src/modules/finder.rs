//! Source discovery.
//!
//! Walks one or more root directories and yields the source files eligible for
//! graph construction. The walk is package-gated: a directory that does not
//! carry the package marker contributes nothing and is not descended into, so
//! stray scripts and build output next to a package tree never enter the graph.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::modules::identifier::PACKAGE_MARKER;

/// Recursive, package-gated walker over source roots.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceFinder {
    follow_links: bool,
}

impl SourceFinder {
    /// Create a finder with symlink following off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow directory symlinks during the walk.
    #[must_use]
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collect all eligible source files under the given roots.
    ///
    /// Unreadable directories are logged and skipped; discovery never fails the
    /// build on its own.
    #[must_use]
    pub fn find(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in roots {
            self.visit(root, &mut files);
        }
        files
    }

    fn visit(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        if !dir.join(PACKAGE_MARKER).is_file() {
            debug!("skipping {} - not a package", dir.display());
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot read directory {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if is_hidden(name) {
                debug!("ignoring {name} as a hidden entry");
                continue;
            }

            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() || (file_type.is_symlink() && self.links_to_dir(&path)) {
                self.visit(&path, files);
            } else if file_type.is_file() && eligible(name) {
                files.push(path);
            }
        }
    }

    fn links_to_dir(&self, path: &Path) -> bool {
        self.follow_links && fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// A file is eligible when it has the source extension and exactly one dot in
/// its name (names like `module.test.py` cannot form a valid dotted identifier).
fn eligible(name: &str) -> bool {
    if !name.ends_with(".py") {
        debug!("ignoring {name} - no .py extension");
        return false;
    }

    if name.matches('.').count() > 1 {
        debug!("ignoring {name} - extra dot in the filename");
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let app = root.path().join("app");
        let sub = app.join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(app.join(PACKAGE_MARKER), "").unwrap();
        fs::write(app.join("main.py"), "").unwrap();
        fs::write(app.join("notes.txt"), "").unwrap();
        fs::write(app.join(".hidden.py"), "").unwrap();
        fs::write(app.join("main.test.py"), "").unwrap();
        fs::write(sub.join(PACKAGE_MARKER), "").unwrap();
        fs::write(sub.join("helper.py"), "").unwrap();
        // a directory without a marker is pruned entirely
        let scripts = app.join("scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("deploy.py"), "").unwrap();
        root
    }

    fn names(files: &[PathBuf]) -> HashSet<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_finds_only_eligible_files_in_packages() {
        let root = fixture();
        let files = SourceFinder::new().find(&[root.path().join("app")]);

        let found = names(&files);
        assert!(found.contains("main.py"));
        assert!(found.contains("helper.py"));
        assert!(found.contains(PACKAGE_MARKER));
        assert!(!found.contains("notes.txt"));
        assert!(!found.contains(".hidden.py"));
        assert!(!found.contains("main.test.py"));
        assert!(!found.contains("deploy.py"));
    }

    #[test]
    fn test_non_package_root_yields_nothing() {
        let root = fixture();
        // the temp root itself carries no marker
        let files = SourceFinder::new().find(&[root.path().to_path_buf()]);
        assert!(files.is_empty());
    }

    #[test]
    fn test_multiple_roots_accumulate() {
        let first = fixture();
        let second = fixture();
        let files = SourceFinder::new().find(&[
            first.path().join("app"),
            second.path().join("app"),
        ]);
        // two copies of the fixture package: __init__ x2, main x2, sub/__init__ x2, helper x2
        assert_eq!(files.len(), 8);
    }
}
