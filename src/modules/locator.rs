//! Module-location probe.
//!
//! The resolution algorithm needs one external capability: given a dotted
//! identifier, does a module by that name exist, and if so where? The host
//! runtime answers this through its own import machinery; here it is an
//! explicit, injectable seam so the resolver stays pure and testable against a
//! fake probe while production code backs it with real search-path scanning.
//!
//! # Contract
//!
//! [`ModuleLocator::locate`] has three outcomes and they are never conflated:
//!
//! - `Ok(Some(path))` - the module exists at `path`
//! - `Ok(None)` - genuine absence; the resolver's module-vs-attribute fallback
//!   is only valid on this outcome
//! - `Err(_)` - the probe itself failed (broken search configuration); this
//!   aborts the whole build
//!
//! Probes may be called many times from many worker threads concurrently and
//! must be safe under concurrent read-only use.

use std::path::{Path, PathBuf};

use crate::{
    modules::{identifier::PACKAGE_MARKER, ModuleIdentifier},
    Error, Result,
};

/// Capability that maps a dotted identifier to its file location, or reports absence.
pub trait ModuleLocator: Send + Sync {
    /// Probe for the file defining `id`.
    ///
    /// # Errors
    /// Returns [`Error::Resolution`] (or an I/O error) only when the probe itself
    /// cannot function; plain absence is `Ok(None)`.
    fn locate(&self, id: &ModuleIdentifier) -> Result<Option<PathBuf>>;
}

/// Real probe backed by an ordered list of search roots.
///
/// For identifier `a.b` each root is tried in order: `<root>/a/b/__init__.py`
/// (a package), then `<root>/a/b.py` (a plain module). Every intermediate
/// directory on the candidate path must itself carry the package marker,
/// mirroring how the host locates modules along its search path.
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    roots: Vec<PathBuf>,
}

impl SearchPathLocator {
    /// Create a locator over the given search roots, tried in order.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// The configured search roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Probe a single root for `id`, requiring package markers along the way.
    fn locate_under(root: &Path, id: &ModuleIdentifier) -> Option<PathBuf> {
        let (last, parents) = id.segments().split_last()?;

        let mut dir = root.to_path_buf();
        for segment in parents {
            dir.push(segment);
            if !dir.join(PACKAGE_MARKER).is_file() {
                return None;
            }
        }

        let package = dir.join(last).join(PACKAGE_MARKER);
        if package.is_file() {
            return Some(package);
        }

        let module = dir.join(format!("{last}.py"));
        if module.is_file() {
            return Some(module);
        }

        None
    }
}

impl ModuleLocator for SearchPathLocator {
    fn locate(&self, id: &ModuleIdentifier) -> Result<Option<PathBuf>> {
        if self.roots.is_empty() {
            return Err(Error::Resolution(
                "no search paths configured".to_string(),
            ));
        }

        if id.is_empty() {
            return Err(Error::Resolution(
                "cannot locate an empty module identifier".to_string(),
            ));
        }

        Ok(self
            .roots
            .iter()
            .find_map(|root| Self::locate_under(root, id)))
    }
}
