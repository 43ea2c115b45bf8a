//! Name resolution: from raw import records to canonical module identities.
//!
//! This is the heart of the system. It replicates the host language's own
//! name-resolution rules - absolute paths, relative "dots-up" paths, the
//! package-vs-plain-module distinction, and module-vs-attribute import
//! disambiguation - without a language runtime to ask, using only the
//! injectable [`ModuleLocator`] probe.
//!
//! # Relative Anchoring
//!
//! A relative import's base is the importer's identity resolved up by the
//! statement's level, with one adjustment: a *package* importing at level 1
//! is anchored at itself, not its parent, because `from . import x` written
//! inside a package's marker file means "my own package". The adjustment is
//! always applied before combining with the statement's explicit module name;
//! combining first would mis-anchor package-relative imports that name a
//! submodule.
//!
//! # Module vs Attribute
//!
//! `from pkg.sub import Thing` is ambiguous without executing the code:
//! `Thing` may be a submodule (`pkg.sub.Thing`) or an attribute defined inside
//! `pkg.sub`. Each name is first probed as a module; on genuine absence the
//! last segment is treated as an attribute and the base is re-probed. Only the
//! probe's "not found" outcome triggers the fallback - a true probe error
//! propagates unchanged, since falling back on a broken probe would silently
//! misclassify imports.

use std::collections::HashSet;

use crate::{
    modules::{Importer, ModuleIdentifier, ModuleLocator, RawImport, ResolvedImport, SourceLocation},
    Error, Result,
};

/// Resolves raw import records against an importing module's identity.
///
/// Pure function of its inputs plus the read-only probe: no side effects, no
/// internal state, safe to use from many worker threads at once.
pub struct NameResolver<'a> {
    locator: &'a dyn ModuleLocator,
}

impl<'a> NameResolver<'a> {
    /// Create a resolver backed by the given probe.
    #[must_use]
    pub fn new(locator: &'a dyn ModuleLocator) -> Self {
        Self { locator }
    }

    /// Resolve one raw import record into its outgoing edges.
    ///
    /// Returns the de-duplicated set of resolved targets for the record. A record
    /// with imported names yields one edge per name (collapsing attribute imports
    /// onto their owning module); a plain or star import yields a single edge.
    ///
    /// # Errors
    /// - [`Error::ModuleNotFound`] if the record's target does not exist after the
    ///   module-vs-attribute fallback (edge-local; carries the attempted path)
    /// - [`Error::Resolution`] or I/O errors from the probe itself (fatal)
    pub fn resolve(
        &self,
        importer: &Importer<'_>,
        raw: &RawImport,
    ) -> Result<HashSet<ResolvedImport>> {
        let location = SourceLocation {
            file: importer.file.to_path_buf(),
            line: raw.line,
            column: raw.column,
        };

        let base = self.anchor(importer, raw)?;

        let mut resolved = HashSet::new();

        if raw.names.is_empty() {
            // `import a.b` or `from a import *`: the record is the whole target.
            match self.locator.locate(&base)? {
                Some(path) => {
                    resolved.insert(ResolvedImport {
                        target: base,
                        target_path: path,
                        location,
                    });
                }
                None => return Err(Error::ModuleNotFound(base.to_string())),
            }
        } else {
            for name in &raw.names {
                resolved.insert(self.resolve_name(&base, name, &location)?);
            }
        }

        Ok(resolved)
    }

    /// Compute the base identifier the record's names are resolved against.
    fn anchor(&self, importer: &Importer<'_>, raw: &RawImport) -> Result<ModuleIdentifier> {
        if raw.level == 0 {
            return Ok(ModuleIdentifier::new(raw.segments.clone()));
        }

        let mut level = raw.level as usize;
        if importer.is_package {
            // A package's level-1 relative imports are anchored at itself.
            level -= 1;
        }

        if level >= importer.name.len() {
            return Err(Error::ModuleNotFound(format!(
                "attempted relative import beyond top-level package from '{}'",
                importer.name
            )));
        }

        let mut base = importer.name.resolve_levels_up(level);
        for segment in &raw.segments {
            base = base.join(segment);
        }

        Ok(base)
    }

    /// Resolve a single imported name, with the module-vs-attribute fallback.
    fn resolve_name(
        &self,
        base: &ModuleIdentifier,
        name: &str,
        location: &SourceLocation,
    ) -> Result<ResolvedImport> {
        let full = base.join(name);

        if let Some(path) = self.locator.locate(&full)? {
            return Ok(ResolvedImport {
                target: full,
                target_path: path,
                location: location.clone(),
            });
        }

        // Not a submodule: treat the last segment as an attribute owned by `base`.
        if let Some(path) = self.locator.locate(base)? {
            return Ok(ResolvedImport {
                target: base.clone(),
                target_path: path,
                location: location.clone(),
            });
        }

        Err(Error::ModuleNotFound(full.to_string()))
    }
}
