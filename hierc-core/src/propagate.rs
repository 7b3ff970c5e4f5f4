//! Staleness propagation down the inheritance trees.
//!
//! Generated code for a child embeds its parent's, so a stale parent forces
//! every descendant to be regenerated even when the descendant's own output
//! is current.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::class::{ClassId, ClassTable};
use crate::error::CoreError;
use crate::forest::Forest;
use crate::registry::FileRegistry;

/// Whether `dest` exists and is at least as new as `orig`.
///
/// A missing `dest` or a missing `orig` both count as not current.
pub fn is_current(orig: &Path, dest: &Path) -> Result<bool, CoreError> {
    let Some(dest_time) = modified_time(dest)? else {
        return Ok(false);
    };
    let Some(orig_time) = modified_time(orig)? else {
        return Ok(false);
    };
    Ok(dest_time >= orig_time)
}

fn modified_time(path: &Path) -> Result<Option<std::time::SystemTime>, CoreError> {
    match std::fs::metadata(path) {
        Ok(metadata) => metadata
            .modified()
            .map(Some)
            .map_err(|err| CoreError::io(path, err)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(CoreError::io(path, err)),
    }
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Source classes whose files must be regenerated.
    pub modified: HashSet<String>,
    /// True if anything was modified or the pass was forced.
    pub any_modified: bool,
}

/// Walks every tree once, deciding which source files are stale.
pub struct Propagator<'a> {
    registry: &'a FileRegistry,
    dest: &'a Path,
    output_extension: &'a str,
    modified: HashSet<String>,
}

impl<'a> Propagator<'a> {
    pub fn new(registry: &'a FileRegistry, dest: &'a Path, output_extension: &'a str) -> Self {
        Self {
            registry,
            dest,
            output_extension,
            modified: HashSet::new(),
        }
    }

    /// Visit every tree of `forest`, starting each root with `force`.
    pub fn run(mut self, forest: &Forest, force: bool) -> Result<Propagation, CoreError> {
        let registry = self.registry;
        let classes = registry.classes();
        let mut somebody_is_modified = false;
        for &root in forest.roots() {
            if self.visit(classes, root, force)? {
                somebody_is_modified = true;
            }
        }
        Ok(Propagation {
            modified: self.modified,
            any_modified: somebody_is_modified || force,
        })
    }

    fn visit(
        &mut self,
        classes: &ClassTable,
        id: ClassId,
        inherited: bool,
    ) -> Result<bool, CoreError> {
        let class = &classes[id];
        let source_class = class.source_class();
        let file = self
            .registry
            .lookup(source_class)
            .ok_or_else(|| CoreError::MissingSourceFile(source_class.to_string()))?;
        let source_path = file.source_path();
        let output_path: PathBuf = file.output_path(self.dest, self.output_extension);

        let mut modified = inherited;
        if !is_current(source_path, &output_path)? {
            modified = true;
        }
        if modified {
            self.modified.insert(source_class.to_string());
        }
        trace!(class = class.name(), inherited, modified, "visited class");

        let mut somebody_is_modified = modified;
        for &child in class.children() {
            if class.is_final() {
                return Err(CoreError::FinalInheritance {
                    parent: class.name().to_string(),
                    child: classes[child].name().to_string(),
                });
            }
            if self.visit(classes, child, modified)? {
                somebody_is_modified = true;
            }
        }
        Ok(somebody_is_modified)
    }
}
