//! The hierarchy of one build: every source file below a source root,
//! parsed and assembled into a forest of class trees.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::class::{ClassId, ClassNode, ClassTable};
use crate::config::HierarchyConfig;
use crate::error::CoreError;
use crate::forest::{Forest, assemble};
use crate::ladder;
use crate::naming::derive_class_name;
use crate::parser::ParseContext;
use crate::propagate::Propagator;
use crate::registry::{FileRegistry, SourceFile};
use crate::scan::find_source_files;

#[derive(Debug)]
pub struct Hierarchy {
    source: PathBuf,
    dest: PathBuf,
    config: HierarchyConfig,
    registry: FileRegistry,
    forest: Forest,
    built: bool,
}

impl Hierarchy {
    pub fn new(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<Self, CoreError> {
        Self::with_config(source, dest, HierarchyConfig::default())
    }

    pub fn with_config(
        source: impl AsRef<Path>,
        dest: impl AsRef<Path>,
        config: HierarchyConfig,
    ) -> Result<Self, CoreError> {
        let (source, dest) = (source.as_ref(), dest.as_ref());
        if source.as_os_str().is_empty() || dest.as_os_str().is_empty() {
            return Err(CoreError::Config(
                "both 'source' and 'dest' are required".to_string(),
            ));
        }
        config.validate()?;
        Ok(Self {
            source: std::path::absolute(source).map_err(|err| CoreError::io(source, err))?,
            dest: std::path::absolute(dest).map_err(|err| CoreError::io(dest, err))?,
            config,
            registry: FileRegistry::new(),
            forest: Forest::new(),
            built: false,
        })
    }

    /// Find, parse and register every source file, then link the classes
    /// into trees.
    pub fn build(&mut self) -> Result<(), CoreError> {
        if self.built {
            return Err(CoreError::Config("hierarchy was already built".to_string()));
        }
        self.built = true;

        let paths = find_source_files(&self.source, &self.config.source_extension)?;
        let mut context = ParseContext::new(
            self.config.arena_capacity,
            self.config.output_extension.clone(),
        );
        for path in paths {
            let source_class = derive_class_name(&self.source, &path)?;
            let content = fs::read_to_string(&path).map_err(|err| CoreError::io(&path, err))?;
            let parsed = context.parse_file(&content, &source_class)?;
            let relative = path
                .strip_prefix(&self.source)
                .map(Path::to_path_buf)
                .map_err(|_| CoreError::MalformedPath {
                    path: path.clone(),
                    root: self.source.clone(),
                })?;
            self.registry.register(parsed, path, relative)?;
        }
        debug!(
            files = self.registry.len(),
            classes = self.registry.classes().len(),
            "parsed source tree"
        );

        self.forest = assemble(self.registry.classes_mut())?;
        info!(
            source = %self.source.display(),
            classes = self.registry.classes().len(),
            trees = self.forest.len(),
            "built class hierarchy"
        );
        Ok(())
    }

    /// Mark the source files whose generated output must be rewritten.
    ///
    /// A file is marked when its output is missing or older than the source,
    /// when `force` is set, or when any ancestor class was marked. Flags from
    /// a previous call are replaced. Returns true if anything was marked or
    /// `force` was set.
    pub fn propagate_modified(&mut self, force: bool) -> Result<bool, CoreError> {
        let propagation = Propagator::new(&self.registry, &self.dest, &self.config.output_extension)
            .run(&self.forest, force)?;
        debug!(
            modified = propagation.modified.len(),
            force, "propagated modifications"
        );
        self.registry.set_modified(&propagation.modified);
        Ok(propagation.any_modified)
    }

    /// All classes, each before its descendants.
    pub fn ordered_classes(&self) -> Vec<ClassId> {
        ladder::ordered_classes(self.registry.classes(), &self.forest)
    }

    pub fn trees(&self) -> &[ClassId] {
        self.forest.roots()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn files(&self) -> &[SourceFile] {
        self.registry.files()
    }

    pub fn fetch_file(&self, source_class: &str) -> Option<&SourceFile> {
        self.registry.lookup(source_class)
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn classes(&self) -> &ClassTable {
        self.registry.classes()
    }

    pub fn class(&self, id: ClassId) -> &ClassNode {
        &self.registry.classes()[id]
    }

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.registry.classes().find(name)
    }

    /// The file that declared class `id`.
    pub fn file_of(&self, id: ClassId) -> Option<&SourceFile> {
        self.registry.lookup(self.class(id).source_class())
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }
}
