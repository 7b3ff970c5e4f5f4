use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::class::{ClassId, ClassNode, ClassTable};
use crate::error::CoreError;
use crate::naming::class_name_to_path;
use crate::parser::ParsedFile;

/// A parsed source file and the classes it declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    source_class: String,
    path: PathBuf,
    relative: PathBuf,
    classes: Vec<ClassId>,
    modified: bool,
}

impl SourceFile {
    /// Derived class name, the registry key.
    pub fn source_class(&self) -> &str {
        &self.source_class
    }

    /// Absolute path of the source file.
    pub fn source_path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the source root.
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Location of the generated file for this one under `dest`.
    ///
    /// Built from the derived class name, the same way class include paths
    /// are, so `Test_Util/My-Class.cfh` generates `TestUtil/MyClass.h`.
    pub fn output_path(&self, dest: &Path, output_extension: &str) -> PathBuf {
        dest.join(format!(
            "{}.{output_extension}",
            class_name_to_path(&self.source_class)
        ))
    }

    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    /// Whether the last propagation pass asked for this file to be regenerated.
    pub fn modified(&self) -> bool {
        self.modified
    }
}

/// Registered source files keyed by derived class name, plus the flat
/// table of every class they declared.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Vec<SourceFile>,
    by_source_class: HashMap<String, usize>,
    classes: ClassTable,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parsed file found at `path` (`relative` to the source root).
    ///
    /// Nothing is recorded unless every check passes.
    pub fn register(
        &mut self,
        parsed: ParsedFile,
        path: PathBuf,
        relative: PathBuf,
    ) -> Result<&SourceFile, CoreError> {
        let ParsedFile {
            source_class,
            classes,
        } = parsed;
        if self.by_source_class.contains_key(&source_class) {
            return Err(CoreError::DuplicateFile(source_class));
        }
        {
            let mut seen = HashSet::new();
            for decl in &classes {
                if self.classes.find(&decl.name).is_some() || !seen.insert(decl.name.as_str()) {
                    return Err(CoreError::DuplicateClass(decl.name.clone()));
                }
            }
        }

        let class_ids = classes
            .into_iter()
            .map(|decl| self.classes.push(ClassNode::new(decl, source_class.clone())))
            .collect::<Vec<_>>();
        debug!(%source_class, classes = class_ids.len(), "registered source file");

        let index = self.files.len();
        self.by_source_class.insert(source_class.clone(), index);
        self.files.push(SourceFile {
            source_class,
            path,
            relative,
            classes: class_ids,
            modified: false,
        });
        Ok(&self.files[index])
    }

    pub fn lookup(&self, source_class: &str) -> Option<&SourceFile> {
        self.by_source_class
            .get(source_class)
            .map(|&index| &self.files[index])
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub(crate) fn classes_mut(&mut self) -> &mut ClassTable {
        &mut self.classes
    }

    pub fn modified_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(|file| file.modified)
    }

    /// Replace every file's modified flag: set for the given source classes,
    /// cleared for all others.
    pub(crate) fn set_modified(&mut self, modified: &HashSet<String>) {
        for file in &mut self.files {
            file.modified = modified.contains(&file.source_class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ClassDecl;

    fn decl(name: &str) -> ClassDecl {
        ClassDecl {
            name: name.to_string(),
            parent: None,
            is_final: false,
            cnick: name.to_string(),
            struct_sym: name.to_string(),
            include_h: format!("{name}.h"),
        }
    }

    fn parsed(source_class: &str, names: &[&str]) -> ParsedFile {
        ParsedFile {
            source_class: source_class.to_string(),
            classes: names.iter().map(|name| decl(name)).collect(),
        }
    }

    fn register(
        registry: &mut FileRegistry,
        source_class: &str,
        names: &[&str],
    ) -> Result<(), CoreError> {
        let relative = PathBuf::from(format!("{source_class}.cfh"));
        registry
            .register(
                parsed(source_class, names),
                Path::new("/src").join(&relative),
                relative,
            )
            .map(|_| ())
    }

    #[test]
    fn registers_files_and_their_classes() {
        let mut registry = FileRegistry::new();
        register(&mut registry, "Animal", &["Animal"]).expect("register");
        register(&mut registry, "Dog", &["Dog", "Puppy"]).expect("register");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.classes().len(), 3);
        let dog = registry.lookup("Dog").expect("lookup");
        assert_eq!(dog.classes().len(), 2);
        assert_eq!(dog.source_path(), Path::new("/src/Dog.cfh"));
        let puppy = registry.classes().find("Puppy").expect("find");
        assert_eq!(registry.classes()[puppy].source_class(), "Dog");
        assert!(registry.lookup("Cat").is_none());
    }

    #[test]
    fn rejects_duplicate_file() {
        let mut registry = FileRegistry::new();
        register(&mut registry, "Animal", &["Animal"]).expect("register");
        let err = register(&mut registry, "Animal", &["Other"]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateFile(name) if name == "Animal"));
        assert_eq!(registry.classes().len(), 1);
    }

    #[test]
    fn rejects_class_declared_by_another_file() {
        let mut registry = FileRegistry::new();
        register(&mut registry, "Animal", &["Animal", "Dog"]).expect("register");
        let err = register(&mut registry, "Dog", &["Cat", "Dog"]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateClass(name) if name == "Dog"));
        assert!(registry.lookup("Dog").is_none());
        assert!(registry.classes().find("Cat").is_none());
    }

    #[test]
    fn rejects_class_declared_twice_in_one_file() {
        let mut registry = FileRegistry::new();
        let err = register(&mut registry, "Animal", &["Animal", "Animal"]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateClass(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn mirrors_output_path_under_dest() {
        let mut registry = FileRegistry::new();
        let relative = PathBuf::from("Zoo/Dog.cfh");
        let file = registry
            .register(
                parsed("Zoo::Dog", &["Zoo::Dog"]),
                Path::new("/src").join(&relative),
                relative,
            )
            .expect("register");
        assert_eq!(
            file.output_path(Path::new("/out"), "h"),
            PathBuf::from("/out/Zoo/Dog.h")
        );
    }

    #[test]
    fn output_path_follows_derived_name() {
        let mut registry = FileRegistry::new();
        let relative = PathBuf::from("Test_Util/My-Class.cfh");
        let file = registry
            .register(
                parsed("TestUtil::MyClass", &["TestUtil::MyClass"]),
                Path::new("/src").join(&relative),
                relative,
            )
            .expect("register");
        assert_eq!(
            file.output_path(Path::new("/out"), "h"),
            PathBuf::from("/out/TestUtil/MyClass.h")
        );
    }

    #[test]
    fn set_modified_replaces_previous_flags() {
        let mut registry = FileRegistry::new();
        register(&mut registry, "A", &["A"]).expect("register");
        register(&mut registry, "B", &["B"]).expect("register");

        registry.set_modified(&HashSet::from(["A".to_string()]));
        let names: Vec<_> = registry.modified_files().map(|f| f.source_class()).collect();
        assert_eq!(names, ["A"]);

        registry.set_modified(&HashSet::from(["B".to_string()]));
        let names: Vec<_> = registry.modified_files().map(|f| f.source_class()).collect();
        assert_eq!(names, ["B"]);
    }
}
