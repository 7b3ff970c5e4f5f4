//! Class nodes and the flat class table that owns them.
//!
//! Nodes refer to one another by [`ClassId`], an index into the table, so
//! parent and child links never form ownership cycles.

use std::collections::HashMap;
use std::fmt;

use crate::parser::ClassDecl;

/// Index of a class within a [`ClassTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    name: String,
    parent_name: Option<String>,
    /// Filled in once the forest is assembled.
    parent: Option<ClassId>,
    is_final: bool,
    children: Vec<ClassId>,
    cnick: String,
    struct_sym: String,
    include_h: String,
    source_class: String,
}

impl ClassNode {
    pub fn new(decl: ClassDecl, source_class: impl Into<String>) -> Self {
        Self {
            name: decl.name,
            parent_name: decl.parent,
            parent: None,
            is_final: decl.is_final,
            children: Vec::new(),
            cnick: decl.cnick,
            struct_sym: decl.struct_sym,
            include_h: decl.include_h,
            source_class: source_class.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn children(&self) -> &[ClassId] {
        &self.children
    }

    pub fn cnick(&self) -> &str {
        &self.cnick
    }

    pub fn struct_sym(&self) -> &str {
        &self.struct_sym
    }

    pub fn include_h(&self) -> &str {
        &self.include_h
    }

    /// Derived class name of the file that declared this class.
    pub fn source_class(&self) -> &str {
        &self.source_class
    }
}

/// Every class of a build, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    nodes: Vec<ClassNode>,
    by_name: HashMap<String, ClassId>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node. The caller is responsible for name uniqueness; a later
    /// node with a duplicate name does not replace the first in lookups.
    pub fn push(&mut self, node: ClassNode) -> ClassId {
        let id = ClassId(self.nodes.len() as u32);
        self.by_name.entry(node.name.clone()).or_insert(id);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassNode> {
        self.nodes.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.nodes.len() as u32).map(ClassId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (ClassId(index as u32), node))
    }

    /// Ancestors of `id`, nearest first. Empty until the forest is assembled.
    pub fn ancestors(&self, id: ClassId) -> Ancestors<'_> {
        Ancestors {
            table: self,
            next: self[id].parent,
        }
    }

    pub(crate) fn link_child(&mut self, parent: ClassId, child: ClassId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }
}

impl std::ops::Index<ClassId> for ClassTable {
    type Output = ClassNode;

    fn index(&self, id: ClassId) -> &ClassNode {
        &self.nodes[id.index()]
    }
}

pub struct Ancestors<'a> {
    table: &'a ClassTable,
    next: Option<ClassId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = self.table[current].parent;
        Some(current)
    }
}
