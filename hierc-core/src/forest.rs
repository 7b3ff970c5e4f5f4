//! Assembly of registered classes into inheritance trees.

use tracing::debug;

use crate::class::{ClassId, ClassTable};
use crate::error::CoreError;

/// Root classes of every tree in a build, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<ClassId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[ClassId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Add a tree root, rejecting a second root with the same struct symbol.
    pub fn add_tree(&mut self, classes: &ClassTable, root: ClassId) -> Result<(), CoreError> {
        let struct_sym = classes[root].struct_sym();
        if self
            .roots
            .iter()
            .any(|&existing| classes[existing].struct_sym() == struct_sym)
        {
            return Err(CoreError::DuplicateTree(struct_sym.to_string()));
        }
        self.roots.push(root);
        Ok(())
    }
}

/// Link every class to its declared parent and collect parentless classes
/// as tree roots.
///
/// Classes are visited in table order, so children end up in registration
/// order regardless of whether a parent was registered before its child.
/// Nothing is linked unless every parent resolves and no parent chain loops.
pub fn assemble(classes: &mut ClassTable) -> Result<Forest, CoreError> {
    let mut forest = Forest::new();
    let mut parents = Vec::with_capacity(classes.len());
    for id in classes.ids() {
        let parent = match classes[id].parent_name() {
            Some(parent_name) => {
                let parent =
                    classes
                        .find(parent_name)
                        .ok_or_else(|| CoreError::UnresolvedParent {
                            parent: parent_name.to_string(),
                            class: classes[id].name().to_string(),
                        })?;
                Some(parent)
            }
            None => {
                forest.add_tree(classes, id)?;
                None
            }
        };
        parents.push(parent);
    }
    if let Some(looped) = first_cycle_member(classes, &parents) {
        return Err(CoreError::InheritanceCycle(classes[looped].name().to_string()));
    }
    for (id, parent) in classes.ids().zip(parents).collect::<Vec<_>>() {
        if let Some(parent) = parent {
            classes.link_child(parent, id);
        }
    }
    debug!(
        classes = classes.len(),
        trees = forest.len(),
        "assembled class forest"
    );
    Ok(forest)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnChain,
    Grounded,
}

/// Follow each parent chain until it reaches a root or loops back on itself.
fn first_cycle_member(classes: &ClassTable, parents: &[Option<ClassId>]) -> Option<ClassId> {
    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut chain = Vec::new();
    for start in classes.ids() {
        let mut next = Some(start);
        while let Some(id) = next {
            match marks[id.index()] {
                Mark::Grounded => break,
                Mark::OnChain => return Some(id),
                Mark::Unvisited => {
                    marks[id.index()] = Mark::OnChain;
                    chain.push(id);
                    next = parents[id.index()];
                }
            }
        }
        for id in chain.drain(..) {
            marks[id.index()] = Mark::Grounded;
        }
    }
    None
}
