//! Parent-before-descendant ordering of classes for code generation.

use crate::class::{ClassId, ClassTable};
use crate::forest::Forest;

/// Pre-order walk of the tree rooted at `root`: a class, then each child's
/// ladder in child order.
pub fn tree_to_ladder(classes: &ClassTable, root: ClassId) -> Vec<ClassId> {
    let mut ladder = Vec::new();
    push_tree(classes, root, &mut ladder);
    ladder
}

fn push_tree(classes: &ClassTable, id: ClassId, ladder: &mut Vec<ClassId>) {
    ladder.push(id);
    for &child in classes[id].children() {
        push_tree(classes, child, ladder);
    }
}

/// Every class of the forest, tree by tree in root order.
///
/// A class always appears before all of its descendants.
pub fn ordered_classes(classes: &ClassTable, forest: &Forest) -> Vec<ClassId> {
    let mut ladder = Vec::with_capacity(classes.len());
    for &root in forest.roots() {
        push_tree(classes, root, &mut ladder);
    }
    ladder
}
