use crate::markup::ActivityNode;

/// What a visit callback wants done with the rest of the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeVisit {
    /// Descend into this node's children.
    Continue,
    /// Skip this node's entire subtree, keep walking siblings.
    SkipChildren,
    /// Stop the whole traversal.
    Abort,
}

/// Pre-order traversal. Returns false if the walk was aborted.
pub fn walk_activities<F>(root: &ActivityNode, visit: &mut F) -> bool
where
    F: FnMut(&ActivityNode) -> TreeVisit,
{
    match visit(root) {
        TreeVisit::Abort => false,
        TreeVisit::SkipChildren => true,
        TreeVisit::Continue => root
            .children
            .iter()
            .all(|child| walk_activities(child, visit)),
    }
}
