/// One element of the parsed workflow tree.
///
/// Built during markup deserialization, mutated only there, and treated as
/// immutable afterwards. The tree owns its nodes exclusively; nothing is
/// shared across trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityNode {
    /// The resolved, qualified activity type name.
    pub type_name: String,
    /// The `Name` attribute; empty when the node is anonymous.
    pub name: String,
    /// The `Enabled` attribute; defaults to true.
    pub enabled: bool,
    /// Inline code carried by the `Code` attribute, if any.
    pub code: Option<String>,
    /// The `x:Class` marker; only ever set on a tree's root and marks the
    /// subtree as declaring a new compiled class.
    pub declared_class: Option<String>,
    /// Child activities in document order. Document order is significant:
    /// it becomes member order during code generation.
    pub children: Vec<ActivityNode>,
    /// 1-based source position of the element's opening tag.
    pub line: u32,
    pub column: u32,
}

impl ActivityNode {
    pub fn declares_class(&self) -> bool {
        self.declared_class.is_some()
    }

    /// Total node count including this node, enabled or not.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ActivityNode::node_count).sum::<usize>()
    }
}
