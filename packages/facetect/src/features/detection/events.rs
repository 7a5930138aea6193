//! Structural-edit events from the host's content/structure stream.
//!
//! The host's open-ended listener hierarchy is replaced by a tagged
//! variant dispatched through one explicit match in
//! [`DetectionManager::handle_event`](super::DetectionManager::handle_event).

use super::FileHandle;
use std::sync::Arc;

/// The node a structural edit touched.
#[derive(Clone)]
pub struct StructuralNode {
    /// Set when the changed node is itself a whole file subtree.
    file: Option<Arc<dyn FileHandle>>,

    /// The file owning the edited node, when resolvable.
    owning_file: Option<Arc<dyn FileHandle>>,
}

impl StructuralNode {
    /// A whole-file subtree appeared or disappeared.
    pub fn file(file: Arc<dyn FileHandle>) -> Self {
        Self {
            file: Some(file),
            owning_file: None,
        }
    }

    /// An edit inside a file.
    pub fn inner(owning_file: Arc<dyn FileHandle>) -> Self {
        Self {
            file: None,
            owning_file: Some(owning_file),
        }
    }

    /// An edit whose owning file could not be resolved.
    pub fn unresolved() -> Self {
        Self {
            file: None,
            owning_file: None,
        }
    }

    pub fn as_file(&self) -> Option<&Arc<dyn FileHandle>> {
        self.file.as_ref()
    }

    pub fn owning_file(&self) -> Option<&Arc<dyn FileHandle>> {
        self.owning_file.as_ref().or(self.file.as_ref())
    }
}

/// Structural edit, tagged by kind.
#[derive(Clone)]
pub enum StructuralEvent {
    ChildAdded(StructuralNode),
    ChildRemoved(StructuralNode),
    ChildReplaced(StructuralNode),
    ChildMoved(StructuralNode),
}
