pub mod commands;
pub mod journal;

pub use commands::{
    BoundaryCommand, CMD_ADD_NODE, CMD_CONFIRM, CMD_NODE_MOVED, CMD_RECONFIGURE, CMD_RESET,
    DispatchOutcome, dispatch,
};
pub use journal::{EditJournal, EditRecord, JournalError, JournalPacket};

use crate::scene::{BoxCollider, NodeId, SceneError, SceneGraph, Visual};

/// Editor-side services the boundary tools call out to: proxy object
/// creation and destruction, undo-style mutation records, and warnings.
/// Implementations decide how those requests surface; the boundary layer
/// never assumes a particular frontend.
pub trait EditorHost {
    fn label(&self) -> &'static str;

    fn create_box(
        &mut self,
        scene: &mut SceneGraph,
        parent: NodeId,
        name: &str,
    ) -> Result<NodeId, SceneError>;

    fn destroy(&mut self, scene: &mut SceneGraph, node: NodeId);

    fn record_mutation(&mut self, operation: &str, detail: &str);

    fn warn(&mut self, message: String);
}

/// Host for tests and batch tooling: boxes become plain scene nodes,
/// mutations land in an [`EditJournal`], warnings are logged and kept.
#[derive(Default)]
pub struct HeadlessHost {
    journal: EditJournal,
    warnings: Vec<String>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> &EditJournal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut EditJournal {
        &mut self.journal
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl EditorHost for HeadlessHost {
    fn label(&self) -> &'static str {
        "Headless Editor Host"
    }

    fn create_box(
        &mut self,
        scene: &mut SceneGraph,
        parent: NodeId,
        name: &str,
    ) -> Result<NodeId, SceneError> {
        let id = scene.spawn_child(parent, name)?;
        if let Some(node) = scene.node_mut(id) {
            node.visual = Some(Visual::default());
            node.collider = Some(BoxCollider::default());
        }
        Ok(id)
    }

    fn destroy(&mut self, scene: &mut SceneGraph, node: NodeId) {
        // destroying an already-gone node is a no-op, not an error
        if let Err(err) = scene.despawn(node) {
            log::debug!("[editor] destroy skipped: {err}");
        }
    }

    fn record_mutation(&mut self, operation: &str, detail: &str) {
        self.journal.record(operation, detail);
    }

    fn warn(&mut self, message: String) {
        log::warn!("[editor] {message}");
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_host_creates_visible_box_nodes() {
        let mut scene = SceneGraph::new();
        let mut host = HeadlessHost::new();
        let root = scene.spawn("Boundary");

        let wall = host
            .create_box(&mut scene, root, "Wall_0_to_1")
            .expect("box created");

        let node = scene.node(wall).expect("node alive");
        assert_eq!(node.name, "Wall_0_to_1");
        assert_eq!(node.parent(), Some(root));
        assert!(node.visual.as_ref().is_some_and(|visual| visual.visible));
        assert!(node.collider.is_some());
    }

    #[test]
    fn destroy_tolerates_stale_ids() {
        let mut scene = SceneGraph::new();
        let mut host = HeadlessHost::new();
        let root = scene.spawn("Boundary");
        let wall = host
            .create_box(&mut scene, root, "Wall_0_to_1")
            .expect("box created");

        host.destroy(&mut scene, wall);
        assert!(!scene.contains(wall));
        // second destroy of the same id must be a quiet no-op
        host.destroy(&mut scene, wall);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn warnings_and_mutations_are_collected() {
        let mut host = HeadlessHost::new();
        host.record_mutation("boundary.reset", "rebuilt default square");
        host.warn("cannot build walls with fewer than 2 nodes".to_string());

        assert_eq!(host.journal().total_records(), 1);
        let record = host.journal().last_recorded().expect("record present");
        assert_eq!(record.operation, "boundary.reset");
        assert_eq!(host.warnings().len(), 1);
        assert!(host.warnings()[0].contains("fewer than 2"));
    }
}
