pub mod edge;
pub mod nodes;
pub mod segment;

pub use edge::{
    EdgeKind, EdgeTransform, MIN_EDGE_LENGTH, WALL_THICKNESS, classify_edge, derive_edge,
    successor,
};
pub use nodes::{ControlNode, NODE_NAME_PREFIX, NodeStore};
pub use segment::{FINAL_SEGMENT_NAME, SegmentManager};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::editor::EditorHost;
use crate::scene::{ControlPoint, MaterialRef, NodeId, SceneError, SceneGraph};

/// Whether the node ordering closes back on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    Closed,
    Open,
}

impl Default for Topology {
    fn default() -> Self {
        Topology::Closed
    }
}

/// Authoring configuration for one boundary. Materials are optional
/// references into whatever library the host editor maintains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub wall_height: f32,
    pub visible: bool,
    pub topology: Topology,
    pub material: Option<MaterialRef>,
    pub end_material: Option<MaterialRef>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            wall_height: 3.0,
            visible: true,
            topology: Topology::Closed,
            material: None,
            end_material: None,
        }
    }
}

/// What a confirm left behind: the permanent collider nodes and how many
/// children of the root were swept away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmSummary {
    pub colliders: Vec<NodeId>,
    pub removed_nodes: usize,
}

fn default_square() -> [Vector3<f32>; 4] {
    [
        Vector3::new(-5.0, 0.0, -5.0),
        Vector3::new(-5.0, 0.0, 5.0),
        Vector3::new(5.0, 0.0, 5.0),
        Vector3::new(5.0, 0.0, -5.0),
    ]
}

/// Controller for one boundary rig: a root scene node, the configuration,
/// and the store of control nodes found beneath the root.
///
/// Every mutating operation refreshes the store before deriving geometry,
/// so edits made directly to the scene (moved, added or deleted children)
/// are picked up on the next call. Confirm consumes the controller; a
/// confirmed boundary cannot be edited again.
pub struct Boundary {
    root: NodeId,
    config: BoundaryConfig,
    store: NodeStore,
}

impl Boundary {
    /// Attaches a controller to an existing scene node and brings the rig
    /// up to date: full reconfigure plus a visibility push.
    pub fn attach<H: EditorHost>(
        scene: &mut SceneGraph,
        host: &mut H,
        root: NodeId,
        config: BoundaryConfig,
    ) -> Result<Self, SceneError> {
        if !scene.contains(root) {
            return Err(SceneError::NoSuchNode(root));
        }
        let mut boundary = Self {
            root,
            config,
            store: NodeStore::new(),
        };
        boundary.reconfigure(scene, host);
        boundary.set_visible(scene, config.visible);
        log::debug!(
            "[boundary] attached to {:?} with {} control nodes",
            root,
            boundary.store.len()
        );
        Ok(boundary)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    /// Refreshes the store and re-derives every wall segment. The entry
    /// point for any structural or positional change; cheap enough to run
    /// on every drag update.
    pub fn reconfigure<H: EditorHost>(&mut self, scene: &mut SceneGraph, host: &mut H) {
        self.store.refresh(scene, self.root);
        self.recompute(scene, host);
    }

    /// Replaces the configuration, then reconfigures and pushes visibility.
    pub fn apply_config<H: EditorHost>(
        &mut self,
        scene: &mut SceneGraph,
        host: &mut H,
        config: BoundaryConfig,
    ) {
        self.config = config;
        self.reconfigure(scene, host);
        self.set_visible(scene, config.visible);
    }

    /// Pushes visibility to every wall segment without re-deriving them.
    pub fn set_visible(&mut self, scene: &mut SceneGraph, visible: bool) {
        self.config.visible = visible;
        for node in self.store.iter_mut() {
            node.segment_mut().set_visibility(scene, visible);
        }
    }

    /// Adds a control node at the midpoint of the first and last nodes and
    /// re-derives the walls. Fails (with a host warning, without changes)
    /// when fewer than two nodes exist.
    pub fn add_node<H: EditorHost>(
        &mut self,
        scene: &mut SceneGraph,
        host: &mut H,
    ) -> Option<NodeId> {
        let added = self.store.add(scene, host, self.root)?;
        self.recompute(scene, host);
        Some(added)
    }

    /// Tears down every child of the root and rebuilds the default 10x10
    /// square, centered on the root's position.
    pub fn reset<H: EditorHost>(&mut self, scene: &mut SceneGraph, host: &mut H) {
        let Some(base) = scene.position(self.root) else {
            host.warn("cannot reset a boundary whose root is gone".to_string());
            return;
        };
        self.store.clear(scene, host, self.root);
        for (i, offset) in default_square().into_iter().enumerate() {
            let id = scene
                .spawn_child(self.root, format!("{NODE_NAME_PREFIX}{i}"))
                .expect("boundary root is alive");
            if let Some(node) = scene.node_mut(id) {
                node.transform.position = base + offset;
                node.control = Some(ControlPoint { sort_key: i as u32 });
            }
        }
        self.reconfigure(scene, host);
        log::debug!("[boundary] reset to the default square around {base:?}");
    }

    /// Reacts to a committed node drag. Ids that are not control nodes of
    /// this boundary still trigger a reconfigure; the rig must end up
    /// consistent either way.
    pub fn notify_node_moved<H: EditorHost>(
        &mut self,
        scene: &mut SceneGraph,
        host: &mut H,
        node: NodeId,
    ) {
        self.store.refresh(scene, self.root);
        if !self.store.iter().any(|control| control.id() == node) {
            log::debug!("[boundary] move notice for {node:?}, which is not a control node here");
        }
        self.recompute(scene, host);
    }

    /// Converts the rig into permanent geometry and consumes the controller.
    ///
    /// Works on a snapshot of the node list: every segment is finalized
    /// (visuals kept only while the boundary is visible), finalized owners
    /// are deactivated, every control facet is removed, and remaining
    /// children of the root still carrying the node name prefix are swept.
    /// The root node itself survives.
    pub fn confirm<H: EditorHost>(
        mut self,
        scene: &mut SceneGraph,
        host: &mut H,
    ) -> ConfirmSummary {
        self.store.refresh(scene, self.root);
        let keep_visual = self.config.visible;

        let mut colliders = Vec::new();
        for control in self.store.take_all() {
            let (owner, segment) = control.into_parts();
            let finalized = segment.finalize(scene, keep_visual);
            if let Some(collider) = finalized {
                colliders.push(collider);
            }
            if let Some(node) = scene.node_mut(owner) {
                if finalized.is_some() {
                    node.active = false;
                }
                node.control = None;
            }
        }

        let mut removed_nodes = 0;
        for child in scene.children(self.root).to_vec() {
            let swept = scene
                .node(child)
                .is_some_and(|node| node.name.starts_with(NODE_NAME_PREFIX));
            if swept {
                host.destroy(scene, child);
                removed_nodes += 1;
            }
        }

        log::info!(
            "[boundary] confirmed: {} colliders kept, {} nodes removed",
            colliders.len(),
            removed_nodes
        );
        ConfirmSummary {
            colliders,
            removed_nodes,
        }
    }

    fn recompute<H: EditorHost>(&mut self, scene: &mut SceneGraph, host: &mut H) {
        let config = self.config;
        let count = self.store.len();
        if count < 2 {
            if count == 1 {
                log::warn!("[boundary] a single control node cannot carry walls");
            }
            // drop whatever proxies remain from a larger generation
            for node in self.store.iter_mut() {
                node.segment_mut().release(scene, host);
            }
            return;
        }

        let positions = self.store.positions();
        for (index, node) in self.store.iter_mut().enumerate() {
            let owner = node.id();
            let segment = node.segment_mut();
            match successor(index, count, config.topology) {
                Some(next) => {
                    let kind = classify_edge(index, next, count, config.topology);
                    segment.apply(
                        scene,
                        host,
                        owner,
                        positions[index],
                        positions[next],
                        index,
                        next,
                        kind,
                        &config,
                    );
                }
                None => segment.release(scene, host),
            }
        }
    }
}
