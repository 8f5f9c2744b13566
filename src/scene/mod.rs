pub mod transform;

pub use transform::Transform;

use nalgebra::Point3;
use std::fmt;

/// Handle referencing a node within the scene graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// Opaque reference to a material owned by the host; the core never
/// dereferences it, only copies it onto visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MaterialRef(pub u32);

/// Renderer stand-in carried by nodes that have a visible shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub material: Option<MaterialRef>,
    pub visible: bool,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            material: None,
            visible: true,
        }
    }
}

/// Box collision volume. Size is local and scaled by the node transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub size: [f32; 3],
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            size: [1.0, 1.0, 1.0],
        }
    }
}

/// Marks a node as a boundary control point and carries the ordinal the
/// node store sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPoint {
    pub sort_key: u32,
}

pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub active: bool,
    pub visual: Option<Visual>,
    pub collider: Option<BoxCollider>,
    pub control: Option<ControlPoint>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: String) -> Self {
        Self {
            name,
            transform: Transform::identity(),
            active: true,
            visual: None,
            collider: None,
            control: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Errors returned by scene-graph operations.
#[derive(Debug)]
pub enum SceneError {
    NoSuchNode(NodeId),
    ReparentCycle { node: NodeId, parent: NodeId },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NoSuchNode(id) => {
                write!(f, "node {:?} is not alive in this scene", id)
            }
            SceneError::ReparentCycle { node, parent } => {
                write!(
                    f,
                    "cannot parent {:?} under {:?}: the parent lives in the node's own subtree",
                    node, parent
                )
            }
        }
    }
}

impl std::error::Error for SceneError {}

#[derive(Default)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Flat scene-graph storage: generational ids, free-list reuse, and
/// parent/child ownership links. Transforms are world-space throughout.
#[derive(Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: impl Into<String>) -> NodeId {
        let node = SceneNode::new(name.into());
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(index, 0)
        }
    }

    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, SceneError> {
        self.validate(parent)?;
        let child = self.spawn(name);
        self.link(parent, child);
        Ok(child)
    }

    /// Removes a node and its entire subtree. Stale ids fail with
    /// `NoSuchNode`; live descendants are always removed with their root.
    pub fn despawn(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.validate(id)?;
        self.detach(id);
        self.drop_subtree(id);
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index as usize)
            .map(|slot| slot.generation == id.generation && slot.node.is_some())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Children of `id` in insertion order; empty for dead ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(SceneNode::children).unwrap_or(&[])
    }

    /// Moves a node under a new parent, or to the scene root with `None`.
    /// Rejects reparenting a node under its own subtree.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        self.validate(id)?;
        if let Some(parent) = parent {
            self.validate(parent)?;
            if parent == id || self.is_in_subtree(id, parent) {
                return Err(SceneError::ReparentCycle { node: id, parent });
            }
        }
        self.detach(id);
        if let Some(parent) = parent {
            self.link(parent, id);
        }
        Ok(())
    }

    pub fn position(&self, id: NodeId) -> Option<Point3<f32>> {
        self.node(id).map(|node| node.transform.position)
    }

    /// Writes a world-space position; stale ids are ignored.
    pub fn set_position(&mut self, id: NodeId, position: Point3<f32>) {
        if let Some(node) = self.node_mut(id) {
            node.transform.position = position;
        }
    }

    fn validate(&self, id: NodeId) -> Result<(), SceneError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SceneError::NoSuchNode(id))
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.node(id).and_then(SceneNode::parent);
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|child| *child != id);
            }
        }
    }

    /// True when `node` lives in the subtree rooted at `root`.
    fn is_in_subtree(&self, root: NodeId, node: NodeId) -> bool {
        let mut cursor = self.node(node).and_then(SceneNode::parent);
        while let Some(current) = cursor {
            if current == root {
                return true;
            }
            cursor = self.node(current).and_then(SceneNode::parent);
        }
        false
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        if !self.free_list.contains(&id.index) {
            self.free_list.push(id.index);
        }
    }
}
