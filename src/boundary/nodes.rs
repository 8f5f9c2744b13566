use std::collections::{HashMap, HashSet};

use nalgebra::Point3;

use super::segment::SegmentManager;
use crate::editor::EditorHost;
use crate::scene::{ControlPoint, NodeId, SceneGraph};

/// Prefix given to control nodes created by this module. Confirm also uses
/// it to sweep straggler children that lost their control facet.
pub const NODE_NAME_PREFIX: &str = "Node";

/// One control node as seen by the last [`NodeStore::refresh`]: its scene
/// id, ordering key, assigned index, the position captured at refresh time,
/// and the segment manager for its outgoing edge.
#[derive(Debug)]
pub struct ControlNode {
    id: NodeId,
    sort_key: u32,
    index: usize,
    position: Point3<f32>,
    segment: SegmentManager,
}

impl ControlNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn sort_key(&self) -> u32 {
        self.sort_key
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn segment(&self) -> &SegmentManager {
        &self.segment
    }

    pub fn segment_mut(&mut self) -> &mut SegmentManager {
        &mut self.segment
    }

    pub fn into_parts(self) -> (NodeId, SegmentManager) {
        (self.id, self.segment)
    }
}

/// Ordered view over the control nodes under a boundary root.
///
/// The store never owns the scene objects; it is rebuilt from the root's
/// children on every refresh and may be thrown away at any time. Segment
/// managers are the one piece of state carried across refreshes, keyed by
/// the node's scene id.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<ControlNode>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlNode> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ControlNode> {
        self.nodes.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&ControlNode> {
        self.nodes.get(index)
    }

    /// Positions captured by the last refresh, in index order.
    pub fn positions(&self) -> Vec<Point3<f32>> {
        self.nodes.iter().map(|node| node.position).collect()
    }

    /// Rebuilds the ordered node list from the root's direct children.
    ///
    /// Membership is the control facet: children without one are ignored.
    /// Nodes sort by their explicit sort key, ties keeping scene child
    /// order, and indices are reassigned afterwards. Positions are read
    /// from the scene here and nowhere else, so every index pairs with the
    /// position of the same refresh generation.
    pub fn refresh(&mut self, scene: &SceneGraph, root: NodeId) {
        let mut reclaimed: HashMap<NodeId, SegmentManager> = HashMap::new();
        for node in std::mem::take(&mut self.nodes) {
            let (id, segment) = node.into_parts();
            reclaimed.insert(id, segment);
        }

        let mut seen = HashSet::new();
        for &child in scene.children(root) {
            if !seen.insert(child) {
                continue;
            }
            let Some(node) = scene.node(child) else {
                continue;
            };
            let Some(control) = node.control.as_ref() else {
                continue;
            };
            self.nodes.push(ControlNode {
                id: child,
                sort_key: control.sort_key,
                index: 0,
                position: node.transform.position,
                segment: reclaimed.remove(&child).unwrap_or_default(),
            });
        }

        self.nodes.sort_by_key(|node| node.sort_key);
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.index = index;
        }
    }

    /// Creates a control node at the midpoint of the first and last nodes.
    ///
    /// The new node takes the current count as its sort key, so it orders
    /// last and slots into the wrap-around edge of a closed ring. With
    /// fewer than two nodes there is no midpoint; the host gets a warning
    /// and nothing changes.
    pub fn add<H: EditorHost>(
        &mut self,
        scene: &mut SceneGraph,
        host: &mut H,
        root: NodeId,
    ) -> Option<NodeId> {
        self.refresh(scene, root);
        if self.nodes.len() < 2 {
            host.warn("at least 2 nodes are required before adding another".to_string());
            return None;
        }

        let first = self.nodes[0].position;
        let last = self.nodes[self.nodes.len() - 1].position;
        let midpoint = Point3::from((first.coords + last.coords) * 0.5);
        let sort_key = self.nodes.len() as u32;

        let id = match scene.spawn_child(root, format!("{NODE_NAME_PREFIX}{sort_key}")) {
            Ok(id) => id,
            Err(err) => {
                host.warn(format!("cannot add node: {err}"));
                return None;
            }
        };
        if let Some(node) = scene.node_mut(id) {
            node.transform.position = midpoint;
            node.control = Some(ControlPoint { sort_key });
        }

        self.refresh(scene, root);
        Some(id)
    }

    /// Destroys every child of the root, control node or not, and empties
    /// the store. Wall proxies go down with their owning nodes.
    pub fn clear<H: EditorHost>(&mut self, scene: &mut SceneGraph, host: &mut H, root: NodeId) {
        let children: Vec<NodeId> = scene.children(root).to_vec();
        for child in children {
            host.destroy(scene, child);
        }
        self.nodes.clear();
    }

    /// Hands every node over to the caller, leaving the store empty.
    pub fn take_all(&mut self) -> Vec<ControlNode> {
        std::mem::take(&mut self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryConfig;
    use crate::boundary::edge::EdgeKind;
    use crate::editor::HeadlessHost;

    fn control_child(
        scene: &mut SceneGraph,
        root: NodeId,
        name: &str,
        sort_key: u32,
        position: Point3<f32>,
    ) -> NodeId {
        let id = scene.spawn_child(root, name).expect("child spawned");
        let node = scene.node_mut(id).expect("node alive");
        node.transform.position = position;
        node.control = Some(ControlPoint { sort_key });
        id
    }

    #[test]
    fn refresh_collects_sorts_and_indexes() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("Boundary");
        let late = control_child(&mut scene, root, "NodeB", 2, Point3::new(2.0, 0.0, 0.0));
        let early = control_child(&mut scene, root, "NodeA", 0, Point3::new(0.0, 0.0, 0.0));
        let middle = control_child(&mut scene, root, "NodeC", 1, Point3::new(1.0, 0.0, 0.0));
        // a plain prop child never becomes a control node
        scene.spawn_child(root, "Prop").expect("prop spawned");

        let mut store = NodeStore::new();
        store.refresh(&scene, root);

        let ids: Vec<_> = store.iter().map(ControlNode::id).collect();
        assert_eq!(ids, vec![early, middle, late]);
        let indices: Vec<_> = store.iter().map(ControlNode::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(store.get(1).expect("middle").position(), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn refresh_keeps_scene_order_for_equal_sort_keys() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("Boundary");
        let first = control_child(&mut scene, root, "NodeA", 7, Point3::origin());
        let second = control_child(&mut scene, root, "NodeB", 7, Point3::origin());

        let mut store = NodeStore::new();
        store.refresh(&scene, root);

        let ids: Vec<_> = store.iter().map(ControlNode::id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn refresh_preserves_segment_managers_across_reorders() {
        let mut scene = SceneGraph::new();
        let mut host = HeadlessHost::new();
        let root = scene.spawn("Boundary");
        let a = control_child(&mut scene, root, "Node0", 0, Point3::origin());
        control_child(&mut scene, root, "Node1", 1, Point3::new(5.0, 0.0, 0.0));

        let mut store = NodeStore::new();
        store.refresh(&scene, root);

        let config = BoundaryConfig::default();
        let owner = store.get(0).expect("node").id();
        store
            .iter_mut()
            .next()
            .expect("node")
            .segment_mut()
            .apply(
                &mut scene,
                &mut host,
                owner,
                Point3::origin(),
                Point3::new(5.0, 0.0, 0.0),
                0,
                1,
                EdgeKind::Normal,
                &config,
            );
        let proxy = store.get(0).expect("node").segment().proxy().expect("proxy");

        // push the first node to the back of the ordering
        scene.node_mut(a).expect("alive").control = Some(ControlPoint { sort_key: 9 });
        store.refresh(&scene, root);

        let moved = store.get(1).expect("node moved last");
        assert_eq!(moved.id(), a);
        assert_eq!(moved.segment().proxy(), Some(proxy));
    }

    #[test]
    fn refresh_drops_dead_nodes() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("Boundary");
        let keep = control_child(&mut scene, root, "Node0", 0, Point3::origin());
        let gone = control_child(&mut scene, root, "Node1", 1, Point3::origin());

        let mut store = NodeStore::new();
        store.refresh(&scene, root);
        assert_eq!(store.len(), 2);

        scene.despawn(gone).expect("despawn");
        store.refresh(&scene, root);
        let ids: Vec<_> = store.iter().map(ControlNode::id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn add_requires_two_existing_nodes() {
        let mut scene = SceneGraph::new();
        let mut host = HeadlessHost::new();
        let root = scene.spawn("Boundary");
        control_child(&mut scene, root, "Node0", 0, Point3::origin());

        let mut store = NodeStore::new();
        assert!(store.add(&mut scene, &mut host, root).is_none());
        assert_eq!(host.warnings().len(), 1);
        assert_eq!(scene.children(root).len(), 1);
    }

    #[test]
    fn add_places_the_midpoint_of_first_and_last() {
        let mut scene = SceneGraph::new();
        let mut host = HeadlessHost::new();
        let root = scene.spawn("Boundary");
        control_child(&mut scene, root, "Node0", 0, Point3::new(-4.0, 0.0, 0.0));
        control_child(&mut scene, root, "Node1", 1, Point3::new(0.0, 0.0, 8.0));
        control_child(&mut scene, root, "Node2", 2, Point3::new(4.0, 0.0, 0.0));

        let mut store = NodeStore::new();
        let added = store
            .add(&mut scene, &mut host, root)
            .expect("node added");

        let node = scene.node(added).expect("alive");
        assert_eq!(node.name, "Node3");
        assert_eq!(node.transform.position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(node.control.as_ref().expect("control").sort_key, 3);

        // the new node orders last
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(3).expect("last").id(), added);
        assert!(host.warnings().is_empty());
    }

    #[test]
    fn clear_destroys_every_child_of_the_root() {
        let mut scene = SceneGraph::new();
        let mut host = HeadlessHost::new();
        let root = scene.spawn("Boundary");
        control_child(&mut scene, root, "Node0", 0, Point3::origin());
        control_child(&mut scene, root, "Node1", 1, Point3::origin());
        scene.spawn_child(root, "NodeStray").expect("straggler");

        let mut store = NodeStore::new();
        store.refresh(&scene, root);
        store.clear(&mut scene, &mut host, root);

        assert!(store.is_empty());
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.len(), 1);
    }
}
