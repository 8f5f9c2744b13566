use nalgebra::Point3;

use super::BoundaryConfig;
use super::edge::{EdgeKind, derive_edge};
use crate::editor::EditorHost;
use crate::scene::{BoxCollider, NodeId, SceneGraph};

/// Name every proxy receives when a boundary is confirmed.
pub const FINAL_SEGMENT_NAME: &str = "BoundaryCollider";

/// Owns the wall proxy for one control node's outgoing edge.
///
/// The proxy is created lazily on the first [`apply`](Self::apply) and named
/// `Wall_{index}_to_{next_index}` from the indices current at that moment.
/// The name is never rewritten afterwards, so it goes stale when later edits
/// shift the ordering; only the transform, material and visibility track the
/// live state.
#[derive(Debug, Default)]
pub struct SegmentManager {
    proxy: Option<NodeId>,
}

impl SegmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proxy(&self) -> Option<NodeId> {
        self.proxy
    }

    /// Positions the proxy along the edge from `a` to `b`, creating it under
    /// `owner` if it does not exist yet. End-connection edges take the end
    /// material; either material is applied only when configured, otherwise
    /// the proxy keeps whatever it had. Visibility is not touched here, only
    /// by [`set_visibility`](Self::set_visibility): a freshly created proxy
    /// stays visible until the next visibility push.
    #[allow(clippy::too_many_arguments)]
    pub fn apply<H: EditorHost>(
        &mut self,
        scene: &mut SceneGraph,
        host: &mut H,
        owner: NodeId,
        a: Point3<f32>,
        b: Point3<f32>,
        index: usize,
        next_index: usize,
        kind: EdgeKind,
        config: &BoundaryConfig,
    ) {
        let Some(proxy) = self.ensure_proxy(scene, host, owner, index, next_index) else {
            return;
        };

        let edge = derive_edge(a, b, config.wall_height);
        let Some(node) = scene.node_mut(proxy) else {
            return;
        };
        node.transform.position = edge.center;
        node.transform.rotation = edge.rotation;
        node.transform.scale = edge.scale;

        let material = match kind {
            EdgeKind::EndConnection => config.end_material,
            EdgeKind::Normal => config.material,
        };
        if material.is_some() {
            if let Some(visual) = node.visual.as_mut() {
                visual.material = material;
            }
        }
    }

    /// Toggles the proxy's visibility without re-deriving its placement.
    pub fn set_visibility(&mut self, scene: &mut SceneGraph, visible: bool) {
        let Some(proxy) = self.proxy else {
            return;
        };
        if let Some(visual) = scene.node_mut(proxy).and_then(|node| node.visual.as_mut()) {
            visual.visible = visible;
        }
    }

    /// Destroys the proxy when its edge disappears, for example after the
    /// owner becomes the tail of an open chain.
    pub fn release<H: EditorHost>(&mut self, scene: &mut SceneGraph, host: &mut H) {
        if let Some(proxy) = self.proxy.take() {
            host.destroy(scene, proxy);
        }
    }

    /// Turns the proxy into a permanent collider: detached from its owner so
    /// it survives node teardown, renamed to [`FINAL_SEGMENT_NAME`], and
    /// given a box collider. The visual is kept only when `keep_visual` is
    /// set. Returns the collider's id, or `None` when no live proxy exists.
    pub fn finalize(self, scene: &mut SceneGraph, keep_visual: bool) -> Option<NodeId> {
        let proxy = self.proxy?;
        scene.set_parent(proxy, None).ok()?;
        let node = scene.node_mut(proxy)?;
        node.name = FINAL_SEGMENT_NAME.to_string();
        if !keep_visual {
            node.visual = None;
        }
        if node.collider.is_none() {
            node.collider = Some(BoxCollider::default());
        }
        Some(proxy)
    }

    fn ensure_proxy<H: EditorHost>(
        &mut self,
        scene: &mut SceneGraph,
        host: &mut H,
        owner: NodeId,
        index: usize,
        next_index: usize,
    ) -> Option<NodeId> {
        if let Some(proxy) = self.proxy {
            if scene.contains(proxy) {
                return Some(proxy);
            }
            self.proxy = None;
        }

        let name = format!("Wall_{index}_to_{next_index}");
        match host.create_box(scene, owner, &name) {
            Ok(proxy) => {
                // editing proxies are visual only; the collider arrives at finalize
                if let Some(node) = scene.node_mut(proxy) {
                    node.collider = None;
                }
                self.proxy = Some(proxy);
                Some(proxy)
            }
            Err(err) => {
                host.warn(format!("cannot create wall segment {name}: {err}"));
                None
            }
        }
    }
}
