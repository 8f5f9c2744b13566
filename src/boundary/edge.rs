use nalgebra::{Point3, UnitQuaternion, Vector3};

use super::Topology;

/// Constant wall width along the local X axis.
pub const WALL_THICKNESS: f32 = 0.02;

/// Edges at or below this length are treated as degenerate: the derived
/// orientation falls back to identity instead of producing NaNs.
pub const MIN_EDGE_LENGTH: f32 = 1e-6;

const UP_COLLINEAR_LIMIT: f32 = 0.999;

/// Placement of one wall segment between two adjacent control nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeTransform {
    pub center: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

/// Material/variant classification of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Normal,
    /// The wrap-around edge of a closed ring (last node back to first).
    EndConnection,
}

/// Derives the wall transform spanning `a` to `b`: center is the exact
/// midpoint, the local +Z axis points from `a` towards `b`, and the scale
/// is (thickness, height, edge length). Degenerate directions are guarded:
/// zero-length edges keep the identity orientation, and near-vertical
/// directions swap the up-reference so the frame stays finite.
pub fn derive_edge(a: Point3<f32>, b: Point3<f32>, height: f32) -> EdgeTransform {
    let direction = b - a;
    let length = direction.norm();
    let center = Point3::from((a.coords + b.coords) * 0.5);

    let rotation = if length <= MIN_EDGE_LENGTH {
        UnitQuaternion::identity()
    } else {
        let forward = direction / length;
        let up = if forward.y.abs() > UP_COLLINEAR_LIMIT {
            Vector3::x()
        } else {
            Vector3::y()
        };
        UnitQuaternion::face_towards(&direction, &up)
    };

    EdgeTransform {
        center,
        rotation,
        scale: Vector3::new(WALL_THICKNESS, height, length),
    }
}

/// Successor of `index` in the node ordering: the next index, wrapping to
/// zero only in closed rings of at least two nodes. The tail of an open
/// chain has no successor and therefore no edge.
pub fn successor(index: usize, count: usize, topology: Topology) -> Option<usize> {
    let next = index + 1;
    if next < count {
        Some(next)
    } else if topology == Topology::Closed && count >= 2 {
        Some(0)
    } else {
        None
    }
}

/// Classifies the edge from `index` to `next_index`: `EndConnection` only
/// for the wrap-around pair of a closed ring, never for open chains.
pub fn classify_edge(
    index: usize,
    next_index: usize,
    count: usize,
    topology: Topology,
) -> EdgeKind {
    if topology != Topology::Closed || count < 2 {
        return EdgeKind::Normal;
    }
    let wrap_forward = index == count - 1 && next_index == 0;
    let wrap_backward = index == 0 && next_index == count - 1;
    if wrap_forward || wrap_backward {
        EdgeKind::EndConnection
    } else {
        EdgeKind::Normal
    }
}
