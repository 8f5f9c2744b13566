use nalgebra::{Point3, UnitQuaternion, Vector3};

/// World-space placement of a scene node. Parent links in the scene graph
/// are ownership links, not coordinate spaces, so this is never composed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_position(position: Point3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let transform = Transform::default();
        assert_eq!(transform.position, Point3::origin());
        assert_eq!(transform.rotation, UnitQuaternion::identity());
        assert_eq!(transform.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn from_position_keeps_identity_orientation() {
        let transform = Transform::from_position(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.rotation, UnitQuaternion::identity());
    }
}
