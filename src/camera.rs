use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::math::{AdjustPrecision, Vector3};

use crate::util::flatten_and_normalize;

/// Marks the camera the movement input is relative to.
///
/// When exactly one entity has this component, "forward" in [`MoverInput`](crate::MoverInput)
/// means "away from that camera". When no entity (or more than one entity) has it, the input is
/// mapped to the world axes instead.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct MoverCamera;

/// The orientation of the camera, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoverCameraBasis {
    pub forward: Vector3,
    pub right: Vector3,
    pub up: Vector3,
}

impl MoverCameraBasis {
    pub fn from_global_transform(transform: &GlobalTransform) -> Self {
        Self {
            forward: transform.forward().as_vec3().adjust_precision(),
            right: transform.right().as_vec3().adjust_precision(),
            up: transform.up().as_vec3().adjust_precision(),
        }
    }

    /// The camera's forward and right directions flattened onto the ground plane.
    ///
    /// When the camera looks straight down (or up) its forward direction has nothing left after
    /// flattening, so the screen's up direction stands in for it: the camera's up when looking
    /// down, its down when looking up. A degenerate right direction is rebuilt from the flattened
    /// forward.
    ///
    /// Returns `None` if no usable basis can be derived (e.g. a NaN transform).
    pub fn planar_axes(&self) -> Option<PlanarAxes> {
        let forward = flatten_and_normalize(self.forward).or_else(|| {
            if 0.0 < self.forward.y {
                flatten_and_normalize(-self.up)
            } else {
                flatten_and_normalize(self.up)
            }
        })?;
        let right = flatten_and_normalize(self.right)
            .unwrap_or_else(|| forward.cross(Vector3::Y).normalize());
        Some(PlanarAxes { forward, right })
    }
}

/// Horizontal unit vectors used for mapping the input axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarAxes {
    pub forward: Vector3,
    pub right: Vector3,
}
