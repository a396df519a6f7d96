use std::ops::{BitAnd, BitOr};

use crate::math::{AdjustPrecision, AsF32, Float, Quaternion, Vector3};
use bevy::prelude::*;

/// Allows disabling the mover for a specific entity.
///
/// This can be used to let some other system temporarily take control over a character.
///
/// This component is not mandatory - if omitted, the mover will just assume it is enabled for
/// that entity.
#[derive(Component, Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum MoverToggle {
    /// Do not update the sensors, and do not apply velocities or impulses.
    ///
    /// The controller systems will also not run, so the mover state (jump count, move direction)
    /// retains its last value from before `MoverToggle::Disabled` was set.
    Disabled,
    /// Update the sensors, but do not apply velocities or impulses.
    ///
    /// The controller systems still run and still update the motor and the mover state. Only the
    /// systems that write to the rigid body are disabled.
    SenseOnly,
    #[default]
    /// The backend behaves normally - it updates the sensors and applies the motor.
    Enabled,
}

impl MoverToggle {
    pub fn senses(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub fn drives(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Newtonian state of the rigid body.
///
/// The physics backend is responsible for updating this component from the physics engine during
/// [`MoverPipelineSystems::Sensors`](crate::MoverPipelineSystems::Sensors).
#[derive(Component, Debug, Clone)]
pub struct MoverRigidBodyTracker {
    pub translation: Vector3,
    pub rotation: Quaternion,
    pub velocity: Vector3,
}

impl Default for MoverRigidBodyTracker {
    fn default() -> Self {
        Self {
            translation: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            velocity: Vector3::ZERO,
        }
    }
}

/// A set of collision layers, as a bitmask.
///
/// Bit `n` stands for layer `n + 1`, which is how Rapier numbers its groups (`GROUP_1` is the
/// lowest bit). Colliders created without explicit groups are members of every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundLayers(pub u32);

impl GroundLayers {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);
    /// The layer used for ground when nothing else is configured.
    pub const DEFAULT_GROUND: Self = Self(1);

    /// Build a mask from 1-based layer numbers. Numbers outside `1..=32` are ignored.
    pub fn from_layers(layers: &[u32]) -> Self {
        Self(
            layers
                .iter()
                .filter(|layer| (1..=32).contains(*layer))
                .fold(0, |mask, layer| mask | (1 << (layer - 1))),
        )
    }

    pub fn contains_layer(&self, layer: u32) -> bool {
        (1..=32).contains(&layer) && self.0 & (1 << (layer - 1)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl Default for GroundLayers {
    fn default() -> Self {
        Self::DEFAULT_GROUND
    }
}

impl BitOr for GroundLayers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for GroundLayers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// A sphere overlap test used to decide whether the character stands on something.
///
/// The mover keeps [`radius`](Self::radius) and [`layers`](Self::layers) in sync with its
/// configuration. The physics backend is responsible for updating [`output`](Self::output)
/// during [`MoverPipelineSystems::Sensors`](crate::MoverPipelineSystems::Sensors).
#[derive(Component, Debug, Clone)]
pub struct MoverGroundProbe {
    /// The center of the sphere in the entity's coord system. `None` means the probe point was
    /// never resolved, and the backend will not perform the test.
    pub origin: Option<Vector3>,
    pub radius: Float,
    /// Only colliders that are members of at least one of these layers count as ground.
    pub layers: GroundLayers,
    pub output: Option<MoverGroundContact>,
}

impl Default for MoverGroundProbe {
    fn default() -> Self {
        Self {
            origin: None,
            radius: 0.3,
            layers: GroundLayers::DEFAULT_GROUND,
            output: None,
        }
    }
}

impl MoverGroundProbe {
    /// A probe centered at `origin`, given in the character's coord system.
    pub fn at(origin: Vector3) -> Self {
        Self {
            origin: Some(origin),
            ..Default::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.origin.is_some()
    }

    /// The center of the sphere in world coordinates.
    pub fn world_point(&self, transform: &GlobalTransform) -> Option<Vector3> {
        let origin = self.origin?;
        Some(transform.transform_point(origin.f32()).adjust_precision())
    }
}

/// Information from [`MoverGroundProbe`] that has detected ground.
#[derive(Debug, Clone)]
pub struct MoverGroundContact {
    /// The entity of one of the colliders overlapping the probe.
    pub entity: Entity,
}

/// An instantaneous upward push requested by the mover.
#[derive(Debug, Clone, PartialEq)]
pub struct MoverJumpImpulse {
    /// The impulse to apply, in world space. Its magnitude is the configured jump force.
    pub impulse: Vector3,
}

/// Instructions on how to move the rigid body.
///
/// The physics backend reads this component during
/// [`MoverPipelineSystems::Motors`](crate::MoverPipelineSystems::Motors) (for the jump) and
/// during [`MoverFixedPipelineSystems::Motors`](crate::MoverFixedPipelineSystems::Motors) (for the
/// planar velocity).
#[derive(Component, Default, Debug, Clone)]
pub struct MoverMotor {
    /// The horizontal velocity to assign to the rigid body on every physics step.
    ///
    /// Any vertical component is ignored - see [`resolve_velocity`](Self::resolve_velocity).
    pub planar_velocity: Vector3,

    /// Set on the frame a jump was triggered, and cleared by the mover on the next frame.
    ///
    /// The backend must zero the body's vertical velocity before applying the impulse, so that
    /// consecutive jumps do not stack.
    pub jump: Option<MoverJumpImpulse>,
}

impl MoverMotor {
    /// The velocity the body should have, given its `current` velocity.
    ///
    /// The horizontal components are replaced by [`planar_velocity`](Self::planar_velocity) and
    /// the vertical component is kept as is, so gravity and jumps are never overwritten.
    pub fn resolve_velocity(&self, current: Vector3) -> Vector3 {
        Vector3::new(self.planar_velocity.x, current.y, self.planar_velocity.z)
    }

    /// The velocity the body should have right before `jump` is applied.
    pub fn velocity_before_jump(current: Vector3) -> Vector3 {
        Vector3::new(current.x, 0.0, current.z)
    }
}
