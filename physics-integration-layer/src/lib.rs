use bevy::prelude::*;

pub mod data_for_backends;
pub mod math;

/// Umbrella system set for [`MoverPipelineSystems`] and [`MoverFixedPipelineSystems`].
///
/// The physics backends' plugins are responsible for preventing this entire system set from
/// running when the physics backend itself is paused.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct MoverSystems;

/// The stages of the per-frame pipeline.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MoverPipelineSystems {
    /// Data is read from the physics backend.
    Sensors,
    /// The mover decides where the character should go, which way it faces, and whether it
    /// jumps.
    Logic,
    /// Jump impulses are applied in the physics backend.
    Motors,
}

/// The stages of the fixed-timestep pipeline.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MoverFixedPipelineSystems {
    /// The mover converts its cached move direction into a planar velocity.
    Logic,
    /// The planar velocity is written to the rigid body, keeping its vertical component.
    Motors,
}
