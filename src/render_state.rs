use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::math::Vector3;

/// Where the character was this frame, for systems outside the mover (shaders, VFX, audio
/// listeners) that need the character's position.
///
/// The mover rewrites this component once per frame, at the very start of its frame logic.
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct MoverRenderState {
    /// The character's world position.
    pub position: Vector3,
}
