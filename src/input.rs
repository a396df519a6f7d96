use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::math::Float;

/// The input sample the mover reads every frame.
///
/// User control systems should write to this component in
/// [`MoverUserControlsSystems`](crate::MoverUserControlsSystems) - either directly, or by using
/// [`MoverKeyboardControlsPlugin`](crate::keyboard::MoverKeyboardControlsPlugin).
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct MoverInput {
    /// Strafing axis: -1.0 is fully left and 1.0 is fully right.
    pub horizontal: Float,
    /// Forward axis: -1.0 is fully back and 1.0 is fully forward.
    pub vertical: Float,
    /// Set on the frame the jump button was pressed - not while it is being held.
    ///
    /// The mover clears this flag after reading it, so a single press never triggers more than
    /// one jump.
    pub jump_just_pressed: bool,
}

impl MoverInput {
    /// The axes, each clamped to `[-1.0, 1.0]`, with non-finite values treated as zero.
    pub fn axes(&self) -> (Float, Float) {
        (sanitize_axis(self.horizontal), sanitize_axis(self.vertical))
    }
}

fn sanitize_axis(value: Float) -> Float {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
