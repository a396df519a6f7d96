use bevy_third_person_mover_physics_integration_layer::math::{Float, Quaternion, Vector3};

/// Below this length a vector is considered to have no direction.
pub const DIRECTION_EPSILON: Float = 1e-5;

/// Drop the vertical component of `vector`.
pub fn flatten(vector: Vector3) -> Vector3 {
    Vector3::new(vector.x, 0.0, vector.z)
}

/// Drop the vertical component of `vector` and normalize what's left.
///
/// Returns `None` when nothing (or almost nothing) is left - e.g. when flattening a vertical
/// vector.
pub fn flatten_and_normalize(vector: Vector3) -> Option<Vector3> {
    let flat = flatten(vector);
    if flat.length() < DIRECTION_EPSILON || !flat.is_finite() {
        None
    } else {
        Some(flat.normalize())
    }
}

/// Like `normalize_or_zero`, except that very short vectors also become zero instead of being
/// blown up into an arbitrary unit vector.
pub fn normalize_or_zero_with_epsilon(vector: Vector3) -> Vector3 {
    if vector.length() < DIRECTION_EPSILON || !vector.is_finite() {
        Vector3::ZERO
    } else {
        vector.normalize()
    }
}

/// The rotation around the up axis that makes an entity's forward (its negative Z, as usual in
/// Bevy) face `direction`.
///
/// Only the horizontal part of `direction` matters. The caller must make sure it is not zero.
pub fn look_rotation(direction: Vector3) -> Quaternion {
    Quaternion::from_rotation_y(Float::atan2(-direction.x, -direction.z))
}

/// Calculate the impulse required for a rigid body to jump to a certain height.
///
/// The jump is assumed to start from zero vertical velocity (the mover cancels the vertical
/// velocity before every jump) under constant `gravity`, which is given as a positive magnitude.
///
/// ```
/// # use bevy_third_person_mover::util::jump_force_for_height;
/// let jump_force = jump_force_for_height(2.0, 9.81, 1.0).expect("valid jump parameters");
/// assert!((jump_force - 6.264).abs() < 1e-3);
/// ```
pub fn jump_force_for_height(
    height: Float,
    gravity: Float,
    mass: Float,
) -> Result<Float, JumpHeightError> {
    if !(height.is_finite() && 0.0 <= height) {
        return Err(JumpHeightError::InvalidHeight(height));
    }
    if !(gravity.is_finite() && 0.0 < gravity) {
        return Err(JumpHeightError::InvalidGravity(gravity));
    }
    if !(mass.is_finite() && 0.0 < mass) {
        return Err(JumpHeightError::InvalidMass(mass));
    }
    Ok(mass * (2.0 * gravity * height).sqrt())
}

/// Thrown by [`jump_force_for_height`] when the jump cannot be calculated.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum JumpHeightError {
    #[error("Jump height must be a non-negative number, got {0}")]
    InvalidHeight(Float),
    #[error("Gravity must be a positive number, got {0}")]
    InvalidGravity(Float),
    #[error("Mass must be a positive number, got {0}")]
    InvalidMass(Float),
}
