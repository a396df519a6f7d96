use bevy_third_person_mover_physics_integration_layer::data_for_backends::GroundLayers;
use bevy_third_person_mover_physics_integration_layer::math::Float;

/// The tunable parameters of a [`CharacterMover`](crate::CharacterMover).
///
/// These can be changed at any time - including while the character is active - by mutating
/// [`CharacterMover::config`](crate::CharacterMover::config). The ground probe is kept in sync
/// with [`ground_check_radius`](Self::ground_check_radius) and
/// [`ground_layers`](Self::ground_layers) on every frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct MoverConfig {
    /// Horizontal speed, in units per second, when the input is fully pressed.
    pub move_speed: Float,

    /// How fast the character turns to face the move direction.
    ///
    /// Each frame the facing is interpolated toward the move direction by `rotate_speed * dt`
    /// (capped at 1.0), so higher values turn faster and anything above the frame rate turns
    /// instantly.
    pub rotate_speed: Float,

    /// The magnitude of the upward impulse applied on every jump.
    ///
    /// Use [`jump_force_for_height`](crate::util::jump_force_for_height) to derive it from a
    /// desired jump height.
    pub jump_force: Float,

    /// Allow a second jump while airborne.
    pub can_double_jump: bool,

    /// The radius of the sphere used for detecting ground.
    pub ground_check_radius: Float,

    /// Which collision layers count as ground.
    pub ground_layers: GroundLayers,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotate_speed: 10.0,
            jump_force: 7.0,
            can_double_jump: false,
            ground_check_radius: 0.3,
            ground_layers: GroundLayers::DEFAULT_GROUND,
        }
    }
}

impl MoverConfig {
    /// How many jumps can be made before landing again.
    pub fn max_jump_count(&self) -> u32 {
        if self.can_double_jump {
            2
        } else {
            1
        }
    }

    /// Check that all the numeric parameters are finite and non-negative.
    pub fn validate(&self) -> Result<(), MoverConfigError> {
        for (field, value) in [
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
            ("jump_force", self.jump_force),
            ("ground_check_radius", self.ground_check_radius),
        ] {
            if !value.is_finite() {
                return Err(MoverConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(MoverConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

/// Thrown when a [`MoverConfig`] cannot be used.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MoverConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: Float },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: Float },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(MoverConfig::default().validate(), Ok(()));
    }

    #[test]
    fn max_jump_count_follows_double_jump() {
        let mut config = MoverConfig::default();
        assert_eq!(config.max_jump_count(), 1);
        config.can_double_jump = true;
        assert_eq!(config.max_jump_count(), 2);
    }

    #[test]
    fn negative_values_are_rejected() {
        let config = MoverConfig {
            jump_force: -1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(MoverConfigError::Negative {
                field: "jump_force",
                value: -1.0
            })
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let config = MoverConfig {
            ground_check_radius: Float::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MoverConfigError::NotFinite {
                field: "ground_check_radius",
                ..
            })
        ));
    }
}
