use bevy::prelude::*;
use bevy_third_person_mover::math::Float;
use bevy_third_person_mover::MoverConfig;
use clap::Parser;

#[derive(Resource, Debug, Parser, Clone)]
#[command(about = "Walk around with WASD (or the arrow keys) and jump with Space")]
pub struct AppSetupConfiguration {
    /// Allow a second jump while airborne.
    #[arg(long)]
    pub double_jump: bool,
    #[arg(long)]
    pub move_speed: Option<Float>,
    #[arg(long)]
    pub jump_force: Option<Float>,
    /// Move along the world axes instead of relative to the camera.
    #[arg(long)]
    pub no_camera: bool,
    /// Draw the physics colliders and the ground probe.
    #[arg(long)]
    pub debug_gizmos: bool,
}

impl AppSetupConfiguration {
    pub fn from_environment() -> Self {
        Self::parse()
    }

    pub fn mover_config(&self) -> MoverConfig {
        let defaults = MoverConfig::default();
        MoverConfig {
            move_speed: self.move_speed.unwrap_or(defaults.move_speed),
            jump_force: self.jump_force.unwrap_or(defaults.jump_force),
            can_double_jump: self.double_jump,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_defaults() {
        let cfg = AppSetupConfiguration::parse_from([
            "third_person",
            "--double-jump",
            "--move-speed",
            "8",
        ]);
        let mover_config = cfg.mover_config();
        assert!(mover_config.can_double_jump);
        assert_eq!(mover_config.move_speed, 8.0);
        assert_eq!(mover_config.jump_force, MoverConfig::default().jump_force);
        assert!(!cfg.no_camera);
    }
}
