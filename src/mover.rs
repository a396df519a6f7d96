use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::data_for_backends::{
    MoverGroundProbe, MoverJumpImpulse, MoverMotor, MoverRigidBodyTracker,
};
use bevy_third_person_mover_physics_integration_layer::math::{Float, Quaternion, Vector3};

use crate::camera::MoverCameraBasis;
use crate::config::{MoverConfig, MoverConfigError};
use crate::input::MoverInput;
use crate::render_state::MoverRenderState;
use crate::util::{look_rotation, normalize_or_zero_with_epsilon};

/// Movement intent weaker than this does not turn the character.
pub const ROTATION_DEADZONE: Float = 0.1;

/// The main component of the crate - a third-person mover for a dynamic rigid body.
///
/// Every frame, the mover reads the [`MoverInput`] and the [`MoverCamera`](crate::MoverCamera) (if
/// there is one) and decides:
///
/// * Which horizontal direction the character moves in.
/// * Which way the character faces. The character turns smoothly toward the move direction.
/// * Whether the character jumps.
///
/// On every physics step, the horizontal velocity of the rigid body is replaced with the move
/// direction times [`move_speed`](MoverConfig::move_speed). The vertical velocity is left to the
/// physics engine - gravity and jump impulses are never overwritten.
///
/// The ground is detected with a sphere overlap around the [`MoverGroundProbe`]. It is important
/// to set the probe's origin (typically at the character's feet) when spawning the character -
/// otherwise the character will never be considered grounded and will only be able to jump once.
#[derive(Component, Default, Clone, Debug)]
#[require(
    MoverRigidBodyTracker,
    MoverGroundProbe,
    MoverMotor,
    MoverInput,
    MoverRenderState
)]
pub struct CharacterMover {
    pub config: MoverConfig,
    state: MoverState,
}

/// The part of the mover that changes from frame to frame.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MoverState {
    /// Jumps made since the character last touched the ground.
    pub jump_count: u32,
    pub grounded: bool,
    /// A horizontal unit vector, or zero when there is no movement input.
    pub move_direction: Vector3,
}

/// Everything the mover needs to know about the world for running a single frame.
pub struct MoverFrameContext<'a> {
    /// The duration of the current frame, in seconds.
    pub frame_duration: Float,
    pub tracker: &'a MoverRigidBodyTracker,
    pub ground_probe: &'a MoverGroundProbe,
    pub input: &'a MoverInput,
    pub camera: Option<&'a MoverCameraBasis>,
}

/// What the mover decided on a single frame, other than what it wrote to the [`MoverMotor`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoverFrameOutput {
    /// The character's position, to be published to other systems.
    pub published_position: Vector3,
    /// The new facing of the character, or `None` if it should be left as is.
    pub facing: Option<Quaternion>,
    pub jumped: bool,
}

/// The direction the player wants to move in, and how strongly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    pub direction: Vector3,
    /// The length of the input vector before normalization. Used for the rotation deadzone.
    pub magnitude: Float,
}

impl CharacterMover {
    pub fn new(config: MoverConfig) -> Self {
        Self {
            config,
            state: Default::default(),
        }
    }

    /// Like [`new`](Self::new), but rejects configurations that cannot be used.
    pub fn try_new(config: MoverConfig) -> Result<Self, MoverConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn state(&self) -> &MoverState {
        &self.state
    }

    pub fn jump_count(&self) -> u32 {
        self.state.jump_count
    }

    pub fn max_jump_count(&self) -> u32 {
        self.config.max_jump_count()
    }

    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    pub fn move_direction(&self) -> Vector3 {
        self.state.move_direction
    }

    /// Whether a jump is allowed right now.
    pub fn can_jump(&self) -> bool {
        self.state.jump_count < self.max_jump_count()
    }

    /// Run the per-frame logic.
    ///
    /// This updates the grounded status and the move direction, decides the new facing, and - if
    /// the jump button was just pressed and the jump budget allows it - jumps.
    pub fn tick(&mut self, ctx: MoverFrameContext, motor: &mut MoverMotor) -> MoverFrameOutput {
        let published_position = ctx.tracker.translation;

        // The double jump may have been disabled mid-air.
        self.state.jump_count = self.state.jump_count.min(self.max_jump_count());

        self.ground_check(ctx.ground_probe);

        let (horizontal, vertical) = ctx.input.axes();
        let intent = self.compute_move_intent(horizontal, vertical, ctx.camera);
        self.state.move_direction = intent.direction;

        let facing = self.turn(ctx.tracker.rotation, intent.magnitude, ctx.frame_duration);

        motor.jump = None;
        let jumped = ctx.input.jump_just_pressed && self.can_jump();
        if jumped {
            self.jump(motor);
        }

        MoverFrameOutput {
            published_position,
            facing,
            jumped,
        }
    }

    /// Run the fixed-step logic, converting the move direction to a planar velocity.
    pub fn tick_physics(&self, motor: &mut MoverMotor) {
        motor.planar_velocity = self.planar_velocity();
    }

    /// The horizontal velocity the character should have.
    pub fn planar_velocity(&self) -> Vector3 {
        self.state.move_direction * self.config.move_speed
    }

    /// The velocity the rigid body should have after the next physics step is applied, given its
    /// `current` velocity.
    pub fn physics_velocity(&self, current: Vector3) -> Vector3 {
        MoverMotor {
            planar_velocity: self.planar_velocity(),
            jump: None,
        }
        .resolve_velocity(current)
    }

    /// Update the grounded status from the probe. Landing restores the entire jump budget.
    ///
    /// An unresolved probe never reports ground.
    pub fn ground_check(&mut self, probe: &MoverGroundProbe) {
        self.state.grounded = probe.is_resolved() && probe.output.is_some();
        if self.state.grounded {
            self.state.jump_count = 0;
        }
    }

    /// Copy the ground check settings from the config into `probe`.
    ///
    /// This must happen before the backend runs the overlap test, so that the very first ground
    /// check already uses the configured radius and layers.
    pub fn sync_ground_probe(&self, probe: &mut MoverGroundProbe) {
        probe.radius = self.config.ground_check_radius;
        probe.layers = self.config.ground_layers;
    }

    /// Jump unconditionally.
    ///
    /// This does not check the jump budget - use [`can_jump`](Self::can_jump) first.
    pub fn jump(&mut self, motor: &mut MoverMotor) {
        motor.jump = Some(MoverJumpImpulse {
            impulse: Vector3::Y * self.config.jump_force,
        });
        self.state.jump_count += 1;
    }

    /// Map the input axes to a horizontal direction.
    ///
    /// With a camera, `vertical` goes along the camera's flattened forward and `horizontal` along
    /// its flattened right. Without a camera, `horizontal` is the X axis and `vertical` is the Z
    /// axis. If the camera's orientation is unusable, the previous direction is kept.
    pub fn compute_move_intent(
        &self,
        horizontal: Float,
        vertical: Float,
        camera: Option<&MoverCameraBasis>,
    ) -> MoveIntent {
        let raw = match camera {
            Some(camera) => match camera.planar_axes() {
                Some(axes) => axes.forward * vertical + axes.right * horizontal,
                None => {
                    return MoveIntent {
                        direction: self.state.move_direction,
                        magnitude: Vector3::new(horizontal, 0.0, vertical).length(),
                    };
                }
            },
            None => Vector3::new(horizontal, 0.0, vertical),
        };
        let direction = normalize_or_zero_with_epsilon(raw);
        MoveIntent {
            direction,
            magnitude: if direction == Vector3::ZERO {
                0.0
            } else {
                raw.length()
            },
        }
    }

    /// The facing after turning toward the move direction for `frame_duration` seconds.
    ///
    /// Returns `None` when the intent is inside the [deadzone](ROTATION_DEADZONE).
    pub fn turn(
        &self,
        facing: Quaternion,
        intent_magnitude: Float,
        frame_duration: Float,
    ) -> Option<Quaternion> {
        let direction = self.state.move_direction;
        if intent_magnitude <= ROTATION_DEADZONE || direction.length() <= ROTATION_DEADZONE {
            return None;
        }
        let factor = (self.config.rotate_speed * frame_duration).clamp(0.0, 1.0);
        Some(facing.slerp(look_rotation(direction), factor))
    }
}
