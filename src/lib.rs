//! # Third-person Character Mover for Bevy
//!
//! A mover for characters driven by a dynamic rigid body: the character walks relative to the
//! camera, smoothly turns to face where it walks, and jumps (or double jumps) off the ground.
//!
//! The mover only decides what the character should do. Moving the rigid body is left to a
//! physics backend - currently
//! [bevy-third-person-mover-rapier3d](https://crates.io/crates/bevy-third-person-mover-rapier3d).
//!
//! ## Using the mover
//!
//! * Add [`MoverControllerPlugin`] and the physics backend's plugin. Both must be created with the
//!   same frame and physics schedules - [`Update`] and [`FixedUpdate`] by default.
//! * Spawn the character as a dynamic rigid body with a collider and a [`CharacterMover`]. Also add
//!   a [`MoverGroundProbe`](crate::prelude::MoverGroundProbe) with its origin at the character's
//!   feet - without it the character is never grounded.
//! * Mark the camera with [`MoverCamera`] so that "forward" means "away from the camera".
//! * Feed [`MoverInput`] from a system in [`MoverUserControlsSystems`], or add
//!   [`MoverKeyboardControlsPlugin`](keyboard::MoverKeyboardControlsPlugin) and put
//!   [`MoverKeyboardBindings`](keyboard::MoverKeyboardBindings) on the character.
//!
//! ```no_run
//! # use bevy::prelude::*;
//! # use bevy_third_person_mover::prelude::*;
//! # use bevy_third_person_mover::math::Vector3;
//! # let mut commands: Commands = panic!();
//! commands.spawn((
//!     // Also add the rigid body and the collider from the physics backend.
//!     CharacterMover::new(MoverConfig {
//!         can_double_jump: true,
//!         ..Default::default()
//!     }),
//!     MoverGroundProbe::at(Vector3::new(0.0, -1.0, 0.0)),
//!     MoverKeyboardBindings::default(),
//! ));
//! ```
//!
//! Other systems that need the character's position each frame can read it from
//! [`MoverRenderState`].
mod camera;
mod config;
mod controller;
#[cfg(feature = "gizmos")]
mod debug_gizmos;
mod input;
pub mod keyboard;
mod mover;
mod render_state;
pub mod util;

pub use bevy_third_person_mover_physics_integration_layer::data_for_backends::*;
pub use bevy_third_person_mover_physics_integration_layer::math;
pub use bevy_third_person_mover_physics_integration_layer::{
    MoverFixedPipelineSystems, MoverPipelineSystems, MoverSystems,
};

pub use camera::{MoverCamera, MoverCameraBasis, PlanarAxes};
pub use config::{MoverConfig, MoverConfigError};
pub use controller::MoverControllerPlugin;
#[cfg(feature = "gizmos")]
pub use debug_gizmos::MoverDebugGizmosPlugin;
pub use input::MoverInput;
pub use mover::{
    CharacterMover, MoveIntent, MoverFrameContext, MoverFrameOutput, MoverState,
    ROTATION_DEADZONE,
};
pub use render_state::MoverRenderState;

use bevy::prelude::*;

pub mod prelude {
    pub use crate::keyboard::{MoverKeyboardBindings, MoverKeyboardControlsPlugin};
    pub use crate::{
        CharacterMover, GroundLayers, MoverCamera, MoverConfig, MoverControllerPlugin,
        MoverGroundProbe, MoverInput, MoverRenderState, MoverToggle, MoverUserControlsSystems,
    };
    #[cfg(feature = "gizmos")]
    pub use crate::MoverDebugGizmosPlugin;
}

/// The user controls should run in this system set.
///
/// It runs after the sensors read the physics backend and before the mover logic consumes
/// [`MoverInput`].
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct MoverUserControlsSystems;
