//! Keyboard controls for the mover.
//!
//! Games with their own input handling (gamepads, rebinding, input managers) can skip this module
//! and write to [`MoverInput`] directly.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::math::{AdjustPrecision, Float};

use crate::input::MoverInput;
use crate::MoverUserControlsSystems;

/// Feeds [`MoverInput`] from the keyboard for every entity with [`MoverKeyboardBindings`].
///
/// Must use the same schedule as the frame schedule of
/// [`MoverControllerPlugin`](crate::MoverControllerPlugin) - [`Update`] by default.
pub struct MoverKeyboardControlsPlugin {
    schedule: InternedScheduleLabel,
}

impl MoverKeyboardControlsPlugin {
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Default for MoverKeyboardControlsPlugin {
    fn default() -> Self {
        Self::new(Update)
    }
}

impl Plugin for MoverKeyboardControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            self.schedule,
            apply_keyboard_controls_system.in_set(MoverUserControlsSystems),
        );
    }
}

/// Which keys move the character, and how the axes respond to them.
///
/// The axes do not jump straight to the pressed value. They ramp up at
/// [`sensitivity`](Self::sensitivity) units per second and fall back to zero at
/// [`gravity`](Self::gravity) units per second once released. Set both to `Float::INFINITY` for
/// raw, unsmoothed axes.
#[derive(Component, Clone, Debug)]
#[require(MoverInput)]
pub struct MoverKeyboardBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub forward: Vec<KeyCode>,
    pub back: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
    pub sensitivity: Float,
    pub gravity: Float,
    /// When pressing the opposite direction, start from zero instead of sliding through it.
    pub snap: bool,
    horizontal: Float,
    vertical: Float,
}

impl Default for MoverKeyboardBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            back: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            jump: vec![KeyCode::Space],
            sensitivity: 3.0,
            gravity: 3.0,
            snap: true,
            horizontal: 0.0,
            vertical: 0.0,
        }
    }
}

impl MoverKeyboardBindings {
    /// The current smoothed axes, as `(horizontal, vertical)`.
    pub fn axes(&self) -> (Float, Float) {
        (self.horizontal, self.vertical)
    }

    fn update_axes(&mut self, keyboard: &ButtonInput<KeyCode>, frame_duration: Float) {
        let horizontal_target = axis_target(keyboard, &self.left, &self.right);
        let vertical_target = axis_target(keyboard, &self.back, &self.forward);
        self.horizontal = smooth_axis(
            self.horizontal,
            horizontal_target,
            self.sensitivity,
            self.gravity,
            self.snap,
            frame_duration,
        );
        self.vertical = smooth_axis(
            self.vertical,
            vertical_target,
            self.sensitivity,
            self.gravity,
            self.snap,
            frame_duration,
        );
    }
}

fn axis_target(
    keyboard: &ButtonInput<KeyCode>,
    negative: &[KeyCode],
    positive: &[KeyCode],
) -> Float {
    let mut target = 0.0;
    if keyboard.any_pressed(negative.iter().copied()) {
        target -= 1.0;
    }
    if keyboard.any_pressed(positive.iter().copied()) {
        target += 1.0;
    }
    target
}

/// Move an axis value toward `target` for a single frame.
///
/// While `target` is zero the value decays at `gravity`, otherwise it moves toward `target` at
/// `sensitivity`. With `snap`, a value on the opposite side of zero from `target` is reset to zero
/// first.
pub fn smooth_axis(
    current: Float,
    target: Float,
    sensitivity: Float,
    gravity: Float,
    snap: bool,
    frame_duration: Float,
) -> Float {
    if target == 0.0 {
        return move_toward(current, 0.0, gravity * frame_duration);
    }
    let current = if snap && current * target < 0.0 {
        0.0
    } else {
        current
    };
    move_toward(current, target, sensitivity * frame_duration)
}

fn move_toward(current: Float, target: Float, max_step: Float) -> Float {
    let difference = target - current;
    if !(difference.abs() > max_step) {
        target
    } else {
        current + max_step.copysign(difference)
    }
}

fn apply_keyboard_controls_system(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&mut MoverKeyboardBindings, &mut MoverInput)>,
) {
    let frame_duration = time.delta_secs().adjust_precision();
    for (mut bindings, mut input) in query.iter_mut() {
        bindings.update_axes(&keyboard, frame_duration);
        (input.horizontal, input.vertical) = bindings.axes();
        if keyboard.any_just_pressed(bindings.jump.iter().copied()) {
            input.jump_just_pressed = true;
        }
    }
}
