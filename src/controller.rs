use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::data_for_backends::{
    MoverGroundProbe, MoverMotor, MoverRigidBodyTracker, MoverToggle,
};
use bevy_third_person_mover_physics_integration_layer::math::{AdjustPrecision, AsF32};
use bevy_third_person_mover_physics_integration_layer::{
    MoverFixedPipelineSystems, MoverPipelineSystems, MoverSystems,
};

use crate::camera::{MoverCamera, MoverCameraBasis};
use crate::input::MoverInput;
use crate::mover::{CharacterMover, MoverFrameContext};
use crate::render_state::MoverRenderState;
use crate::MoverUserControlsSystems;

/// The main plugin of the crate.
///
/// The per-frame logic (ground check, move direction, facing, jumping) runs in `frame_schedule`
/// and the velocity is applied in `physics_schedule`. The physics backend's plugin must be
/// created with the same two schedules.
///
/// By default these are [`Update`] and [`FixedUpdate`].
pub struct MoverControllerPlugin {
    frame_schedule: InternedScheduleLabel,
    physics_schedule: InternedScheduleLabel,
}

impl MoverControllerPlugin {
    pub fn new(frame_schedule: impl ScheduleLabel, physics_schedule: impl ScheduleLabel) -> Self {
        Self {
            frame_schedule: frame_schedule.intern(),
            physics_schedule: physics_schedule.intern(),
        }
    }
}

impl Default for MoverControllerPlugin {
    fn default() -> Self {
        Self::new(Update, FixedUpdate)
    }
}

impl Plugin for MoverControllerPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            self.frame_schedule,
            (
                MoverPipelineSystems::Sensors,
                MoverUserControlsSystems,
                MoverPipelineSystems::Logic,
                MoverPipelineSystems::Motors,
            )
                .chain()
                .in_set(MoverSystems),
        );
        app.configure_sets(
            self.physics_schedule,
            (
                MoverFixedPipelineSystems::Logic,
                MoverFixedPipelineSystems::Motors,
            )
                .chain()
                .in_set(MoverSystems),
        );
        app.add_systems(
            self.frame_schedule,
            (activate_movers_system, sync_ground_probes_system)
                .chain()
                .before(MoverSystems),
        );
        app.add_systems(
            self.frame_schedule,
            apply_mover_frame_system.in_set(MoverPipelineSystems::Logic),
        );
        app.add_systems(
            self.physics_schedule,
            apply_mover_physics_system.in_set(MoverFixedPipelineSystems::Logic),
        );
    }
}

fn activate_movers_system(
    mut query: Query<(Entity, &CharacterMover, &mut MoverGroundProbe), Added<CharacterMover>>,
) {
    for (entity, mover, mut probe) in query.iter_mut() {
        mover.sync_ground_probe(&mut probe);
        if let Err(err) = mover.config.validate() {
            warn!("Character mover {entity} was activated with an invalid configuration: {err}");
        }
        if !probe.is_resolved() {
            warn!(
                "Character mover {entity} has no ground probe origin - \
                it will never be considered grounded"
            );
        }
        debug!(
            "Activated character mover {entity} (max jumps: {})",
            mover.max_jump_count()
        );
    }
}

/// Runs before the backend's sensors, so that config changes apply to this frame's ground check.
fn sync_ground_probes_system(mut query: Query<(&CharacterMover, &mut MoverGroundProbe)>) {
    for (mover, mut probe) in query.iter_mut() {
        if probe.radius != mover.config.ground_check_radius
            || probe.layers != mover.config.ground_layers
        {
            mover.sync_ground_probe(&mut probe);
        }
    }
}

#[allow(clippy::type_complexity)]
fn apply_mover_frame_system(
    time: Res<Time>,
    camera: Option<Single<&GlobalTransform, With<MoverCamera>>>,
    mut query: Query<(
        &mut CharacterMover,
        &MoverRigidBodyTracker,
        &MoverGroundProbe,
        &mut MoverInput,
        &mut MoverMotor,
        &mut MoverRenderState,
        &mut Transform,
        Option<&MoverToggle>,
    )>,
) {
    let frame_duration = time.delta_secs().adjust_precision();
    let camera = camera.map(|camera_transform| {
        MoverCameraBasis::from_global_transform(camera_transform.into_inner())
    });

    for (
        mut mover,
        tracker,
        probe,
        mut input,
        mut motor,
        mut render_state,
        mut transform,
        toggle,
    ) in query.iter_mut()
    {
        let toggle = toggle.copied().unwrap_or_default();
        // A jump edge is only valid on the frame it was pressed, even if the mover did not get to
        // see it. Paused frames (`dt == 0`) must not jump or re-apply the last jump either.
        if !toggle.senses() || frame_duration == 0.0 {
            motor.jump = None;
            input.jump_just_pressed = false;
            continue;
        }

        let output = mover.tick(
            MoverFrameContext {
                frame_duration,
                tracker,
                ground_probe: probe,
                input: &input,
                camera: camera.as_ref(),
            },
            motor.as_mut(),
        );

        render_state.position = output.published_position;
        if let Some(facing) = output.facing {
            if toggle.drives() {
                transform.rotation = facing.f32();
            }
        }
        input.jump_just_pressed = false;
    }
}

fn apply_mover_physics_system(
    mut query: Query<(&CharacterMover, &mut MoverMotor, Option<&MoverToggle>)>,
) {
    for (mover, mut motor, toggle) in query.iter_mut() {
        if !toggle.copied().unwrap_or_default().senses() {
            continue;
        }
        mover.tick_physics(motor.as_mut());
    }
}
