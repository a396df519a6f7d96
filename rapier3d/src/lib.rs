//! # bevy_rapier3d Integration for bevy-third-person-mover
//!
//! In addition to the instruction in bevy-third-person-mover's documentation:
//!
//! * Add [`MoverRapier3dPlugin`] to the Bevy app, with the same schedules used for
//!   `MoverControllerPlugin`.
//! * Make the character a [`RigidBody::Dynamic`] with a [`Collider`]. The plugin adds
//!   [`Velocity`], [`ExternalImpulse`] and [`LockedAxes`] when they are missing, and locks the
//!   rotation of the rigid body either way - the mover is the only one turning the character.
//! * Ground colliders must be members of at least one of the mover's ground layers. Layer `n`
//!   corresponds to Rapier's `Group::GROUP_n`.
mod helpers;

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use bevy_third_person_mover_physics_integration_layer::data_for_backends::{
    GroundLayers, MoverGroundContact, MoverGroundProbe, MoverMotor, MoverRigidBodyTracker,
    MoverToggle,
};
use bevy_third_person_mover_physics_integration_layer::math::{AdjustPrecision, AsF32};
use bevy_third_person_mover_physics_integration_layer::{
    MoverFixedPipelineSystems, MoverPipelineSystems, MoverSystems,
};

use self::helpers::RapierSceneQuery;

pub mod prelude {
    pub use crate::MoverRapier3dPlugin;
}

/// Add this plugin to use bevy_rapier3d as a physics backend.
///
/// This plugin should be used in addition to `MoverControllerPlugin`, and both plugins must use
/// the same frame schedule and the same physics schedule. By default these are [`Update`] and
/// [`FixedUpdate`], which fit Rapier running in [`PostUpdate`] (its default).
pub struct MoverRapier3dPlugin {
    frame_schedule: InternedScheduleLabel,
    physics_schedule: InternedScheduleLabel,
}

impl MoverRapier3dPlugin {
    pub fn new(frame_schedule: impl ScheduleLabel, physics_schedule: impl ScheduleLabel) -> Self {
        Self {
            frame_schedule: frame_schedule.intern(),
            physics_schedule: physics_schedule.intern(),
        }
    }
}

impl Default for MoverRapier3dPlugin {
    fn default() -> Self {
        Self::new(Update, FixedUpdate)
    }
}

impl Plugin for MoverRapier3dPlugin {
    fn build(&self, app: &mut App) {
        app.register_required_components::<MoverMotor, Velocity>()
            .register_required_components::<MoverMotor, ExternalImpulse>()
            .register_required_components_with::<MoverMotor, LockedAxes>(|| {
                LockedAxes::ROTATION_LOCKED
            });
        for schedule in [self.frame_schedule, self.physics_schedule] {
            app.configure_sets(
                schedule,
                MoverSystems.before(PhysicsSet::SyncBackend).run_if(
                    |rapier_config: Single<&RapierConfiguration>| {
                        rapier_config.physics_pipeline_active
                    },
                ),
            );
        }
        app.add_systems(
            self.frame_schedule,
            lock_rotation_system.before(MoverSystems),
        );
        app.add_systems(
            self.frame_schedule,
            (
                update_rigid_body_trackers_system,
                update_ground_probes_system,
            )
                .in_set(MoverPipelineSystems::Sensors),
        );
        app.add_systems(
            self.frame_schedule,
            apply_jump_system.in_set(MoverPipelineSystems::Motors),
        );
        app.add_systems(
            self.physics_schedule,
            apply_planar_velocity_system.in_set(MoverFixedPipelineSystems::Motors),
        );
    }
}

/// Rapier's collision groups for a query that only hits colliders in `layers`.
pub fn ground_collision_groups(layers: GroundLayers) -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::from_bits_truncate(layers.bits()))
}

fn lock_rotation_system(mut query: Query<&mut LockedAxes, Added<MoverMotor>>) {
    for mut locked_axes in query.iter_mut() {
        if !locked_axes.contains(LockedAxes::ROTATION_LOCKED) {
            debug!("Locking the rotation of a character mover's rigid body");
            *locked_axes |= LockedAxes::ROTATION_LOCKED;
        }
    }
}

#[allow(clippy::type_complexity)]
fn update_rigid_body_trackers_system(
    mut query: Query<(
        &GlobalTransform,
        &Velocity,
        &mut MoverRigidBodyTracker,
        Option<&MoverToggle>,
    )>,
) {
    for (transform, velocity, mut tracker, toggle) in query.iter_mut() {
        if !toggle.copied().unwrap_or_default().senses() {
            continue;
        }
        let (_, rotation, translation) = transform.to_scale_rotation_translation();
        *tracker = MoverRigidBodyTracker {
            translation: translation.adjust_precision(),
            rotation: rotation.adjust_precision(),
            velocity: velocity.linvel.adjust_precision(),
        };
    }
}

#[allow(clippy::type_complexity)]
fn update_ground_probes_system(
    rapier_context_query: Query<RapierSceneQuery>,
    mut probe_query: Query<(
        Entity,
        &mut MoverGroundProbe,
        &GlobalTransform,
        &RapierContextEntityLink,
        Option<&MoverToggle>,
    )>,
) {
    for (owner_entity, mut probe, transform, rapier_context_entity_link, toggle) in
        probe_query.iter_mut()
    {
        if !toggle.copied().unwrap_or_default().senses() {
            continue;
        }
        let Some(probe_point) = probe.world_point(transform) else {
            probe.output = None;
            continue;
        };
        if probe.layers.is_empty() {
            probe.output = None;
            continue;
        }
        let Ok(rapier_context) = rapier_context_query.get(rapier_context_entity_link.0) else {
            continue;
        };

        let query_filter = QueryFilter::new()
            .exclude_rigid_body(owner_entity)
            .exclude_sensors()
            .groups(ground_collision_groups(probe.layers));

        probe.output = rapier_context
            .first_ball_overlap(query_filter, probe_point.f32(), probe.radius.f32())
            .map(|entity| MoverGroundContact { entity });
    }
}

#[allow(clippy::type_complexity)]
fn apply_jump_system(
    mut query: Query<(
        &MoverMotor,
        &mut Velocity,
        &mut ExternalImpulse,
        Option<&MoverToggle>,
    )>,
) {
    for (motor, mut velocity, mut external_impulse, toggle) in query.iter_mut() {
        if !toggle.copied().unwrap_or_default().drives() {
            continue;
        }
        let Some(jump) = &motor.jump else {
            continue;
        };
        if !jump.impulse.is_finite() {
            continue;
        }
        velocity.linvel =
            MoverMotor::velocity_before_jump(velocity.linvel.adjust_precision()).f32();
        external_impulse.impulse += jump.impulse.f32();
    }
}

fn apply_planar_velocity_system(
    mut query: Query<(&MoverMotor, &mut Velocity, Option<&MoverToggle>)>,
) {
    for (motor, mut velocity, toggle) in query.iter_mut() {
        if !toggle.copied().unwrap_or_default().drives() {
            continue;
        }
        if motor.planar_velocity.is_finite() {
            velocity.linvel = motor
                .resolve_velocity(velocity.linvel.adjust_precision())
                .f32();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;
    use bevy::transform::TransformPlugin;
    use bevy_third_person_mover::{CharacterMover, MoverControllerPlugin, MoverInput};
    use bevy_third_person_mover_physics_integration_layer::data_for_backends::MoverJumpImpulse;
    use bevy_third_person_mover_physics_integration_layer::math::Vector3;

    use super::*;

    fn physics_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            TransformPlugin,
            RapierPhysicsPlugin::<NoUserData>::default(),
            MoverRapier3dPlugin::default(),
        ));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f64(1.0 / 60.0),
        ));
        app
    }

    fn settle(app: &mut App) {
        for _ in 0..4 {
            app.update();
        }
    }

    fn spawn_checker(app: &mut App, position: Vec3, probe: MoverGroundProbe) -> Entity {
        app.world_mut()
            .spawn((
                RigidBody::Fixed,
                Collider::ball(0.5),
                Transform::from_translation(position),
                probe,
            ))
            .id()
    }

    fn feet_check(layers: GroundLayers) -> MoverGroundProbe {
        MoverGroundProbe {
            layers,
            ..MoverGroundProbe::at(Vector3::new(0.0, -1.0, 0.0))
        }
    }

    fn contact(app: &App, checker: Entity) -> Option<Entity> {
        app.world()
            .get::<MoverGroundProbe>(checker)
            .unwrap()
            .output
            .as_ref()
            .map(|contact| contact.entity)
    }

    #[test]
    fn ground_check_only_detects_ground_layers() {
        let mut app = physics_app();
        let floor = app
            .world_mut()
            .spawn((
                Collider::cuboid(5.0, 0.5, 5.0),
                Transform::from_xyz(0.0, -0.5, 0.0),
                CollisionGroups::new(Group::GROUP_1, Group::ALL),
            ))
            .id();
        let wall = app
            .world_mut()
            .spawn((
                Collider::cuboid(0.5, 2.0, 0.5),
                Transform::from_xyz(3.0, 1.5, 0.0),
                CollisionGroups::new(Group::GROUP_2, Group::ALL),
            ))
            .id();

        let on_floor_wall_layer = spawn_checker(
            &mut app,
            Vec3::new(0.0, 1.0, 0.0),
            feet_check(GroundLayers::from_layers(&[2])),
        );
        let by_wall_wall_layer = spawn_checker(
            &mut app,
            Vec3::new(2.4, 1.0, 0.0),
            feet_check(GroundLayers::from_layers(&[2])),
        );
        let on_floor_floor_layer = spawn_checker(
            &mut app,
            Vec3::new(-2.0, 1.0, 0.0),
            feet_check(GroundLayers::from_layers(&[1])),
        );
        settle(&mut app);

        assert_eq!(contact(&app, on_floor_wall_layer), None);
        assert_eq!(contact(&app, by_wall_wall_layer), Some(wall));
        assert_eq!(contact(&app, on_floor_floor_layer), Some(floor));
    }

    #[test]
    fn ground_check_ignores_own_body_and_sensors() {
        let mut app = physics_app();
        app.world_mut().spawn((
            Collider::ball(0.5),
            Sensor,
            Transform::from_xyz(10.0, 0.0, 0.0),
        ));
        let solid = app
            .world_mut()
            .spawn((Collider::ball(0.5), Transform::from_xyz(20.0, 0.0, 0.0)))
            .id();

        // The ground check sphere overlaps the checker's own collider in both cases.
        let above_sensor = spawn_checker(
            &mut app,
            Vec3::new(10.0, 1.0, 0.0),
            MoverGroundProbe {
                layers: GroundLayers::ALL,
                ..MoverGroundProbe::at(Vector3::new(0.0, -0.6, 0.0))
            },
        );
        let above_solid = spawn_checker(
            &mut app,
            Vec3::new(20.0, 1.0, 0.0),
            MoverGroundProbe {
                layers: GroundLayers::ALL,
                ..MoverGroundProbe::at(Vector3::new(0.0, -0.6, 0.0))
            },
        );
        settle(&mut app);

        assert_eq!(contact(&app, above_sensor), None);
        assert_eq!(contact(&app, above_solid), Some(solid));
    }

    #[test]
    fn jump_replaces_vertical_velocity_with_impulse() {
        let mut app = App::new();
        app.add_systems(Update, apply_jump_system);
        let jumping = app
            .world_mut()
            .spawn((
                MoverMotor {
                    planar_velocity: Vector3::ZERO,
                    jump: Some(MoverJumpImpulse {
                        impulse: Vector3::new(0.0, 7.0, 0.0),
                    }),
                },
                Velocity::linear(Vec3::new(1.0, -9.8, 2.0)),
                ExternalImpulse::default(),
            ))
            .id();
        let sensing_only = app
            .world_mut()
            .spawn((
                MoverMotor {
                    planar_velocity: Vector3::ZERO,
                    jump: Some(MoverJumpImpulse {
                        impulse: Vector3::new(0.0, 7.0, 0.0),
                    }),
                },
                Velocity::linear(Vec3::new(1.0, -9.8, 2.0)),
                ExternalImpulse::default(),
                MoverToggle::SenseOnly,
            ))
            .id();
        app.update();

        let world = app.world();
        assert_eq!(
            world.get::<Velocity>(jumping).unwrap().linvel,
            Vec3::new(1.0, 0.0, 2.0)
        );
        assert_eq!(
            world.get::<ExternalImpulse>(jumping).unwrap().impulse,
            Vec3::new(0.0, 7.0, 0.0)
        );
        assert_eq!(
            world.get::<Velocity>(sensing_only).unwrap().linvel,
            Vec3::new(1.0, -9.8, 2.0)
        );
        assert_eq!(
            world.get::<ExternalImpulse>(sensing_only).unwrap().impulse,
            Vec3::ZERO
        );
    }

    #[test]
    fn fixed_step_keeps_vertical_velocity() {
        let mut app = App::new();
        app.add_systems(Update, apply_planar_velocity_system);
        let character = app
            .world_mut()
            .spawn((
                MoverMotor {
                    planar_velocity: Vector3::new(5.0, 0.0, 0.0),
                    jump: None,
                },
                Velocity::linear(Vec3::new(0.0, -9.8, 3.0)),
            ))
            .id();
        app.update();

        assert_eq!(
            app.world().get::<Velocity>(character).unwrap().linvel,
            Vec3::new(5.0, -9.8, 0.0)
        );
    }

    #[test]
    fn paused_time_applies_the_jump_once() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, MoverControllerPlugin::default()));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            100,
        )));
        app.add_systems(Update, apply_jump_system.in_set(MoverPipelineSystems::Motors));
        app.update();

        let character = app
            .world_mut()
            .spawn((
                CharacterMover::default(),
                MoverGroundProbe::at(Vector3::new(0.0, -1.0, 0.0)),
                Transform::default(),
                Velocity::default(),
                ExternalImpulse::default(),
            ))
            .id();
        app.world_mut()
            .get_mut::<MoverInput>(character)
            .unwrap()
            .jump_just_pressed = true;
        app.update();
        assert_eq!(
            app.world().get::<ExternalImpulse>(character).unwrap().impulse,
            Vec3::new(0.0, 7.0, 0.0)
        );

        app.world_mut().resource_mut::<Time<Virtual>>().pause();
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(
            app.world().get::<ExternalImpulse>(character).unwrap().impulse,
            Vec3::new(0.0, 7.0, 0.0)
        );
        assert_eq!(
            app.world().get::<CharacterMover>(character).unwrap().jump_count(),
            1
        );
    }

    #[test]
    fn ground_groups_only_hit_ground_layers() {
        let groups = ground_collision_groups(GroundLayers::from_layers(&[1, 3]));
        assert_eq!(groups.memberships, Group::ALL);
        assert_eq!(groups.filters, Group::GROUP_1 | Group::GROUP_3);

        let ground = CollisionGroups::new(Group::GROUP_3, Group::ALL);
        let wall = CollisionGroups::new(Group::GROUP_2, Group::ALL);
        let interaction = |other: CollisionGroups| {
            groups.memberships.intersects(other.filters)
                && other.memberships.intersects(groups.filters)
        };
        assert!(interaction(ground));
        assert!(!interaction(wall));
    }

    #[test]
    fn activation_locks_rotation() {
        let mut app = App::new();
        app.add_systems(Update, lock_rotation_system);
        let entity = app
            .world_mut()
            .spawn((MoverMotor::default(), LockedAxes::TRANSLATION_LOCKED_X))
            .id();
        app.update();
        assert_eq!(
            *app.world().get::<LockedAxes>(entity).unwrap(),
            LockedAxes::TRANSLATION_LOCKED_X | LockedAxes::ROTATION_LOCKED
        );
    }
}
