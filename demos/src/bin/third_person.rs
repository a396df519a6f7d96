use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_third_person_mover::math::{AdjustPrecision, Vector3};
use bevy_third_person_mover::prelude::*;
use bevy_third_person_mover_rapier3d::prelude::*;

use third_person_mover_demos::app_setup_options::AppSetupConfiguration;
use third_person_mover_demos::follow_camera::{FollowCamera, FollowCameraPlugin};
use third_person_mover_demos::levels_setup::setup_level;

const CAPSULE_HALF_HEIGHT: f32 = 0.5;
const CAPSULE_RADIUS: f32 = 0.5;

fn main() {
    let app_setup_configuration = AppSetupConfiguration::from_environment();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins);

    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    // The mover's main plugin, and the backend that connects it to bevy_rapier3d. Both use
    // `Update` and `FixedUpdate`, to match Rapier running in `PostUpdate`.
    app.add_plugins(MoverControllerPlugin::default());
    app.add_plugins(MoverRapier3dPlugin::default());
    app.add_plugins(MoverKeyboardControlsPlugin::default());

    if app_setup_configuration.debug_gizmos {
        app.add_plugins(RapierDebugRenderPlugin::default());
        app.add_plugins(MoverDebugGizmosPlugin);
    }

    app.add_plugins(FollowCameraPlugin);
    app.add_systems(Startup, (setup_lights, setup_level, setup_player));
    app.insert_resource(app_setup_configuration);
    app.run();
}

fn setup_lights(mut commands: Commands) {
    commands.spawn((
        PointLight::default(),
        Transform::from_xyz(5.0, 5.0, 5.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: true,
            ..Default::default()
        },
        Transform::default().looking_at(-Vec3::Y, Vec3::Z),
    ));
}

fn setup_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    app_setup_configuration: Res<AppSetupConfiguration>,
) {
    let mover_config = app_setup_configuration.mover_config();
    if let Err(err) = mover_config.validate() {
        error!("Ignoring the command line tuning: {err}");
    }
    let mover = CharacterMover::try_new(mover_config).unwrap_or_default();

    let player = commands
        .spawn((
            Name::new("Player"),
            Mesh3d(meshes.add(Capsule3d::new(CAPSULE_RADIUS, 2.0 * CAPSULE_HALF_HEIGHT))),
            MeshMaterial3d(materials.add(Color::srgb(0.8, 0.7, 0.2))),
            Transform::from_xyz(0.0, 2.0, 0.0),
            // The character entity must be configured as a dynamic rigid body of the physics
            // backend.
            RigidBody::Dynamic,
            Collider::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS),
            mover,
            // The probe sits at the bottom of the capsule, so that its sphere reaches slightly
            // below the character's feet.
            MoverGroundProbe::at(Vector3::new(
                0.0,
                -(CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS).adjust_precision(),
                0.0,
            )),
            MoverKeyboardBindings::default(),
        ))
        .id();

    let mut cmd = commands.spawn((
        Camera3d::default(),
        FollowCamera {
            target: player,
            offset: Vec3::new(0.0, 6.0, 12.0),
        },
    ));
    // Without the marker, "forward" is always the world's +Z.
    if !app_setup_configuration.no_camera {
        cmd.insert(MoverCamera);
    }
}
