use bevy::prelude::*;
use bevy_third_person_mover::math::AsF32;
use bevy_third_person_mover::{MoverRenderState, MoverSystems};

/// Keeps the camera at a fixed offset from a character, looking at it.
#[derive(Component)]
pub struct FollowCamera {
    pub target: Entity,
    pub offset: Vec3,
}

pub struct FollowCameraPlugin;

impl Plugin for FollowCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, follow_camera_system.after(MoverSystems));
    }
}

fn follow_camera_system(
    mut cameras_query: Query<(&FollowCamera, &mut Transform)>,
    targets_query: Query<&MoverRenderState>,
) {
    for (follow_camera, mut transform) in cameras_query.iter_mut() {
        let Ok(render_state) = targets_query.get(follow_camera.target) else {
            continue;
        };
        let target = render_state.position.f32();
        *transform =
            Transform::from_translation(target + follow_camera.offset).looking_at(target, Vec3::Y);
    }
}
