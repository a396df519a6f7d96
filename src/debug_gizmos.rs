use bevy::color::palettes::css;
use bevy::prelude::*;
use bevy_third_person_mover_physics_integration_layer::data_for_backends::MoverGroundProbe;
use bevy_third_person_mover_physics_integration_layer::math::AsF32;

use crate::CharacterMover;

/// Draws the ground probe of every character mover as a red wireframe sphere.
///
/// Purely observational - nothing is drawn for movers whose probe origin was never set.
pub struct MoverDebugGizmosPlugin;

impl Plugin for MoverDebugGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, draw_ground_probe_gizmos_system);
    }
}

/// The sphere to draw for `probe`, as a world-space center and a radius.
fn ground_probe_sphere(
    probe: &MoverGroundProbe,
    transform: &GlobalTransform,
) -> Option<(Vec3, f32)> {
    let point = probe.world_point(transform)?;
    Some((point.f32(), probe.radius.f32()))
}

fn draw_ground_probe_gizmos_system(
    mut gizmos: Gizmos,
    query: Query<(&MoverGroundProbe, &GlobalTransform), With<CharacterMover>>,
) {
    for (probe, transform) in query.iter() {
        let Some((center, radius)) = ground_probe_sphere(probe, transform) else {
            continue;
        };
        gizmos.sphere(Isometry3d::from_translation(center), radius, css::RED);
    }
}

#[cfg(test)]
mod tests {
    use bevy_third_person_mover_physics_integration_layer::math::Vector3;

    use super::*;

    #[test]
    fn unresolved_origin_draws_nothing() {
        let transform = GlobalTransform::from(Transform::from_xyz(1.0, 2.0, 3.0));
        assert_eq!(
            ground_probe_sphere(&MoverGroundProbe::default(), &transform),
            None
        );
    }

    #[test]
    fn sphere_is_drawn_at_the_check_point() {
        let probe = MoverGroundProbe {
            radius: 0.8,
            ..MoverGroundProbe::at(Vector3::new(0.0, -1.0, 0.0))
        };
        let transform = GlobalTransform::from(Transform::from_xyz(1.0, 2.0, 3.0));
        let (center, radius) = ground_probe_sphere(&probe, &transform).unwrap();
        assert!((center - Vec3::new(1.0, 1.0, 3.0)).length() < 1e-5, "{center}");
        assert_eq!(radius, 0.8);
    }
}
