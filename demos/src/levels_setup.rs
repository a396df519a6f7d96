use bevy::color::palettes::css;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Layer 1 - the default ground layer of the mover.
pub fn ground_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::ALL)
}

/// Layer 2 - solid, but not something the character can jump off.
pub fn wall_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_2, Group::ALL)
}

pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut spawn_block = |name: &'static str,
                           size: Vec3,
                           position: Vec3,
                           color: Srgba,
                           groups: CollisionGroups| {
        commands.spawn((
            Name::new(name),
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(Color::from(color))),
            Transform::from_translation(position),
            RigidBody::Fixed,
            Collider::cuboid(0.5 * size.x, 0.5 * size.y, 0.5 * size.z),
            groups,
        ));
    };

    spawn_block(
        "Floor",
        Vec3::new(64.0, 1.0, 64.0),
        Vec3::new(0.0, -0.5, 0.0),
        css::DARK_OLIVEGREEN,
        ground_groups(),
    );
    for (index, height) in [1.0, 2.0, 3.0].into_iter().enumerate() {
        spawn_block(
            "Step",
            Vec3::new(3.0, height, 3.0),
            Vec3::new(-6.0 + 3.0 * index as f32, 0.5 * height, -8.0),
            css::GRAY,
            ground_groups(),
        );
    }
    spawn_block(
        "Wall",
        Vec3::new(1.0, 6.0, 12.0),
        Vec3::new(8.0, 3.0, 0.0),
        css::INDIAN_RED,
        wall_groups(),
    );
}
