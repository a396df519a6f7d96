use bevy::prelude::*;
use bevy_rapier3d::parry;
use bevy_rapier3d::prelude::*;

/// The parts of a Rapier context needed for running scene queries.
#[derive(bevy::ecs::query::QueryData)]
pub struct RapierSceneQuery<'a> {
    pub simulation: &'a RapierContextSimulation,
    pub colliders: &'a RapierContextColliders,
    pub rigidbody_set: &'a RapierRigidBodySet,
}

// TODO: After https://github.com/dimforge/bevy_rapier/issues/677 is fixed, this can go through
// `ReadRapierContext` instead.
impl RapierSceneQueryItem<'_, '_, '_> {
    /// The entity of the first collider (in no particular order) that passes `filter` and
    /// overlaps a ball of `radius` around `center`.
    pub fn first_ball_overlap(
        &self,
        filter: QueryFilter<'_>,
        center: Vec3,
        radius: f32,
    ) -> Option<Entity> {
        RapierQueryPipeline::new_scoped(
            &self.simulation.broad_phase,
            self.colliders,
            self.rigidbody_set,
            &filter,
            &parry::query::DefaultQueryDispatcher,
            |query_pipeline| {
                query_pipeline
                    .intersect_shape(center, Quat::IDENTITY, &parry::shape::Ball::new(radius))
                    .into_iter()
                    .next()
            },
        )
    }
}
