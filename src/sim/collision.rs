//! Collision detection between the actor and falling objects
//!
//! Both sides are treated as circles around their box centers. A hit
//! registers once the center distance is within 1.5x the summed radii, so
//! contacts fire before the drawn shapes actually touch. Overlap detection
//! only; there is no response.

use glam::Vec2;

use super::state::{Actor, FallingObject};
use crate::consts::COLLISION_TOLERANCE;

/// Anything with a circular hit area
pub trait Collider {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

impl Collider for Actor {
    fn center(&self) -> Vec2 {
        Actor::center(self)
    }

    fn radius(&self) -> f32 {
        Actor::radius(self)
    }
}

impl Collider for FallingObject {
    fn center(&self) -> Vec2 {
        FallingObject::center(self)
    }

    fn radius(&self) -> f32 {
        FallingObject::radius(self)
    }
}

/// Distance threshold for a pair of radii
#[inline]
pub fn hit_distance(radius_a: f32, radius_b: f32) -> f32 {
    (radius_a + radius_b) * COLLISION_TOLERANCE
}

/// Whether two colliders are within the tolerance distance
pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let distance = a.center().distance(b.center());
    distance <= hit_distance(a.radius(), b.radius())
}

/// First object (in iteration order) that hits the actor
///
/// Order decides ties, not proximity.
pub fn evaluate<'a, I>(actor: &Actor, objects: I) -> Option<&'a FallingObject>
where
    I: IntoIterator<Item = &'a FallingObject>,
{
    let hit = objects.into_iter().find(|obj| collides(actor, *obj))?;
    log::debug!(
        "Collision with {:?}: distance={:.1}, threshold={:.1}",
        hit.id,
        actor.center().distance(hit.center()),
        hit_distance(actor.radius(), hit.radius())
    );
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObjectId;

    fn actor_at(x: f32, y: f32) -> Actor {
        let mut actor = Actor::new(30.0, 50.0);
        actor.pos = Vec2::new(x, y);
        actor
    }

    fn object_at(id: u64, x: f32, y: f32, size: f32) -> FallingObject {
        FallingObject {
            id: ObjectId(id),
            pos: Vec2::new(x, y),
            size,
            active: true,
            ..FallingObject::inert()
        }
    }

    #[test]
    fn test_close_object_collides() {
        // Threshold (15 + 10) * 1.5 = 37.5
        let actor = actor_at(100.0, 100.0);
        let obj = object_at(1, 110.0, 110.0, 20.0);
        assert_eq!(hit_distance(actor.radius(), obj.radius()), 37.5);
        assert!(collides(&actor, &obj));
    }

    #[test]
    fn test_tolerance_reaches_past_overlap() {
        let actor = actor_at(100.0, 100.0); // center (115, 115)
        // Centers 36 apart horizontally: shapes don't touch (25) but within 37.5
        let near = object_at(1, 141.0, 105.0, 20.0);
        assert!(collides(&actor, &near));
        // Just past the threshold
        let far = object_at(2, 142.6, 105.0, 20.0);
        assert!(!collides(&actor, &far));
    }

    #[test]
    fn test_symmetric() {
        let actor = actor_at(200.0, 200.0);
        for (x, y, size) in [(230.0, 230.0, 15.0), (250.0, 180.0, 40.0), (400.0, 0.0, 10.0)] {
            let obj = object_at(1, x, y, size);
            assert_eq!(collides(&actor, &obj), collides(&obj, &actor));
        }
    }

    #[test]
    fn test_evaluate_returns_first_in_order() {
        let actor = actor_at(100.0, 100.0);
        let objects = [
            object_at(1, 500.0, 500.0, 20.0),
            // Farther but earlier in order
            object_at(2, 130.0, 110.0, 20.0),
            // Dead center
            object_at(3, 105.0, 105.0, 20.0),
        ];
        let hit = evaluate(&actor, &objects).unwrap();
        assert_eq!(hit.id, ObjectId(2));
    }

    #[test]
    fn test_evaluate_none() {
        let actor = actor_at(100.0, 100.0);
        let objects = [object_at(1, 500.0, 500.0, 20.0)];
        assert!(evaluate(&actor, &objects).is_none());
        let empty: [FallingObject; 0] = [];
        assert!(evaluate(&actor, &empty).is_none());
    }
}
