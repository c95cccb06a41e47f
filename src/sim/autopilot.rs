//! Demo-mode steering
//!
//! Produces the same direction intent a player would. Nothing here touches
//! simulation state, so a host can swap it for real input at any time.

use glam::Vec2;

use super::collision::hit_distance;
use super::movement::Direction;
use super::state::{Actor, FallingObject};

/// How far above the actor objects count as threats
pub const LOOKAHEAD: f32 = 240.0;
/// Extra horizontal clearance over the hit distance
pub const LANE_MARGIN: f32 = 1.25;

/// Pick a direction for the actor given the active objects
///
/// Dodges sideways away from the nearest object falling toward it. With
/// nothing threatening, drifts back toward the arena center.
pub fn steer<'a, I>(actor: &Actor, objects: I, arena: Vec2) -> Option<Direction>
where
    I: IntoIterator<Item = &'a FallingObject>,
{
    let me = actor.center();
    let bottom = actor.pos.y + actor.size.y;

    let threat = objects
        .into_iter()
        .filter(|obj| {
            let c = obj.center();
            let lane = hit_distance(actor.radius(), obj.radius()) * LANE_MARGIN;
            c.y <= bottom && me.y - c.y <= LOOKAHEAD && (c.x - me.x).abs() < lane
        })
        .min_by(|a, b| me.distance(a.center()).total_cmp(&me.distance(b.center())));

    match threat {
        Some(obj) => {
            let away_left = obj.center().x >= me.x;
            let at_left_wall = actor.pos.x <= 0.0;
            let at_right_wall = actor.pos.x + actor.size.x >= arena.x;
            let go_left = if away_left { !at_left_wall } else { at_right_wall };
            Some(if go_left {
                Direction::West
            } else {
                Direction::East
            })
        }
        None => {
            let offset = arena / 2.0 - me;
            let axis = |d: f32| {
                if d.abs() > actor.speed {
                    d.signum() as i32
                } else {
                    0
                }
            };
            Direction::from_axes(axis(offset.x), axis(offset.y))
        }
    }
}
