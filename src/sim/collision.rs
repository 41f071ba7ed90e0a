//! Actor vs. vehicle collision
//!
//! Only the actor's committed lane is tested, so the check reduces to 1D
//! interval overlap along X.

use super::state::{GameState, Lane};

/// Strict overlap of two closed intervals `(min, max)`; touching edges miss
#[inline]
pub fn intervals_overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    a.1 > b.0 && a.0 < b.1
}

/// Bounding interval of something `width` wide centred on `x`
#[inline]
pub fn extent(x: f32, width: f32) -> (f32, f32) {
    (x - width / 2.0, x + width / 2.0)
}

/// Index of the first vehicle in `lane` overlapping the actor, if any
pub fn first_hit(lane: &Lane, actor_x: f32, actor_width: f32) -> Option<usize> {
    if !lane.kind.has_traffic() {
        return None;
    }

    let actor = extent(actor_x, actor_width);
    lane.vehicles()
        .iter()
        .position(|vehicle| intervals_overlap(actor, vehicle.extent()))
}

/// Whether the actor currently overlaps a vehicle in its committed lane
///
/// Pure predicate; latching the result is the game loop's job.
pub fn actor_collides(state: &GameState) -> bool {
    state.current_lane().is_some_and(|lane| {
        first_hit(lane, state.actor.position.x, state.settings.actor_width()).is_some()
    })
}
