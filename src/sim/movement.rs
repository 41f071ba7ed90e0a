//! Queued step movement
//!
//! Moves are validated against the position the actor will reach once every
//! pending move has played out, then queued. The step scheduler animates the
//! front of the queue over `step_time_ms` and commits it when time runs out.

use glam::Vec3;

use super::state::{Direction, GameHost, GamePhase, GameState};
use super::world::{add_lane, ensure_lane};

/// A discrete (lane, column) cell, signed so projections may leave the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub lane: i64,
    pub column: i64,
}

impl Cell {
    /// Cell reached by taking one step in `direction`
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self { lane: self.lane + 1, ..self },
            Direction::Backward => Self { lane: self.lane - 1, ..self },
            Direction::Left => Self { column: self.column - 1, ..self },
            Direction::Right => Self { column: self.column + 1, ..self },
        }
    }
}

/// Fold pending moves onto a committed cell
pub fn project_position<'a, I>(lane: u32, column: u32, moves: I) -> Cell
where
    I: IntoIterator<Item = &'a Direction>,
{
    moves.into_iter().fold(
        Cell {
            lane: lane as i64,
            column: column as i64,
        },
        |cell, &direction| cell.step(direction),
    )
}

/// Whether `direction` can be taken from `from` without leaving the board or
/// walking into a tree
pub fn can_step(state: &GameState, from: Cell, direction: Direction) -> bool {
    let target = from.step(direction);
    let columns = state.settings.columns as i64;

    if target.lane < 0 || target.column < 0 || target.column >= columns {
        return false;
    }

    // A lane that has not been generated yet cannot be checked for trees
    state
        .lanes
        .get(target.lane as usize)
        .is_some_and(|lane| !lane.blocks(target.column as u32))
}

/// Queue a move if it is legal from the projected position
///
/// Returns `false` for rejected moves. A rejected forward move may still have
/// generated the lane it was checked against.
pub fn move_actor(state: &mut GameState, direction: Direction) -> bool {
    if state.phase == GamePhase::GameOver {
        return false;
    }

    let projected = project_position(state.actor.lane, state.actor.column, &state.moves);
    if direction == Direction::Forward {
        // Forward moves are checked against the real lane ahead
        if let Ok(ahead) = usize::try_from(projected.lane + 1) {
            ensure_lane(state, ahead);
        }
    }
    if !can_step(state, projected, direction) {
        log::debug!("Rejected {} from {:?}", direction.as_str(), projected);
        return false;
    }

    if state.step_start.is_none() {
        state.start_moving = true;
    }
    if direction == Direction::Forward {
        add_lane(state);
    }
    state.moves.push_back(direction);
    true
}

/// Advance the in-flight step to `timestamp`
///
/// Updates the actor's continuous position and commits the step once more
/// than `step_time_ms` has elapsed.
pub fn advance_step(state: &mut GameState, timestamp: f64, host: &mut dyn GameHost) {
    if state.start_moving && state.step_start.is_none() {
        state.step_start = Some(timestamp);
        state.start_moving = false;
    }

    let (Some(start), Some(&direction)) = (state.step_start, state.moves.front()) else {
        return;
    };

    let settings = &state.settings;
    let elapsed = timestamp - start;
    let progress = (elapsed / settings.step_time_ms).clamp(0.0, 1.0) as f32;
    let distance = progress * settings.cell_size();
    let hop = (progress * std::f32::consts::PI).sin() * settings.hop_height * settings.zoom;

    let base_x = settings.column_x(state.actor.column);
    let base_y = settings.lane_y(state.actor.lane);
    state.actor.position = match direction {
        Direction::Forward => Vec3::new(base_x, base_y + distance, hop),
        Direction::Backward => Vec3::new(base_x, base_y - distance, hop),
        Direction::Left => Vec3::new(base_x - distance, base_y, hop),
        Direction::Right => Vec3::new(base_x + distance, base_y, hop),
    };

    if elapsed > settings.step_time_ms {
        commit_step(state, direction, host);
        state.step_start = if state.moves.is_empty() {
            None
        } else {
            Some(timestamp)
        };
    }
}

/// Apply a completed step to the committed position
fn commit_step(state: &mut GameState, direction: Direction, host: &mut dyn GameHost) {
    let actor = &mut state.actor;
    match direction {
        Direction::Forward => actor.lane += 1,
        Direction::Backward => actor.lane = actor.lane.saturating_sub(1),
        Direction::Left => actor.column = actor.column.saturating_sub(1),
        Direction::Right => actor.column += 1,
    }
    state.moves.pop_front();

    // Rest exactly on the committed cell
    actor.position = Vec3::new(
        state.settings.column_x(actor.column),
        state.settings.lane_y(actor.lane),
        0.0,
    );

    if direction.changes_lane() {
        state.best_lane = state.best_lane.max(actor.lane);
        host.on_score_update(actor.lane);
    }
}
