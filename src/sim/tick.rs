//! Per-frame simulation tick
//!
//! Order matters: vehicles move first, then the actor's step advances (and
//! may commit), then collision is tested against the committed lane. A step
//! that lands on a vehicle is therefore caught in the frame it completes.

use super::collision::actor_collides;
use super::movement::advance_step;
use super::state::{GamePhase, GameHost, GameState};
use super::vehicles::advance_vehicles;

/// Advance the game to `timestamp` (host clock, ms)
///
/// Timestamps come from the frame driver and need not be evenly spaced.
/// After game over this is a no-op until [`GameState::retry`].
pub fn tick(state: &mut GameState, timestamp: f64, host: &mut dyn GameHost) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    let delta = state
        .previous_timestamp
        .map_or(0.0, |previous| (timestamp - previous).max(0.0));
    state.previous_timestamp = Some(timestamp);

    let bound = state.settings.wrap_bound();
    advance_vehicles(&mut state.lanes, delta as f32, bound);

    advance_step(state, timestamp, host);

    if actor_collides(state) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at lane {} column {} (best {})",
            state.actor.lane,
            state.actor.column,
            state.best_lane
        );
        host.on_game_over();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::movement::move_actor;
    use crate::sim::state::{Direction, GameEvent, Lane, LaneKind, Traffic, Vehicle};

    /// Field start lane, one car lane ahead with a single car at `car_x`
    fn single_car_world(car_x: f32, direction: bool, speed: f32) -> GameState {
        let settings = Settings::default();
        let car = Vehicle {
            x: car_x,
            length: settings.car_length * settings.zoom,
            rotation: 0.0,
            color: 0,
        };
        let mut lanes = vec![
            Lane::field(0),
            Lane::road(
                1,
                LaneKind::Car,
                Traffic {
                    direction,
                    speed,
                    vehicles: vec![car],
                },
            ),
        ];
        lanes.extend((2..10).map(Lane::field));
        GameState::with_lanes(settings, 11, lanes)
    }

    #[test]
    fn test_tick_before_any_move_changes_nothing_discrete() {
        let mut state = GameState::new(Settings::default(), 2024);
        let mut events: Vec<GameEvent> = Vec::new();

        tick(&mut state, 100.0, &mut events);
        tick(&mut state, 500.0, &mut events);

        assert_eq!(state.actor.lane, 0);
        assert_eq!(state.actor.column, 8);
        assert!(state.moves.is_empty());
        assert_eq!(state.step_start, None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut state = single_car_world(-600.0, true, 2.0);
        tick(&mut state, 12345.0, &mut ());
        assert_eq!(state.lanes[1].vehicles()[0].x, -600.0);

        tick(&mut state, 12345.0 + 160.0, &mut ());
        assert!((state.lanes[1].vehicles()[0].x + 580.0).abs() < 0.001);
    }

    #[test]
    fn test_crossing_clear_road() {
        let mut state = single_car_world(-600.0, true, 2.0);
        let mut events: Vec<GameEvent> = Vec::new();

        assert!(move_actor(&mut state, Direction::Forward));
        tick(&mut state, 0.0, &mut events);
        tick(&mut state, 250.0, &mut events);

        assert_eq!(state.actor.lane, 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(events, vec![GameEvent::ScoreUpdate(1)]);
    }

    #[test]
    fn test_landing_on_car_ends_game_once() {
        let mut state = single_car_world(0.0, true, 2.0);
        let mut events: Vec<GameEvent> = Vec::new();

        assert!(move_actor(&mut state, Direction::Forward));
        tick(&mut state, 0.0, &mut events);
        tick(&mut state, 250.0, &mut events);

        // Caught the same frame the step commits
        assert!(state.is_game_over());
        assert_eq!(
            events,
            vec![GameEvent::ScoreUpdate(1), GameEvent::GameOver]
        );

        tick(&mut state, 300.0, &mut events);
        tick(&mut state, 400.0, &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_car_runs_into_waiting_actor() {
        let mut state = single_car_world(-200.0, true, 3.0);
        let mut events: Vec<GameEvent> = Vec::new();

        move_actor(&mut state, Direction::Forward);
        let mut t = 0.0;
        while t < 2000.0 {
            tick(&mut state, t, &mut events);
            t += 16.0;
        }

        assert!(state.is_game_over());
        let game_overs = events.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_actor_mid_step_is_not_in_target_lane() {
        // Car sits on the target cell but the actor is still committed to lane 0
        let mut state = single_car_world(0.0, true, 0.0);
        let mut events: Vec<GameEvent> = Vec::new();

        move_actor(&mut state, Direction::Forward);
        tick(&mut state, 0.0, &mut events);
        tick(&mut state, 150.0, &mut events);
        assert!(!state.is_game_over());

        tick(&mut state, 201.0, &mut events);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_retry_restores_initial_state() {
        let mut state = GameState::new(Settings::default(), 99);
        let mut events: Vec<GameEvent> = Vec::new();

        move_actor(&mut state, Direction::Left);
        move_actor(&mut state, Direction::Left);
        tick(&mut state, 0.0, &mut events);
        tick(&mut state, 250.0, &mut events);
        state.phase = GamePhase::GameOver;

        state.retry();

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.actor.lane, 0);
        assert_eq!(state.actor.column, state.settings.columns / 2);
        assert!(state.moves.is_empty());
        assert!(!state.start_moving);
        assert_eq!(state.step_start, None);
        assert_eq!(state.previous_timestamp, None);
        assert_eq!(state.lanes.len(), state.settings.initial_lanes as usize);
        assert_eq!(state.best_lane, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(Settings::default(), 4242);
        let mut b = GameState::new(Settings::default(), 4242);
        let script = [
            Direction::Forward,
            Direction::Right,
            Direction::Forward,
            Direction::Left,
        ];

        let mut t = 0.0;
        for direction in script {
            move_actor(&mut a, direction);
            move_actor(&mut b, direction);
            for _ in 0..20 {
                tick(&mut a, t, &mut ());
                tick(&mut b, t, &mut ());
                t += 16.0;
            }
        }

        assert_eq!(a.lanes, b.lanes);
        assert_eq!(a.actor.lane, b.actor.lane);
        assert_eq!(a.actor.column, b.actor.column);
        assert_eq!(a.phase, b.phase);
    }
}
