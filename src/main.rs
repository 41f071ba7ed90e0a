//! Lane Hopper entry point
//!
//! The browser build is driven from JavaScript through `lane_hopper::web`.
//! Natively this runs a headless autoplay game at 60 fps.
//!
//! Usage: `lane-hopper [seed] [settings.json]`
//! Set `LANE_HOPPER_SCORES=path.json` to record the result.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use lane_hopper::sim::{
        Cell, Direction, GameHost, GameState, LaneKind, can_step, collision, ensure_lane,
        move_actor, project_position,
    };

    /// Frame spacing of the simulated display (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this much simulated time (ms)
    pub const MAX_RUN_MS: f64 = 120_000.0;

    /// Host that logs notifications
    #[derive(Debug, Default)]
    pub struct LogHost {
        pub best: u32,
        pub game_over: bool,
    }

    impl GameHost for LogHost {
        fn on_score_update(&mut self, score: u32) {
            if score > self.best {
                self.best = score;
                log::info!("Score: {}", score);
            }
        }

        fn on_game_over(&mut self) {
            self.game_over = true;
            log::info!("Game over");
        }
    }

    /// Whether `lane` stays clear around `x` for the next `horizon_ms`
    fn lane_clear(state: &GameState, lane: usize, x: f32, horizon_ms: f32) -> bool {
        let Some(lane) = state.lanes.get(lane) else {
            return true;
        };
        let Some(traffic) = &lane.traffic else {
            return true;
        };

        // Pad by one cell so cars arriving between samples still count
        let width = state.settings.actor_width() + state.settings.cell_size();
        let sign = if traffic.direction { 1.0 } else { -1.0 };
        let travel = traffic.speed / lane_hopper::consts::SPEED_DIVISOR * horizon_ms;

        traffic.vehicles.iter().all(|vehicle| {
            (0..=4).all(|i| {
                let future = lane_hopper::sim::Vehicle {
                    x: vehicle.x + sign * travel * i as f32 / 4.0,
                    ..*vehicle
                };
                !collision::intervals_overlap(collision::extent(x, width), future.extent())
            })
        })
    }

    /// Pick the next move for an idle actor, or wait
    pub fn choose_move(state: &GameState) -> Option<Direction> {
        let here = project_position(state.actor.lane, state.actor.column, &state.moves);
        let horizon = (state.settings.step_time_ms * 2.0) as f32;
        let x = state.settings.column_x(state.actor.column);

        let safe = |from: Cell, direction: Direction| {
            let to = from.step(direction);
            can_step(state, from, direction)
                && lane_clear(
                    state,
                    to.lane as usize,
                    state.settings.column_x(to.column as u32),
                    horizon,
                )
        };

        if safe(here, Direction::Forward) {
            return Some(Direction::Forward);
        }

        let blocked_by_tree = state
            .lanes
            .get(here.lane as usize + 1)
            .is_some_and(|lane| lane.kind == LaneKind::Forest && lane.blocks(state.actor.column));
        if blocked_by_tree {
            let centre = state.settings.start_column();
            let order = if state.actor.column < centre {
                [Direction::Right, Direction::Left]
            } else {
                [Direction::Left, Direction::Right]
            };
            if let Some(direction) = order.into_iter().find(|&d| safe(here, d)) {
                return Some(direction);
            }
        }

        // Retreat if traffic is coming for the current lane
        if !lane_clear(state, here.lane as usize, x, horizon) && safe(here, Direction::Backward) {
            return Some(Direction::Backward);
        }

        None
    }

    /// Play one game to completion (or time limit); returns the best lane
    pub fn run(state: &mut GameState) -> u32 {
        let mut host = LogHost::default();
        let mut t = 0.0;

        while t < MAX_RUN_MS && !host.game_over {
            if !state.is_stepping() {
                // The bot looks one lane ahead before deciding
                let ahead = state.actor.lane as usize + 1;
                ensure_lane(state, ahead);
                if let Some(direction) = choose_move(state) {
                    move_actor(state, direction);
                }
            }
            lane_hopper::sim::tick(state, t, &mut host);
            t += FRAME_MS;
        }

        if !host.game_over {
            log::info!("Time limit reached after {:.0} s", t / 1000.0);
        }
        state.score()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_hopper::sim::GameState;
    use lane_hopper::{HighScores, Settings};
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let settings = args
        .get(2)
        .map(|path| Settings::load_from_path(Path::new(path)))
        .unwrap_or_default();

    log::info!("Lane Hopper (native autoplay) starting, seed {}", seed);
    let mut state = GameState::new(settings, seed);
    let score = autoplay::run(&mut state);
    log::info!("Final score: {} ({} lanes generated)", score, state.lanes.len());

    if let Ok(path) = std::env::var("LANE_HOPPER_SCORES") {
        let path = Path::new(&path);
        let mut scores = HighScores::load_from_path(path);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = scores.add_score(score, seed, now) {
            log::info!("New high score #{}", rank);
            if let Err(e) = scores.save_to_path(path) {
                log::error!("Could not save high scores: {}", e);
            }
        }
        if let Some(best) = scores.top_score() {
            log::info!("Best on record: {}", best);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is lane_hopper::web::start, this is just to satisfy the compiler
}
