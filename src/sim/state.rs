//! Game state and core simulation types
//!
//! Everything one engine instance mutates lives in [`GameState`].

use std::collections::{BTreeSet, VecDeque};

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::world::generate_initial_lanes;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting moves and advancing time
    Running,
    /// Actor was hit; run ended
    GameOver,
}

/// A move request from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forward" | "up" => Some(Direction::Forward),
            "backward" | "down" => Some(Direction::Backward),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value (arrow keys) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Forward),
            "ArrowDown" => Some(Direction::Backward),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Whether this move changes lane (and therefore score)
    #[inline]
    pub fn changes_lane(&self) -> bool {
        matches!(self, Direction::Forward | Direction::Backward)
    }
}

/// Lane types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneKind {
    /// Empty grass (always the start lane)
    Field,
    /// Grass with static trees
    Forest,
    /// Road with cars
    Car,
    /// Road with trucks
    Truck,
}

impl LaneKind {
    /// Kinds a non-start lane draws from, uniformly
    pub const RANDOM_KINDS: [LaneKind; 3] = [LaneKind::Car, LaneKind::Truck, LaneKind::Forest];

    /// Whether lanes of this kind carry moving vehicles
    #[inline]
    pub fn has_traffic(&self) -> bool {
        matches!(self, LaneKind::Car | LaneKind::Truck)
    }
}

/// A static obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub column: u32,
    /// Crown height (before zoom), cosmetic
    pub height: f32,
}

/// Crown heights a tree may draw from
pub const TREE_HEIGHTS: [f32; 3] = [20.0, 45.0, 60.0];

/// Number of vehicle colour variants the renderer provides
pub const VEHICLE_COLORS: u8 = 3;

/// A moving obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Continuous centre X (world units)
    pub x: f32,
    /// Bounding length along X (world units)
    pub length: f32,
    /// Facing around Z (radians): 0 or π
    pub rotation: f32,
    /// Colour variant index, cosmetic
    pub color: u8,
}

impl Vehicle {
    /// Bounding interval along X
    #[inline]
    pub fn extent(&self) -> (f32, f32) {
        (self.x - self.length / 2.0, self.x + self.length / 2.0)
    }
}

/// Motion parameters of a road lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traffic {
    /// true = vehicles travel toward increasing X
    pub direction: bool,
    /// Speed drawn from the lane speed set
    pub speed: f32,
    pub vehicles: Vec<Vehicle>,
}

/// One row of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub index: i32,
    pub kind: LaneKind,
    /// Forest lanes only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trees: Vec<Tree>,
    /// Car/truck lanes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Traffic>,
}

impl Lane {
    /// An empty field lane
    pub fn field(index: i32) -> Self {
        Self {
            index,
            kind: LaneKind::Field,
            trees: Vec::new(),
            traffic: None,
        }
    }

    /// A forest lane with trees in the given columns
    ///
    /// Hand-built forests use the shortest crown height; generated ones draw
    /// a random height per tree. Height is cosmetic and never affects blocking.
    pub fn forest(index: i32, columns: &[u32]) -> Self {
        Self {
            index,
            kind: LaneKind::Forest,
            trees: columns
                .iter()
                .map(|&column| Tree {
                    column,
                    height: TREE_HEIGHTS[0],
                })
                .collect(),
            traffic: None,
        }
    }

    /// A road lane with the given traffic
    pub fn road(index: i32, kind: LaneKind, traffic: Traffic) -> Self {
        debug_assert!(kind.has_traffic());
        Self {
            index,
            kind,
            trees: Vec::new(),
            traffic: Some(traffic),
        }
    }

    /// Columns holding a tree
    pub fn occupied_columns(&self) -> BTreeSet<u32> {
        self.trees.iter().map(|t| t.column).collect()
    }

    /// Whether a static obstacle blocks entry into `column`
    pub fn blocks(&self, column: u32) -> bool {
        self.kind == LaneKind::Forest && self.trees.iter().any(|t| t.column == column)
    }

    /// Vehicles in this lane (empty for non-road lanes)
    pub fn vehicles(&self) -> &[Vehicle] {
        self.traffic.as_ref().map_or(&[], |t| t.vehicles.as_slice())
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Committed lane
    pub lane: u32,
    /// Committed column
    pub column: u32,
    /// Continuous (x, y, hop) position, recomputed each tick
    pub position: Vec3,
}

impl Actor {
    /// Actor resting on a committed cell
    pub fn at(lane: u32, column: u32, settings: &Settings) -> Self {
        Self {
            lane,
            column,
            position: Vec3::new(settings.column_x(column), settings.lane_y(lane), 0.0),
        }
    }
}

/// Notification emitted toward the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A forward/backward step committed; carries the committed lane
    ScoreUpdate(u32),
    /// The actor was hit
    GameOver,
}

impl GameEvent {
    /// Hand this event to a host
    pub fn deliver(self, host: &mut dyn GameHost) {
        match self {
            GameEvent::ScoreUpdate(score) => host.on_score_update(score),
            GameEvent::GameOver => host.on_game_over(),
        }
    }
}

/// Host-side receiver for score and game-over notifications
///
/// Calls are fire-and-forget; the engine never waits on the host.
pub trait GameHost {
    fn on_score_update(&mut self, score: u32);
    fn on_game_over(&mut self);
}

/// Collects events for hosts that poll instead of reacting
impl GameHost for Vec<GameEvent> {
    fn on_score_update(&mut self, score: u32) {
        self.push(GameEvent::ScoreUpdate(score));
    }

    fn on_game_over(&mut self) {
        self.push(GameEvent::GameOver);
    }
}

/// Host that ignores all notifications
impl GameHost for () {
    fn on_score_update(&mut self, _score: u32) {}
    fn on_game_over(&mut self) {}
}

/// RNG seed and stream; each retry moves to the next stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete engine state for one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Seed and stream of the current world
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// World, indexed by lane index
    pub lanes: Vec<Lane>,
    pub actor: Actor,
    /// Pending moves, front is the one in flight
    pub moves: VecDeque<Direction>,
    /// Set by an accepted move when no step is in flight
    pub start_moving: bool,
    /// Timestamp the in-flight step started
    pub step_start: Option<f64>,
    /// Timestamp of the previous tick
    pub previous_timestamp: Option<f64>,
    /// Highest lane committed this run
    pub best_lane: u32,
}

impl GameState {
    /// Create a new game with a generated world
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let lanes = generate_initial_lanes(&mut rng, &settings, settings.initial_lanes);
        log::info!("New game: seed {}, {} lanes", seed, lanes.len());
        Self::assemble(settings, rng_state, rng, lanes)
    }

    /// Create a game over a prepared world (scripted layouts, tests)
    ///
    /// Lane indices are rewritten to match their position. Lanes added by
    /// forward moves are still generated from `seed`.
    pub fn with_lanes(settings: Settings, seed: u64, mut lanes: Vec<Lane>) -> Self {
        let settings = settings.sanitized();
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        for (i, lane) in lanes.iter_mut().enumerate() {
            lane.index = i as i32;
        }
        if lanes.first().is_none_or(|l| l.kind != LaneKind::Field) {
            log::warn!("Start lane must be a field, inserting one");
            lanes.insert(0, Lane::field(0));
            for (i, lane) in lanes.iter_mut().enumerate() {
                lane.index = i as i32;
            }
        }
        Self::assemble(settings, rng_state, rng, lanes)
    }

    fn assemble(settings: Settings, rng_state: RngState, rng: Pcg32, lanes: Vec<Lane>) -> Self {
        let actor = Actor::at(0, settings.start_column(), &settings);
        Self {
            settings,
            rng_state,
            rng,
            phase: GamePhase::Running,
            lanes,
            actor,
            moves: VecDeque::new(),
            start_moving: false,
            step_start: None,
            previous_timestamp: None,
            best_lane: 0,
        }
    }

    /// Reset to the initial state with a freshly generated world
    pub fn retry(&mut self) {
        self.rng_state.stream = self.rng_state.stream.wrapping_add(1);
        self.rng = self.rng_state.to_rng();
        self.lanes = generate_initial_lanes(&mut self.rng, &self.settings, self.settings.initial_lanes);
        self.actor = Actor::at(0, self.settings.start_column(), &self.settings);
        self.moves.clear();
        self.start_moving = false;
        self.step_start = None;
        self.previous_timestamp = None;
        self.best_lane = 0;
        self.phase = GamePhase::Running;
        log::info!("Retry (stream {})", self.rng_state.stream);
    }

    /// Lane the actor has committed to
    pub fn current_lane(&self) -> Option<&Lane> {
        self.lanes.get(self.actor.lane as usize)
    }

    /// Whether a step is being animated or waiting to start
    pub fn is_stepping(&self) -> bool {
        !self.moves.is_empty()
    }

    /// Displayed score: highest lane reached this run
    pub fn score(&self) -> u32 {
        self.best_lane
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_starts_on_field() {
        let state = GameState::new(Settings::default(), 42);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lanes.len(), 10);
        assert_eq!(state.lanes[0].kind, LaneKind::Field);
        assert_eq!(state.actor.lane, 0);
        assert_eq!(state.actor.column, 8);
        assert!(state.actor.position.x.abs() < 0.001);
        assert!(!state.is_stepping());
    }

    #[test]
    fn test_lane_indices_match_positions() {
        let state = GameState::new(Settings::default(), 7);
        for (i, lane) in state.lanes.iter().enumerate() {
            assert_eq!(lane.index, i as i32);
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(Settings::default(), 1234);
        let b = GameState::new(Settings::default(), 1234);
        assert_eq!(a.lanes, b.lanes);
    }

    #[test]
    fn test_with_lanes_inserts_start_field() {
        let state = GameState::with_lanes(Settings::default(), 1, vec![Lane::forest(5, &[1, 2, 3, 4])]);
        assert_eq!(state.lanes.len(), 2);
        assert_eq!(state.lanes[0].kind, LaneKind::Field);
        assert_eq!(state.lanes[1].index, 1);
    }

    #[test]
    fn test_lane_blocks_only_forest_columns() {
        let forest = Lane::forest(1, &[3, 9]);
        assert!(forest.blocks(3));
        assert!(!forest.blocks(4));
        assert_eq!(forest.occupied_columns().len(), 2);
        assert!(!Lane::field(0).blocks(3));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::from_str("Forward"), Some(Direction::Forward));
        assert_eq!(Direction::from_str("sideways"), None);
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("KeyA"), None);
        assert!(Direction::Backward.changes_lane());
        assert!(!Direction::Right.changes_lane());
    }

    #[test]
    fn test_event_collector() {
        let mut events: Vec<GameEvent> = Vec::new();
        events.on_score_update(3);
        events.on_game_over();
        assert_eq!(events, vec![GameEvent::ScoreUpdate(3), GameEvent::GameOver]);
    }

    #[test]
    fn test_deliver_replays_every_event_in_order() {
        let frame = [GameEvent::ScoreUpdate(1), GameEvent::GameOver];
        let mut replayed: Vec<GameEvent> = Vec::new();
        for event in frame {
            event.deliver(&mut replayed);
        }
        assert_eq!(replayed, frame);
        frame[1].deliver(&mut ());
    }
}
