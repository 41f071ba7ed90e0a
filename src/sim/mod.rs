//! Simulation engine
//!
//! All gameplay logic lives here. This module must stay renderer-agnostic:
//! - Time only enters through `tick(timestamp)`
//! - Seeded RNG only
//! - Lanes addressed by index, append-only

pub mod collision;
pub mod movement;
pub mod state;
pub mod tick;
pub mod vehicles;
pub mod view;
pub mod world;

pub use collision::{actor_collides, first_hit, intervals_overlap};
pub use movement::{Cell, advance_step, can_step, move_actor, project_position};
pub use state::{
    Actor, Direction, GameEvent, GameHost, GamePhase, GameState, Lane, LaneKind, RngState,
    Traffic, Tree, Vehicle,
};
pub use tick::tick;
pub use vehicles::{advance_traffic, advance_vehicles};
pub use view::{ActorView, FrameView};
pub use world::{add_lane, build_lane, ensure_lane, generate_initial_lanes, place_distinct};
