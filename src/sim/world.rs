//! Procedural world generation
//!
//! Lanes are built one at a time from the engine's seeded RNG. Obstacles are
//! placed on a coarse slot grid by rejection sampling so they never overlap.

use std::collections::BTreeSet;
use std::f32::consts::PI;

use rand::Rng;

use super::state::{
    GameState, Lane, LaneKind, TREE_HEIGHTS, Traffic, Tree, VEHICLE_COLORS, Vehicle,
};
use crate::consts::*;
use crate::settings::Settings;

/// Pick `count` distinct slots from `0..slots`, in placement order
///
/// Samples uniformly and retries on occupied slots. `count` is capped at
/// `slots` so sampling always terminates.
pub fn place_distinct<R: Rng>(rng: &mut R, count: usize, slots: u32) -> Vec<u32> {
    let count = count.min(slots as usize);
    let mut occupied = BTreeSet::new();
    let mut placed = Vec::with_capacity(count);

    while placed.len() < count {
        let slot = rng.random_range(0..slots);
        if occupied.insert(slot) {
            placed.push(slot);
        }
    }

    placed
}

/// Centre X of a placement slot that spans `slot_columns` columns
pub fn slot_x(settings: &Settings, slot: u32, slot_columns: u32) -> f32 {
    (slot as f32 * slot_columns as f32 * settings.position_width + settings.position_width / 2.0)
        * settings.zoom
        - settings.board_width() / 2.0
}

/// Build the lane at `index`
///
/// Index 0 and below are always fields; every other lane picks car, truck or
/// forest uniformly.
pub fn build_lane<R: Rng>(rng: &mut R, settings: &Settings, index: i32) -> Lane {
    if index <= 0 {
        return Lane::field(index);
    }

    let kind = LaneKind::RANDOM_KINDS[rng.random_range(0..LaneKind::RANDOM_KINDS.len())];

    match kind {
        LaneKind::Field => Lane::field(index),
        LaneKind::Forest => {
            let trees = place_distinct(rng, TREES_PER_FOREST, settings.columns)
                .into_iter()
                .map(|column| Tree {
                    column,
                    height: TREE_HEIGHTS[rng.random_range(0..TREE_HEIGHTS.len())],
                })
                .collect();
            Lane {
                index,
                kind,
                trees,
                traffic: None,
            }
        }
        LaneKind::Car | LaneKind::Truck => {
            let (count, slot_columns, length) = if kind == LaneKind::Car {
                (CARS_PER_LANE, CAR_SLOT_COLUMNS, settings.car_length)
            } else {
                (TRUCKS_PER_LANE, TRUCK_SLOT_COLUMNS, settings.truck_length)
            };

            let direction = rng.random_bool(0.5);
            let slots = settings.columns.div_ceil(slot_columns);
            let vehicles = place_distinct(rng, count, slots)
                .into_iter()
                .map(|slot| Vehicle {
                    x: slot_x(settings, slot, slot_columns),
                    length: length * settings.zoom,
                    rotation: if direction { 0.0 } else { PI },
                    color: rng.random_range(0..VEHICLE_COLORS),
                })
                .collect();
            let speed = settings.lane_speeds[rng.random_range(0..settings.lane_speeds.len())];

            Lane::road(
                index,
                kind,
                Traffic {
                    direction,
                    speed,
                    vehicles,
                },
            )
        }
    }
}

/// Generate the starting world: lanes `0..count`
///
/// The mirrored negative half is built as a scenery buffer and then dropped,
/// so only non-negative lanes are playable.
pub fn generate_initial_lanes<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    count: u32,
) -> Vec<Lane> {
    let reach = count.max(1) as i32 - 1;
    let lanes: Vec<Lane> = (-reach..=reach)
        .map(|index| build_lane(rng, settings, index))
        .filter(|lane| lane.index >= 0)
        .collect();

    log::debug!(
        "Generated {} lanes ({} buffer lanes discarded)",
        lanes.len(),
        reach
    );
    lanes
}

/// Append one lane at `index = lanes.len()`
pub fn add_lane(state: &mut GameState) {
    let index = state.lanes.len() as i32;
    let lane = build_lane(&mut state.rng, &state.settings, index);
    log::debug!("Lane {} added: {:?}", index, lane.kind);
    state.lanes.push(lane);
}

/// Generate lanes until `index` exists
pub fn ensure_lane(state: &mut GameState, index: usize) {
    while state.lanes.len() <= index {
        add_lane(state);
    }
}
