//! Vehicle motion
//!
//! Every road lane is a conveyor: vehicles drive off one side of the board and
//! reappear on the other.

use super::state::{Lane, Traffic};
use crate::consts::SPEED_DIVISOR;

/// Move one lane's vehicles by `delta_ms`, wrapping at `±bound`
///
/// A vehicle already past the leading bound is moved to the trailing bound
/// instead of advancing this frame.
pub fn advance_traffic(traffic: &mut Traffic, delta_ms: f32, bound: f32) {
    let step = traffic.speed / SPEED_DIVISOR * delta_ms;

    for vehicle in traffic.vehicles.iter_mut() {
        if traffic.direction {
            vehicle.x = if vehicle.x > bound {
                -bound
            } else {
                vehicle.x + step
            };
        } else {
            vehicle.x = if vehicle.x < -bound {
                bound
            } else {
                vehicle.x - step
            };
        }
    }
}

/// Advance every road lane in the world
pub fn advance_vehicles(lanes: &mut [Lane], delta_ms: f32, bound: f32) {
    for traffic in lanes.iter_mut().filter_map(|lane| lane.traffic.as_mut()) {
        advance_traffic(traffic, delta_ms, bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{LaneKind, Vehicle};

    fn traffic(direction: bool, x: f32) -> Traffic {
        Traffic {
            direction,
            speed: 2.0,
            vehicles: vec![Vehicle {
                x,
                length: 120.0,
                rotation: 0.0,
                color: 0,
            }],
        }
    }

    #[test]
    fn test_moves_with_direction() {
        let mut t = traffic(true, 0.0);
        advance_traffic(&mut t, 160.0, 900.0);
        assert!((t.vehicles[0].x - 20.0).abs() < 0.001);

        let mut t = traffic(false, 0.0);
        advance_traffic(&mut t, 160.0, 900.0);
        assert!((t.vehicles[0].x + 20.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_delta_holds_position() {
        let mut t = traffic(true, 123.0);
        advance_traffic(&mut t, 0.0, 900.0);
        assert_eq!(t.vehicles[0].x, 123.0);
    }

    #[test]
    fn test_wraps_past_leading_bound() {
        let mut t = traffic(true, 901.0);
        advance_traffic(&mut t, 16.0, 900.0);
        assert_eq!(t.vehicles[0].x, -900.0);

        let mut t = traffic(false, -901.0);
        advance_traffic(&mut t, 16.0, 900.0);
        assert_eq!(t.vehicles[0].x, 900.0);
    }

    #[test]
    fn test_conveyor_returns_after_full_cycle() {
        // 2 / 16 * 8ms = 1 unit per frame
        let mut t = traffic(true, -900.0);
        for _ in 0..=1800 {
            advance_traffic(&mut t, 8.0, 900.0);
        }
        assert!(t.vehicles[0].x > 900.0);
        advance_traffic(&mut t, 8.0, 900.0);
        assert_eq!(t.vehicles[0].x, -900.0);
    }

    #[test]
    fn test_advance_vehicles_skips_non_roads() {
        let mut lanes = vec![
            Lane::field(0),
            Lane::forest(1, &[1, 2, 3, 4]),
            Lane::road(2, LaneKind::Car, traffic(true, 0.0)),
        ];
        advance_vehicles(&mut lanes, 160.0, 900.0);
        assert!((lanes[2].vehicles()[0].x - 20.0).abs() < 0.001);
        assert_eq!(lanes[1].trees.len(), 4);
    }
}
