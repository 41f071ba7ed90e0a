//! Renderer-facing frame snapshot
//!
//! The renderer owns meshes, camera and lights; it only needs lane layout,
//! vehicle positions and the actor's continuous position each frame.

use serde::Serialize;

use super::state::{GamePhase, GameState, Lane};

/// Actor position for drawing and camera tracking
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    /// Height above ground from the hop arc
    pub hop: f32,
    pub lane: u32,
    pub column: u32,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub actor: ActorView,
    /// Lanes in index order; each carries its own `index`
    pub lanes: &'a [Lane],
    pub score: u32,
    pub phase: GamePhase,
    /// Column / lane size in world units
    pub cell_size: f32,
    pub board_width: f32,
}

impl<'a> FrameView<'a> {
    /// Snapshot the whole world
    pub fn new(state: &'a GameState) -> Self {
        Self::around(state, usize::MAX, usize::MAX)
    }

    /// Snapshot only lanes within `behind`/`ahead` of the actor's lane
    pub fn around(state: &'a GameState, behind: usize, ahead: usize) -> Self {
        let current = state.actor.lane as usize;
        let start = current.saturating_sub(behind);
        let end = current
            .saturating_add(ahead)
            .saturating_add(1)
            .min(state.lanes.len());
        let start = start.min(end);

        let position = state.actor.position;
        Self {
            actor: ActorView {
                x: position.x,
                y: position.y,
                hop: position.z,
                lane: state.actor.lane,
                column: state.actor.column,
            },
            lanes: &state.lanes[start..end],
            score: state.score(),
            phase: state.phase,
            cell_size: state.settings.cell_size(),
            board_width: state.settings.board_width(),
        }
    }

    /// JSON encoding for script-side renderers
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_full_view_covers_world() {
        let state = GameState::new(Settings::default(), 8);
        let view = FrameView::new(&state);
        assert_eq!(view.lanes.len(), state.lanes.len());
        assert_eq!(view.actor.column, 8);
        assert_eq!(view.phase, GamePhase::Running);
    }

    #[test]
    fn test_window_clamps_to_world() {
        let mut state = GameState::new(Settings::default(), 8);
        state.actor.lane = 5;
        let view = FrameView::around(&state, 2, 3);
        assert_eq!(view.lanes.len(), 6);
        assert_eq!(view.lanes[0].index, 3);

        state.actor.lane = 0;
        let view = FrameView::around(&state, 4, 100);
        assert_eq!(view.lanes.len(), state.lanes.len());
        assert_eq!(view.lanes[0].index, 0);
    }

    #[test]
    fn test_json_shape() {
        let state = GameState::new(Settings::default(), 8);
        let json = FrameView::around(&state, 0, 0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["actor"]["lane"], 0);
        assert_eq!(value["lanes"][0]["kind"], "field");
        assert_eq!(value["phase"], "Running");
    }
}
