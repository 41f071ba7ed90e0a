//! Browser host
//!
//! Exposes the engine to JavaScript. The page's renderer calls `tick` from
//! `requestAnimationFrame` and draws the returned frame JSON; score and
//! game-over callbacks feed the page's UI and score submission.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{Direction, FrameView, GameEvent, GameHost, GameState, move_actor, tick};

/// Lanes behind / ahead of the actor included in each frame
const VIEW_BEHIND: usize = 9;
const VIEW_AHEAD: usize = 20;

/// Forwards engine notifications to the page's callbacks
///
/// A throwing callback is logged and skipped so later events still arrive.
struct JsHost<'a> {
    on_score_update: Option<&'a js_sys::Function>,
    on_game_over: Option<&'a js_sys::Function>,
}

impl GameHost for JsHost<'_> {
    fn on_score_update(&mut self, score: u32) {
        if let Some(callback) = self.on_score_update {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(score)) {
                log::warn!("onScoreUpdate threw: {:?}", e);
            }
        }
    }

    fn on_game_over(&mut self) {
        if let Some(callback) = self.on_game_over {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::warn!("onGameOver threw: {:?}", e);
            }
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Lane Hopper starting...");
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WebGame {
    state: Rc<RefCell<GameState>>,
    on_score_update: Option<js_sys::Function>,
    on_game_over: Option<js_sys::Function>,
    high_scores: HighScores,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; callbacks receive `(score)` and `()` respectively
    #[wasm_bindgen(constructor)]
    pub fn new(
        on_score_update: Option<js_sys::Function>,
        on_game_over: Option<js_sys::Function>,
    ) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(Settings::load(), seed);
        log::info!("Game initialized with seed: {}", seed);

        WebGame {
            state: Rc::new(RefCell::new(state)),
            on_score_update,
            on_game_over,
            high_scores: HighScores::load(),
        }
    }

    /// Queue a move ("forward", "backward", "left", "right")
    ///
    /// Returns false for unknown directions and rejected moves.
    #[wasm_bindgen(js_name = moveDirection)]
    pub fn move_direction(&self, direction: &str) -> bool {
        let Some(direction) = Direction::from_str(direction) else {
            log::warn!("Unknown direction: {}", direction);
            return false;
        };
        move_actor(&mut self.state.borrow_mut(), direction)
    }

    /// Advance to `timestamp` and return the frame as JSON
    pub fn tick(&mut self, timestamp: f64) -> Result<String, JsValue> {
        let mut events: Vec<GameEvent> = Vec::new();
        let frame = {
            let mut state = self.state.borrow_mut();
            tick(&mut state, timestamp, &mut events);
            FrameView::around(&state, VIEW_BEHIND, VIEW_AHEAD).to_json()
        };

        // State borrow is released so callbacks may call back into the game
        if events.contains(&GameEvent::GameOver) {
            self.record_score();
        }
        let mut host = JsHost {
            on_score_update: self.on_score_update.as_ref(),
            on_game_over: self.on_game_over.as_ref(),
        };
        for event in events {
            event.deliver(&mut host);
        }

        frame.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start over with a new world
    pub fn retry(&self) {
        self.state.borrow_mut().retry();
    }

    /// Highest lane reached this run
    pub fn score(&self) -> u32 {
        self.state.borrow().score()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.state.borrow().is_game_over()
    }

    /// Best score on the local leaderboard, if any
    #[wasm_bindgen(js_name = bestScore)]
    pub fn best_score(&self) -> Option<u32> {
        self.high_scores.top_score()
    }

    /// Current settings as JSON
    pub fn settings(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.borrow().settings)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Persist new settings and start a fresh game with them
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();

        let seed = js_sys::Date::now() as u64;
        *self.state.borrow_mut() = GameState::new(settings, seed);
        log::info!("Settings applied, new game with seed: {}", seed);
        Ok(())
    }

    /// Local leaderboard as JSON
    #[wasm_bindgen(js_name = highScores)]
    pub fn high_scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.high_scores).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Route arrow keys on the window to moves
    #[wasm_bindgen(js_name = bindKeyboard)]
    pub fn bind_keyboard(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let state = self.state.clone();

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(direction) = Direction::from_key(&event.key()) {
                // Keep arrows from scrolling the page
                event.prevent_default();
                move_actor(&mut state.borrow_mut(), direction);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

impl WebGame {
    fn record_score(&mut self) {
        let (score, seed) = {
            let state = self.state.borrow();
            (state.score(), state.rng_state.seed)
        };
        if let Some(rank) = self.high_scores.add_score(score, seed, js_sys::Date::now()) {
            log::info!("New high score #{}: {}", rank, score);
            self.high_scores.save();
        }
    }
}
