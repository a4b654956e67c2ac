pub mod runner;

pub use runner::GameRunner;

use std::cell::RefCell;

use snooker_engine::{GameConfig, InputEvent, Mode, PROTOCOL_VERSION};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner. Calls made before `game_init` are
/// reported to the console and ignored.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                web_sys::console::warn_1(&"snooker: game not initialized, call game_init() first".into());
                None
            }
        }
    })
}

fn start(config: GameConfig) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = GameRunner::new(config, js_sys::Date::now());
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("snooker: initialized");
}

#[wasm_bindgen]
pub fn game_init() {
    start(GameConfig::default());
}

/// Start with a JSON config. Missing fields keep their defaults; a malformed
/// document is logged and the defaults are used.
#[wasm_bindgen]
pub fn game_init_with_config(json: &str) {
    start(GameConfig::from_json_or_default(json));
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt, js_sys::Date::now()));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

/// Mode buttons on the page. Unknown numbers are ignored.
#[wasm_bindgen]
pub fn game_select_mode(mode: u32) {
    match Mode::from_number(mode) {
        Some(mode) => {
            with_runner(|r| r.push_input(InputEvent::SelectMode { mode }));
        }
        None => log::warn!("Unknown game mode {}", mode),
    }
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_balls_ptr() -> *const f32 {
    with_runner(|r| r.balls_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_ball_count() -> u32 {
    with_runner(|r| r.ball_count()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_runner(|r| r.sound_events_len()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_score() -> i32 {
    with_runner(|r| r.score()).unwrap_or_default()
}

/// Visible alerts, oldest first, newline separated.
#[wasm_bindgen]
pub fn get_alerts_text() -> String {
    with_runner(|r| r.alerts_text().to_owned()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_cue_ball_present() -> bool {
    with_runner(|r| r.cue_ball_present()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_mode() -> u32 {
    with_runner(|r| r.mode()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_table_width() -> f32 {
    with_runner(|r| r.table_width()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_table_height() -> f32 {
    with_runner(|r| r.table_height()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_pointer_x() -> f32 {
    with_runner(|r| r.pointer_x()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_pointer_y() -> f32 {
    with_runner(|r| r.pointer_y()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_is_charging() -> bool {
    with_runner(|r| r.is_charging()).unwrap_or_default()
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_protocol_version() -> f32 {
    PROTOCOL_VERSION
}

#[wasm_bindgen]
pub fn get_max_balls() -> u32 {
    with_runner(|r| r.max_balls()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_runner(|r| r.max_sounds()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or_default()
}
