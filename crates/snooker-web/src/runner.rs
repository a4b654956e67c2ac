use snooker_engine::{
    BallBuffer, FixedTimestep, GameConfig, InputEvent, InputQueue, ProtocolLayout, SnookerGame,
};

/// Wires the table into the browser frame loop.
///
/// `lib.rs` keeps one runner in a `thread_local!` and exposes free functions
/// via `#[wasm_bindgen]`, because wasm-bindgen cannot export the runner's
/// borrowing accessors directly.
pub struct GameRunner {
    game: SnookerGame,
    input: InputQueue,
    timestep: FixedTimestep,
    layout: ProtocolLayout,
    balls: BallBuffer,
    /// Flat buffer of hit-sound indices for the page to read.
    sound_buffer: Vec<u8>,
    alerts: String,
}

impl GameRunner {
    /// Build the table and rack up. `wall_ms` is the wall-clock time now.
    pub fn new(config: GameConfig, wall_ms: f64) -> Self {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let balls = BallBuffer::with_capacity(config.max_balls);
        let sound_buffer = Vec::with_capacity(config.max_sounds);

        let mut game = SnookerGame::new(config, wall_ms);
        game.init();

        let mut runner = Self {
            game,
            input: InputQueue::new(),
            timestep,
            layout,
            balls,
            sound_buffer,
            alerts: String::new(),
        };
        runner.snapshot();
        runner
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: as many fixed steps as `dt` covers, then snapshot the
    /// table for the page. `wall_ms` is the wall-clock time of this frame.
    pub fn tick(&mut self, dt: f32, wall_ms: f64) {
        self.game.clear_frame_data();
        self.game.set_wall_clock(wall_ms);

        let steps = self.timestep.accumulate(dt);
        // Input waits for a frame that actually steps, and is seen once
        if steps > 0 {
            let input = self.input.drain();
            self.game.update(&input);
            for _ in 1..steps {
                self.game.update(&[]);
            }
        }

        self.snapshot();
    }

    fn snapshot(&mut self) {
        self.game.write_balls(&mut self.balls);

        self.sound_buffer.clear();
        for sound in self.game.sounds() {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.alerts = self.game.alerts_text();
    }

    // ---- Pointer accessors for buffer reads ----

    pub fn balls_ptr(&self) -> *const f32 {
        self.balls.as_ptr()
    }

    pub fn ball_count(&self) -> u32 {
        self.balls.len() as u32
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.game.events().as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.game.events().len() as u32
    }

    // ---- Table state ----

    pub fn score(&self) -> i32 {
        self.game.score()
    }

    pub fn alerts_text(&self) -> &str {
        &self.alerts
    }

    pub fn cue_ball_present(&self) -> bool {
        self.game.has_cue_ball()
    }

    pub fn mode(&self) -> u32 {
        self.game.state().mode().number()
    }

    pub fn table_width(&self) -> f32 {
        self.game.state().layout().width
    }

    pub fn table_height(&self) -> f32 {
        self.game.state().layout().height
    }

    pub fn pointer_x(&self) -> f32 {
        self.game.pointer().x
    }

    pub fn pointer_y(&self) -> f32 {
        self.game.pointer().y
    }

    pub fn is_charging(&self) -> bool {
        self.game.is_charging()
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_balls(&self) -> u32 {
        self.layout.max_balls as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }
}
