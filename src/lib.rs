//! Slice Rush - a browser arcade slicing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (targets, slicer trail, particles, game state)
//! - `renderer`: Canvas 2D rendering (wasm only)
//! - `audio`: Procedurally synthesized sound effects (playback is wasm only)
//! - `settings`: Player preferences

pub mod audio;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use settings::{QualityPreset, Settings};

/// Game tuning constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Ceiling on a single tick's delta time (bounds step size under frame drops)
    pub const MAX_TICK_DT: f32 = 1.0 / 30.0;

    /// Playfield fallback size before the host reports real bounds
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Target defaults
    pub const TARGET_MIN_RADIUS: f32 = 30.0;
    pub const TARGET_MAX_RADIUS: f32 = 50.0;
    pub const TARGET_MIN_LIFETIME: f32 = 4.0;
    pub const TARGET_MAX_LIFETIME: f32 = 8.0;
    pub const TARGET_MAX_SPIN: f32 = 5.0;
    /// Downward acceleration on targets (pixels/s²)
    pub const TARGET_GRAVITY: f32 = 150.0;
    /// Velocity damping on a side-wall bounce
    pub const BOUNCE_DAMP_X: f32 = 0.7;
    /// Velocity damping on a top-wall bounce
    pub const BOUNCE_DAMP_Y: f32 = 0.6;

    /// Slicer trail bounds
    pub const TRAIL_MAX_POINTS: usize = 50;
    pub const TRAIL_LIFETIME: f32 = 0.3;

    /// Particle defaults
    pub const MAX_PARTICLES: usize = 500;
    pub const PARTICLE_GRAVITY: f32 = 300.0;
    /// Multiplicative velocity drag per tick
    pub const PARTICLE_DRAG: f32 = 0.98;
    /// Initial velocity spread, uniform per axis (pixels/s)
    pub const PARTICLE_SPREAD: f32 = 200.0;
    pub const PARTICLE_MIN_LIFE: f32 = 0.5;
    pub const PARTICLE_MAX_LIFE: f32 = 1.5;
    pub const PARTICLE_MIN_SIZE: f32 = 2.0;
    pub const PARTICLE_MAX_SIZE: f32 = 6.0;
    /// Burst sizes for slice and miss effects
    pub const SLICE_BURST: usize = 20;
    pub const MISS_BURST: usize = 10;

    /// Misses allowed before the round ends
    pub const MAX_MISSES: u32 = 3;

    /// Spawn interval bounds (seconds); the interval shrinks toward the
    /// minimum as difficulty rises
    pub const MIN_SPAWN_DELAY: f32 = 0.2;
    pub const MAX_SPAWN_DELAY: f32 = 1.2;
    /// Difficulty factor gain per second of play
    pub const DIFFICULTY_RAMP: f32 = 0.15;
    /// Spawn speed range before difficulty scaling (pixels/s)
    pub const SPAWN_MIN_SPEED: f32 = 200.0;
    pub const SPAWN_MAX_SPEED: f32 = 500.0;

    /// Probabilistic second spawn: armed above this difficulty, with this
    /// chance, landing this many seconds after the scheduled spawn
    pub const DOUBLE_SPAWN_THRESHOLD: f32 = 2.0;
    pub const DOUBLE_SPAWN_CHANCE: f64 = 0.3;
    pub const DOUBLE_SPAWN_DELAY: f32 = 0.1;

    /// Scoring
    pub const BASE_SCORE: u64 = 100;
    pub const COMBO_BONUS_STEP: f32 = 0.15;
    pub const COMBO_BONUS_CAP: f32 = 3.0;
    pub const DIFFICULTY_BONUS: f32 = 0.3;

    /// Screen shake (decaying sim-state scalar, sampled by the renderer)
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_MISS_BUMP: f32 = 0.4;
    pub const SHAKE_MAX_OFFSET: f32 = 8.0;
}
