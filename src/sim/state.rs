//! Session state, phases, and the host-facing event queue
//!
//! `GameState` owns everything the simulation mutates. The host drives it
//! through the control methods and observes it by draining discrete
//! `GameEvent` values each frame - there are no callbacks, so the core stays
//! decoupled from any particular presentation layer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles::ParticleSystem;
use super::slicer::Slicer;
use super::target::Target;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Initial state, nothing simulates
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation suspended, all entity state retained
    Paused,
    /// Round ended; terminal until restart or menu
    GameOver,
}

/// Discrete notifications for the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Fires on every phase transition
    PhaseChanged(GamePhase),
    /// Fires whenever the score changes (and on reset)
    ScoreChanged(u64),
    /// Fires every tick while playing (and on reset)
    TimeChanged(f32),
    /// A target was cut; `combo` is the streak including this slice
    TargetSliced { points: u64, combo: u32 },
    /// A target expired or escaped unsliced
    TargetMissed { misses: u32 },
    /// Fires exactly once per round, at the Playing -> GameOver transition
    GameOver { score: u64, time: f32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub elapsed: f32,
    pub misses: u32,
    pub combo: u32,
    /// Monotone ramp over elapsed play time, >= 1
    pub difficulty: f32,
    /// Playfield size in display pixels
    pub bounds: Vec2,
    pub targets: Vec<Target>,
    pub particles: ParticleSystem,
    pub slicer: Slicer,
    /// Time accumulated since the last scheduled spawn
    pub spawn_timer: f32,
    /// Countdown to a probabilistic second spawn; cleared on reset, so it is
    /// trivially safe across restarts
    pub pending_spawn: Option<f32>,
    /// Screen shake intensity in [0, 1]; decays each tick, renderer samples it
    pub screen_shake: f32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            elapsed: 0.0,
            misses: 0,
            combo: 0,
            difficulty: 1.0,
            bounds: Vec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            targets: Vec::new(),
            particles: ParticleSystem::new(),
            slicer: Slicer::new(),
            spawn_timer: 0.0,
            pending_spawn: None,
            screen_shake: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Host reports the playfield size (display pixels). Clamped so spawn
    /// position ranges stay valid.
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width.max(300.0), height.max(300.0));
    }

    // === Session controls ===

    /// Begin a fresh round from any state
    pub fn start(&mut self) {
        self.reset();
        self.set_phase(GamePhase::Playing);
        log::info!("round started (seed {})", self.seed);
    }

    /// Suspend simulation; entity state is retained exactly
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Full reset and back into play
    pub fn restart(&mut self) {
        self.start();
    }

    /// Full reset and back to the menu
    pub fn go_to_menu(&mut self) {
        self.reset();
        self.set_phase(GamePhase::Menu);
    }

    // === Pointer input (append-only into the slicer buffer) ===

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.slicer.begin(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.slicer.extend(pos);
    }

    pub fn pointer_up(&mut self) {
        self.slicer.finish();
    }

    // === Events ===

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.push_event(GameEvent::PhaseChanged(phase));
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.elapsed = 0.0;
        self.misses = 0;
        self.combo = 0;
        self.difficulty = 1.0;
        self.spawn_timer = 0.0;
        self.pending_spawn = None;
        self.screen_shake = 0.0;
        self.targets.clear();
        self.particles.clear();
        self.slicer.clear();
        self.push_event(GameEvent::ScoreChanged(0));
        self.push_event(GameEvent::TimeChanged(0.0));
    }
}
