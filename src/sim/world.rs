/// WorldState: the complete snapshot of the running level.
///
/// Ownership: the per-frame step pass is the only mutator. The renderer
/// and sound layers read events and state, never write. Solidity and
/// hazard activity are derived from the counters here, never cached.
///
/// Two counters advance together every step:
///   - `clock.global_timer` — gates platform solidity (phase A/B)
///   - `time`               — drives hazard windows and platform sweeps
/// They are authored against the same 60 Hz step but are independent
/// cycles; hazards never read the phase.

use crate::domain::hazard::Hazard;
use crate::domain::phase::PhaseClock;
use crate::domain::platform::Platform;
use crate::domain::player::Player;

/// Which top-level screen the game is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scene {
    Title,
    Playing,
    Complete,
}

/// Smoothed scalar follow of the player for horizontal scrolling.
/// No dead zone, no hard logic: a fixed lookahead and exponential ease.
#[derive(Clone, Debug)]
pub struct Camera {
    pub x: f32,
}

const CAMERA_LOOKAHEAD: f32 = 300.0;
const CAMERA_SMOOTHING: f32 = 0.08;

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0.0 }
    }

    pub fn follow(&mut self, target_x: f32) {
        let target = target_x - CAMERA_LOOKAHEAD;
        self.x += (target - self.x) * CAMERA_SMOOTHING;
        if self.x < 0.0 {
            self.x = 0.0;
        }
    }
}

/// One-way progress marker. Activation is monotonic: once true, only a
/// full level reset reverts it.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub x: f32,
    pub y: f32,
    pub id: u32,
    pub active: bool,
}

impl Checkpoint {
    pub fn new(x: f32, y: f32, id: u32) -> Self {
        Checkpoint { x, y, id, active: false }
    }
}

/// Decorative world-space text. Render-only.
#[derive(Clone, Debug)]
pub struct Decoration {
    pub x: f32,
    pub y: f32,
    pub text: &'static str,
}

pub struct WorldState {
    // ── Clocks ──
    pub clock: PhaseClock,
    /// Shared frame counter for hazards and platform sweeps.
    pub time: u64,

    // ── Level data ──
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub checkpoints: Vec<Checkpoint>,
    pub decorations: Vec<Decoration>,
    /// Index of the most recently activated checkpoint, if any.
    pub active_checkpoint: Option<usize>,
    /// Fixed start position used when no checkpoint is active.
    pub spawn: (f32, f32),
    /// Reaching this x completes the level.
    pub target_x: f32,

    // ── Entities ──
    /// None until the level spawns one; the step and render passes no-op
    /// gracefully without it.
    pub player: Option<Player>,

    // ── Meta ──
    pub scene: Scene,
    pub paused: bool,
    /// Completion latch: the host signal fires exactly once.
    pub completed: bool,

    // ── Camera ──
    pub camera: Camera,
}

impl WorldState {
    pub fn new() -> Self {
        WorldState {
            clock: PhaseClock::new(180),
            time: 0,
            platforms: vec![],
            hazards: vec![],
            checkpoints: vec![],
            decorations: vec![],
            active_checkpoint: None,
            spawn: (100.0, 600.0),
            target_x: 8000.0,
            player: None,
            scene: Scene::Title,
            paused: false,
            completed: false,
            camera: Camera::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_eases_toward_lookahead_point() {
        let mut cam = Camera::new();
        cam.x = 1000.0;
        cam.follow(2000.0);
        // Target is 1700; one step covers 8% of the gap.
        assert!((cam.x - (1000.0 + 700.0 * 0.08)).abs() < 1e-3);
    }

    #[test]
    fn camera_never_goes_negative() {
        let mut cam = Camera::new();
        for _ in 0..100 {
            cam.follow(100.0); // target would be -200
        }
        assert_eq!(cam.x, 0.0);
    }

    #[test]
    fn camera_converges_on_static_target() {
        let mut cam = Camera::new();
        cam.x = 5000.0;
        for _ in 0..500 {
            cam.follow(2000.0);
        }
        assert!((cam.x - 1700.0).abs() < 1.0);
    }
}
