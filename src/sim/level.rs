/// Level construction: the "Logic Core" layout and its validation.
///
/// Geometry is authored data; the rules that govern it live in `domain`.
/// Validation runs before the world is touched: a zero cycle or a zero
/// hazard interval would make the clock arithmetic divide by zero, so
/// both are programmer errors rejected at construction time.

use std::fmt;

use crate::config::GameConfig;
use crate::domain::hazard::Hazard;
use crate::domain::phase::PhaseClock;
use crate::domain::platform::{Platform, PlatformKind};
use crate::domain::player::Player;
use super::world::{Checkpoint, Decoration, Scene, WorldState};

/// Frames per full phase cycle (~3 seconds at 60 steps/second).
pub const CYCLE_DURATION: u64 = 180;

/// Where the player first appears.
pub const START_POS: (f32, f32) = (100.0, 600.0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    ZeroCycleDuration,
    ZeroHazardInterval { index: usize },
    WindowExceedsInterval { index: usize },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::ZeroCycleDuration => {
                write!(f, "phase cycle duration must be > 0")
            }
            LevelError::ZeroHazardInterval { index } => {
                write!(f, "hazard {index}: interval must be > 0")
            }
            LevelError::WindowExceedsInterval { index } => {
                write!(f, "hazard {index}: active window exceeds interval")
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Build the Logic Core into `world` and spawn the player.
pub fn load_level(world: &mut WorldState, config: &GameConfig) -> Result<(), LevelError> {
    let platforms = build_platforms();
    let hazards = build_hazards();
    validate(CYCLE_DURATION, &hazards)?;

    world.clock = PhaseClock::new(CYCLE_DURATION);
    world.time = 0;
    world.platforms = platforms;
    world.hazards = hazards;
    world.checkpoints = vec![
        Checkpoint::new(2100.0, 100.0, 1),
        Checkpoint::new(4700.0, 200.0, 2),
    ];
    world.decorations = vec![
        Decoration { x: 300.0, y: 550.0, text: "OBSERVE THE CYCLE" },
        Decoration { x: 2100.0, y: 50.0, text: "SYNC COMPLETE" },
        Decoration { x: 4700.0, y: 150.0, text: "PROCESSOR NODE" },
        Decoration { x: 7500.0, y: 400.0, text: "LOGIC VERIFIED" },
    ];
    world.active_checkpoint = None;
    world.spawn = START_POS;
    world.target_x = 7800.0;
    world.completed = false;
    world.camera.x = 0.0;

    let mut player = Player::new(START_POS.0, START_POS.1);
    player.gravity = config.tuning.gravity;
    player.speed = config.tuning.run_speed;
    player.climb_speed = config.tuning.climb_speed;
    player.jump_force = config.tuning.jump_force;
    player.stun_frames = config.tuning.stun_frames;
    player.attack_frames = config.tuning.attack_frames;
    world.player = Some(player);

    world.scene = Scene::Playing;
    world.paused = false;
    Ok(())
}

fn validate(cycle_duration: u64, hazards: &[Hazard]) -> Result<(), LevelError> {
    if cycle_duration == 0 {
        return Err(LevelError::ZeroCycleDuration);
    }
    for (index, hz) in hazards.iter().enumerate() {
        if hz.interval == 0 {
            return Err(LevelError::ZeroHazardInterval { index });
        }
        if hz.duration > hz.interval {
            return Err(LevelError::WindowExceedsInterval { index });
        }
    }
    Ok(())
}

fn build_platforms() -> Vec<Platform> {
    let mut platforms = Vec::new();

    // ── Mechanic introduction: phasing ──
    // Ground
    platforms.push(Platform::fixed(0.0, 700.0, 400.0, 200.0, PlatformKind::Static));
    // Phase A platform (solid first half of the cycle)
    platforms.push(Platform::fixed(500.0, 600.0, 100.0, 20.0, PlatformKind::PhaseA));
    // Phase B platform (solid second half)
    platforms.push(Platform::fixed(700.0, 500.0, 100.0, 20.0, PlatformKind::PhaseB));
    // Safe landing
    platforms.push(Platform::fixed(900.0, 500.0, 200.0, 20.0, PlatformKind::Static));

    // ── Section 1: the binary staircase ──
    // A climb where every other step disappears. Rushing means falling.
    for i in 0..6 {
        let kind = if i % 2 == 0 { PlatformKind::PhaseA } else { PlatformKind::PhaseB };
        platforms.push(Platform::fixed(
            1200.0 + i as f32 * 120.0,
            500.0 - i as f32 * 60.0,
            80.0,
            20.0,
            kind,
        ));
    }
    // Safe platform at the top
    platforms.push(Platform::fixed(2000.0, 100.0, 300.0, 20.0, PlatformKind::Static));

    // ── Section 2: the sequence lasers ──
    // Long bridge under the laser wave.
    platforms.push(Platform::fixed(2300.0, 100.0, 1400.0, 20.0, PlatformKind::Static));

    // ── Section 3: the logic gap ──
    // A moving platform that is also phased: catch it solid AND inbound.
    platforms.push(Platform::fixed(3800.0, 200.0, 200.0, 20.0, PlatformKind::Static));
    platforms.push(Platform::moving(
        4000.0, 200.0, 100.0, 20.0,
        PlatformKind::MovingPhaseA,
        4000.0, 4500.0, 2.0,
    ));
    platforms.push(Platform::fixed(4600.0, 200.0, 200.0, 20.0, PlatformKind::Static));

    // ── Section 4: the memory wall ──
    // A vertical drop through a grid where only the phase A path is real.
    platforms.push(Platform::fixed(5000.0, 200.0, 100.0, 20.0, PlatformKind::Static));
    let (sx, sy) = (5200.0, 200.0);
    // Row 1
    platforms.push(Platform::fixed(sx, sy + 100.0, 80.0, 20.0, PlatformKind::PhaseB));
    platforms.push(Platform::fixed(sx + 150.0, sy + 100.0, 80.0, 20.0, PlatformKind::PhaseA));
    // Row 2
    platforms.push(Platform::fixed(sx + 50.0, sy + 250.0, 80.0, 20.0, PlatformKind::PhaseA));
    platforms.push(Platform::fixed(sx + 200.0, sy + 250.0, 80.0, 20.0, PlatformKind::PhaseB));
    // Row 3
    platforms.push(Platform::fixed(sx, sy + 400.0, 80.0, 20.0, PlatformKind::PhaseB));
    platforms.push(Platform::fixed(sx + 150.0, sy + 400.0, 80.0, 20.0, PlatformKind::PhaseA));
    // Floor of the drop
    platforms.push(Platform::fixed(5200.0, 700.0, 600.0, 20.0, PlatformKind::Static));

    // ── Section 5: the final calculation ──
    // Alternating phase platforms with head-height lasers in the gaps.
    for i in 0..5 {
        let px = 6000.0 + i as f32 * 200.0;
        let kind = if i % 2 == 0 { PlatformKind::PhaseA } else { PlatformKind::PhaseB };
        platforms.push(Platform::fixed(px, 600.0, 100.0, 20.0, kind));
    }

    // ── Exit shelf ──
    platforms.push(Platform::fixed(7200.0, 600.0, 800.0, 200.0, PlatformKind::Static));

    platforms
}

fn build_hazards() -> Vec<Hazard> {
    let mut hazards = Vec::new();

    // Sequence lasers over the bridge: a wave firing 1 → 2 → 3 → 4 → 5.
    // Run with the wave or wait for the reset.
    for i in 0..5u64 {
        hazards.push(Hazard::laser_vertical(
            2500.0 + i as f32 * 250.0,
            0.0,
            100.0, // reaches down to the bridge
            200,
            i * 30, // sequential firing
            60,
        ));
    }

    // Final calculation: lasers at jump height between the platforms,
    // alternating so the beam fires while the destination is solid.
    for i in 0..5u64 {
        let px = 6000.0 + i as f32 * 200.0;
        hazards.push(Hazard::laser_horizontal(
            px + 100.0, // the gap between platforms
            550.0,
            100.0,
            120,
            if i % 2 == 0 { 0 } else { 60 },
            60,
        ));
    }

    hazards
}
