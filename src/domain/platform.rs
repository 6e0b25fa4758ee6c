/// Platforms: static, phase-gated, and moving variants.
/// Solidity is derived from kind + global phase, not stored as a flag,
/// so the physics pass and the ghost visualization can never drift apart.

use super::phase::CyclePhase;

/// Angular rate of the moving-platform sweep, radians per frame.
const SWEEP_RATE: f32 = 0.02;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlatformKind {
    Static,
    PhaseA,
    PhaseB,
    MovingPhaseA,
    MovingPhaseB,
}

impl PlatformKind {
    /// Which phase this kind is gated on. None = always solid.
    pub fn gating_phase(self) -> Option<CyclePhase> {
        match self {
            PlatformKind::Static => None,
            PlatformKind::PhaseA | PlatformKind::MovingPhaseA => Some(CyclePhase::A),
            PlatformKind::PhaseB | PlatformKind::MovingPhaseB => Some(CyclePhase::B),
        }
    }

    pub fn is_moving(self) -> bool {
        matches!(self, PlatformKind::MovingPhaseA | PlatformKind::MovingPhaseB)
    }
}

#[derive(Clone, Debug)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: PlatformKind,
    /// Sweep bounds for moving kinds. Unused (zero) on fixed platforms.
    pub start_x: f32,
    pub end_x: f32,
    /// Authored alongside the sweep bounds; the motion law is a fixed
    /// sinusoid and does not read it.
    #[allow(dead_code)]
    pub speed: f32,
}

impl Platform {
    pub fn fixed(x: f32, y: f32, w: f32, h: f32, kind: PlatformKind) -> Self {
        Platform { x, y, w, h, kind, start_x: 0.0, end_x: 0.0, speed: 0.0 }
    }

    pub fn moving(x: f32, y: f32, w: f32, h: f32, kind: PlatformKind,
                  start_x: f32, end_x: f32, speed: f32) -> Self {
        Platform { x, y, w, h, kind, start_x, end_x, speed }
    }

    /// Is this platform solid under the given phase?
    /// A non-solid ("ghost") platform is rendered but inert to collision.
    #[inline]
    pub fn is_solid(&self, phase: CyclePhase) -> bool {
        match self.kind.gating_phase() {
            None => true,
            Some(p) => p == phase,
        }
    }

    /// Reposition a moving platform for the given frame. Closed-form
    /// sine sweep between start_x and end_x — bounded and drift-free,
    /// unlike integrated velocity. Fixed kinds are untouched.
    pub fn tick_motion(&mut self, frame: u64) {
        if !self.kind.is_moving() { return; }
        let range = (self.end_x - self.start_x) / 2.0;
        let center = self.start_x + range;
        self.x = center + (frame as f32 * SWEEP_RATE).sin() * range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_is_always_solid() {
        let p = Platform::fixed(0.0, 0.0, 100.0, 20.0, PlatformKind::Static);
        assert!(p.is_solid(CyclePhase::A));
        assert!(p.is_solid(CyclePhase::B));
    }

    #[test]
    fn phase_a_solid_only_in_phase_a() {
        let p = Platform::fixed(0.0, 0.0, 100.0, 20.0, PlatformKind::PhaseA);
        assert!(p.is_solid(CyclePhase::A));
        assert!(!p.is_solid(CyclePhase::B));
    }

    #[test]
    fn phase_b_solid_only_in_phase_b() {
        let p = Platform::fixed(0.0, 0.0, 100.0, 20.0, PlatformKind::PhaseB);
        assert!(!p.is_solid(CyclePhase::A));
        assert!(p.is_solid(CyclePhase::B));
    }

    #[test]
    fn moving_kinds_follow_their_phase() {
        let a = Platform::moving(0.0, 0.0, 100.0, 20.0, PlatformKind::MovingPhaseA,
                                 0.0, 500.0, 2.0);
        let b = Platform::moving(0.0, 0.0, 100.0, 20.0, PlatformKind::MovingPhaseB,
                                 0.0, 500.0, 2.0);
        assert!(a.is_solid(CyclePhase::A) && !a.is_solid(CyclePhase::B));
        assert!(b.is_solid(CyclePhase::B) && !b.is_solid(CyclePhase::A));
    }

    #[test]
    fn sweep_stays_within_bounds() {
        let mut p = Platform::moving(4000.0, 200.0, 100.0, 20.0,
                                     PlatformKind::MovingPhaseA,
                                     4000.0, 4500.0, 2.0);
        for frame in 0..2000u64 {
            p.tick_motion(frame);
            assert!(p.x >= 4000.0 - 1e-3 && p.x <= 4500.0 + 1e-3,
                    "frame {frame}: x = {}", p.x);
        }
    }

    #[test]
    fn sweep_crosses_center_at_zero() {
        let mut p = Platform::moving(4000.0, 200.0, 100.0, 20.0,
                                     PlatformKind::MovingPhaseA,
                                     4000.0, 4500.0, 2.0);
        p.tick_motion(0);
        assert!((p.x - 4250.0).abs() < 1e-3);
    }

    #[test]
    fn fixed_platform_ignores_motion_tick() {
        let mut p = Platform::fixed(500.0, 600.0, 100.0, 20.0, PlatformKind::PhaseA);
        p.tick_motion(123);
        assert_eq!(p.x, 500.0);
    }
}
