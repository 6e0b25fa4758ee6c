/// The global phase clock: a free-running frame counter producing a
/// two-valued cyclic phase. Phase-gated platforms are solid only while
/// the clock is in their half of the cycle.
///
/// Phase is derived, never stored: it is a pure function of
/// `(global_timer, cycle_duration)`, so collision and rendering can never
/// disagree about which platform group is currently solid.

/// Which half of the global cycle we are in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CyclePhase {
    A,
    B,
}

#[derive(Clone, Debug)]
pub struct PhaseClock {
    /// Monotonic frame counter. Advances every step, unconditionally.
    pub global_timer: u64,
    /// Frames per full A→B→A cycle. Validated > 0 at level construction.
    pub cycle_duration: u64,
}

impl PhaseClock {
    pub fn new(cycle_duration: u64) -> Self {
        PhaseClock { global_timer: 0, cycle_duration }
    }

    /// Advance one simulation step. Runs even while the player is stunned
    /// or mid-respawn — the cycle never waits for anyone.
    pub fn advance(&mut self) {
        self.global_timer += 1;
    }

    /// Current phase. Pure, O(1).
    #[inline]
    pub fn current_phase(&self) -> CyclePhase {
        Self::phase_at(self.global_timer, self.cycle_duration)
    }

    /// Phase at an arbitrary frame count. A for the first half of each
    /// cycle, B for the second.
    #[inline]
    pub fn phase_at(timer: u64, cycle_duration: u64) -> CyclePhase {
        if timer % cycle_duration < cycle_duration / 2 {
            CyclePhase::A
        } else {
            CyclePhase::B
        }
    }

    /// Fraction of the current cycle elapsed, 0.0..1.0. HUD only.
    pub fn cycle_progress(&self) -> f32 {
        (self.global_timer % self.cycle_duration) as f32 / self.cycle_duration as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_pure_function_of_timer() {
        for t in 0..1000u64 {
            let expected = if t % 180 < 90 { CyclePhase::A } else { CyclePhase::B };
            assert_eq!(PhaseClock::phase_at(t, 180), expected, "t={t}");
        }
    }

    #[test]
    fn cycle_180_scenario() {
        let mut clock = PhaseClock::new(180);
        // t = 0..89 → A
        for t in 0..90u64 {
            assert_eq!(clock.current_phase(), CyclePhase::A, "t={t}");
            clock.advance();
        }
        // t = 90..179 → B
        for t in 90..180u64 {
            assert_eq!(clock.current_phase(), CyclePhase::B, "t={t}");
            clock.advance();
        }
        // t = 180 → wraps back to A
        assert_eq!(clock.global_timer, 180);
        assert_eq!(clock.current_phase(), CyclePhase::A);
    }

    #[test]
    fn advance_is_unconditional() {
        let mut clock = PhaseClock::new(180);
        for _ in 0..500 { clock.advance(); }
        assert_eq!(clock.global_timer, 500);
    }

    #[test]
    fn cycle_progress_range() {
        let mut clock = PhaseClock::new(100);
        assert!((clock.cycle_progress() - 0.0).abs() < 1e-6);
        for _ in 0..50 { clock.advance(); }
        assert!((clock.cycle_progress() - 0.5).abs() < 1e-6);
        for _ in 0..50 { clock.advance(); }
        assert!((clock.cycle_progress() - 0.0).abs() < 1e-6);
    }
}
