/// Hazards: lasers with periodic activation windows.
///
/// Activation is a pure function of the shared frame counter:
/// `active(t) = ((t + offset) % interval) < duration`. Hazards carry no
/// memory and never look at the player, so runs are deterministic and
/// replayable regardless of play. Coordinated waves (sequential firing)
/// are authored purely through offsets.

/// Half-thickness of a laser beam for hit testing, world units.
const BEAM_HALF_WIDTH: f32 = 10.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HazardKind {
    /// Beam from (x, y) downward for `h` units. Hits on center-x proximity.
    LaserVertical,
    /// Beam from (x, y) rightward for `w` units. Hits on center-y proximity.
    LaserHorizontal,
}

#[derive(Clone, Debug)]
pub struct Hazard {
    pub kind: HazardKind,
    pub x: f32,
    pub y: f32,
    /// Horizontal reach (LaserHorizontal). Zero for vertical beams.
    pub w: f32,
    /// Vertical reach (LaserVertical). Zero for horizontal beams.
    pub h: f32,
    /// Full cycle length in frames. Validated > 0 at level construction.
    pub interval: u64,
    /// Position in the cycle where the window opens.
    pub offset: u64,
    /// Window length in frames. Validated <= interval.
    pub duration: u64,
}

impl Hazard {
    pub fn laser_vertical(x: f32, y: f32, h: f32,
                          interval: u64, offset: u64, duration: u64) -> Self {
        Hazard { kind: HazardKind::LaserVertical, x, y, w: 0.0, h,
                 interval, offset, duration }
    }

    pub fn laser_horizontal(x: f32, y: f32, w: f32,
                            interval: u64, offset: u64, duration: u64) -> Self {
        Hazard { kind: HazardKind::LaserHorizontal, x, y, w, h: 0.0,
                 interval, offset, duration }
    }

    /// Is the window open at frame `t`? Pure, recomputed every frame.
    #[inline]
    pub fn is_active(&self, t: u64) -> bool {
        (t + self.offset) % self.interval < self.duration
    }

    /// Does an active beam touch a hitbox spanning `(left, top)..(right,
    /// bottom)`? Lasers are thin: the test uses the hitbox center against
    /// a ±10 band around the beam line, matching the beam visual.
    pub fn hits(&self, left: f32, top: f32, right: f32, bottom: f32) -> bool {
        let cx = left + (right - left) / 2.0;
        let cy = top + (bottom - top) / 2.0;
        match self.kind {
            HazardKind::LaserVertical => {
                cx > self.x - BEAM_HALF_WIDTH && cx < self.x + BEAM_HALF_WIDTH
                    && bottom > self.y && top < self.y + self.h
            }
            HazardKind::LaserHorizontal => {
                cx > self.x && cx < self.x + self.w
                    && cy > self.y - BEAM_HALF_WIDTH && cy < self.y + BEAM_HALF_WIDTH
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_formula() {
        let hz = Hazard::laser_vertical(2500.0, 0.0, 100.0, 200, 30, 60);
        for t in 0..1000u64 {
            let expected = (t + 30) % 200 < 60;
            assert_eq!(hz.is_active(t), expected, "t={t}");
        }
    }

    #[test]
    fn wave_scenario_interval_200_offset_30() {
        let hz = Hazard::laser_vertical(2500.0, 0.0, 100.0, 200, 30, 60);
        // (0+30) % 200 = 30 < 60 → active at t=0
        assert!(hz.is_active(0));
        // (100+30) % 200 = 130 → inactive at t=100
        assert!(!hz.is_active(100));
    }

    #[test]
    fn sequential_offsets_fire_in_order() {
        let wave: Vec<Hazard> = (0..5)
            .map(|i| Hazard::laser_vertical(2500.0 + i as f32 * 250.0, 0.0, 100.0,
                                            200, i * 30, 60))
            .collect();
        // Laser 0 fires at the top of each cycle, 60 frames long.
        assert!(wave[0].is_active(0));
        assert!(wave[0].is_active(59));
        assert!(!wave[0].is_active(60));
        // Each later laser opens where (t + 30i) % 200 wraps to 0,
        // i.e. t = 200 - 30i: the wave marches down the corridor.
        for i in 1..5u64 {
            let open_t = 200 - 30 * i;
            assert!(wave[i as usize].is_active(open_t));
            assert!(!wave[i as usize].is_active(open_t - 1));
        }
    }

    #[test]
    fn vertical_laser_hits_on_center_band() {
        let hz = Hazard::laser_vertical(2500.0, 0.0, 100.0, 200, 0, 200);
        // Hitbox centered on the beam, overlapping its reach.
        assert!(hz.hits(2482.0, 40.0, 2518.0, 100.0));
        // Center outside the ±10 band.
        assert!(!hz.hits(2520.0, 40.0, 2556.0, 100.0));
        // Entirely below the beam's reach.
        assert!(!hz.hits(2482.0, 120.0, 2518.0, 180.0));
    }

    #[test]
    fn horizontal_laser_hits_on_center_band() {
        let hz = Hazard::laser_horizontal(6100.0, 550.0, 100.0, 120, 0, 120);
        // Center inside the span, center-y within ±10 of the line.
        assert!(hz.hits(6120.0, 520.0, 6156.0, 580.0));
        // Center-y too far below the line.
        assert!(!hz.hits(6120.0, 580.0, 6156.0, 640.0));
        // Center-x left of the span.
        assert!(!hz.hits(6040.0, 520.0, 6076.0, 580.0));
    }

    #[test]
    fn activation_ignores_everything_but_the_counter() {
        let hz = Hazard::laser_horizontal(0.0, 0.0, 100.0, 120, 60, 60);
        let a = hz.is_active(500);
        // Same frame queried again → same answer; no hidden state.
        assert_eq!(hz.is_active(500), a);
    }
}
