/// Collision resolution between the player's hitbox and solid platforms.
///
/// Two independent rules, run in one pass over the platforms in their
/// authored order:
///
///   1. PUSH-OUT — an overlapping platform whose top lies far enough
///      above the hitbox bottom (`top + max(15, vy + 5)`, a velocity-
///      scaled threshold) resolves as a horizontal correction: displace
///      by the smaller of the left/right overlaps, zero `vx`, and refresh
///      the horizontal bounds before testing the next platform. There is
///      no vertical snap here.
///
///   2. GROUND HEIGHT — independently, every platform whose horizontal
///      extent overlaps the hitbox and whose top is no more than 35 units
///      above the hitbox bottom is a landing candidate while the player
///      is not rising. `ground_y` becomes the highest candidate top, or a
///      large sentinel when none qualify. The player's own vertical snap
///      against `ground_y` happens in its state machine, not here.
///
/// Earlier push-outs deliberately affect later platform tests within the
/// same frame; the authored platform order is part of the behavior.
///
/// Moving platforms get no passenger logic: a rider is only kept aloft by
/// being re-detected as grounded against the platform's new position each
/// frame, and can be outrun by a fast sweep.

use super::phase::CyclePhase;
use super::platform::Platform;
use super::player::Player;

/// `ground_y` sentinel: no qualifying floor anywhere below.
pub const GROUND_NONE: f32 = 2000.0;

/// Slack below a platform top within which it still counts as a floor.
const LANDING_SLACK: f32 = 35.0;

/// Resolve the player against every currently-solid platform and derive
/// `ground_y` for this frame.
pub fn resolve(player: &mut Player, platforms: &[Platform], phase: CyclePhase) {
    let hb = player.hitbox;
    let mut left = player.x + hb.offset_x;
    let mut right = left + hb.w;
    let top = player.y + hb.offset_y;
    let bottom = top + hb.h;
    let mut ground = GROUND_NONE;

    for plat in platforms {
        // Ghost platforms are inert to physics.
        if !plat.is_solid(phase) {
            continue;
        }

        let plat_right = plat.x + plat.w;

        if right > plat.x && left < plat_right && bottom > plat.y && top < plat.y + plat.h {
            let floor_threshold = plat.y + (player.vy + 5.0).max(15.0);
            if bottom > floor_threshold {
                let overlap_l = right - plat.x;
                let overlap_r = plat_right - left;
                if overlap_l < overlap_r {
                    player.x -= overlap_l;
                } else {
                    player.x += overlap_r;
                }
                player.vx = 0.0;
                left = player.x + hb.offset_x;
                right = left + hb.w;
            }
        }

        // Floor detection, independent of the push-out above.
        if right > plat.x && left < plat_right {
            if bottom <= plat.y + LANDING_SLACK && player.vy >= 0.0 {
                if plat.y < ground {
                    ground = plat.y;
                }
            }
        }
    }

    player.ground_y = ground;
}
