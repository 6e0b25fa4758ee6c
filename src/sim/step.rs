/// The step function: advances the level by one frame.
///
/// Processing order (fixed; required for correctness):
///   1. Phase clock + frame counter advance (unconditional)
///   2. Moving platform repositioning
///   3. Collision resolution + ground-height derivation
///   4. Player integration (input, gravity, state transitions)
///   5. Hazard collision check against the settled player bounds
///   6. Void check → respawn
///   7. Checkpoint activation
///   8. Completion check (fires once)
///   9. Camera follow
///
/// Every helper no-ops gracefully when no player is spawned.

use crate::domain::collision;
use crate::domain::player::InputSnapshot;
use super::event::GameEvent;
use super::world::{Scene, WorldState};

/// Falling past this y is the sole death/respawn trigger. Running out of
/// health merely leaves the player stunned and knocked back.
const VOID_Y: f32 = 1000.0;

/// Hazard hits always deal this much — an effectively instant failure.
const HAZARD_DAMAGE: i32 = 100;

/// The level's own knockback for hazard hits, applied on top of (and
/// overriding) the generic damage knockback. Two-step on purpose.
const HAZARD_KNOCKBACK: (f32, f32) = (-10.0, -5.0);

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: InputSnapshot) -> Vec<GameEvent> {
    if world.scene != Scene::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();

    // The cycle never waits: clocks advance even while stunned or falling.
    world.clock.advance();
    world.time += 1;

    let frame = world.time;
    for plat in world.platforms.iter_mut() {
        plat.tick_motion(frame);
    }

    resolve_platform_collisions(world);
    resolve_player(world, input, &mut events);
    resolve_hazards(world, &mut events);
    resolve_void(world, &mut events);
    resolve_checkpoints(world, &mut events);
    resolve_completion(world, &mut events);

    if let Some(p) = &world.player {
        world.camera.follow(p.x);
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Collision / player integration
// ══════════════════════════════════════════════════════════════

fn resolve_platform_collisions(world: &mut WorldState) {
    let phase = world.clock.current_phase();
    if let Some(player) = world.player.as_mut() {
        collision::resolve(player, &world.platforms, phase);
    }
}

fn resolve_player(world: &mut WorldState, input: InputSnapshot, events: &mut Vec<GameEvent>) {
    let Some(player) = world.player.as_mut() else { return };
    let fb = player.update(&input);
    if fb.jumped {
        events.push(GameEvent::Jumped);
    }
    if fb.attack_started {
        events.push(GameEvent::AttackStarted);
    }
    if fb.footstep {
        events.push(GameEvent::Footstep);
    }
}

// ══════════════════════════════════════════════════════════════
// Hazards
// ══════════════════════════════════════════════════════════════

fn resolve_hazards(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let t = world.time;
    let Some(player) = world.player.as_mut() else { return };

    let b = player.hitbox_bounds();
    for hz in &world.hazards {
        if !hz.is_active(t) {
            continue;
        }
        if hz.hits(b.left, b.top, b.right, b.bottom) && !player.is_stunned {
            // Generic damage first, then the level's own knockback wins.
            player.take_damage(HAZARD_DAMAGE, 0.0);
            player.vx = HAZARD_KNOCKBACK.0;
            player.vy = HAZARD_KNOCKBACK.1;
            events.push(GameEvent::Damaged);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Void / respawn
// ══════════════════════════════════════════════════════════════

fn resolve_void(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let fell = world.player.as_ref().map_or(false, |p| p.y > VOID_Y);
    if fell {
        respawn(world, events);
    }
}

/// Reposition at the active checkpoint (offset up by the player height so
/// they land on top of it) or the level start, and restore health,
/// velocity, and stun.
fn respawn(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let cp = world
        .active_checkpoint
        .and_then(|i| world.checkpoints.get(i))
        .map(|cp| (cp.x, cp.y));

    let Some(player) = world.player.as_mut() else { return };
    match cp {
        Some((cx, cy)) => {
            player.x = cx;
            player.y = cy - player.height;
        }
        None => {
            player.x = world.spawn.0;
            player.y = world.spawn.1;
        }
    }
    player.hp = player.max_hp;
    player.vx = 0.0;
    player.vy = 0.0;
    player.is_stunned = false;
    events.push(GameEvent::Respawned);
}

// ══════════════════════════════════════════════════════════════
// Checkpoints / completion
// ══════════════════════════════════════════════════════════════

fn resolve_checkpoints(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let Some(px) = world.player.as_ref().map(|p| p.x) else { return };
    for (i, cp) in world.checkpoints.iter_mut().enumerate() {
        if !cp.active && px > cp.x {
            cp.active = true;
            world.active_checkpoint = Some(i);
            events.push(GameEvent::CheckpointActivated { id: cp.id });
        }
    }
}

fn resolve_completion(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.completed {
        return;
    }
    let reached = world.player.as_ref().map_or(false, |p| p.x >= world.target_x);
    if reached {
        world.completed = true;
        world.scene = Scene::Complete;
        events.push(GameEvent::LevelComplete);
    }
}

// ══════════════════════════════════════════════════════════════
// Restart
// ══════════════════════════════════════════════════════════════

/// Full level reset: clocks to zero, checkpoints deactivated, player back
/// at the start with full health.
pub fn restart_level(world: &mut WorldState) {
    world.clock.global_timer = 0;
    world.time = 0;
    for cp in world.checkpoints.iter_mut() {
        cp.active = false;
    }
    world.active_checkpoint = None;
    world.completed = false;
    world.camera.x = 0.0;

    let (sx, sy) = world.spawn;
    if let Some(player) = world.player.as_mut() {
        player.x = sx;
        player.y = sy;
        player.vx = 0.0;
        player.vy = 0.0;
        player.hp = player.max_hp;
        player.is_stunned = false;
        player.stun_timer = 0;
        player.is_climbing = false;
        player.is_attacking = false;
        player.attack_timer = 0;
    }
    world.scene = Scene::Playing;
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hazard::Hazard;
    use crate::domain::phase::PhaseClock;
    use crate::domain::platform::{Platform, PlatformKind};
    use crate::domain::player::Player;
    use crate::sim::world::Checkpoint;

    /// A small playable world: one ground slab, one player standing on it.
    fn test_world() -> WorldState {
        let mut world = WorldState::new();
        world.clock = PhaseClock::new(180);
        world.platforms = vec![Platform::fixed(
            0.0, 700.0, 10_000.0, 200.0, PlatformKind::Static,
        )];
        world.spawn = (100.0, 600.0);
        world.target_x = 7800.0;
        let mut player = Player::new(100.0, 634.0); // feet on the slab
        player.is_grounded = true;
        world.player = Some(player);
        world.scene = Scene::Playing;
        world
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn clocks_advance_even_while_stunned() {
        let mut world = test_world();
        world.player.as_mut().unwrap().take_damage(50, 0.0);
        step(&mut world, idle());
        step(&mut world, idle());
        assert_eq!(world.clock.global_timer, 2);
        assert_eq!(world.time, 2);
    }

    #[test]
    fn missing_player_is_a_graceful_noop() {
        let mut world = test_world();
        world.player = None;
        let events = step(&mut world, idle());
        assert!(events.is_empty());
        assert_eq!(world.clock.global_timer, 1);
    }

    #[test]
    fn step_outside_playing_does_nothing() {
        let mut world = test_world();
        world.scene = Scene::Title;
        let events = step(&mut world, idle());
        assert!(events.is_empty());
        assert_eq!(world.clock.global_timer, 0);
    }

    #[test]
    fn void_respawn_restores_player_at_start() {
        let mut world = test_world();
        {
            let p = world.player.as_mut().unwrap();
            p.y = 1200.0;
            p.vx = 7.0;
            p.vy = 22.0;
            p.hp = 40;
            p.is_stunned = true;
            p.stun_timer = 9;
        }
        let events = step(&mut world, idle());
        assert!(events.iter().any(|e| matches!(e, GameEvent::Respawned)));

        let p = world.player.as_ref().unwrap();
        assert_eq!(p.hp, p.max_hp);
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
        assert!(!p.is_stunned);
        assert_eq!(p.x, 100.0);
    }

    #[test]
    fn void_respawn_uses_active_checkpoint() {
        let mut world = test_world();
        world.checkpoints = vec![Checkpoint::new(2100.0, 100.0, 1)];

        // Walk past the checkpoint to activate it.
        world.player.as_mut().unwrap().x = 2150.0;
        let events = step(&mut world, idle());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::CheckpointActivated { id: 1 })));
        assert_eq!(world.active_checkpoint, Some(0));

        // Fall into the void: respawn on top of the checkpoint.
        world.player.as_mut().unwrap().y = 1500.0;
        step(&mut world, idle());
        let p = world.player.as_ref().unwrap();
        assert_eq!(p.x, 2100.0);
        assert_eq!(p.y, 100.0 - p.height);
    }

    #[test]
    fn checkpoint_activation_is_monotonic_and_idempotent() {
        let mut world = test_world();
        world.checkpoints = vec![Checkpoint::new(500.0, 700.0, 1)];
        world.player.as_mut().unwrap().x = 600.0;

        let first = step(&mut world, idle());
        assert_eq!(
            first
                .iter()
                .filter(|e| matches!(e, GameEvent::CheckpointActivated { .. }))
                .count(),
            1
        );

        // Repeated steps with non-decreasing x fire nothing new.
        let again = step(&mut world, idle());
        assert!(!again
            .iter()
            .any(|e| matches!(e, GameEvent::CheckpointActivated { .. })));

        // Walking back does not deactivate.
        world.player.as_mut().unwrap().x = 100.0;
        step(&mut world, idle());
        assert!(world.checkpoints[0].active);
        assert_eq!(world.active_checkpoint, Some(0));
    }

    #[test]
    fn hazard_hit_applies_damage_then_level_knockback() {
        let mut world = test_world();
        // Always-active beam straight through the player's standing spot.
        world.hazards = vec![Hazard::laser_vertical(136.0, 0.0, 800.0, 10, 0, 10)];

        let events = step(&mut world, idle());
        assert!(events.iter().any(|e| matches!(e, GameEvent::Damaged)));

        let p = world.player.as_ref().unwrap();
        assert_eq!(p.hp, 0);
        assert!(p.is_stunned);
        // The level's override, not take_damage's generic (0, -4).
        assert_eq!((p.vx, p.vy), (-10.0, -5.0));
    }

    #[test]
    fn stunned_player_is_not_hit_again() {
        let mut world = test_world();
        world.hazards = vec![Hazard::laser_vertical(136.0, 0.0, 800.0, 10, 0, 10)];

        step(&mut world, idle());
        let hp_after_first = world.player.as_ref().unwrap().hp;

        // Next frame the player is still stunned inside the beam.
        let events = step(&mut world, idle());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Damaged)));
        assert_eq!(world.player.as_ref().unwrap().hp, hp_after_first);
    }

    #[test]
    fn inactive_hazard_never_hits() {
        let mut world = test_world();
        // Window never opens at the frames we step through (opens at t=50).
        world.hazards = vec![Hazard::laser_vertical(136.0, 0.0, 800.0, 100, 50, 10)];
        for _ in 0..10 {
            let events = step(&mut world, idle());
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Damaged)));
        }
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut world = test_world();
        world.player.as_mut().unwrap().x = 7900.0;

        let events = step(&mut world, idle());
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelComplete)));
        assert_eq!(world.scene, Scene::Complete);

        // Scene left Playing; further steps are inert.
        let events = step(&mut world, idle());
        assert!(events.is_empty());

        // Even if forced back to Playing, the latch holds.
        world.scene = Scene::Playing;
        let events = step(&mut world, idle());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelComplete)));
    }

    #[test]
    fn player_lands_on_phase_platform_only_while_solid() {
        let mut world = test_world();
        // Replace the ground with a phase A slab under the player and
        // nothing else.
        world.platforms = vec![Platform::fixed(
            0.0, 700.0, 10_000.0, 20.0, PlatformKind::PhaseA,
        )];

        // Phase A (t < 90): floor found, player settles.
        for _ in 0..30 {
            step(&mut world, idle());
        }
        assert!(world.player.as_ref().unwrap().is_grounded);

        // Advance the clock into phase B: the slab ghosts and the player
        // falls through it.
        world.clock.global_timer = 90;
        for _ in 0..30 {
            step(&mut world, idle());
        }
        let p = world.player.as_ref().unwrap();
        assert!(!p.is_grounded);
        assert!(p.y > 700.0);
    }

    #[test]
    fn moving_platform_does_not_carry_its_rider() {
        let mut world = test_world();
        world.platforms = vec![Platform::moving(
            4000.0, 700.0, 100.0, 20.0,
            PlatformKind::MovingPhaseA,
            4000.0, 4500.0, 2.0,
        )];
        // Stand on the platform at its sweep center.
        {
            let p = world.player.as_mut().unwrap();
            p.x = 4250.0 - 18.0; // hitbox centered on 4250
            p.y = 634.0;
            p.is_grounded = true;
        }
        let x0 = world.player.as_ref().unwrap().x;

        // The platform sweeps; the player's x never moves with it.
        for _ in 0..40 {
            step(&mut world, idle());
        }
        assert_eq!(world.player.as_ref().unwrap().x, x0);
    }

    #[test]
    fn restart_resets_progress_and_player() {
        let mut world = test_world();
        world.checkpoints = vec![Checkpoint::new(500.0, 700.0, 1)];
        world.player.as_mut().unwrap().x = 600.0;
        step(&mut world, idle());
        assert!(world.checkpoints[0].active);

        restart_level(&mut world);
        assert_eq!(world.clock.global_timer, 0);
        assert_eq!(world.time, 0);
        assert!(!world.checkpoints[0].active);
        assert_eq!(world.active_checkpoint, None);
        let p = world.player.as_ref().unwrap();
        assert_eq!((p.x, p.y), world.spawn);
        assert_eq!(p.hp, p.max_hp);
    }
}
