/// Player: movement state machine (normal / climbing / stunned), health,
/// and display-state selection.
///
/// Three rules keep this deterministic:
///   - Input arrives as an `InputSnapshot` value, never ambient state.
///   - The attack window is a frame-counted countdown, not a timer racing
///     the frame loop.
///   - The vertical floor is `ground_y`, supplied each frame by the
///     collision pass; the player snaps to it here.
///
/// Sound-worthy moments are reported through `Feedback`; the step function
/// turns them into events for the presentation layer.

/// Knockback applied by `take_damage`: horizontal per direction unit,
/// plus a fixed upward kick.
const KNOCKBACK_X: f32 = 8.0;
const KNOCKBACK_Y: f32 = -4.0;

/// Footstep cadence in frames: running on the ground vs climbing.
const RUN_STEP_FRAMES: u32 = 15;
const CLIMB_STEP_FRAMES: u32 = 12;

/// Named input signals polled once per frame. `up` doubles as jump.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub attack: bool,
}

/// Display-only animation state. Never feeds back into physics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Anim {
    Idle,
    Run,
    Jump,
    Fall,
    Attack,
    Climb,
}

/// Collision rectangle, offset from the sprite origin. May differ from
/// the sprite bounds.
#[derive(Clone, Copy, Debug)]
pub struct Hitbox {
    pub offset_x: f32,
    pub offset_y: f32,
    pub w: f32,
    pub h: f32,
}

/// Hitbox edges in world coordinates.
#[derive(Clone, Copy, Debug)]
pub struct HitboxBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// What happened during one update that the presentation layer cares about.
#[derive(Clone, Copy, Debug, Default)]
pub struct Feedback {
    pub jumped: bool,
    pub attack_started: bool,
    pub footstep: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    // Physics
    pub vx: f32,
    pub vy: f32,
    /// Nearest qualifying floor beneath us, set by the collision pass
    /// each frame. Large sentinel = no floor found.
    pub ground_y: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub speed: f32,
    pub climb_speed: f32,

    // State
    pub facing_right: bool,
    pub is_grounded: bool,
    pub is_attacking: bool,
    pub attack_timer: u32,
    pub attack_frames: u32,
    pub anim: Anim,

    // Health / stun
    pub hp: i32,
    pub max_hp: i32,
    pub is_stunned: bool,
    pub stun_timer: u32,
    pub stun_frames: u32,

    // Climbing
    pub is_climbing: bool,

    /// Set when a jump fires; cleared only when the jump signal reads
    /// released. Prevents re-trigger while the button is held.
    pub jump_locked: bool,

    // Animation timers (player-owned; no physics effect)
    pub frame_index: u32,
    pub frame_timer: u32,
    pub step_timer: u32,

    pub hitbox: Hitbox,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Player {
            x,
            y,
            width: 36.0,
            height: 60.0,
            vx: 0.0,
            vy: 0.0,
            ground_y: 500.0,
            gravity: 0.6,
            jump_force: -14.0,
            speed: 4.0,
            climb_speed: 3.0,
            facing_right: true,
            is_grounded: false,
            is_attacking: false,
            attack_timer: 0,
            attack_frames: 18,
            anim: Anim::Idle,
            hp: 100,
            max_hp: 100,
            is_stunned: false,
            stun_timer: 0,
            stun_frames: 15,
            is_climbing: false,
            jump_locked: false,
            frame_index: 0,
            frame_timer: 0,
            step_timer: 0,
            hitbox: Hitbox { offset_x: 18.0, offset_y: 6.0, w: 36.0, h: 60.0 },
        }
    }

    pub fn hitbox_bounds(&self) -> HitboxBounds {
        let left = self.x + self.hitbox.offset_x;
        let top = self.y + self.hitbox.offset_y;
        HitboxBounds {
            left,
            top,
            right: left + self.hitbox.w,
            bottom: top + self.hitbox.h,
        }
    }

    /// Advance one frame. Dispatches on state: stunned ignores input
    /// entirely, climbing maps input straight to vertical velocity,
    /// normal runs the full move/jump/attack/gravity pipeline.
    pub fn update(&mut self, input: &InputSnapshot) -> Feedback {
        let mut fb = Feedback::default();

        // Jump lock clears only on release of the jump signal.
        if !input.up {
            self.jump_locked = false;
        }

        // The attack window expires on a frame count, in every state.
        if self.is_attacking {
            self.attack_timer = self.attack_timer.saturating_sub(1);
            if self.attack_timer == 0 {
                self.is_attacking = false;
            }
        }

        if self.is_stunned {
            self.update_stunned();
            return fb;
        }

        if self.is_climbing {
            self.update_climbing(input, &mut fb);
        } else {
            self.update_normal(input, &mut fb);
        }

        self.advance_anim_frame();
        fb
    }

    fn update_stunned(&mut self) {
        self.stun_timer = self.stun_timer.saturating_sub(1);
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        if self.stun_timer == 0 {
            self.is_stunned = false;
            self.vx = 0.0;
        }
        // Still collide with the floor while tumbling.
        let bottom = self.y + self.hitbox.offset_y + self.hitbox.h;
        if bottom >= self.ground_y {
            self.y = self.ground_y - (self.hitbox.offset_y + self.hitbox.h);
            self.vy = 0.0;
            self.is_grounded = true;
        }
    }

    fn update_climbing(&mut self, input: &InputSnapshot, fb: &mut Feedback) {
        self.is_grounded = false;
        self.anim = Anim::Climb;

        // No gravity on the ladder: vertical velocity comes from input.
        if input.up {
            self.vy = -self.climb_speed;
        } else if input.down {
            self.vy = self.climb_speed;
        } else {
            self.vy = 0.0;
        }

        if self.vy != 0.0 {
            self.step_timer += 1;
            if self.step_timer > CLIMB_STEP_FRAMES {
                fb.footstep = true;
                self.step_timer = 0;
            }
        }

        self.x += self.vx;
        self.y += self.vy;

        // Horizontal stays locked every frame.
        self.vx = 0.0;
    }

    fn update_normal(&mut self, input: &InputSnapshot, fb: &mut Feedback) {
        if !self.is_attacking {
            // Instantaneous horizontal speed — no acceleration or friction.
            if input.right {
                self.vx = self.speed;
                self.facing_right = true;
                self.anim = Anim::Run;
            } else if input.left {
                self.vx = -self.speed;
                self.facing_right = false;
                self.anim = Anim::Run;
            } else {
                self.vx = 0.0;
                self.anim = Anim::Idle;
            }

            if self.vx != 0.0 && self.is_grounded {
                self.step_timer += 1;
                if self.step_timer > RUN_STEP_FRAMES {
                    fb.footstep = true;
                    self.step_timer = 0;
                }
            } else {
                // Park near the threshold so the first step lands quickly.
                self.step_timer = 10;
            }
        } else {
            self.vx = 0.0;
        }

        if input.up && !self.jump_locked && self.is_grounded && !self.is_attacking {
            self.vy = self.jump_force;
            self.is_grounded = false;
            self.jump_locked = true;
            fb.jumped = true;
        }

        if input.attack && !self.is_attacking {
            self.is_attacking = true;
            self.anim = Anim::Attack;
            self.frame_index = 0;
            self.attack_timer = self.attack_frames;
            fb.attack_started = true;
        }

        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;

        // Vertical collision against the floor the resolver found.
        let bottom = self.y + self.hitbox.offset_y + self.hitbox.h;
        if bottom >= self.ground_y {
            self.y = self.ground_y - (self.hitbox.offset_y + self.hitbox.h);
            self.vy = 0.0;
            self.is_grounded = true;
        } else {
            self.is_grounded = false;
        }

        if self.is_attacking {
            self.anim = Anim::Attack;
        } else if !self.is_grounded {
            self.anim = if self.vy < 0.0 { Anim::Jump } else { Anim::Fall };
        }
    }

    fn advance_anim_frame(&mut self) {
        self.frame_timer += 1;
        let period = if self.anim == Anim::Attack { 8 } else { 10 };
        if self.frame_timer >= period {
            self.frame_index = self.frame_index.wrapping_add(1);
            self.frame_timer = 0;
        }
    }

    /// Apply damage with a generic knockback. No-op once health is gone —
    /// hp never goes below the hit that emptied it.
    pub fn take_damage(&mut self, amount: i32, knockback_dir: f32) {
        if self.hp <= 0 {
            return;
        }
        self.hp -= amount;
        self.is_stunned = true;
        self.stun_timer = self.stun_frames;
        self.vx = knockback_dir * KNOCKBACK_X;
        self.vy = KNOCKBACK_Y;
        self.anim = Anim::Fall;
    }

    /// Climbing entry contract for ladder-zone triggers. Optionally snaps
    /// to the ladder's center line.
    pub fn enter_climb(&mut self, center_x: Option<f32>) {
        if self.is_climbing {
            return;
        }
        self.is_climbing = true;
        self.vx = 0.0;
        self.vy = 0.0;
        if let Some(cx) = center_x {
            self.x = cx - self.width / 2.0 - 10.0;
        }
    }

    pub fn exit_climb(&mut self) {
        self.is_climbing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        let mut p = Player::new(100.0, 600.0);
        p.ground_y = 666.0; // hitbox bottom (600 + 6 + 60) rests exactly here
        p.is_grounded = true;
        p
    }

    #[test]
    fn damage_stuns_and_starts_timer() {
        let mut p = grounded_player();
        p.take_damage(100, 0.0);
        assert_eq!(p.hp, 0);
        assert!(p.is_stunned);
        assert_eq!(p.stun_timer, 15);
        assert_eq!(p.vx, 0.0);
        assert_eq!(p.vy, -4.0);
    }

    #[test]
    fn stun_clears_after_fifteen_steps() {
        let mut p = grounded_player();
        p.take_damage(100, 0.0);
        let idle = InputSnapshot::default();
        for _ in 0..14 {
            p.update(&idle);
            assert!(p.is_stunned);
        }
        p.update(&idle);
        assert!(!p.is_stunned);
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn stunned_ignores_input() {
        let mut p = grounded_player();
        p.take_damage(50, 1.0);
        let held_right = InputSnapshot { right: true, up: true, ..Default::default() };
        p.update(&held_right);
        // Knockback velocity, not run speed; no jump fired.
        assert_eq!(p.vx, 8.0);
        assert!(p.vy > -14.0);
    }

    #[test]
    fn damage_at_zero_hp_is_noop() {
        let mut p = grounded_player();
        p.take_damage(100, 0.0);
        assert_eq!(p.hp, 0);
        let (x, y, vx, vy, timer) = (p.x, p.y, p.vx, p.vy, p.stun_timer);
        p.take_damage(100, -1.0);
        assert_eq!(p.hp, 0);
        assert_eq!((p.x, p.y, p.vx, p.vy, p.stun_timer), (x, y, vx, vy, timer));
    }

    #[test]
    fn knockback_scales_with_direction() {
        let mut p = grounded_player();
        p.take_damage(10, -1.0);
        assert_eq!(p.vx, -8.0);
        assert_eq!(p.vy, -4.0);
    }

    #[test]
    fn jump_fires_once_per_press() {
        let mut p = grounded_player();
        let jump_held = InputSnapshot { up: true, ..Default::default() };
        let fb = p.update(&jump_held);
        assert!(fb.jumped);
        assert_eq!(p.vy, -14.0 + 0.6); // impulse + one gravity tick
        assert!(!p.is_grounded);
        assert!(p.jump_locked);

        // Land again, keep holding: lock blocks a second jump.
        p.is_grounded = true;
        p.vy = 0.0;
        p.y = 600.0;
        let fb = p.update(&jump_held);
        assert!(!fb.jumped);

        // Release, then press again: jump fires.
        p.update(&InputSnapshot::default());
        p.is_grounded = true;
        p.vy = 0.0;
        p.y = 600.0;
        let fb = p.update(&jump_held);
        assert!(fb.jumped);
    }

    #[test]
    fn run_input_sets_speed_and_facing() {
        let mut p = grounded_player();
        p.update(&InputSnapshot { left: true, ..Default::default() });
        assert_eq!(p.vx, -4.0);
        assert!(!p.facing_right);
        assert_eq!(p.anim, Anim::Run);

        p.update(&InputSnapshot::default());
        assert_eq!(p.vx, 0.0);
        assert_eq!(p.anim, Anim::Idle);
    }

    #[test]
    fn falls_without_floor_and_lands_on_it() {
        let mut p = Player::new(100.0, 600.0);
        p.ground_y = 700.0;
        let idle = InputSnapshot::default();
        p.update(&idle);
        assert!(!p.is_grounded);
        assert!(p.vy > 0.0);
        assert_eq!(p.anim, Anim::Fall);

        for _ in 0..120 {
            p.update(&idle);
        }
        assert!(p.is_grounded);
        assert_eq!(p.vy, 0.0);
        // Hitbox bottom sits exactly on the floor.
        assert!((p.hitbox_bounds().bottom - 700.0).abs() < 1e-4);
    }

    #[test]
    fn attack_window_counts_down_in_frames() {
        let mut p = grounded_player();
        let fb = p.update(&InputSnapshot { attack: true, ..Default::default() });
        assert!(fb.attack_started);
        assert!(p.is_attacking);
        assert_eq!(p.vx, 0.0);

        // Held attack does not restart the window.
        let fb = p.update(&InputSnapshot { attack: true, ..Default::default() });
        assert!(!fb.attack_started);

        let idle = InputSnapshot::default();
        while p.is_attacking {
            p.update(&idle);
        }
        // Attacking again works after expiry.
        let fb = p.update(&InputSnapshot { attack: true, ..Default::default() });
        assert!(fb.attack_started);
    }

    #[test]
    fn attack_blocks_jump_and_movement() {
        let mut p = grounded_player();
        p.update(&InputSnapshot { attack: true, ..Default::default() });
        let fb = p.update(&InputSnapshot { up: true, right: true, attack: true, ..Default::default() });
        assert!(!fb.jumped);
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn climbing_maps_input_to_vertical_velocity() {
        let mut p = grounded_player();
        p.enter_climb(None);
        let y0 = p.y;

        p.update(&InputSnapshot { up: true, ..Default::default() });
        assert_eq!(p.vy, -3.0);
        assert!(p.y < y0);
        assert_eq!(p.anim, Anim::Climb);
        assert!(!p.is_grounded);

        p.update(&InputSnapshot { down: true, ..Default::default() });
        assert_eq!(p.vy, 3.0);

        // No input → hangs in place, no gravity.
        let y1 = p.y;
        p.update(&InputSnapshot::default());
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.y, y1);
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn enter_climb_snaps_to_center() {
        let mut p = Player::new(100.0, 600.0);
        p.enter_climb(Some(200.0));
        assert_eq!(p.x, 200.0 - 18.0 - 10.0);
        assert!(p.is_climbing);

        // Re-entry is a no-op.
        p.x = 55.0;
        p.enter_climb(Some(400.0));
        assert_eq!(p.x, 55.0);

        p.exit_climb();
        assert!(!p.is_climbing);
    }

    #[test]
    fn hitbox_bounds_track_position() {
        let p = Player::new(100.0, 600.0);
        let b = p.hitbox_bounds();
        assert_eq!(b.left, 118.0);
        assert_eq!(b.top, 606.0);
        assert_eq!(b.right, 154.0);
        assert_eq!(b.bottom, 666.0);
    }

    #[test]
    fn footsteps_fire_on_cadence_while_running() {
        let mut p = grounded_player();
        let run = InputSnapshot { right: true, ..Default::default() };
        let mut steps = 0;
        for _ in 0..64 {
            // Keep the player on the floor: running never leaves it here.
            if p.update(&run).footstep {
                steps += 1;
            }
        }
        assert!(steps >= 3, "expected a footstep roughly every 15 frames, got {steps}");
    }
}
