/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::player::InputSnapshot;
use sim::event::GameEvent;
use sim::level;
use sim::step;
use sim::world::{Scene, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::F(2), KeyCode::Char('r'), KeyCode::Char('R')];

fn main() {
    let config = GameConfig::load();

    let mut world = WorldState::new();
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Phase Runner: Logic Core!");
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, sound, &kb, &gp, config)? {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            if world.scene == Scene::Playing && !world.paused {
                let input = merge_input(&kb, &gp);
                let events = step::step(world, input);
                process_sound_events(sound, &events);
            }
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Keyboard snapshot merged with the gamepad's held states.
fn merge_input(kb: &InputState, gp: &GamepadState) -> InputSnapshot {
    let mut input = kb.snapshot();
    input.left |= gp.left_held();
    input.right |= gp.right_held();
    input.up |= gp.up_held() || gp.jump_held();
    input.down |= gp.down_held();
    input.attack |= gp.attack_held();
    input
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Jumped => sfx.play_jump(),
            GameEvent::AttackStarted => sfx.play_attack(),
            GameEvent::Footstep => sfx.play_step(),
            GameEvent::Damaged => sfx.play_damage(),
            GameEvent::CheckpointActivated { .. } => sfx.play_checkpoint(),
            GameEvent::LevelComplete => sfx.play_clear(),
            _ => {}
        }
    }
}

fn handle_meta(
    world: &mut WorldState,
    _sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
    config: &GameConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
    let esc = kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed();

    match world.scene {
        // ── Title Screen ──
        Scene::Title => {
            if confirm {
                level::load_level(world, config)?;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return Ok(true);
            }
        }

        // ── Playing ──
        Scene::Playing => {
            // F1: Pause / Resume
            if kb.any_pressed(&[KeyCode::F(1)]) {
                world.paused = !world.paused;
                return Ok(false);
            }
            if world.paused {
                // ESC while paused: back to title
                if esc {
                    world.paused = false;
                    world.scene = Scene::Title;
                }
                return Ok(false); // Block all other input while paused
            }
            if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
                step::restart_level(world);
            }
            if esc {
                world.scene = Scene::Title;
            }
        }

        // ── Level Complete ──
        Scene::Complete => {
            if confirm {
                world.scene = Scene::Title;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
