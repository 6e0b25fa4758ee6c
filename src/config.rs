/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Milliseconds per simulation step (~16 → 60 steps/second).
    pub tick_rate_ms: u64,
    pub tuning: TuningConfig,
    pub gamepad: GamepadConfig,
}

/// Player physics tuning. Applied once when the level spawns the player.
#[derive(Clone, Debug)]
pub struct TuningConfig {
    pub gravity: f32,
    pub run_speed: f32,
    pub climb_speed: f32,
    pub jump_force: f32,
    pub stun_frames: u32,
    pub attack_frames: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub attack: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub restart: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_run_speed")]
    run_speed: f32,
    #[serde(default = "default_climb_speed")]
    climb_speed: f32,
    #[serde(default = "default_jump_force")]
    jump_force: f32,
    #[serde(default = "default_stun_frames")]
    stun_frames: u32,
    #[serde(default = "default_attack_frames")]
    attack_frames: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump_btns")]
    jump: Vec<String>,
    #[serde(default = "default_attack_btns")]
    attack: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }          // ≈ 60 steps/second

fn default_gravity() -> f32 { 0.6 }
fn default_run_speed() -> f32 { 4.0 }
fn default_climb_speed() -> f32 { 3.0 }
fn default_jump_force() -> f32 { -14.0 }
fn default_stun_frames() -> u32 { 15 }
fn default_attack_frames() -> u32 { 18 }      // ≈ 300ms of attack window

fn default_jump_btns() -> Vec<String> { vec!["A".into(), "L1".into()] }
fn default_attack_btns() -> Vec<String> { vec!["X".into(), "R1".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            gravity: default_gravity(),
            run_speed: default_run_speed(),
            climb_speed: default_climb_speed(),
            jump_force: default_jump_force(),
            stun_frames: default_stun_frames(),
            attack_frames: default_attack_frames(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump_btns(),
            attack: default_attack_btns(),
            confirm: default_confirm(),
            cancel: default_cancel(),
            restart: default_restart(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            tick_rate_ms: toml_cfg.general.tick_rate_ms,
            tuning: TuningConfig {
                gravity: toml_cfg.player.gravity,
                run_speed: toml_cfg.player.run_speed,
                climb_speed: toml_cfg.player.climb_speed,
                jump_force: toml_cfg.player.jump_force,
                stun_frames: toml_cfg.player.stun_frames,
                attack_frames: toml_cfg.player.attack_frames,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                attack: toml_cfg.gamepad.attack,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                restart: toml_cfg.gamepad.restart,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let toml_cfg = TomlConfig::default();
        GameConfig {
            tick_rate_ms: toml_cfg.general.tick_rate_ms,
            tuning: TuningConfig {
                gravity: toml_cfg.player.gravity,
                run_speed: toml_cfg.player.run_speed,
                climb_speed: toml_cfg.player.climb_speed,
                jump_force: toml_cfg.player.jump_force,
                stun_frames: toml_cfg.player.stun_frames,
                attack_frames: toml_cfg.player.attack_frames,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                attack: toml_cfg.gamepad.attack,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                restart: toml_cfg.gamepad.restart,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed binary still finds data
        // relative to its real location.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/phaserunner)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/phaserunner");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/phaserunner)
    let sys = PathBuf::from("/usr/share/phaserunner");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
