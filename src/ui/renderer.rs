/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// World space is pixels (the level spans ~8000×900); the viewport maps
/// SCALE_X×SCALE_Y pixel blocks onto single terminal cells. The renderer
/// only reads simulation state — camera x comes from the step pass, the
/// vertical framing is view-side.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::hazard::HazardKind;
use crate::domain::phase::CyclePhase;
use crate::domain::player::{Anim, Player};
use crate::sim::world::{Scene, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap color matches the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 5, g: 5, b: 12 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        cell
    }

    fn as_str(&self) -> &str {
        if self.ch_len == 0 { return " "; }
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn set_i(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 {
            self.set(x as usize, y as usize, cell);
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }

    fn put_str_i(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        if y < 0 { return; }
        let mut cx = x;
        for ch in s.chars() {
            if cx >= 0 && (cx as usize) < self.width {
                self.set(cx as usize, y as usize, Cell::from_char(ch, fg, bg));
            }
            cx += 1;
        }
    }
}

// ── World-to-viewport scaling ──

/// World pixels per terminal cell.
const SCALE_X: f32 = 20.0;
const SCALE_Y: f32 = 20.0;

/// Row where the map viewport begins (row 0 is the HUD).
const MAP_ROW: usize = 1;
/// Rows reserved below the map (help bar).
const FOOTER_ROWS: usize = 1;

// ── Palette ──

const COLOR_STATIC: Color = Color::Rgb { r: 70, g: 70, b: 80 };
const COLOR_PHASE_A: Color = Color::Rgb { r: 0, g: 255, b: 136 };
const COLOR_PHASE_B: Color = Color::Rgb { r: 255, g: 0, b: 136 };
const COLOR_GHOST_A: Color = Color::Rgb { r: 0, g: 68, b: 34 };
const COLOR_GHOST_B: Color = Color::Rgb { r: 68, g: 0, b: 34 };
const COLOR_LASER: Color = Color::Rgb { r: 255, g: 40, b: 40 };
const COLOR_EMITTER: Color = Color::Rgb { r: 51, g: 0, b: 0 };
const COLOR_DECO: Color = Color::Rgb { r: 51, g: 68, b: 51 };
const COLOR_PLAYER: Color = Color::Rgb { r: 120, g: 200, b: 255 };
const COLOR_HUD_BG: Color = Color::Rgb { r: 16, g: 16, b: 40 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_scene: Option<Scene>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_scene: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Scene change → clear for a clean transition
        if self.last_scene != Some(world.scene) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_scene = Some(world.scene);
        }

        self.front.clear();

        match world.scene {
            Scene::Title => self.compose_title(),
            Scene::Playing => self.compose_game(world),
            Scene::Complete => self.compose_complete(world),
        }

        if world.paused {
            self.compose_pause_overlay();
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor —
        // the terminal default may differ from BASE_BG and leave artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: the playing field ──

    fn compose_game(&mut self, w: &WorldState) {
        let view_h_rows = self.term_h.saturating_sub(MAP_ROW + FOOTER_ROWS).max(1);
        let view_h_px = view_h_rows as f32 * SCALE_Y;

        // Vertical framing: keep the player in the upper-middle band.
        // On very tall terminals the whole 900px world fits; pin to the top.
        let cam_y_max = (900.0 - view_h_px).max(-100.0);
        let cam_y = match &w.player {
            Some(p) => (p.y - view_h_px * 0.55).clamp(-100.0, cam_y_max),
            None => 300.0,
        };
        let cam_x = w.camera.x;

        let to_col = |wx: f32| ((wx - cam_x) / SCALE_X).floor() as i32;
        let to_row = |wy: f32| MAP_ROW as i32 + ((wy - cam_y) / SCALE_Y).floor() as i32;

        let phase = w.clock.current_phase();

        // ── Decorative text ──
        for deco in &w.decorations {
            self.front.put_str_i(to_col(deco.x), to_row(deco.y), deco.text,
                                 COLOR_DECO, Cell::BASE_BG);
        }

        // ── Platforms ──
        for plat in &w.platforms {
            let solid = plat.is_solid(phase);
            let (glyph, color) = match plat.kind.gating_phase() {
                None => ('█', COLOR_STATIC),
                Some(CyclePhase::A) if solid => ('█', COLOR_PHASE_A),
                Some(CyclePhase::B) if solid => ('█', COLOR_PHASE_B),
                Some(CyclePhase::A) => ('░', COLOR_GHOST_A),
                Some(CyclePhase::B) => ('░', COLOR_GHOST_B),
            };
            let c0 = to_col(plat.x);
            let c1 = to_col(plat.x + plat.w - 1.0).max(c0);
            let r0 = to_row(plat.y);
            let r1 = to_row(plat.y + plat.h - 1.0).max(r0);
            for r in r0..=r1 {
                for c in c0..=c1 {
                    self.front.set_i(c, r, Cell::from_char(glyph, color, Cell::BASE_BG));
                }
            }
        }

        // ── Hazards ──
        for hz in &w.hazards {
            let active = hz.is_active(w.time);
            match hz.kind {
                HazardKind::LaserVertical => {
                    let c = to_col(hz.x);
                    if active {
                        let r0 = to_row(hz.y);
                        let r1 = to_row(hz.y + hz.h).max(r0);
                        for r in r0..=r1 {
                            self.front.set_i(c, r, Cell::from_char('║', COLOR_LASER, Cell::BASE_BG));
                        }
                    } else {
                        self.front.set_i(c, to_row(hz.y), Cell::from_char('▽', COLOR_EMITTER, Cell::BASE_BG));
                    }
                }
                HazardKind::LaserHorizontal => {
                    let r = to_row(hz.y);
                    if active {
                        let c0 = to_col(hz.x);
                        let c1 = to_col(hz.x + hz.w).max(c0);
                        for c in c0..=c1 {
                            self.front.set_i(c, r, Cell::from_char('═', COLOR_LASER, Cell::BASE_BG));
                        }
                    } else {
                        self.front.set_i(to_col(hz.x), r, Cell::from_char('▷', COLOR_EMITTER, Cell::BASE_BG));
                    }
                }
            }
        }

        // ── Checkpoints ──
        for cp in &w.checkpoints {
            let color = if cp.active { COLOR_PHASE_A } else { COLOR_STATIC };
            self.front.set_i(to_col(cp.x), to_row(cp.y - 10.0),
                             Cell::from_char('◉', color, Cell::BASE_BG));
        }

        // ── Exit ──
        let exit_col = to_col(w.target_x);
        let exit_row = to_row(500.0);
        self.front.put_str_i(exit_col, exit_row, "EXIT ▶▶", Color::White, Cell::BASE_BG);

        // ── Player ──
        if let Some(p) = &w.player {
            self.compose_player(p, to_col(p.x), to_row(p.y));
        }

        self.compose_hud(w);
        self.compose_help();
    }

    /// Player sprite: a 2×3 cell figure, tinted by state.
    fn compose_player(&mut self, p: &Player, col: i32, row: i32) {
        let color = if p.is_stunned {
            COLOR_LASER
        } else if p.is_climbing {
            Color::Rgb { r: 255, g: 220, b: 120 }
        } else {
            COLOR_PLAYER
        };

        let head = if p.facing_right { "◖●" } else { "●◗" };
        let body = match p.anim {
            Anim::Attack => if p.facing_right { "█▶" } else { "◀█" },
            _ => "██",
        };
        let legs = match p.anim {
            Anim::Run if p.frame_index % 2 == 0 => "/\\",
            Anim::Run => "|\\",
            Anim::Jump | Anim::Fall => "vv",
            Anim::Climb => "||",
            _ => "▌▐",
        };

        self.front.put_str_i(col, row, head, color, Cell::BASE_BG);
        self.front.put_str_i(col, row + 1, body, color, Cell::BASE_BG);
        self.front.put_str_i(col, row + 2, legs, color, Cell::BASE_BG);
    }

    // ── HUD: phase indicator, cycle bar, HP ──

    fn compose_hud(&mut self, w: &WorldState) {
        let buf_w = self.front.width;
        for x in 0..buf_w {
            self.front.set(x, 0, Cell::from_char(' ', Color::White, COLOR_HUD_BG));
        }

        self.front.put_str(1, 0, "LOGIC CORE", Color::White, COLOR_HUD_BG);

        // Phase + cycle progress bar
        let phase = w.clock.current_phase();
        let (label, color) = match phase {
            CyclePhase::A => ("PHASE:A", COLOR_PHASE_A),
            CyclePhase::B => ("PHASE:B", COLOR_PHASE_B),
        };
        let bar_w = 12usize;
        let filled = (w.clock.cycle_progress() * bar_w as f32) as usize;
        let mut bar = String::with_capacity(bar_w);
        for i in 0..bar_w {
            bar.push(if i < filled { '■' } else { '·' });
        }
        let right = format!("{label} [{bar}]");
        let start = buf_w.saturating_sub(right.chars().count() + 1);
        self.front.put_str(start, 0, &right, color, COLOR_HUD_BG);

        // HP bar, shown once damaged
        if let Some(p) = &w.player {
            if p.hp < p.max_hp {
                let hp_w = 10usize;
                let hp_filled = ((p.hp.max(0) as f32 / p.max_hp as f32) * hp_w as f32) as usize;
                let mut hp = String::from("HP ");
                for i in 0..hp_w {
                    hp.push(if i < hp_filled { '█' } else { '░' });
                }
                self.front.put_str(14, 0, &hp, COLOR_LASER, COLOR_HUD_BG);
            }
        }
    }

    fn compose_help(&mut self) {
        let row = self.term_h.saturating_sub(1);
        let help = " ←/→:Move  ↑/Space:Jump  E:Attack  F1:Pause  F2:Restart  Esc:Title";
        self.front.put_str(0, row, help, Color::DarkGrey, Cell::BASE_BG);
    }

    // ── Title / complete screens ──

    fn compose_title(&mut self) {
        let cx = self.term_w / 2;
        let cy = self.term_h / 2;
        let title = "P H A S E   R U N N E R";
        let sub = "LEVEL 9: LOGIC CORE";
        let hint = "[Enter] Start    [Q] Quit";

        self.front.put_str(cx.saturating_sub(title.chars().count() / 2),
                           cy.saturating_sub(3), title, COLOR_PHASE_A, Cell::BASE_BG);
        self.front.put_str(cx.saturating_sub(sub.chars().count() / 2),
                           cy.saturating_sub(1), sub, Color::White, Cell::BASE_BG);
        self.front.put_str(cx.saturating_sub(hint.chars().count() / 2),
                           cy + 2, hint, Color::DarkGrey, Cell::BASE_BG);
    }

    fn compose_complete(&mut self, w: &WorldState) {
        let cx = self.term_w / 2;
        let cy = self.term_h / 2;
        let msg = "LOGIC VERIFIED";
        let sub = format!("cycle count: {}", w.clock.global_timer);
        let hint = "[Enter] Title    [Q] Quit";

        self.front.put_str(cx.saturating_sub(msg.chars().count() / 2),
                           cy.saturating_sub(2), msg, COLOR_PHASE_A, Cell::BASE_BG);
        self.front.put_str(cx.saturating_sub(sub.chars().count() / 2),
                           cy, &sub, Color::White, Cell::BASE_BG);
        self.front.put_str(cx.saturating_sub(hint.chars().count() / 2),
                           cy + 2, hint, Color::DarkGrey, Cell::BASE_BG);
    }

    fn compose_pause_overlay(&mut self) {
        let cx = self.term_w / 2;
        let cy = self.term_h / 2;
        let msg = " PAUSED — [F1] Resume ";
        self.front.put_str(cx.saturating_sub(msg.chars().count() / 2),
                           cy, msg, Color::Black, Color::Rgb { r: 200, g: 180, b: 50 });
    }
}
