//! Rendering layer. All terminal I/O lives here.
//!
//! `TerminalHost` is the game's host: the engine draws into its cell
//! canvas and pushes HUD and popup state into it; `render` then turns the
//! whole thing into terminal commands. No game logic happens here.

pub mod canvas;

use std::collections::{HashMap, HashSet};
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::config::Config;
use crate::entities::{Rgba, Sprite, Stroke};
use crate::host::{Hud, HudField, IdentityStore, PopupKind, Popups, Surface};

pub use canvas::{Canvas, Cell};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_LABEL: Color = Color::DarkGrey;
const C_HUD_VALUE: Color = Color::Yellow;
const C_HUD_FAIL: Color = Color::Red;
const C_COUNTDOWN: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_POPUP_BORDER: Color = Color::Cyan;
const C_POPUP_TEXT: Color = Color::White;

/// Columns reserved right of the playfield for the scoreboard.
const PANEL_WIDTH: u16 = 22;
const MAX_NAME_LEN: usize = 16;

/// Playfield size in cells that fits the terminal. Cells are roughly
/// twice as tall as wide, which the column count compensates for.
pub fn fit_playfield(term_cols: u16, term_rows: u16, config: &Config) -> (usize, usize) {
    let rows = term_rows.saturating_sub(2).max(8) as usize;
    let px_row = config.canvas_height / rows as f64;
    let px_col = px_row / 2.0;
    let wanted = (config.canvas_width / px_col).round() as usize;
    let room = term_cols.saturating_sub(PANEL_WIDTH + 2).max(8) as usize;
    (wanted.min(room).max(4), rows)
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

pub struct TerminalHost {
    canvas: Canvas,
    hud_visible: bool,
    hud: HashMap<HudField, String>,
    countdown: Option<u32>,
    popups: HashSet<PopupKind>,
    game_over: [String; 3],
    player: Option<String>,
    name_input: String,
    hint: String,
}

impl TerminalHost {
    pub fn new(cols: usize, rows: usize, config: &Config, hint: String) -> Self {
        Self {
            canvas: Canvas::new(cols, rows, config.canvas_width, config.canvas_height),
            hud_visible: false,
            hud: HashMap::new(),
            countdown: None,
            popups: HashSet::new(),
            game_over: Default::default(),
            player: config.player.clone(),
            name_input: config.player.clone().unwrap_or_default(),
            hint,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn popup_visible(&self, kind: PopupKind) -> bool {
        self.popups.contains(&kind)
    }

    pub fn hud_visible(&self) -> bool {
        self.hud_visible
    }

    pub fn hud_field(&self, field: HudField) -> Option<&str> {
        self.hud.get(&field).map(String::as_str)
    }

    // ── Start popup name entry ────────────────────────────────────────────────

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn type_char(&mut self, c: char) {
        if !c.is_control() && self.name_input.chars().count() < MAX_NAME_LEN {
            self.name_input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.name_input.pop();
    }

    /// Start button. Disabled (returns `false`) while the name is blank;
    /// otherwise the name goes to the identity store.
    pub fn submit_name(&mut self) -> bool {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            return false;
        }
        self.set_player_name(&name);
        true
    }

    // ── Frame output ──────────────────────────────────────────────────────────

    /// Render one complete frame.
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        draw_canvas(out, &self.canvas)?;
        if self.hud_visible {
            self.draw_hud(out)?;
        } else {
            self.clear_panel(out)?;
        }
        if let Some(n) = self.countdown {
            self.draw_countdown(out, n)?;
        }
        if self.popup_visible(PopupKind::Start) {
            self.draw_start_popup(out)?;
        }
        if self.popup_visible(PopupKind::Pause) {
            self.draw_pause_popup(out)?;
        }
        if self.popup_visible(PopupKind::GameOver) {
            self.draw_game_over_popup(out)?;
        }
        self.draw_hint(out)?;

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.canvas.rows() as u16 + 1))?;
        out.flush()?;
        Ok(())
    }

    fn panel_col(&self) -> u16 {
        self.canvas.cols() as u16 + 2
    }

    fn clear_panel<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(style::ResetColor)?;
        for row in 0..5 {
            out.queue(cursor::MoveTo(self.panel_col(), row))?;
            out.queue(Print(" ".repeat(PANEL_WIDTH as usize)))?;
        }
        Ok(())
    }

    fn draw_hud<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let rows: [(&str, HudField, Color); 4] = [
            ("Player", HudField::Player, C_HUD_VALUE),
            ("Time", HudField::Time, C_HUD_VALUE),
            ("Score", HudField::Score, C_HUD_VALUE),
            ("Fail", HudField::Fail, C_HUD_FAIL),
        ];
        out.queue(style::ResetColor)?;
        for (i, (label, field, color)) in rows.iter().enumerate() {
            let value = self.hud_field(*field).unwrap_or("");
            out.queue(cursor::MoveTo(self.panel_col(), i as u16))?;
            out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
            out.queue(Print(format!("{:<8}", label)))?;
            out.queue(style::SetForegroundColor(*color))?;
            out.queue(Print(format!("{:<width$}", value, width = PANEL_WIDTH as usize - 8)))?;
        }
        Ok(())
    }

    fn draw_countdown<W: Write>(&self, out: &mut W, n: u32) -> std::io::Result<()> {
        let text = format!(" {} ", n);
        let col = (self.canvas.cols() / 2).saturating_sub(text.len() / 2) as u16;
        let row = (self.canvas.rows() / 3) as u16;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetBackgroundColor(Color::Black))?;
        out.queue(style::SetForegroundColor(C_COUNTDOWN))?;
        out.queue(Print(text))?;
        Ok(())
    }

    fn draw_box<W: Write>(&self, out: &mut W, lines: &[String]) -> std::io::Result<()> {
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let cx = (self.canvas.cols() + PANEL_WIDTH as usize) / 2;
        let col = cx.saturating_sub(inner / 2 + 1) as u16;
        let top = (self.canvas.rows() / 2).saturating_sub(lines.len() / 2 + 1) as u16;

        out.queue(style::SetBackgroundColor(Color::Black))?;
        out.queue(style::SetForegroundColor(C_POPUP_BORDER))?;
        out.queue(cursor::MoveTo(col, top))?;
        out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
        for (i, line) in lines.iter().enumerate() {
            out.queue(cursor::MoveTo(col, top + 1 + i as u16))?;
            out.queue(style::SetForegroundColor(C_POPUP_BORDER))?;
            out.queue(Print("║"))?;
            out.queue(style::SetForegroundColor(C_POPUP_TEXT))?;
            out.queue(Print(format!(" {:<width$} ", line, width = inner - 2)))?;
            out.queue(style::SetForegroundColor(C_POPUP_BORDER))?;
            out.queue(Print("║"))?;
        }
        out.queue(cursor::MoveTo(col, top + 1 + lines.len() as u16))?;
        out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
        Ok(())
    }

    fn draw_start_popup<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let enter = if self.name_input.trim().is_empty() {
            "(type a name)"
        } else {
            "ENTER - Start"
        };
        let lines = [
            "VIRUS LANES".to_string(),
            String::new(),
            "Player name:".to_string(),
            format!("> {}_", self.name_input),
            String::new(),
            enter.to_string(),
        ];
        self.draw_box(out, &lines)
    }

    fn draw_pause_popup<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let lines = [
            "PAUSED".to_string(),
            String::new(),
            "C / ESC - Continue".to_string(),
            "R - Restart".to_string(),
            "Q - Quit".to_string(),
        ];
        self.draw_box(out, &lines)
    }

    fn draw_game_over_popup<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let [time, score, player] = &self.game_over;
        let lines = [
            "GAME OVER".to_string(),
            String::new(),
            format!("Time:   {}", time),
            format!("Score:  {}", score),
            format!("Player: {}", player),
            String::new(),
            "R - Play Again  Q - Quit".to_string(),
        ];
        self.draw_box(out, &lines)
    }

    fn draw_hint<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.canvas.rows() as u16))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(&self.hint))?;
        out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        Ok(())
    }
}

fn draw_canvas<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.rows() {
        out.queue(cursor::MoveTo(0, row as u16))?;
        let mut last: Option<(Rgba, Rgba)> = None;
        for col in 0..canvas.cols() {
            let Some(cell) = canvas.cell(col, row) else {
                continue;
            };
            if last != Some((cell.fg, cell.bg)) {
                out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                last = Some((cell.fg, cell.bg));
            }
            out.queue(Print(cell.ch))?;
        }
    }
    Ok(())
}

// ── Host traits ───────────────────────────────────────────────────────────────

impl Surface for TerminalHost {
    fn draw_image(&mut self, sprite: Sprite, x: f64, y: f64, w: f64, h: f64) {
        self.canvas.draw_image(sprite, x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        self.canvas.fill_rect(x, y, w, h, color);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: Stroke) {
        self.canvas.stroke_rect(x, y, w, h, stroke);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        self.canvas.fill_circle(cx, cy, radius, color);
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, stroke: Stroke) {
        self.canvas.stroke_circle(cx, cy, radius, stroke);
    }

    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.canvas.clear(x, y, w, h);
    }
}

impl Hud for TerminalHost {
    fn set_field(&mut self, field: HudField, value: &str) {
        self.hud.insert(field, value.to_string());
    }

    fn set_visible(&mut self, visible: bool) {
        self.hud_visible = visible;
    }

    fn set_countdown(&mut self, remaining: Option<u32>) {
        self.countdown = remaining;
    }
}

impl Popups for TerminalHost {
    fn show_popup(&mut self, kind: PopupKind) {
        self.popups.insert(kind);
    }

    fn hide_popup(&mut self, kind: PopupKind) {
        self.popups.remove(&kind);
    }

    fn set_game_over_score(&mut self, time: &str, score: &str, player: &str) {
        self.game_over = [time.to_string(), score.to_string(), player.to_string()];
    }
}

impl IdentityStore for TerminalHost {
    fn player_name(&self) -> Option<String> {
        self.player.clone()
    }

    fn set_player_name(&mut self, name: &str) {
        self.player = Some(name.to_string());
    }
}
