//! Everything the engine talks to but does not own.
//!
//! The controller holds one `Host` and hands the relevant face of it to each
//! subsystem. Implementations must treat every call as best effort: a HUD
//! slot or popup that does not exist is simply not updated.

use crate::entities::{Rgba, Sprite, Stroke};

/// A 2D drawing target in logical canvas pixels.
pub trait Surface {
    /// Draw `sprite` stretched to the given box.
    fn draw_image(&mut self, sprite: Sprite, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: Stroke);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba);
    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, stroke: Stroke);
    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudField {
    Time,
    Score,
    Fail,
    Player,
}

/// The scoreboard panel.
pub trait Hud {
    fn set_field(&mut self, field: HudField, value: &str);
    fn set_visible(&mut self, visible: bool);
    /// Seconds left before play starts; `None` clears the display.
    fn set_countdown(&mut self, remaining: Option<u32>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupKind {
    Start,
    Pause,
    GameOver,
}

/// Buttons a popup can report back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupButton {
    Start,
    Continue,
    Restart,
}

pub trait Popups {
    fn show_popup(&mut self, kind: PopupKind);
    fn hide_popup(&mut self, kind: PopupKind);
    /// Fill the game-over popup. Called before it is shown.
    fn set_game_over_score(&mut self, time: &str, score: &str, player: &str);
}

/// Where the player name lives between games.
pub trait IdentityStore {
    fn player_name(&self) -> Option<String>;
    fn set_player_name(&mut self, name: &str);
}

/// The full set of collaborators a controller runs against.
pub trait Host: Surface + Hud + Popups + IdentityStore {}

impl<T: Surface + Hud + Popups + IdentityStore> Host for T {}
