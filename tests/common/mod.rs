#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;

use virus_lanes::entities::{Rgba, Sprite, Stroke};
use virus_lanes::host::{Hud, HudField, IdentityStore, PopupKind, Popups, Surface};
use virus_lanes::{Config, Game, GameState};

/// Every call a host can receive, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Image(Sprite, f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64, Rgba),
    StrokeRect(f64, f64, f64, f64, Stroke),
    FillCircle(f64, f64, f64, Rgba),
    StrokeCircle(f64, f64, f64, Stroke),
    Clear(f64, f64, f64, f64),
}

#[derive(Default, Debug)]
pub struct RecordingHost {
    pub draws: Vec<Draw>,
    pub fields: HashMap<HudField, String>,
    pub hud_refreshes: usize,
    pub hud_visible: bool,
    pub countdowns: Vec<Option<u32>>,
    pub popups: HashSet<PopupKind>,
    pub popup_log: Vec<(PopupKind, bool)>,
    pub game_over: Option<(String, String, String)>,
    pub player: Option<String>,
}

impl RecordingHost {
    pub fn with_player(name: &str) -> Self {
        Self {
            player: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn field(&self, field: HudField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn images(&self) -> Vec<Sprite> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::Image(s, ..) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingHost {
    fn draw_image(&mut self, sprite: Sprite, x: f64, y: f64, w: f64, h: f64) {
        self.draws.push(Draw::Image(sprite, x, y, w, h));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        self.draws.push(Draw::FillRect(x, y, w, h, color));
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: Stroke) {
        self.draws.push(Draw::StrokeRect(x, y, w, h, stroke));
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        self.draws.push(Draw::FillCircle(cx, cy, radius, color));
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, stroke: Stroke) {
        self.draws.push(Draw::StrokeCircle(cx, cy, radius, stroke));
    }

    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.draws.push(Draw::Clear(x, y, w, h));
    }
}

impl Hud for RecordingHost {
    fn set_field(&mut self, field: HudField, value: &str) {
        self.hud_refreshes += 1;
        self.fields.insert(field, value.to_string());
    }

    fn set_visible(&mut self, visible: bool) {
        self.hud_visible = visible;
    }

    fn set_countdown(&mut self, remaining: Option<u32>) {
        self.countdowns.push(remaining);
    }
}

impl Popups for RecordingHost {
    fn show_popup(&mut self, kind: PopupKind) {
        self.popups.insert(kind);
        self.popup_log.push((kind, true));
    }

    fn hide_popup(&mut self, kind: PopupKind) {
        self.popups.remove(&kind);
        self.popup_log.push((kind, false));
    }

    fn set_game_over_score(&mut self, time: &str, score: &str, player: &str) {
        self.game_over = Some((time.to_string(), score.to_string(), player.to_string()));
    }
}

impl IdentityStore for RecordingHost {
    fn player_name(&self) -> Option<String> {
        self.player.clone()
    }

    fn set_player_name(&mut self, name: &str) {
        self.player = Some(name.to_string());
    }
}

pub type TestGame = Game<RecordingHost, StdRng>;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn new_game() -> TestGame {
    Game::new(Config::default(), RecordingHost::default(), seeded_rng())
}

/// A game that has finished its countdown and is playing, with no viruses.
pub fn playing_game() -> TestGame {
    let mut game = new_game();
    game.start("tester");
    for _ in 0..4 {
        game.timer_tick();
    }
    assert_eq!(game.state(), GameState::Playing);
    game
}

/// Run frames until `done` holds, failing after `limit` frames.
pub fn frames_until(game: &mut TestGame, limit: usize, mut done: impl FnMut(&TestGame) -> bool) {
    for _ in 0..limit {
        if done(game) {
            return;
        }
        game.frame_tick();
    }
    assert!(done(game), "condition not reached within {} frames", limit);
}
