//! Score tracker. Every mutation pushes the new values to the HUD.

use crate::host::{Hud, HudField, IdentityStore};
use crate::util::format_time;

pub const UNKNOWN_PLAYER: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreBoard {
    time: u64,
    score: u32,
    fail: u32,
    player: String,
}

impl ScoreBoard {
    /// Read the player name once from the identity store.
    pub fn new(identity: &dyn IdentityStore) -> Self {
        Self {
            time: 0,
            score: 0,
            fail: 0,
            player: identity
                .player_name()
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
        }
    }

    /// Push all four fields to the HUD.
    pub fn refresh(&self, hud: &mut dyn Hud) {
        hud.set_field(HudField::Time, &self.formatted_time());
        hud.set_field(HudField::Score, &self.score.to_string());
        hud.set_field(HudField::Fail, &self.fail.to_string());
        hud.set_field(HudField::Player, &self.player);
    }

    /// Show the panel and refresh it.
    pub fn show(&self, hud: &mut dyn Hud) {
        hud.set_visible(true);
        self.refresh(hud);
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn fail(&self) -> u32 {
        self.fail
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn formatted_time(&self) -> String {
        format_time(self.time)
    }

    pub fn set_time(&mut self, time: u64, hud: &mut dyn Hud) {
        self.time = time;
        self.refresh(hud);
    }

    pub fn set_score(&mut self, score: u32, hud: &mut dyn Hud) {
        self.score = score;
        self.refresh(hud);
    }

    pub fn set_fail(&mut self, fail: u32, hud: &mut dyn Hud) {
        self.fail = fail;
        self.refresh(hud);
    }

    pub fn set_player(&mut self, player: &str, hud: &mut dyn Hud) {
        self.player = player.to_string();
        self.refresh(hud);
    }

    pub fn increment_time(&mut self, by: u64, hud: &mut dyn Hud) {
        self.time += by;
        self.refresh(hud);
    }

    pub fn increment_score(&mut self, by: u32, hud: &mut dyn Hud) {
        self.score += by;
        self.refresh(hud);
    }

    pub fn increment_fail(&mut self, by: u32, hud: &mut dyn Hud) {
        self.fail += by;
        self.refresh(hud);
    }

    /// Zero time, score and fails. The player name is kept.
    pub fn reset(&mut self, hud: &mut dyn Hud) {
        self.time = 0;
        self.score = 0;
        self.fail = 0;
        self.refresh(hud);
    }
}
