//! Game controller.
//!
//! Owns the host, the scheduler, the virus collection and the state machine:
//!
//! ```text
//! Stopped ──run──▶ Countdown ──4th timer tick──▶ Playing ──fails ≥ threshold──▶ GameOver
//!                      ▲                          │   ▲                             │
//!                      │                        pause resume (via run)              │
//!                      │                          ▼   │                             │
//!                      └──────────restart────── Paused ◀──────────restart───────────┘
//! ```
//!
//! Input that does not match the current state is ignored.

use std::time::Duration;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::Config;
use crate::entities::Virus;
use crate::host::{Host, PopupButton, PopupKind};
use crate::input::Command;
use crate::schedule::{Due, Schedule};
use crate::scene::{Scene, C_PULSE};
use crate::score::ScoreBoard;
use crate::util::remove_at;
use crate::LANES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Stopped,
    Countdown,
    Playing,
    Paused,
    GameOver,
}

pub struct Game<H: Host, R: Rng = ThreadRng> {
    config: Config,
    host: H,
    rng: R,
    schedule: Schedule,
    state: GameState,
    scene: Scene,
    score: ScoreBoard,
    viruses: Vec<Virus>,
    frame: u64,
    speed: f64,
    /// Countdown seconds still to announce.
    countdown: u32,
}

impl<H: Host, R: Rng> Game<H, R> {
    /// Build a stopped game and put up the start popup.
    pub fn new(config: Config, host: H, rng: R) -> Self {
        let scene = Scene::new(&config);
        let score = ScoreBoard::new(&host);
        let mut game = Self {
            speed: config.initial_speed,
            countdown: config.countdown_seconds,
            config,
            host,
            rng,
            schedule: Schedule::new(),
            state: GameState::Stopped,
            scene,
            score,
            viruses: Vec::new(),
            frame: 0,
        };
        game.host.set_visible(false);
        game.score.refresh(&mut game.host);
        game.redraw_backdrop();
        game.host.show_popup(PopupKind::Start);
        game
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn viruses(&self) -> &[Virus] {
        &self.viruses
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Start button: store the player name and begin the countdown.
    pub fn start(&mut self, player: &str) {
        let player = player.trim();
        if self.state != GameState::Stopped || player.is_empty() {
            log::trace!("start ignored in {:?}", self.state);
            return;
        }
        self.host.set_player_name(player);
        self.score.set_player(player, &mut self.host);
        self.host.hide_popup(PopupKind::Start);
        self.run();
    }

    /// Enter the countdown. Only valid from `Stopped` or `Paused`.
    pub fn run(&mut self) {
        if !matches!(self.state, GameState::Stopped | GameState::Paused) {
            log::trace!("run ignored in {:?}", self.state);
            return;
        }
        self.schedule.cancel();
        self.redraw_backdrop();
        self.countdown = self.config.countdown_seconds;
        self.state = GameState::Countdown;
        self.schedule.start_timer(self.config.timer_period());
        log::info!("Countdown started ({}s)", self.countdown);
    }

    pub fn pause(&mut self) {
        if self.state != GameState::Playing {
            log::trace!("pause ignored in {:?}", self.state);
            return;
        }
        self.schedule.cancel();
        self.clear_surface();
        self.host.show_popup(PopupKind::Pause);
        self.state = GameState::Paused;
        log::info!("Paused at frame {}", self.frame);
    }

    /// Leave the pause popup. Goes through the countdown again.
    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            log::trace!("resume ignored in {:?}", self.state);
            return;
        }
        self.host.hide_popup(PopupKind::Pause);
        self.run();
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            other => log::trace!("pause toggle ignored in {:?}", other),
        }
    }

    /// Reset everything but the player name and count down again. Valid
    /// from `GameOver` and `Paused`.
    pub fn restart(&mut self) {
        if !matches!(self.state, GameState::GameOver | GameState::Paused) {
            log::trace!("restart ignored in {:?}", self.state);
            return;
        }
        self.schedule.cancel();
        self.host.hide_popup(PopupKind::GameOver);
        self.host.hide_popup(PopupKind::Pause);
        self.host.set_countdown(None);

        self.speed = self.config.initial_speed;
        self.frame = 0;
        self.viruses.clear();
        self.score.reset(&mut self.host);
        self.state = GameState::Stopped;
        log::info!("Game restarted");

        self.run();
    }

    fn game_over(&mut self) {
        self.schedule.cancel();
        self.state = GameState::GameOver;
        let score = self.score.score().to_string();
        self.host.set_game_over_score(
            &self.score.formatted_time(),
            &score,
            self.score.player(),
        );
        self.host.show_popup(PopupKind::GameOver);
        self.host.set_visible(false);
        log::info!(
            "Game over: player={} time={} score={} frames={}",
            self.score.player(),
            self.score.formatted_time(),
            score,
            self.frame
        );
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn command(&mut self, command: Command) {
        match command {
            Command::Lane(lane) => self.select_lane(lane),
            Command::TogglePause => self.toggle_pause(),
        }
    }

    pub fn press(&mut self, button: PopupButton) {
        match button {
            PopupButton::Start => {
                let player = self
                    .host
                    .player_name()
                    .unwrap_or_else(|| self.score.player().to_string());
                self.start(&player);
            }
            PopupButton::Continue => self.resume(),
            PopupButton::Restart => self.restart(),
        }
    }

    /// Lane key: flash the lane and kill whatever sits in its danger zone.
    pub fn select_lane(&mut self, lane: usize) {
        if self.state != GameState::Playing || lane >= LANES {
            log::trace!("lane {} ignored in {:?}", lane, self.state);
            return;
        }
        self.scene.pulse(lane, C_PULSE);
        self.kill_virus_in_danger_area(lane);
    }

    /// Kill the first live virus in `lane` whose top edge has crossed into
    /// the danger zone. Returns whether one was found.
    pub fn kill_virus_in_danger_area(&mut self, lane: usize) -> bool {
        let danger_line = self.config.danger_line();
        let Some(virus) = self
            .viruses
            .iter_mut()
            .find(|v| v.is_alive() && v.lane() == lane && v.trailing_edge() >= danger_line)
        else {
            return false;
        };
        self.score.increment_score(1, &mut self.host);
        virus.kill();
        log::debug!("Killed virus in lane {} at y={:.1}", lane, virus.pos().y);
        true
    }

    // ── Simulation ───────────────────────────────────────────────────────────

    /// Feed elapsed wall time and run every callback that falls due.
    pub fn advance(&mut self, dt: Duration) {
        self.schedule.advance(dt);
        while let Some(due) = self.schedule.next_due() {
            match due {
                Due::Timer => self.timer_tick(),
                Due::Frame => self.frame_tick(),
            }
        }
    }

    /// Coarse tick: announce the countdown, or spawn and keep time.
    ///
    /// The tick after the last announced second only switches to `Playing`
    /// and starts the frame loop; the first virus comes one tick later.
    pub fn timer_tick(&mut self) {
        match self.state {
            GameState::Countdown => {
                if self.countdown > 0 {
                    self.host.set_countdown(Some(self.countdown));
                    self.countdown -= 1;
                    return;
                }
                self.host.set_countdown(None);
                self.state = GameState::Playing;
                self.score.show(&mut self.host);
                self.schedule.start_frames(self.config.frame_period());
                log::info!("Playing");
            }
            GameState::Playing => {
                self.spawn_virus();
                self.score.increment_time(1, &mut self.host);
            }
            _ => {}
        }
    }

    /// One simulated frame while playing: redraw, ramp the speed, move or age
    /// every virus and resolve escapes.
    pub fn frame_tick(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.clear_surface();
        self.scene.tick();
        self.scene.render(&mut self.host);

        self.frame += 1;
        self.speed += self.config.speed_step;

        let kill_line = self.config.kill_line();
        let mut i = 0;
        while i < self.viruses.len() {
            let virus = &mut self.viruses[i];
            if !virus.is_alive() {
                if virus.age(&mut self.host) {
                    remove_at(&mut self.viruses, i);
                    continue;
                }
            } else {
                virus.fall(self.speed, &mut self.host);
                if virus.leading_edge() >= kill_line {
                    log::debug!("Virus escaped in lane {}", virus.lane());
                    remove_at(&mut self.viruses, i);
                    self.score.increment_fail(1, &mut self.host);
                    continue;
                }
            }
            i += 1;
        }

        if self.score.fail() >= self.config.fail_threshold {
            self.game_over();
        }
    }

    /// Spawn a virus on a random lane.
    pub fn spawn_virus(&mut self) {
        let lane = self.rng.gen_range(0..LANES);
        self.spawn_virus_at(lane);
    }

    /// Spawn a virus on `lane`. Out-of-range lanes are ignored.
    pub fn spawn_virus_at(&mut self, lane: usize) {
        if lane >= LANES {
            log::trace!("spawn ignored for lane {}", lane);
            return;
        }
        let mut virus = Virus::new(lane, self.config.lane_width(), self.config.death_frames);
        virus.set_padding(self.config.virus_padding);
        log::debug!("Spawned virus in lane {}", lane);
        self.viruses.push(virus);
    }

    // ── Drawing helpers ──────────────────────────────────────────────────────

    fn clear_surface(&mut self) {
        self.host
            .clear(0.0, 0.0, self.config.canvas_width, self.config.canvas_height);
    }

    /// Any running lane pulse is dropped.
    fn redraw_backdrop(&mut self) {
        self.scene.reset_pulses();
        self.clear_surface();
        self.scene.render(&mut self.host);
    }
}
