mod common;

use std::time::Duration;

use common::{frames_until, new_game, playing_game, Draw, RecordingHost};
use virus_lanes::entities::{Sprite, VirusPhase};
use virus_lanes::host::{HudField, PopupButton, PopupKind};
use virus_lanes::input::Command;
use virus_lanes::scene::C_PULSE;
use virus_lanes::{Config, Game, GameState};

const SEC: Duration = Duration::from_secs(1);

// ── Start & countdown ─────────────────────────────────────────────────────────

#[test]
fn new_game_is_stopped_behind_start_popup() {
    let game = new_game();
    assert_eq!(game.state(), GameState::Stopped);
    assert!(game.host().popups.contains(&PopupKind::Start));
    assert!(!game.host().hud_visible);
    assert!(game.schedule().is_idle());
}

#[test]
fn start_stores_player_and_enters_countdown() {
    let mut game = new_game();
    game.start("  ada ");
    assert_eq!(game.state(), GameState::Countdown);
    assert_eq!(game.host().player.as_deref(), Some("ada"));
    assert_eq!(game.score().player(), "ada");
    assert!(!game.host().popups.contains(&PopupKind::Start));
}

#[test]
fn start_with_blank_name_is_ignored() {
    let mut game = new_game();
    game.start("   ");
    assert_eq!(game.state(), GameState::Stopped);
}

#[test]
fn start_button_uses_identity_store() {
    let mut game = Game::new(
        Config::default(),
        RecordingHost::with_player("grace"),
        common::seeded_rng(),
    );
    assert_eq!(game.score().player(), "grace");
    game.press(PopupButton::Start);
    assert_eq!(game.state(), GameState::Countdown);
}

#[test]
fn countdown_then_play_then_spawn() {
    let mut game = new_game();
    game.run();
    assert_eq!(game.state(), GameState::Countdown);

    for _ in 0..3 {
        game.advance(SEC);
        assert_eq!(game.state(), GameState::Countdown);
        assert!(game.viruses().is_empty());
    }
    assert_eq!(game.host().countdowns, vec![Some(3), Some(2), Some(1)]);
    assert!(!game.schedule().frames_running());

    game.advance(SEC);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.host().countdowns.last(), Some(&None));
    assert!(game.host().hud_visible);
    assert!(game.schedule().frames_running());

    game.advance(SEC);
    assert_eq!(game.viruses().len(), 1);
    assert_eq!(game.score().time(), 1);
    assert!(game.frame() >= 1);
}

#[test]
fn run_while_counting_down_does_not_duplicate_timer() {
    let mut game = new_game();
    game.run();
    game.run();
    game.advance(SEC);
    assert_eq!(game.host().countdowns, vec![Some(3)]);
}

#[test]
fn frames_do_nothing_outside_play() {
    let mut game = new_game();
    game.run();
    game.frame_tick();
    assert_eq!(game.frame(), 0);
    assert_eq!(game.speed(), 1.0);
}

// ── Per-frame simulation ──────────────────────────────────────────────────────

#[test]
fn each_timer_tick_spawns_one_padded_virus() {
    let mut game = playing_game();
    game.timer_tick();
    game.timer_tick();
    assert_eq!(game.viruses().len(), 2);
    assert_eq!(game.score().time(), 2);
    for v in game.viruses() {
        assert!(v.lane() < 4);
        assert_eq!(v.width(), 45.0);
        assert_eq!(v.pos().x, 10.0 + 65.0 * v.lane() as f64);
    }
}

#[test]
fn speed_ramps_every_frame() {
    let mut game = playing_game();
    for _ in 0..100 {
        game.frame_tick();
    }
    assert_eq!(game.frame(), 100);
    assert!((game.speed() - 1.1).abs() < 1e-9);
}

#[test]
fn spawn_on_unknown_lane_is_ignored() {
    let mut game = playing_game();
    game.spawn_virus_at(7);
    assert!(game.viruses().is_empty());
    for _ in 0..700 {
        game.frame_tick();
    }
    assert_eq!(game.score().fail(), 0);
}

#[test]
fn live_virus_falls_at_current_speed() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    let y0 = game.viruses()[0].pos().y;
    game.frame_tick();
    let y1 = game.viruses()[0].pos().y;
    assert!((y1 - y0 - game.speed()).abs() < 1e-9);
}

#[test]
fn escaped_virus_counts_as_failure() {
    let mut game = playing_game();
    game.spawn_virus_at(2);
    frames_until(&mut game, 2000, |g| g.viruses().is_empty());
    assert_eq!(game.score().fail(), 1);
    assert_eq!(game.score().score(), 0);
    assert_eq!(game.host().field(HudField::Fail), "1");
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn escape_happens_when_leading_edge_reaches_kill_line() {
    let mut game = playing_game();
    game.spawn_virus_at(1);
    let kill_line = game.config().kill_line();
    let speed_step = game.config().speed_step;
    frames_until(&mut game, 2000, |g| {
        let v = &g.viruses()[0];
        // next frame would push it over
        v.leading_edge() + g.speed() + speed_step >= kill_line
    });
    assert_eq!(game.viruses().len(), 1);
    game.frame_tick();
    assert!(game.viruses().is_empty());
    assert_eq!(game.score().fail(), 1);
}

#[test]
fn dead_virus_removed_after_death_frames() {
    let mut game = playing_game();
    game.spawn_virus_at(3);
    let danger = game.config().danger_line();
    frames_until(&mut game, 2000, |g| g.viruses()[0].trailing_edge() >= danger);
    assert!(game.kill_virus_in_danger_area(3));

    for _ in 0..39 {
        game.frame_tick();
    }
    assert_eq!(game.viruses()[0].phase(), VirusPhase::Dying { ticks: 39 });
    game.frame_tick();
    assert!(game.viruses().is_empty());
    assert_eq!(game.score().fail(), 0);
}

#[test]
fn frame_redraws_scene_after_clearing() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.host_mut().draws.clear();
    game.frame_tick();
    let draws = &game.host().draws;
    assert_eq!(draws[0], Draw::Clear(0.0, 0.0, 260.0, 680.0));
    assert!(game.host().images().contains(&Sprite::Virus));
}

// ── Lane select ───────────────────────────────────────────────────────────────

#[test]
fn lane_select_kills_virus_in_danger_zone() {
    let mut game = playing_game();
    game.spawn_virus_at(1);
    let danger = game.config().danger_line();
    frames_until(&mut game, 2000, |g| g.viruses()[0].trailing_edge() >= danger);

    game.command(Command::Lane(1));
    assert_eq!(game.score().score(), 1);
    assert_eq!(game.viruses()[0].phase(), VirusPhase::Dying { ticks: 0 });
    assert_eq!(game.viruses()[0].mover.body.image(), Some(Sprite::Splash));
    assert!(game.scene().lane(1).unwrap().is_pulsing());
}

#[test]
fn lane_select_outside_danger_zone_only_pulses() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.frame_tick();
    game.select_lane(0);
    assert_eq!(game.score().score(), 0);
    assert!(game.viruses()[0].is_alive());
    assert!(game.scene().lane(0).unwrap().is_pulsing());
}

#[test]
fn lane_select_in_wrong_lane_misses() {
    let mut game = playing_game();
    game.spawn_virus_at(2);
    let danger = game.config().danger_line();
    frames_until(&mut game, 2000, |g| g.viruses()[0].trailing_edge() >= danger);
    game.select_lane(3);
    assert_eq!(game.score().score(), 0);
    assert!(game.viruses()[0].is_alive());
}

#[test]
fn only_first_eligible_virus_is_killed() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.spawn_virus_at(0);
    let danger = game.config().danger_line();
    frames_until(&mut game, 2000, |g| g.viruses()[0].trailing_edge() >= danger);

    game.select_lane(0);
    assert_eq!(game.score().score(), 1);
    assert!(!game.viruses()[0].is_alive());
    assert!(game.viruses()[1].is_alive());

    // The second one is now the first eligible.
    game.select_lane(0);
    assert_eq!(game.score().score(), 2);
    assert!(!game.viruses()[1].is_alive());

    // Nothing left to kill.
    game.select_lane(0);
    assert_eq!(game.score().score(), 2);
}

#[test]
fn lane_select_ignored_unless_playing() {
    let mut game = new_game();
    game.select_lane(0);
    assert!(!game.scene().lane(0).unwrap().is_pulsing());

    let mut game = playing_game();
    game.pause();
    game.select_lane(0);
    assert!(!game.scene().lane(0).unwrap().is_pulsing());
}

// ── Pause / resume ────────────────────────────────────────────────────────────

#[test]
fn pause_cancels_loops_and_shows_popup() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.host_mut().draws.clear();

    game.command(Command::TogglePause);
    assert_eq!(game.state(), GameState::Paused);
    assert!(game.schedule().is_idle());
    assert!(game.host().popups.contains(&PopupKind::Pause));
    assert_eq!(game.host().draws, vec![Draw::Clear(0.0, 0.0, 260.0, 680.0)]);

    let y = game.viruses()[0].pos().y;
    game.advance(SEC * 5);
    assert_eq!(game.viruses()[0].pos().y, y);
    assert_eq!(game.viruses().len(), 1);
}

#[test]
fn resume_goes_through_countdown_again() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.pause();
    game.toggle_pause();
    assert_eq!(game.state(), GameState::Countdown);
    assert!(!game.host().popups.contains(&PopupKind::Pause));
    assert_eq!(game.viruses().len(), 1);

    for _ in 0..4 {
        game.advance(SEC);
    }
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn pulse_armed_before_pause_is_gone_after_resume() {
    let mut game = playing_game();
    game.select_lane(2);
    assert!(game.scene().lane(2).unwrap().is_pulsing());
    game.pause();
    game.resume();

    let lane = game.scene().lane(2).unwrap();
    assert!(!lane.is_pulsing());
    assert_eq!(lane.body.color(), Some(lane.base_color()));
    let flashes = game
        .host()
        .draws
        .iter()
        .filter(|d| matches!(d, Draw::FillRect(.., c) if *c == C_PULSE))
        .count();
    assert_eq!(flashes, 0);
}

#[test]
fn continue_button_resumes() {
    let mut game = playing_game();
    game.pause();
    game.press(PopupButton::Continue);
    assert_eq!(game.state(), GameState::Countdown);
}

#[test]
fn pause_ignored_during_countdown() {
    let mut game = new_game();
    game.run();
    game.toggle_pause();
    assert_eq!(game.state(), GameState::Countdown);
}

// ── Game over & restart ───────────────────────────────────────────────────────

fn lose(game: &mut common::TestGame) {
    for lane in 0..10 {
        game.spawn_virus_at(lane % 4);
    }
    frames_until(game, 2000, |g| g.state() == GameState::GameOver);
}

#[test]
fn tenth_failure_ends_the_game_once() {
    let mut game = playing_game();
    lose(&mut game);

    assert_eq!(game.score().fail(), 10);
    assert!(game.schedule().is_idle());
    assert!(game.host().popups.contains(&PopupKind::GameOver));
    assert!(!game.host().hud_visible);
    assert_eq!(
        game.host().game_over,
        Some(("00:00".to_string(), "0".to_string(), "tester".to_string()))
    );
    let shown = game
        .host()
        .popup_log
        .iter()
        .filter(|e| **e == (PopupKind::GameOver, true))
        .count();
    assert_eq!(shown, 1);

    let frame = game.frame();
    game.advance(SEC * 10);
    game.frame_tick();
    game.timer_tick();
    assert_eq!(game.frame(), frame);
    assert!(game.viruses().is_empty());
    assert_eq!(game.state(), GameState::GameOver);
}

#[test]
fn nine_failures_keep_playing() {
    let mut game = playing_game();
    for lane in 0..9 {
        game.spawn_virus_at(lane % 4);
    }
    frames_until(&mut game, 2000, |g| g.viruses().is_empty());
    assert_eq!(game.score().fail(), 9);
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn restart_resets_everything_and_counts_down() {
    let mut game = playing_game();
    game.timer_tick();
    game.spawn_virus_at(1);
    lose(&mut game);
    assert!(game.speed() > 1.0);

    game.press(PopupButton::Restart);
    assert_eq!(game.state(), GameState::Countdown);
    assert_eq!(game.speed(), 1.0);
    assert_eq!(game.frame(), 0);
    assert!(game.viruses().is_empty());
    assert_eq!(
        (game.score().time(), game.score().score(), game.score().fail()),
        (0, 0, 0)
    );
    assert_eq!(game.score().player(), "tester");
    assert!(!game.host().popups.contains(&PopupKind::GameOver));
    assert!(game.schedule().timer_running());
    assert!(!game.schedule().frames_running());
}

#[test]
fn restart_from_pause() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.pause();
    game.restart();
    assert_eq!(game.state(), GameState::Countdown);
    assert!(game.viruses().is_empty());
    assert!(!game.host().popups.contains(&PopupKind::Pause));
}

#[test]
fn restart_ignored_while_playing() {
    let mut game = playing_game();
    game.spawn_virus_at(0);
    game.restart();
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.viruses().len(), 1);
}
