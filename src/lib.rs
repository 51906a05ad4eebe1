//! Virus Lanes - a four-lane reflex arcade game.
//!
//! Viruses fall through four lanes toward a danger zone; the player has to
//! hit the lane key while a virus sits inside the zone.
//!
//! - `entities`: drawable objects, moving entities and viruses
//! - `scene`: lane backgrounds, danger zone and the pulse effect
//! - `score`: the score tracker feeding the HUD
//! - `game`: the controller state machine and per-frame simulation
//! - `schedule`: the cooperative timer/frame scheduler
//! - `host`: traits for everything the engine draws on or talks to
//! - `display`: the terminal implementation of `host`

pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod host;
pub mod input;
pub mod schedule;
pub mod scene;
pub mod score;
pub mod util;

pub use config::Config;
pub use error::Error;
pub use game::{Game, GameState};

/// Number of lanes on the playfield.
pub const LANES: usize = 4;
