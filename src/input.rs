//! Key bindings: lane keys and the pause toggle.

use crossterm::event::KeyCode;

use crate::config::Config;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Lane(usize),
    TogglePause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    lanes: Vec<KeyCode>,
    pause: KeyCode,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            lanes: vec![
                KeyCode::Char('d'),
                KeyCode::Char('f'),
                KeyCode::Char('j'),
                KeyCode::Char('k'),
            ],
            pause: KeyCode::Esc,
        }
    }
}

impl Keymap {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let lanes = config
            .lane_keys
            .iter()
            .map(|k| parse_key(k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            lanes,
            pause: parse_key(&config.pause_key)?,
        })
    }

    /// `None` for keys with no binding.
    pub fn command(&self, code: KeyCode) -> Option<Command> {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        if code == self.pause {
            return Some(Command::TogglePause);
        }
        self.lanes.iter().position(|&k| k == code).map(Command::Lane)
    }

    /// Label for the controls hint, e.g. `D F J K`.
    pub fn lane_labels(&self) -> String {
        self.lanes
            .iter()
            .map(|k| key_label(*k))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_key(name: &str) -> Result<KeyCode, Error> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => return Ok(KeyCode::Char(c.to_ascii_lowercase())),
        (None, _) => return Err(Error::ConfigInvalid("empty key binding".into())),
        _ => {}
    }
    match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        "enter" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        _ => Err(Error::ConfigInvalid(format!("unknown key '{}'", name))),
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "SPACE".to_string(),
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Esc => "ESC".to_string(),
        other => format!("{:?}", other),
    }
}
