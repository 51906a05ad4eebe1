use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use virus_lanes::display::{fit_playfield, TerminalHost};
use virus_lanes::host::{PopupButton, PopupKind};
use virus_lanes::input::Keymap;
use virus_lanes::{Config, Error, Game, GameState};

type TerminalGame = Game<TerminalHost>;

/// Loop pacing for input and output. The game's own frame callback runs
/// on its scheduler, driven by the elapsed time measured here.
const FRAME: Duration = Duration::from_millis(16);

/// Route logs to the configured file; the alternate screen owns stdout
/// and stderr would tear it. Without a log file logging stays off.
fn init_logging(config: &Config) -> Result<(), Error> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

/// Apply one key press. Popups take the key first, then the keymap.
fn handle_key(game: &mut TerminalGame, keymap: &Keymap, key: KeyEvent) -> Flow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Flow::Quit;
    }

    if game.host().popup_visible(PopupKind::Start) {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Enter => {
                if game.host_mut().submit_name() {
                    game.press(PopupButton::Start);
                }
            }
            KeyCode::Backspace => game.host_mut().backspace(),
            KeyCode::Char(c) => game.host_mut().type_char(c),
            _ => {}
        }
        return Flow::Continue;
    }

    match (game.state(), key.code) {
        (_, KeyCode::Char('q') | KeyCode::Char('Q')) => return Flow::Quit,
        (GameState::Paused, KeyCode::Char('c') | KeyCode::Char('C')) => {
            game.press(PopupButton::Continue);
            return Flow::Continue;
        }
        (GameState::Paused | GameState::GameOver, KeyCode::Char('r') | KeyCode::Char('R')) => {
            game.press(PopupButton::Restart);
            return Flow::Continue;
        }
        _ => {}
    }

    match keymap.command(key.code) {
        Some(command) => game.command(command),
        None => log::trace!("Unbound key {:?}", key.code),
    }
    Flow::Continue
}

fn game_loop<W: Write>(
    out: &mut W,
    game: &mut TerminalGame,
    keymap: &Keymap,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(key) = ev {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Flow::Quit = handle_key(game, keymap, key) {
                    return Ok(());
                }
            }
        }

        let now = Instant::now();
        game.advance(now - last);
        last = now;

        game.host().render(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    config.validate()?;
    let keymap = Keymap::from_config(&config)?;
    init_logging(&config)?;
    log::info!("Virus Lanes starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &config, &keymap, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Exiting with error: {}", e);
    }
    result.map_err(Error::from)
}

fn run<W: Write>(
    out: &mut W,
    config: &Config,
    keymap: &Keymap,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let (cols, rows) = fit_playfield(width, height, config);
    let hint = format!(
        "{} : Hit lane   ESC : Pause   Q : Quit",
        keymap.lane_labels()
    );
    let host = TerminalHost::new(cols, rows, config, hint);
    let mut game = Game::new(config.clone(), host, thread_rng());
    game_loop(out, &mut game, keymap, rx)
}
