mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use danmaku_shooter::compute::{init_state, tick};
use danmaku_shooter::config::GameConfig;
use danmaku_shooter::entities::{Difficulty, GameState, SessionParams, ShipType};
use danmaku_shooter::events::SceneTransition;
use danmaku_shooter::input::InputSnapshot;
use danmaku_shooter::render;
use danmaku_shooter::select::{MenuAction, SelectMenu};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser)]
#[command(name = "danmaku-shooter")]
#[command(about = "Vertical-scrolling bullet-hell shooter for the terminal")]
struct Cli {
    /// Ship type (1 rapid, 2 heavy, 3 spread)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    ship: Option<u8>,
    /// Difficulty; with --ship, skips the select menu
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file overriding game tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write logs here (RUST_LOG filters, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn menu(&self) -> SelectMenu {
        let mut menu = SelectMenu::default();
        if let Some(ship) = self.ship.and_then(ShipType::from_number) {
            menu.ship = ship;
        }
        if let Some(difficulty) = self.difficulty {
            menu.difficulty = difficulty.into();
        }
        menu
    }

    fn preselected(&self) -> Option<SessionParams> {
        match (self.ship, self.difficulty) {
            (Some(_), Some(_)) => Some(self.menu().session()),
            _ => None,
        }
    }
}

/// The terminal is in raw mode, so logs only go to a file when asked.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this window. Covers terminals that don't emit key-release events: OS key
/// repeat runs at 15 Hz or more, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

struct HeldKeys {
    seen: HashMap<KeyCode, Instant>,
}

impl HeldKeys {
    fn new() -> Self {
        Self { seen: HashMap::new() }
    }

    fn press(&mut self, code: KeyCode, at: Instant) {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        self.seen.insert(code, at);
    }

    fn release(&mut self, code: KeyCode) {
        if let KeyCode::Char(c) = code {
            self.seen.remove(&KeyCode::Char(c.to_ascii_lowercase()));
        } else {
            self.seen.remove(&code);
        }
    }

    fn any(&self, keys: &[KeyCode], now: Instant) -> bool {
        keys.iter().any(|k| {
            self.seen
                .get(k)
                .map_or(false, |&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
        })
    }

    fn snapshot(&self, now: Instant) -> InputSnapshot {
        InputSnapshot {
            up: self.any(&[KeyCode::Up, KeyCode::Char('w')], now),
            down: self.any(&[KeyCode::Down, KeyCode::Char('s')], now),
            left: self.any(&[KeyCode::Left, KeyCode::Char('a')], now),
            right: self.any(&[KeyCode::Right, KeyCode::Char('d')], now),
            fire: self.any(&[KeyCode::Char(' '), KeyCode::Char('z')], now),
            grenade: self.any(&[KeyCode::Char('x')], now),
            summon: self.any(&[KeyCode::Char('b')], now),
            menu: self.any(&[KeyCode::Char('m')], now),
            gamepad: None,
        }
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

/// Blocks until the player starts a session (`Some`) or quits (`None`).
fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    menu: &mut SelectMenu,
    high_score: u32,
) -> Result<Option<SessionParams>> {
    loop {
        display::render_menu(out, menu, high_score, terminal::size()?)?;

        let Ok(event) = rx.recv() else {
            return Ok(None);
        };
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) = event else {
            continue;
        };
        if is_quit(code, modifiers) {
            return Ok(None);
        }
        let action = match code {
            KeyCode::Right | KeyCode::Char('d') => MenuAction::Next,
            KeyCode::Left | KeyCode::Char('a') => MenuAction::Previous,
            KeyCode::Up | KeyCode::Char('w') => MenuAction::Up,
            KeyCode::Down | KeyCode::Char('s') => MenuAction::Down,
            KeyCode::Tab => MenuAction::ToggleFocus,
            KeyCode::Enter | KeyCode::Char(' ') => MenuAction::Confirm,
            _ => continue,
        };
        if let Some(session) = menu.apply(action) {
            return Ok(Some(session));
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum GameExit {
    Quit,
    Transition(SceneTransition),
}

/// Input model: a `HeldKeys` map records when every key was last pressed or
/// repeated. Each tick the keys still inside `HOLD_WINDOW` become the input
/// snapshot, so movement, fire and one-shot buttons combine freely. Terminals
/// with keyboard enhancement also report releases, which drop keys at once.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> Result<GameExit> {
    let frame = Duration::from_millis(state.config.tick_millis());
    let tick_rate = u64::from(state.config.tick_rate.max(1));
    let mut keys = HeldKeys::new();
    let mut ticks: u64 = 0;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if is_quit(code, modifiers) {
                        return Ok(GameExit::Quit);
                    }
                    keys.press(code, frame_start);
                }
                KeyEventKind::Repeat => keys.press(code, frame_start),
                KeyEventKind::Release => keys.release(code),
            }
        }

        let input = keys.snapshot(frame_start);
        let now_ms = ticks * 1000 / tick_rate;
        ticks += 1;
        let transition = tick(state, &input, now_ms, rng);
        for event in &state.events {
            debug!("{event:?}");
        }
        if let Some(transition) = transition {
            return Ok(GameExit::Transition(transition));
        }

        display::render(out, &render::build(state), terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

/// Blocks on the game-over screen. `true` → back to select, `false` → quit.
fn show_game_over<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    score: u32,
    high_score: u32,
) -> Result<bool> {
    display::render_game_over(out, score, high_score, terminal::size()?)?;
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(false);
        };
        if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) = event {
            if is_quit(code, modifiers) {
                return Ok(false);
            }
            if matches!(code, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter) {
                return Ok(true);
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("starting with {config:?}, seed {:?}", cli.seed);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

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

    let result = run(&mut out, &rx, &cli, config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    config: GameConfig,
    rng: &mut StdRng,
) -> Result<()> {
    let mut high_score = 0;
    let mut menu = cli.menu();
    let mut next_session = cli.preselected();

    loop {
        let session = match next_session.take() {
            Some(session) => session,
            None => match show_menu(out, rx, &mut menu, high_score)? {
                Some(session) => session,
                None => break,
            },
        };
        info!("session start: {session:?}");

        let mut state = init_state(session, config.clone(), high_score);
        let exit = game_loop(out, &mut state, rx, rng)?;
        high_score = high_score.max(state.score);

        match exit {
            GameExit::Quit => break,
            GameExit::Transition(SceneTransition::PlayerSelect { ship, difficulty }) => {
                menu = SelectMenu::with_session(SessionParams { ship, difficulty });
            }
            GameExit::Transition(SceneTransition::GameOver { score }) => {
                info!("game over: score {score}, best {high_score}");
                if !show_game_over(out, rx, score, high_score)? {
                    break;
                }
                menu = SelectMenu::with_session(session);
            }
        }
    }
    Ok(())
}
