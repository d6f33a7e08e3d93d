mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invader::compute::{menu_state, start_match, tick, TickInput};
use space_invader::config::GameConfig;
use space_invader::entities::{GameState, Phase};
use space_invader::error::{GameError, GameResult};
use space_invader::sprite::Assets;

#[derive(Parser)]
#[command(name = "space_invader")]
#[command(about = "Defend against descending waves of enemy ships")]
struct Args {
    /// TOML file overriding the default tuning (optional)
    #[arg(long, default_value = "space_invader.toml")]
    config: PathBuf,

    /// Seed the simulation RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output here instead of stderr (the terminal is busy)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// at 60 FPS, 8 frames (≈133 ms) is refreshed by any OS key-repeat rate.
const HOLD_WINDOW: u64 = 8;

/// Maps each held key → the frame it was last seen (press or repeat).
#[derive(Default)]
struct HeldKeys {
    key_frame: HashMap<KeyCode, u64>,
}

impl HeldKeys {
    /// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
    fn any(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|key| {
            self.key_frame
                .get(key)
                .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
                .unwrap_or(false)
        })
    }

    fn tick_input(&self, frame: u64) -> TickInput {
        TickInput {
            left: self.any(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: self.any(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
            up: self.any(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
            down: self.any(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
            fire: self.any(&[KeyCode::Char(' ')], frame),
            quit: false,
        }
    }
}

/// One-shot signals seen while draining the event queue.
#[derive(Default)]
struct Signals {
    quit: bool,
    start: bool,
}

/// Drain all pending input events without blocking.
fn poll_events(keys: &mut HeldKeys, frame: u64) -> std::io::Result<Signals> {
    let mut signals = Signals::default();
    while event::poll(Duration::ZERO)? {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event::read()?
        else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                keys.key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => signals.quit = true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        signals.quit = true
                    }
                    KeyCode::Char(' ') => signals.start = true,
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                keys.key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                keys.key_frame.remove(&code);
            }
        }
    }
    Ok(signals)
}

fn pace(frame_start: Instant, frame_budget: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame_budget {
        std::thread::sleep(frame_budget - elapsed);
    }
}

// ── Loops ─────────────────────────────────────────────────────────────────────

/// Shared state for the shell: everything built once at startup.
struct Shell<'a> {
    config: &'a GameConfig,
    assets: &'a Assets,
    rng: StdRng,
    frame_budget: Duration,
}

enum MatchEnd {
    /// Loss banner finished; back to the menu.
    Finished,
    /// The player asked to quit.
    Quit,
}

impl Shell<'_> {
    /// Returns `true` → start a match,  `false` → quit program.
    fn menu<W: Write>(&mut self, out: &mut W) -> GameResult<bool> {
        let mut keys = HeldKeys::default();
        let mut frame: u64 = 0;
        loop {
            let frame_start = Instant::now();
            frame += 1;

            display::render_menu(out, self.config, terminal::size()?)?;

            let signals = poll_events(&mut keys, frame)?;
            if signals.quit {
                return Ok(false);
            }
            if signals.start {
                return Ok(true);
            }
            pace(frame_start, self.frame_budget);
        }
    }

    fn play<W: Write>(&mut self, out: &mut W, state: &mut GameState) -> GameResult<MatchEnd> {
        let mut keys = HeldKeys::default();

        loop {
            let frame_start = Instant::now();
            let frame = state.frame + 1;

            let signals = poll_events(&mut keys, frame)?;
            let mut input = keys.tick_input(frame);
            input.quit = signals.quit;

            tick(state, &input, self.config, self.assets, &mut self.rng);
            display::render(out, state, self.config, terminal::size()?)?;

            if state.phase == Phase::Terminated {
                return Ok(if input.quit {
                    MatchEnd::Quit
                } else {
                    MatchEnd::Finished
                });
            }
            pace(frame_start, self.frame_budget);
        }
    }

    fn run<W: Write>(&mut self, out: &mut W) -> GameResult<()> {
        let mut state = menu_state(self.config, self.assets);
        while self.menu(out)? {
            start_match(&mut state, self.config, self.assets);
            match self.play(out, &mut state)? {
                MatchEnd::Quit => break,
                MatchEnd::Finished => {
                    log::info!("Match over at level {}", state.level);
                }
            }
        }
        Ok(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>) -> GameResult<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Warn);
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder
            .filter_level(log::LevelFilter::Info)
            .target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.parse_default_env();
    builder.init();
    Ok(())
}

fn main() -> Result<(), GameError> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = GameConfig::load(&args.config)?;
    let assets = Assets::new(&config);
    let rng = match args.seed {
        Some(seed) => {
            log::info!("Seeding RNG with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut shell = Shell {
        config: &config,
        assets: &assets,
        rng,
        frame_budget: Duration::from_secs(1) / config.fps,
    };

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let result = shell.run(&mut out);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("{}", err);
    }
    result
}
