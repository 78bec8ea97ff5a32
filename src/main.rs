use std::fs::File;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use arena_pursuit::display::TerminalCanvas;
use arena_pursuit::input::{InputTracker, Signal};
use arena_pursuit::host::Platform;
use arena_pursuit::{simulation, Config, GameStatus, Result, Simulation};

const HINT_PLAYING: &str = "W A S D / arrows : Move   Mouse : Aim   Left click : Fire   Q : Quit";
const HINT_GAME_OVER: &str = "Player down   Q : Quit";

// ── Terminal platform ─────────────────────────────────────────────────────────

/// Crossterm-backed host: events arrive on a channel from a reader thread,
/// frames are paced by sleeping out the rest of `frame`.
struct TerminalPlatform<W: Write> {
    canvas: TerminalCanvas<W>,
    input: InputTracker,
    rx: mpsc::Receiver<Event>,
    frame: Duration,
    frame_start: Instant,
}

impl<W: Write> Platform for TerminalPlatform<W> {
    type Input = InputTracker;
    type Canvas = TerminalCanvas<W>;

    fn process_messages(&mut self) -> Result<bool> {
        self.frame_start = Instant::now();
        self.input.begin_frame();

        // Drain all pending events (non-blocking)
        while let Ok(ev) = self.rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                self.canvas.resize(cols, rows);
            }
            if self.input.handle(&ev) == Signal::Quit {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn input(&self) -> &InputTracker {
        &self.input
    }

    fn canvas(&mut self) -> &mut TerminalCanvas<W> {
        &mut self.canvas
    }

    fn present(&mut self, status: GameStatus) -> Result<()> {
        let hint = match status {
            GameStatus::Playing => HINT_PLAYING,
            GameStatus::GameOver => HINT_GAME_OVER,
        };
        self.canvas.present(hint)?;

        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        }
        Ok(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The terminal belongs to the renderer, so logs go to a file.
fn init_logging() {
    let path = std::env::temp_dir().join("arena_pursuit.log");
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(file) = File::create(&path) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();
    log::info!("Arena Pursuit starting...");

    let config = Config::load(&Config::default_path())?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    log::info!("Keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread to blocking event reads, so the frame loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                log::warn!("Event reader stopped: {}", e);
                break;
            }
        }
    });

    let result = run(&mut out, rx, config, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Exiting with error: {}", e);
    }
    result
}

fn run(
    out: &mut BufWriter<Stdout>,
    rx: mpsc::Receiver<Event>,
    config: Config,
    keyboard_enhanced: bool,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut platform = TerminalPlatform {
        canvas: TerminalCanvas::new(out, config.world, cols, rows),
        input: InputTracker::new(config.world, cols, rows).with_release_events(keyboard_enhanced),
        rx,
        frame: Duration::from_millis(config.frame_ms),
        frame_start: Instant::now(),
    };

    let mut sim = Simulation::new(config);
    let frames = simulation::run(&mut sim, &mut platform)?;
    log::info!("Ran {} frame(s), final status {:?}", frames, sim.status());
    Ok(())
}
