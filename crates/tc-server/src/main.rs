//! Teaching Canvas server: stdio NDJSON front end for agent drivers.
//!
//! ```text
//! tc-server [CONFIG.json]      serve requests on stdin/stdout
//! tc-server --replay           run a transcript from stdin, print outcomes
//! tc-server --svg              run a transcript from stdin, print the SVG
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries only
//! protocol output.

use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tc_engine::{CanvasConfig, DisplayList, TeachingCanvas, parse_transcript};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Background tick period; about one frame at 60 Hz.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

type SharedCanvas = Arc<Mutex<TeachingCanvas<DisplayList>>>;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        // ── One-shot modes ──────────────────────────────────────────────
        // Read a transcript from stdin, run it with animations off, exit.
        Some("--replay") => {
            let (mut canvas, outcomes) = replay_stdin()?;
            for line in outcomes {
                println!("{line}");
            }
            canvas.dispose();
            Ok(())
        }
        Some("--svg") => {
            let (mut canvas, _) = replay_stdin()?;
            if let Some(surface) = canvas.surface() {
                print!("{}", tc_render::render_svg(surface));
            }
            canvas.dispose();
            Ok(())
        }

        // ── Standard server mode ────────────────────────────────────────
        config_path => {
            let config = match config_path {
                Some(path) => load_config(path)?,
                None => CanvasConfig::default(),
            };
            serve(config).await
        }
    }
}

fn load_config(path: &str) -> std::io::Result<CanvasConfig> {
    let text = std::fs::read_to_string(path)?;
    match CanvasConfig::from_json(&text) {
        Ok(config) => {
            log::info!("loaded config from {path}");
            Ok(config)
        }
        Err(e) => {
            eprintln!("tc-server: {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn new_canvas(config: CanvasConfig) -> TeachingCanvas<DisplayList> {
    let surface = DisplayList::new(config.width, config.height, config.background_color());
    TeachingCanvas::with_surface(config, surface)
}

/// Run a transcript read from stdin; returns the canvas and one outcome
/// per command.
fn replay_stdin() -> std::io::Result<(TeachingCanvas<DisplayList>, Vec<String>)> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let commands = match parse_transcript(&text) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("tc-server --replay error: {e}");
            std::process::exit(1);
        }
    };
    let mut canvas = new_canvas(CanvasConfig::immediate());
    let outcomes = commands.into_iter().map(|cmd| canvas.execute(cmd)).collect();
    Ok((canvas, outcomes))
}

async fn serve(config: CanvasConfig) -> std::io::Result<()> {
    let canvas: SharedCanvas = Arc::new(Mutex::new(new_canvas(config)));
    let started = Instant::now();
    log::info!("tc-server ready");

    // Keeps animations and highlight reversions moving between requests.
    let ticker = {
        let canvas = Arc::clone(&canvas);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                let now = elapsed_ms(started);
                canvas.lock().unwrap_or_else(PoisonError::into_inner).tick(now);
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = {
            let mut canvas = canvas.lock().unwrap_or_else(PoisonError::into_inner);
            tc_server::handle_line(&mut canvas, &line, elapsed_ms(started))
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    ticker.abort();
    canvas.lock().unwrap_or_else(PoisonError::into_inner).dispose();
    log::info!("stdin closed, shutting down");
    Ok(())
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
