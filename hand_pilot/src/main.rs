//! hand_pilot — interactive entry point.

use anyhow::{Context, Result};
use control_sink::Dispatcher;
use hand_pilot::app::{Pilot, PilotConfig};
use hand_pilot::ingest::{spawn_frame_source, ScriptSource, SidecarSource};
use std::io::{self, Write};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Hand Pilot — gesture control for the desktop         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "inject")]
    println!("  Sinks: OS pointer injection, audio/display logged");
    #[cfg(not(feature = "inject"))]
    println!("  Sinks: logging only  (build with --features inject to move the cursor)");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let sidecar = args.iter()
        .position(|a| a == "--sidecar")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let cfg = if args.iter().any(|a| a == "--quick") {
        println!("  Quick-start: 1920×1080 screen, scale 1.0, confidence 0.5\n");
        PilotConfig::default()
    } else {
        configure_interactively()
    };

    let rx = match &sidecar {
        Some(cmdline) => {
            println!("  Source: detector sidecar ({})", cmdline);
            let mut words = cmdline.split_whitespace().map(String::from);
            let cmd = words.next()
                .context("--sidecar needs a command, e.g. --sidecar \"python3 tracker.py\"")?;
            let source = SidecarSource::start(&cmd, &words.collect::<Vec<_>>())
                .context("detector sidecar failed to start")?;
            spawn_frame_source(source)
        }
        None => {
            println!("  Source: built-in demo script  (use --sidecar <cmd> for live tracking)");
            spawn_frame_source(ScriptSource::default())
        }
    };
    println!();

    Pilot::new(cfg, build_dispatcher()).run(rx);
    Ok(())
}

fn configure_interactively() -> PilotConfig {
    println!("  Configure the pilot (Enter keeps the default):");

    let screen_width: u32 = read_line("  Screen width (default 1920): ")
        .trim().parse().unwrap_or(1920);
    let screen_height: u32 = read_line("  Screen height (default 1080): ")
        .trim().parse().unwrap_or(1080);

    let cursor_scale: f64 = {
        let s = read_line("  Cursor scale factor (default 1.0): ")
            .trim().parse().unwrap_or(1.0);
        if s > 0.0 { s } else { 1.0 }
    };

    let min_confidence: f32 = {
        let c: f32 = read_line("  Minimum detection confidence 0–1 (default 0.5): ")
            .trim().parse().unwrap_or(0.5);
        c.clamp(0.0, 1.0)
    };

    PilotConfig { screen_width, screen_height, cursor_scale, min_confidence }
}

/// Pointer injection when built with `inject`.  If the injection
/// backend cannot open, warn once and log events instead of aborting
/// the session.
#[cfg(feature = "inject")]
fn build_dispatcher() -> Dispatcher {
    use control_sink::{EnigoPointer, LogSink};
    match EnigoPointer::new() {
        Ok(pointer) => Dispatcher::new(Box::new(pointer), Box::new(LogSink), Box::new(LogSink)),
        Err(e) => {
            log::warn!("pointer injection unavailable: {} — using logging sink", e);
            Dispatcher::logging()
        }
    }
}

#[cfg(not(feature = "inject"))]
fn build_dispatcher() -> Dispatcher {
    Dispatcher::logging()
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
