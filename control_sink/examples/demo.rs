//! Demonstrates control_sink: logging sinks applying a scripted event
//! sequence, and a failing path being disabled while the rest continue.

use control_map::ControlEvent;
use control_sink::{AudioSink, Dispatcher, LogSink, SinkError};

/// Audio backend whose endpoint is missing, as on a headless host.
struct AbsentAudio;

impl AudioSink for AbsentAudio {
    fn set_mute(&mut self, _muted: bool) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("no audio endpoint".to_string()))
    }
    fn set_volume(&mut self, _percent: u8) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("no audio endpoint".to_string()))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("\n=== Control Sink Demo ===\n");

    // ── 1. Logging sinks ──────────────────────────────────────────────────
    println!("1. Every event reaches its path's sink  (cursor moves log at debug)");
    let mut disp = Dispatcher::logging();
    for event in [
        ControlEvent::CursorMove { x: 960, y: 540 },
        ControlEvent::Click,
        ControlEvent::SetVolume(70),
        ControlEvent::SetBrightness(40),
        ControlEvent::SetMute(true),
        ControlEvent::SetMute(false),
    ] {
        disp.dispatch(event);
    }
    println!();

    // ── 2. A failing path is disabled, the others keep running ────────────
    println!("2. Audio backend missing: first failure disables the audio path");
    let mut disp = Dispatcher::new(Box::new(LogSink), Box::new(AbsentAudio), Box::new(LogSink));
    disp.dispatch(ControlEvent::SetVolume(50)); // fails, disables audio
    disp.dispatch(ControlEvent::SetVolume(60)); // dropped silently
    disp.dispatch(ControlEvent::CursorMove { x: 10, y: 20 }); // pointer unaffected
    disp.dispatch(ControlEvent::SetBrightness(80)); // display unaffected
    println!();
    println!("   audio enabled   : {}", disp.audio_enabled());
    println!("   pointer enabled : {}", disp.pointer_enabled());
    println!("   display enabled : {}", disp.display_enabled());
    println!();
}
