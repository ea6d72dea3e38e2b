//! # control_sink
//!
//! The far end of the pipeline: sinks that apply [`ControlEvent`]s to
//! the host, and the [`Dispatcher`] that fans events out to them.
//!
//! Sinks are fire-and-forget from the pipeline's perspective — no
//! acknowledgements, no retries.  When a sink fails once, the
//! [`Dispatcher`] reports it and disables that control path for the rest
//! of the session instead of retrying every frame.
//!
//! ## Backends
//!
//! * [`LogSink`] — logs every event (default; works everywhere).
//! * [`NullSink`] — drops events silently.
//! * [`EnigoPointer`] — real OS cursor/click injection, behind the
//!   `inject` feature.
//!
//! Audio and display injection are host-specific; integrators implement
//! [`AudioSink`] / [`DisplaySink`] over their platform's endpoint API.

use control_map::ControlEvent;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// SinkError
// ════════════════════════════════════════════════════════════════════════════

/// A sink call that could not be applied to the host.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The backend could not be opened or is not present on this host.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend was open but the call failed.
    #[error("injection failed: {0}")]
    Injection(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Sink contracts
// ════════════════════════════════════════════════════════════════════════════

/// OS cursor and mouse-button injection.
pub trait PointerSink: Send {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError>;
    fn click(&mut self) -> Result<(), SinkError>;
}

/// Audio endpoint mute and master volume.  `set_volume` applies an
/// absolute percentage, not a delta.
pub trait AudioSink: Send {
    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError>;
    fn set_volume(&mut self, percent: u8) -> Result<(), SinkError>;
}

/// Display backlight brightness, absolute percentage.
pub trait DisplaySink: Send {
    fn set_brightness(&mut self, percent: u8) -> Result<(), SinkError>;
}

// ════════════════════════════════════════════════════════════════════════════
// LogSink / NullSink
// ════════════════════════════════════════════════════════════════════════════

/// Logs every call instead of touching the host.  Cursor moves are
/// per-frame noise and go to `debug`; the rest to `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl PointerSink for LogSink {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError> {
        log::debug!("[pointer] move to ({}, {})", x, y);
        Ok(())
    }
    fn click(&mut self) -> Result<(), SinkError> {
        log::info!("[pointer] click");
        Ok(())
    }
}

impl AudioSink for LogSink {
    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError> {
        log::info!("[audio] mute = {}", muted);
        Ok(())
    }
    fn set_volume(&mut self, percent: u8) -> Result<(), SinkError> {
        log::info!("[audio] volume = {}%", percent);
        Ok(())
    }
}

impl DisplaySink for LogSink {
    fn set_brightness(&mut self, percent: u8) -> Result<(), SinkError> {
        log::info!("[display] brightness = {}%", percent);
        Ok(())
    }
}

/// Swallows every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PointerSink for NullSink {
    fn move_cursor(&mut self, _x: i32, _y: i32) -> Result<(), SinkError> { Ok(()) }
    fn click(&mut self) -> Result<(), SinkError> { Ok(()) }
}

impl AudioSink for NullSink {
    fn set_mute(&mut self, _muted: bool) -> Result<(), SinkError> { Ok(()) }
    fn set_volume(&mut self, _percent: u8) -> Result<(), SinkError> { Ok(()) }
}

impl DisplaySink for NullSink {
    fn set_brightness(&mut self, _percent: u8) -> Result<(), SinkError> { Ok(()) }
}

// ════════════════════════════════════════════════════════════════════════════
// EnigoPointer — real injection (feature = "inject")
// ════════════════════════════════════════════════════════════════════════════

/// Pointer sink backed by `enigo`, injecting real cursor moves and
/// clicks into the OS.
#[cfg(feature = "inject")]
pub struct EnigoPointer {
    enigo: enigo::Enigo,
}

#[cfg(feature = "inject")]
impl EnigoPointer {
    pub fn new() -> Result<Self, SinkError> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(EnigoPointer { enigo })
    }
}

#[cfg(feature = "inject")]
impl PointerSink for EnigoPointer {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError> {
        use enigo::{Coordinate, Mouse};
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| SinkError::Injection(e.to_string()))
    }

    fn click(&mut self) -> Result<(), SinkError> {
        use enigo::{Button, Direction, Mouse};
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| SinkError::Injection(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Dispatcher
// ════════════════════════════════════════════════════════════════════════════

/// Routes each [`ControlEvent`] to its sink.
///
/// Each control path (pointer / audio / display) is independent: the
/// first failure on a path logs the error and disables that path for the
/// remainder of the session, while the other paths keep running.
pub struct Dispatcher {
    pointer: Option<Box<dyn PointerSink>>,
    audio:   Option<Box<dyn AudioSink>>,
    display: Option<Box<dyn DisplaySink>>,
}

impl Dispatcher {
    pub fn new(
        pointer: Box<dyn PointerSink>,
        audio: Box<dyn AudioSink>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        Dispatcher { pointer: Some(pointer), audio: Some(audio), display: Some(display) }
    }

    /// All three paths backed by [`LogSink`].
    pub fn logging() -> Self {
        Dispatcher::new(Box::new(LogSink), Box::new(LogSink), Box::new(LogSink))
    }

    pub fn pointer_enabled(&self) -> bool { self.pointer.is_some() }
    pub fn audio_enabled(&self)   -> bool { self.audio.is_some() }
    pub fn display_enabled(&self) -> bool { self.display.is_some() }

    /// Apply one event.  Events for a disabled path are dropped.
    pub fn dispatch(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::CursorMove { x, y } => {
                Self::apply(&mut self.pointer, "pointer", |s| s.move_cursor(x, y));
            }
            ControlEvent::Click => {
                Self::apply(&mut self.pointer, "pointer", |s| s.click());
            }
            ControlEvent::SetMute(muted) => {
                Self::apply(&mut self.audio, "audio", |s| s.set_mute(muted));
            }
            ControlEvent::SetVolume(percent) => {
                Self::apply(&mut self.audio, "audio", |s| s.set_volume(percent));
            }
            ControlEvent::SetBrightness(percent) => {
                Self::apply(&mut self.display, "display", |s| s.set_brightness(percent));
            }
        }
    }

    fn apply<S: ?Sized>(
        slot: &mut Option<Box<S>>,
        path: &str,
        call: impl FnOnce(&mut S) -> Result<(), SinkError>,
    ) {
        let Some(sink) = slot.as_mut() else { return };
        if let Err(e) = call(sink.as_mut()) {
            log::warn!("{} sink failed: {} — disabling {} control for this session", path, e, path);
            *slot = None;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
