//! # control_map
//!
//! Pure mapping from per-frame hand data to desktop control events.
//!
//! Each detected [`Hand`] is routed by handedness to one of two control
//! surfaces:
//!
//! | Hand | Surface | Events |
//! |---|---|---|
//! | Right | pointer | [`ControlEvent::CursorMove`], [`ControlEvent::Click`] |
//! | Left  | system  | [`ControlEvent::SetMute`], [`ControlEvent::SetVolume`], [`ControlEvent::SetBrightness`] |
//!
//! The only state that survives a frame is [`SystemState`] (the mute
//! flag), passed explicitly into the left-hand path.  Everything else is
//! a pure function of the current frame.

use hand_stream::landmark::{INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, THUMB_TIP};
use hand_stream::{FingerState, Hand, Handedness, PixelPoint};

// ════════════════════════════════════════════════════════════════════════════
// ControlEvent
// ════════════════════════════════════════════════════════════════════════════

/// A control signal bound for a sink.  Ephemeral: produced and dispatched
/// within a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// Absolute cursor position in screen coordinates.
    CursorMove { x: i32, y: i32 },

    /// Left mouse click.  Fires every frame the click gesture holds; the
    /// pointer sink is expected to tolerate repeats.
    Click,

    /// Audio endpoint mute flag.
    SetMute(bool),

    /// Absolute master volume, 0–100.
    SetVolume(u8),

    /// Absolute display brightness, 0–100.
    SetBrightness(u8),
}

// ════════════════════════════════════════════════════════════════════════════
// Pointer surface (right hand)
// ════════════════════════════════════════════════════════════════════════════

/// Frame→screen mapping parameters for the pointer surface.
#[derive(Clone, Copy, Debug)]
pub struct PointerConfig {
    pub screen_width:  u32,
    pub screen_height: u32,
    /// Extra multiplier on both axes after the frame→screen ratio.
    pub scale: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig { screen_width: 1920, screen_height: 1080, scale: 1.0 }
    }
}

/// Map a right hand to pointer events.
///
/// The index fingertip is scaled from frame space to screen space with
/// independent X/Y ratios, times `scale`, truncated.  A `CursorMove` is
/// emitted every frame the hand is present — no deadband, no smoothing,
/// so detector jitter passes straight through.
///
/// A `Click` is emitted whenever the middle fingertip sits at or below
/// its PIP joint (finger folded).  There is no single-shot debounce:
/// holding the fold produces a click per frame.
pub fn track_pointer(hand: &Hand, cfg: &PointerConfig) -> Vec<ControlEvent> {
    let tip = hand.point(INDEX_TIP);
    let x = (tip.x as f64 / hand.frame_width as f64 * cfg.screen_width as f64 * cfg.scale) as i32;
    let y = (tip.y as f64 / hand.frame_height as f64 * cfg.screen_height as f64 * cfg.scale) as i32;

    let mut events = vec![ControlEvent::CursorMove { x, y }];
    if hand.point(MIDDLE_TIP).y >= hand.point(MIDDLE_PIP).y {
        events.push(ControlEvent::Click);
    }
    events
}

// ════════════════════════════════════════════════════════════════════════════
// Pinch distance → percent
// ════════════════════════════════════════════════════════════════════════════

/// Pinch distance mapped to 0% (thumb and finger touching).
pub const PINCH_NEAR: i32 = 30;
/// Pinch distance mapped to 100% (full spread).
pub const PINCH_FAR: i32 = 110;

/// Euclidean distance between two pixel points, truncated to whole
/// pixels.
pub fn pinch_distance(a: PixelPoint, b: PixelPoint) -> i32 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx.hypot(dy) as i32
}

/// Linear [`PINCH_NEAR`, `PINCH_FAR`] → [0, 100] interpolation, clamped
/// at both edges.  Out-of-range distances are never an error.
pub fn pinch_percent(dist: i32) -> u8 {
    if dist <= PINCH_NEAR {
        0
    } else if dist >= PINCH_FAR {
        100
    } else {
        ((dist - PINCH_NEAR) * 100 / (PINCH_FAR - PINCH_NEAR)) as u8
    }
}

// ════════════════════════════════════════════════════════════════════════════
// System surface (left hand)
// ════════════════════════════════════════════════════════════════════════════

/// The one piece of cross-frame state: the mute flag.  Owned by the
/// caller and passed into [`system_controls`] each frame; initialized
/// unmuted at startup and never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemState {
    muted: bool,
}

impl SystemState {
    pub fn is_muted(self) -> bool { self.muted }
}

/// Which system gesture a finger state selects, before hysteresis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemAction {
    MuteOn,
    MuteOff,
    Volume,
    Brightness,
}

/// Classify a finger state `[thumb, index, middle, ring, pinky]` into at
/// most one system action.
///
/// * `MuteOn`: only index and pinky extended.
/// * `MuteOff`: thumb and pinky extended, index and middle folded; ring
///   is ignored.
/// * `Volume`: exactly thumb and index extended.
/// * `Brightness`: exactly thumb and middle extended.
///
/// The arms are mutually exclusive by construction, so at most one
/// system event can fire per left hand per frame.
pub fn system_action(fs: FingerState) -> Option<SystemAction> {
    match fs.0 {
        [false, true,  false, false, true ] => Some(SystemAction::MuteOn),
        [true,  false, false, _,     true ] => Some(SystemAction::MuteOff),
        [true,  true,  false, false, false] => Some(SystemAction::Volume),
        [true,  false, true,  false, false] => Some(SystemAction::Brightness),
        _ => None,
    }
}

/// Map a left hand to at most one system event, updating `state`.
///
/// The mute gesture fires every frame it holds — the audio sink applies
/// an absolute flag, so repeats are idempotent.  The unmute gesture is
/// hysteresis-guarded: it only fires while muted, so a held unmute pose
/// produces exactly one `SetMute(false)`.
pub fn system_controls(hand: &Hand, state: &mut SystemState) -> Option<ControlEvent> {
    match system_action(hand.finger_state())? {
        SystemAction::MuteOn => {
            state.muted = true;
            Some(ControlEvent::SetMute(true))
        }
        SystemAction::MuteOff => {
            if !state.muted {
                return None;
            }
            state.muted = false;
            Some(ControlEvent::SetMute(false))
        }
        SystemAction::Volume => {
            let d = pinch_distance(hand.point(THUMB_TIP), hand.point(INDEX_TIP));
            Some(ControlEvent::SetVolume(pinch_percent(d)))
        }
        SystemAction::Brightness => {
            let d = pinch_distance(hand.point(THUMB_TIP), hand.point(MIDDLE_TIP));
            Some(ControlEvent::SetBrightness(pinch_percent(d)))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════

/// Dispatch one hand to its control surface: right → pointer, left →
/// system.  One routing decision per hand per frame; when both hands
/// are present the caller invokes this once per hand and the two paths
/// share nothing but `state`, which only the left path touches.
pub fn route(hand: &Hand, cfg: &PointerConfig, state: &mut SystemState) -> Vec<ControlEvent> {
    let events = match hand.handedness {
        Handedness::Right => track_pointer(hand, cfg),
        Handedness::Left  => system_controls(hand, state).into_iter().collect(),
    };
    for event in &events {
        log::debug!("{} hand → {:?}", hand.handedness.as_str(), event);
    }
    events
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
