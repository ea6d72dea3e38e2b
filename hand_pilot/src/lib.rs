//! # hand_pilot
//!
//! Gesture control for the desktop: a detector sidecar (or the built-in
//! demo script) streams 21-point hand landmarks, and the pilot turns
//! them into cursor movement, clicks, audio mute/volume, and screen
//! brightness — frame by frame, with no cross-frame state beyond the
//! mute flag.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Move index fingertip | Right | Cursor follows, frame→screen scaled |
//! | Fold middle finger | Right | Left click (repeats while held) |
//! | Index + pinky extended | Left | Mute |
//! | Thumb + pinky extended | Left | Unmute (only while muted) |
//! | Thumb–index spread | Left | Volume 0–100% over 30–110 px |
//! | Thumb–middle spread | Left | Brightness 0–100% over 30–110 px |
//!
//! ## Modes
//!
//! * (default) — **Demo mode**: a built-in script of synthetic frames
//!   drives the pipeline; sinks log what they would do.
//! * `--sidecar <cmd>` — **Tracker mode**: spawns a detector process
//!   (e.g. a MediaPipe sidecar) and reads one JSON detection per frame.
//! * `--features inject` — cursor/click events reach the real OS cursor.

pub mod app;
pub mod ingest;
