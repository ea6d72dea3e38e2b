//! Frame ingestion — detector sidecar subprocess and scripted demo frames.
//!
//! The public interface is [`FramePacket`] delivered over an `mpsc`
//! channel.  Consumers don't need to know whether frames came from a
//! real detector or the demo script.
//!
//! ## Sidecar wire format
//!
//! The sidecar prints `READY` once it has loaded its model, then one
//! JSON object per processed frame:
//!
//! ```json
//! {"width": 640, "height": 480, "hands": [
//!   {"handedness": "Right", "score": 0.97,
//!    "landmarks": [{"x": 0.51, "y": 0.48, "z": -0.02}, ...]}
//! ]}
//! ```
//!
//! `hands` holds zero or more detections, each with exactly 21
//! landmarks; a frame the detector could not process carries an
//! `error` string instead and is skipped.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use hand_stream::Landmark;
use serde::Deserialize;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

/// One hand as reported by the detector, not yet validated.
#[derive(Clone, Debug, Deserialize)]
pub struct RawHand {
    pub handedness: String,
    pub score: f32,
    pub landmarks: Vec<Landmark>,
}

/// One frame's worth of detections.
#[derive(Clone, Debug, Deserialize)]
pub struct FramePacket {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub hands: Vec<RawHand>,
    #[serde(default)]
    pub error: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Failure to bring a detector sidecar up.  Per-frame problems are not
/// errors: bad frames are logged and skipped, and the session continues.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to launch detector sidecar: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("detector sidecar exposed no stdout")]
    NoStdout,

    #[error("detector sidecar did not signal READY (got {0:?})")]
    Handshake(String),
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait — unified interface for sidecar and demo
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FramePacket`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FramePacket>);
}

/// Spawn a frame source on its own thread and return the receiving end.
///
/// The channel disconnects when the source ends (detector exit, script
/// finished), which is the processing loop's stop signal.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<FramePacket> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SidecarSource — detector subprocess
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by a detector subprocess (e.g. a MediaPipe
/// sidecar script) speaking the JSON-lines protocol above.
pub struct SidecarSource {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl SidecarSource {
    /// Launch the sidecar and wait for its `READY` line.
    ///
    /// Startup failures surface here, before any frame is processed;
    /// after a successful handshake the source only ends on detector
    /// exit.
    pub fn start(command: &str, args: &[String]) -> Result<Self, IngestError> {
        log::info!("starting detector sidecar: {} {}", command, args.join(" "));

        let mut child = Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdout = child.stdout.take().ok_or(IngestError::NoStdout)?;
        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.trim() != "READY" {
            let _ = child.kill();
            return Err(IngestError::Handshake(line.trim().to_string()));
        }

        log::info!("detector sidecar ready");
        Ok(SidecarSource { child, reader })
    }
}

impl FrameSource for SidecarSource {
    fn run(mut self: Box<Self>, tx: Sender<FramePacket>) {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    log::info!("detector sidecar exited");
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("detector read error: {}", e);
                    return;
                }
            }

            let packet: FramePacket = match serde_json::from_str(&line) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("skipping unparseable frame: {}", e);
                    continue;
                }
            };
            if let Some(err) = &packet.error {
                log::warn!("detector error: {}", err);
                continue;
            }

            if tx.send(packet).is_err() {
                return; // consumer gone
            }
        }
    }
}

impl Drop for SidecarSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptSource — built-in demo choreography (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Replays a built-in script of synthetic frames at a fixed rate: a
/// right-hand cursor sweep and click, then left-hand volume, brightness,
/// mute, and unmute gestures.  No detector or camera needed.
pub struct ScriptSource {
    pub fps: u32,
    pub loops: u32,
}

impl Default for ScriptSource {
    fn default() -> Self {
        ScriptSource { fps: 30, loops: 1 }
    }
}

impl FrameSource for ScriptSource {
    fn run(self: Box<Self>, tx: Sender<FramePacket>) {
        let interval = Duration::from_millis(1000 / self.fps.max(1) as u64);
        for _ in 0..self.loops.max(1) {
            for packet in demo_script() {
                if tx.send(packet).is_err() {
                    return;
                }
                thread::sleep(interval);
            }
        }
    }
}

/// Demo frame dimensions.
const DEMO_W: u32 = 640;
const DEMO_H: u32 = 480;

/// Build a synthetic hand posed to a finger state
/// `[thumb, index, middle, ring, pinky]`, centered at normalized
/// `(cx, cy)`.
pub fn posed_hand(label: &str, fingers: [bool; 5], cx: f32, cy: f32) -> RawHand {
    let mut lms = vec![Landmark { x: cx, y: cy, z: 0.0 }; hand_stream::landmark::COUNT];

    // Non-thumb fingers: tip above the joint two indices down = extended.
    for (i, &extended) in fingers[1..].iter().enumerate() {
        let tip = hand_stream::landmark::INDEX_TIP + i * 4;
        lms[tip - 2].y = cy;
        lms[tip].y = if extended { cy - 0.1 } else { cy + 0.05 };
    }

    // Thumb: tip away from the palm = extended, mirrored by handedness.
    let away = if label == "Left" { 0.08 } else { -0.08 };
    lms[hand_stream::landmark::THUMB_MCP].x = cx;
    lms[hand_stream::landmark::THUMB_TIP].x = if fingers[0] { cx + away } else { cx - away * 0.5 };

    RawHand { handedness: label.to_string(), score: 0.97, landmarks: lms }
}

/// Left hand with thumb tip and `other` tip roughly `dist_px` pixels
/// apart, for the volume/brightness pinch gestures.
fn pinch_hand(other: usize, fingers: [bool; 5], dist_px: f32) -> RawHand {
    let mut hand = posed_hand("Left", fingers, 0.5, 0.5);
    hand.landmarks[hand_stream::landmark::THUMB_MCP] = Landmark { x: 0.3, y: 0.5, z: 0.0 };
    hand.landmarks[hand_stream::landmark::THUMB_TIP] = Landmark { x: 0.4, y: 0.5, z: 0.0 };
    hand.landmarks[other - 2] = Landmark { x: 0.5, y: 0.6, z: 0.0 };
    hand.landmarks[other] = Landmark { x: 0.4 + dist_px / DEMO_W as f32, y: 0.5, z: 0.0 };
    hand
}

fn frame(hands: Vec<RawHand>) -> FramePacket {
    FramePacket { width: DEMO_W, height: DEMO_H, hands, error: None }
}

/// The canned choreography replayed by [`ScriptSource`].
pub fn demo_script() -> Vec<FramePacket> {
    use hand_stream::landmark::{INDEX_TIP, MIDDLE_TIP};

    let mut frames = Vec::new();

    // Right hand sweeps the cursor across the frame (middle extended,
    // so no clicks).
    for t in 0..=20 {
        let x = 0.2 + 0.03 * t as f32;
        frames.push(frame(vec![posed_hand("Right", [false, true, true, false, false], x, 0.5)]));
    }

    // Fold the middle finger: click.
    frames.push(frame(vec![posed_hand("Right", [false, true, false, false, false], 0.8, 0.5)]));

    // Left hand: volume sweep, quiet to loud.
    for dist in (30..=110).step_by(16) {
        frames.push(frame(vec![pinch_hand(INDEX_TIP, [true, true, false, false, false], dist as f32)]));
    }

    // Brightness sweep.
    for dist in (30..=110).step_by(16) {
        frames.push(frame(vec![pinch_hand(MIDDLE_TIP, [true, false, true, false, false], dist as f32)]));
    }

    // Mute (held two frames — fires twice, the sink is idempotent),
    // then unmute (held two frames — hysteresis fires it once).
    for _ in 0..2 {
        frames.push(frame(vec![posed_hand("Left", [false, true, false, false, true], 0.5, 0.5)]));
    }
    for _ in 0..2 {
        frames.push(frame(vec![posed_hand("Left", [true, false, false, false, true], 0.5, 0.5)]));
    }

    // One empty frame: no hands detected.
    frames.push(frame(Vec::new()));

    frames
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_stream::{FingerState, Hand};

    #[test]
    fn parses_detector_json() {
        let lm = r#"{"x": 0.5, "y": 0.5, "z": -0.01}"#;
        let lms = vec![lm; 21].join(",");
        let line = format!(
            r#"{{"width": 640, "height": 480, "hands": [{{"handedness": "Right", "score": 0.9, "landmarks": [{}]}}]}}"#,
            lms
        );
        let packet: FramePacket = serde_json::from_str(&line).unwrap();
        assert_eq!(packet.width, 640);
        assert_eq!(packet.hands.len(), 1);
        assert_eq!(packet.hands[0].handedness, "Right");
        assert_eq!(packet.hands[0].landmarks.len(), 21);
        assert!(packet.error.is_none());
    }

    #[test]
    fn parses_error_frame() {
        let packet: FramePacket =
            serde_json::from_str(r#"{"width": 640, "height": 480, "error": "no frame"}"#).unwrap();
        assert!(packet.hands.is_empty());
        assert_eq!(packet.error.as_deref(), Some("no frame"));
    }

    #[test]
    fn posed_hands_classify_as_posed() {
        for bits in 0..32u8 {
            let fingers = [
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
                bits & 16 != 0,
            ];
            for label in ["Left", "Right"] {
                let raw = posed_hand(label, fingers, 0.5, 0.5);
                let hand = Hand::from_raw(label, &raw.landmarks, raw.score, DEMO_W, DEMO_H).unwrap();
                assert_eq!(hand.finger_state(), FingerState(fingers), "{} {:?}", label, fingers);
            }
        }
    }

    #[test]
    fn demo_script_hands_are_valid() {
        let frames = demo_script();
        assert!(!frames.is_empty());
        for packet in &frames {
            for raw in &packet.hands {
                Hand::from_raw(&raw.handedness, &raw.landmarks, raw.score, packet.width, packet.height)
                    .unwrap();
            }
        }
    }

    #[test]
    fn demo_script_ends_muted_then_unmuted() {
        // The last gesture frames are mute then unmute poses.
        let frames = demo_script();
        let n = frames.len();
        let unmute = &frames[n - 2].hands[0];
        let hand = Hand::from_raw(&unmute.handedness, &unmute.landmarks, unmute.score, DEMO_W, DEMO_H)
            .unwrap();
        assert_eq!(hand.finger_state(), FingerState([true, false, false, false, true]));
    }
}
