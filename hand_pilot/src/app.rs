//! Top-level pilot: configuration and the synchronous frame loop.
//!
//! The [`Pilot`] owns the [`SystemState`] (the mute flag — the only
//! cross-frame state in the pipeline) and the sink [`Dispatcher`].  It
//! consumes frames one at a time: every hand in a frame is validated,
//! classified, routed, and its events dispatched before the next frame
//! begins.  Per-hand failures are isolated — a malformed left hand never
//! blocks the right hand detected in the same frame.

use std::sync::mpsc::Receiver;

use control_map::{route, PointerConfig, SystemState};
use control_sink::Dispatcher;
use hand_stream::Hand;

use crate::ingest::{FramePacket, RawHand};

// ════════════════════════════════════════════════════════════════════════════
// PilotConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for a pilot session.
#[derive(Clone, Copy, Debug)]
pub struct PilotConfig {
    pub screen_width:  u32,
    pub screen_height: u32,
    /// Extra multiplier on the frame→screen cursor mapping.
    pub cursor_scale:  f64,
    /// Hands below this detector confidence are dropped before
    /// classification.
    pub min_confidence: f32,
}

impl Default for PilotConfig {
    fn default() -> Self {
        PilotConfig {
            screen_width:   1920,
            screen_height:  1080,
            cursor_scale:   1.0,
            min_confidence: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pilot
// ════════════════════════════════════════════════════════════════════════════

pub struct Pilot {
    pointer_cfg:    PointerConfig,
    min_confidence: f32,
    system:         SystemState,
    dispatcher:     Dispatcher,

    // ── session counters ─────────────────────────────────────────────────
    frames:   u64,
    rejected: u64,
}

impl Pilot {
    pub fn new(cfg: PilotConfig, dispatcher: Dispatcher) -> Self {
        Pilot {
            pointer_cfg: PointerConfig {
                screen_width:  cfg.screen_width,
                screen_height: cfg.screen_height,
                scale:         cfg.cursor_scale,
            },
            min_confidence: cfg.min_confidence,
            system:         SystemState::default(),
            dispatcher,
            frames:   0,
            rejected: 0,
        }
    }

    pub fn is_muted(&self) -> bool { self.system.is_muted() }
    pub fn frames_processed(&self) -> u64 { self.frames }
    pub fn hands_rejected(&self) -> u64 { self.rejected }

    // ── process one frame ────────────────────────────────────────────────

    /// Validate, classify, route, and dispatch every hand in the frame.
    pub fn process_frame(&mut self, packet: &FramePacket) {
        self.frames += 1;
        for raw in &packet.hands {
            self.process_hand(raw, packet.width, packet.height);
        }
    }

    fn process_hand(&mut self, raw: &RawHand, width: u32, height: u32) {
        if raw.score < self.min_confidence {
            log::debug!(
                "dropping {} hand below confidence threshold ({:.2})",
                raw.handedness, raw.score
            );
            return;
        }

        let hand = match Hand::from_raw(&raw.handedness, &raw.landmarks, raw.score, width, height) {
            Ok(h) => h,
            Err(e) => {
                self.rejected += 1;
                log::warn!("rejected hand: {}", e);
                return;
            }
        };

        for event in route(&hand, &self.pointer_cfg, &mut self.system) {
            self.dispatcher.dispatch(event);
        }
    }

    // ── run loop ─────────────────────────────────────────────────────────

    /// Drain the frame channel until the source disconnects.
    ///
    /// One frame is fully processed before the next is received; the
    /// only blocking point is waiting on the channel.
    pub fn run(mut self, rx: Receiver<FramePacket>) {
        log::info!(
            "pilot running — screen {}×{}, cursor scale {}, min confidence {}",
            self.pointer_cfg.screen_width,
            self.pointer_cfg.screen_height,
            self.pointer_cfg.scale,
            self.min_confidence,
        );

        for packet in rx {
            self.process_frame(&packet);
        }

        log::info!(
            "frame source ended after {} frames ({} hands rejected)",
            self.frames, self.rejected
        );
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::posed_hand;
    use control_map::ControlEvent;
    use control_sink::{AudioSink, DisplaySink, PointerSink, SinkError};
    use hand_stream::Landmark;
    use std::sync::{Arc, Mutex};

    /// Shared recorder implementing all three sink contracts.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<ControlEvent>>>);

    impl Recorder {
        fn record(&mut self, event: ControlEvent) -> Result<(), SinkError> {
            self.0.lock().unwrap().push(event);
            Ok(())
        }
        fn events(&self) -> Vec<ControlEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    impl PointerSink for Recorder {
        fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError> {
            self.record(ControlEvent::CursorMove { x, y })
        }
        fn click(&mut self) -> Result<(), SinkError> {
            self.record(ControlEvent::Click)
        }
    }
    impl AudioSink for Recorder {
        fn set_mute(&mut self, muted: bool) -> Result<(), SinkError> {
            self.record(ControlEvent::SetMute(muted))
        }
        fn set_volume(&mut self, percent: u8) -> Result<(), SinkError> {
            self.record(ControlEvent::SetVolume(percent))
        }
    }
    impl DisplaySink for Recorder {
        fn set_brightness(&mut self, percent: u8) -> Result<(), SinkError> {
            self.record(ControlEvent::SetBrightness(percent))
        }
    }

    fn recording_pilot() -> (Pilot, Recorder) {
        let rec = Recorder::default();
        let dispatcher = Dispatcher::new(
            Box::new(rec.clone()),
            Box::new(rec.clone()),
            Box::new(rec.clone()),
        );
        (Pilot::new(PilotConfig::default(), dispatcher), rec)
    }

    fn packet(hands: Vec<RawHand>) -> FramePacket {
        FramePacket { width: 640, height: 480, hands, error: None }
    }

    /// Right hand, middle finger extended (no click), index tip pinned
    /// to exactly normalized (0.5, 0.5).
    fn pointing_right_hand() -> RawHand {
        let mut hand = posed_hand("Right", [false, true, true, false, false], 0.5, 0.5);
        hand.landmarks[hand_stream::landmark::INDEX_TIP] = Landmark { x: 0.5, y: 0.5, z: 0.0 };
        hand
    }

    #[test]
    fn right_hand_moves_cursor_end_to_end() {
        // Index tip at normalized (0.5, 0.5), 640×480 frame, 1920×1080
        // screen, scale 1 → CursorMove(960, 540).
        let (mut pilot, rec) = recording_pilot();
        pilot.process_frame(&packet(vec![pointing_right_hand()]));
        assert_eq!(rec.events(), vec![ControlEvent::CursorMove { x: 960, y: 540 }]);
    }

    #[test]
    fn left_mute_gesture_end_to_end() {
        let (mut pilot, rec) = recording_pilot();
        let hand = posed_hand("Left", [false, true, false, false, true], 0.5, 0.5);
        pilot.process_frame(&packet(vec![hand]));
        assert_eq!(rec.events(), vec![ControlEvent::SetMute(true)]);
        assert!(pilot.is_muted());
    }

    #[test]
    fn malformed_left_does_not_block_right() {
        let (mut pilot, rec) = recording_pilot();
        let bad_left = RawHand {
            handedness: "Left".to_string(),
            score: 0.9,
            landmarks: vec![Landmark::default(); 20],
        };
        pilot.process_frame(&packet(vec![bad_left, pointing_right_hand()]));

        assert_eq!(pilot.hands_rejected(), 1);
        assert_eq!(rec.events(), vec![ControlEvent::CursorMove { x: 960, y: 540 }]);
    }

    #[test]
    fn low_confidence_hand_is_dropped() {
        let (mut pilot, rec) = recording_pilot();
        let mut hand = posed_hand("Right", [false, true, true, false, false], 0.5, 0.5);
        hand.score = 0.2;
        pilot.process_frame(&packet(vec![hand]));
        assert!(rec.events().is_empty());
        assert_eq!(pilot.hands_rejected(), 0); // gated, not malformed
    }

    #[test]
    fn both_hands_processed_independently() {
        let (mut pilot, rec) = recording_pilot();
        let left = posed_hand("Left", [false, true, false, false, true], 0.5, 0.5);
        pilot.process_frame(&packet(vec![left, pointing_right_hand()]));

        let events = rec.events();
        assert!(events.contains(&ControlEvent::SetMute(true)));
        assert!(events.contains(&ControlEvent::CursorMove { x: 960, y: 540 }));
        assert!(pilot.is_muted());
    }

    #[test]
    fn empty_frame_is_a_noop() {
        let (mut pilot, rec) = recording_pilot();
        pilot.process_frame(&packet(Vec::new()));
        assert!(rec.events().is_empty());
        assert_eq!(pilot.frames_processed(), 1);
    }

    #[test]
    fn demo_script_drives_full_session() {
        // Replay the whole built-in choreography through the pilot.
        let (mut pilot, rec) = recording_pilot();
        for frame in crate::ingest::demo_script() {
            pilot.process_frame(&frame);
        }

        let events = rec.events();
        assert!(events.iter().any(|e| matches!(e, ControlEvent::CursorMove { .. })));
        assert!(events.contains(&ControlEvent::Click));
        assert!(events.iter().any(|e| matches!(e, ControlEvent::SetVolume(_))));
        assert!(events.iter().any(|e| matches!(e, ControlEvent::SetBrightness(_))));

        // Mute held two frames fires twice; unmute held two frames
        // fires once (hysteresis).
        let mutes: Vec<_> = events.iter()
            .filter(|e| matches!(e, ControlEvent::SetMute(_)))
            .collect();
        assert_eq!(mutes, vec![
            &ControlEvent::SetMute(true),
            &ControlEvent::SetMute(true),
            &ControlEvent::SetMute(false),
        ]);
        assert!(!pilot.is_muted());
    }
}
