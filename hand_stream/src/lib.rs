//! # hand_stream
//!
//! Per-frame hand landmark processing: validated 21-point hands in pixel
//! space, bounding boxes, and finger-state classification.
//!
//! A detector (MediaPipe or compatible) reports each hand as 21 normalized
//! landmarks plus a handedness label and a confidence score.  This crate
//! turns one raw detection into a [`Hand`] — pixel-space points for the
//! current frame dimensions — and derives a [`FingerState`] from the
//! landmark geometry.  Everything here is stateless and per-frame: hands
//! carry no identity across frames.
//!
//! ## Landmark layout
//!
//! | Index | Landmark | Index | Landmark |
//! |---|---|---|---|
//! | 0 | wrist | 9–12 | middle MCP→tip |
//! | 1–4 | thumb CMC→tip | 13–16 | ring MCP→tip |
//! | 5–8 | index MCP→tip | 17–20 | pinky MCP→tip |

use serde::Deserialize;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (MediaPipe hand model convention)
// ════════════════════════════════════════════════════════════════════════════

/// Named indices into a 21-point hand, following the MediaPipe hand
/// landmark model.
pub mod landmark {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;

    /// Points per hand.
    pub const COUNT: usize = 21;
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark — one normalized detector point
// ════════════════════════════════════════════════════════════════════════════

/// A single landmark as reported by the detector: `x`/`y` normalized to
/// [0, 1] over the frame, `z` relative depth (unused by classification).
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// A landmark converted to pixel space, integer-truncated.
///
/// Values may legitimately fall outside `[0, W] × [0, H]` when the
/// detector reports edge landmarks; they are not clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

/// Which hand the detector believes it saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse a detector label ("Left"/"Right").
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left"  => Some(Handedness::Left),
            "Right" => Some(Handedness::Right),
            _       => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left  => "Left",
            Handedness::Right => "Right",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// A detection too malformed to classify.  The hand is rejected for the
/// frame; other hands in the same frame are unaffected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HandError {
    #[error("expected 21 landmarks, got {0}")]
    LandmarkCount(usize),

    #[error("unknown handedness label {0:?}")]
    UnknownHandedness(String),
}

// ════════════════════════════════════════════════════════════════════════════
// BoundingBox
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned bounding box over all 21 pixel-space points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: PixelPoint,
    pub max: PixelPoint,
}

impl BoundingBox {
    pub fn width(&self)  -> i32 { self.max.x - self.min.x }
    pub fn height(&self) -> i32 { self.max.y - self.min.y }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerState — 5-bit extended/folded classification
// ════════════════════════════════════════════════════════════════════════════

/// Extended/folded state per finger, indexed
/// `[thumb, index, middle, ring, pinky]`; `true` = extended.
///
/// Classification is purely geometric and per-frame — no smoothing.
/// Rapid motion near a threshold flickers for single frames; callers
/// needing stability must debounce on their side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    /// Derive the finger state from pixel-space landmarks.
    ///
    /// The four non-thumb fingers compare the tip against the joint two
    /// indices below it (smaller y is higher on screen).  The thumb
    /// compares tip-vs-MCP horizontally, mirrored by handedness, so
    /// "extended away from the palm" reads the same for either hand.
    pub fn classify(points: &[PixelPoint; landmark::COUNT], handedness: Handedness) -> Self {
        use landmark::*;

        let mut fingers = [false; 5];
        for (slot, tip) in [(1, INDEX_TIP), (2, MIDDLE_TIP), (3, RING_TIP), (4, PINKY_TIP)] {
            fingers[slot] = points[tip].y < points[tip - 2].y;
        }

        let tip = points[THUMB_TIP];
        let mcp = points[THUMB_MCP];
        fingers[0] = match handedness {
            Handedness::Right => tip.x < mcp.x,
            Handedness::Left  => tip.x > mcp.x,
        };

        FingerState(fingers)
    }

    pub fn thumb(self)  -> bool { self.0[0] }
    pub fn index(self)  -> bool { self.0[1] }
    pub fn middle(self) -> bool { self.0[2] }
    pub fn ring(self)   -> bool { self.0[3] }
    pub fn pinky(self)  -> bool { self.0[4] }

    /// Number of extended fingers.
    pub fn count(self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand — one validated detection in pixel space
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand for the current frame: handedness, 21 pixel-space
/// points, detector confidence, and the frame dimensions the points were
/// normalized against.
///
/// Constructed only through [`Hand::from_raw`], which rejects malformed
/// detections.  A fresh `Hand` is built every frame and discarded after
/// it; there is no persistent hand identity.
#[derive(Clone, Debug)]
pub struct Hand {
    pub handedness:   Handedness,
    pub points:       [PixelPoint; landmark::COUNT],
    pub confidence:   f32,
    pub frame_width:  u32,
    pub frame_height: u32,
}

impl Hand {
    /// Validate a raw detection and convert it to pixel space.
    ///
    /// Fails with [`HandError`] when the landmark count is not 21 or the
    /// handedness label is unknown.
    pub fn from_raw(
        label: &str,
        landmarks: &[Landmark],
        confidence: f32,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self, HandError> {
        let handedness = Handedness::from_label(label)
            .ok_or_else(|| HandError::UnknownHandedness(label.to_string()))?;

        if landmarks.len() != landmark::COUNT {
            return Err(HandError::LandmarkCount(landmarks.len()));
        }

        let mut points = [PixelPoint::default(); landmark::COUNT];
        for (p, lm) in points.iter_mut().zip(landmarks) {
            *p = to_pixels(*lm, frame_width, frame_height);
        }

        Ok(Hand { handedness, points, confidence, frame_width, frame_height })
    }

    pub fn point(&self, idx: usize) -> PixelPoint {
        self.points[idx]
    }

    /// Min/max box over all 21 points.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        BoundingBox { min, max }
    }

    pub fn finger_state(&self) -> FingerState {
        FingerState::classify(&self.points, self.handedness)
    }
}

/// Scale one normalized landmark to pixel space, truncating toward zero.
pub fn to_pixels(lm: Landmark, frame_width: u32, frame_height: u32) -> PixelPoint {
    PixelPoint {
        x: (lm.x * frame_width as f32) as i32,
        y: (lm.y * frame_height as f32) as i32,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use landmark::*;

    /// Flat normalized hand: every point at (0.5, 0.5).
    fn flat_landmarks() -> Vec<Landmark> {
        vec![Landmark { x: 0.5, y: 0.5, z: 0.0 }; COUNT]
    }

    // ── normalizer ───────────────────────────────────────────────────────
    #[test]
    fn pixels_truncate() {
        let p = to_pixels(Landmark { x: 0.5, y: 0.5, z: 0.0 }, 640, 480);
        assert_eq!(p, PixelPoint { x: 320, y: 240 });

        // 0.999 * 640 = 639.36 → 639
        let p = to_pixels(Landmark { x: 0.999, y: 0.999, z: 0.0 }, 640, 480);
        assert_eq!(p, PixelPoint { x: 639, y: 479 });
    }

    #[test]
    fn pixels_outside_frame_not_clamped() {
        let p = to_pixels(Landmark { x: 1.2, y: -0.1, z: 0.0 }, 640, 480);
        assert_eq!(p, PixelPoint { x: 768, y: -48 });
    }

    #[test]
    fn bounding_box_spans_all_points() {
        let mut lms = flat_landmarks();
        lms[WRIST]     = Landmark { x: 0.1, y: 0.9, z: 0.0 };
        lms[INDEX_TIP] = Landmark { x: 0.8, y: 0.2, z: 0.0 };
        let hand = Hand::from_raw("Right", &lms, 0.9, 640, 480).unwrap();
        let bb = hand.bounding_box();
        assert_eq!(bb.min, PixelPoint { x: 64,  y: 96  });
        assert_eq!(bb.max, PixelPoint { x: 512, y: 432 });
        assert_eq!(bb.width(), 448);
        assert_eq!(bb.height(), 336);
    }

    // ── validation ───────────────────────────────────────────────────────
    #[test]
    fn rejects_short_landmark_list() {
        let lms = vec![Landmark::default(); 20];
        let err = Hand::from_raw("Right", &lms, 0.9, 640, 480).unwrap_err();
        assert_eq!(err, HandError::LandmarkCount(20));
    }

    #[test]
    fn rejects_unknown_handedness() {
        let err = Hand::from_raw("Both", &flat_landmarks(), 0.9, 640, 480).unwrap_err();
        assert_eq!(err, HandError::UnknownHandedness("Both".to_string()));
    }

    // ── finger classification ────────────────────────────────────────────

    /// Build a pixel-space hand where each finger's tip sits above
    /// (extended) or below (folded) the joint two indices down, and the
    /// thumb tip sits palm-side or away per `thumb`.
    fn hand_points(thumb: bool, fingers: [bool; 4], handedness: Handedness) -> [PixelPoint; COUNT] {
        let mut pts = [PixelPoint { x: 320, y: 240 }; COUNT];
        for (i, &extended) in fingers.iter().enumerate() {
            let tip = INDEX_TIP + i * 4;
            pts[tip - 2].y = 200;
            pts[tip].y = if extended { 150 } else { 250 };
        }
        pts[THUMB_MCP].x = 300;
        let away = if extended_sign(handedness) < 0 { 260 } else { 340 };
        let near = if extended_sign(handedness) < 0 { 340 } else { 260 };
        pts[THUMB_TIP].x = if thumb { away } else { near };
        pts
    }

    fn extended_sign(handedness: Handedness) -> i32 {
        match handedness {
            Handedness::Right => -1, // extended thumb is left of MCP
            Handedness::Left  => 1,
        }
    }

    #[test]
    fn all_extended() {
        let pts = hand_points(true, [true; 4], Handedness::Right);
        let fs = FingerState::classify(&pts, Handedness::Right);
        assert_eq!(fs, FingerState([true; 5]));
        assert_eq!(fs.count(), 5);
    }

    #[test]
    fn fist() {
        let pts = hand_points(false, [false; 4], Handedness::Right);
        let fs = FingerState::classify(&pts, Handedness::Right);
        assert_eq!(fs, FingerState([false; 5]));
    }

    #[test]
    fn index_and_pinky_only() {
        let pts = hand_points(false, [true, false, false, true], Handedness::Right);
        let fs = FingerState::classify(&pts, Handedness::Right);
        assert_eq!(fs, FingerState([false, true, false, false, true]));
    }

    #[test]
    fn thumb_flips_with_handedness() {
        // Same geometry, opposite labels: the thumb bit must invert.
        let pts = hand_points(true, [false; 4], Handedness::Right);
        let right = FingerState::classify(&pts, Handedness::Right);
        let left  = FingerState::classify(&pts, Handedness::Left);
        assert!(right.thumb());
        assert!(!left.thumb());
    }
}
