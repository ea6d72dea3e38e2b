//! Demonstrates hand_stream: pixel normalization, bounding boxes, and
//! finger-state classification on synthetic hands.

use hand_stream::landmark::*;
use hand_stream::{FingerState, Hand, Landmark};

/// Normalized hand posed to `fingers` = [thumb, index, middle, ring, pinky],
/// centered at (0.5, 0.5).
fn posed(label: &str, fingers: [bool; 5]) -> Vec<Landmark> {
    let mut lms = vec![Landmark { x: 0.5, y: 0.5, z: 0.0 }; COUNT];
    for (i, &extended) in fingers[1..].iter().enumerate() {
        let tip = INDEX_TIP + i * 4;
        lms[tip - 2].y = 0.5;
        lms[tip].y = if extended { 0.35 } else { 0.58 };
    }
    let away = if label == "Left" { 0.1 } else { -0.1 };
    lms[THUMB_MCP].x = 0.5;
    lms[THUMB_TIP].x = if fingers[0] { 0.5 + away } else { 0.5 - away * 0.5 };
    lms
}

fn show_state(label: &str, fs: FingerState) {
    let bits: String = fs.0.iter().map(|&f| if f { '1' } else { '0' }).collect();
    println!("   {:24} [{}]  ({} extended)", label, bits, fs.count());
}

fn main() {
    println!("\n=== Hand Stream Demo ===\n");

    // ── 1. Normalization: detector space → pixel space ────────────────────
    println!("1. Normalized landmarks → 640×480 pixel space");
    let mut lms = posed("Right", [true, true, true, true, true]);
    lms[WRIST] = Landmark { x: 0.45, y: 0.85, z: 0.0 };
    let hand = Hand::from_raw("Right", &lms, 0.97, 640, 480).unwrap();
    println!("   wrist     : {:?}", hand.point(WRIST));
    println!("   index tip : {:?}", hand.point(INDEX_TIP));
    println!("   thumb tip : {:?}", hand.point(THUMB_TIP));
    let bb = hand.bounding_box();
    println!("   bounding  : {:?} → {:?}  ({}×{} px)\n", bb.min, bb.max, bb.width(), bb.height());

    // ── 2. Canonical poses ────────────────────────────────────────────────
    println!("2. Finger classification, right hand  [thumb index middle ring pinky]");
    for (name, fingers) in [
        ("open palm",            [true,  true,  true,  true,  true ]),
        ("fist",                 [false, false, false, false, false]),
        ("point (index only)",   [false, true,  false, false, false]),
        ("rock (index + pinky)", [false, true,  false, false, true ]),
        ("pinch (thumb + index)",[true,  true,  false, false, false]),
    ] {
        let lms = posed("Right", fingers);
        let hand = Hand::from_raw("Right", &lms, 0.97, 640, 480).unwrap();
        show_state(name, hand.finger_state());
    }
    println!();

    // ── 3. Thumb is handedness-relative ───────────────────────────────────
    println!("3. Same geometry, opposite handedness label");
    let lms = posed("Right", [true, false, false, false, false]);
    let right = Hand::from_raw("Right", &lms, 0.97, 640, 480).unwrap();
    let left = Hand::from_raw("Left", &lms, 0.97, 640, 480).unwrap();
    show_state("labelled Right", right.finger_state());
    show_state("labelled Left", left.finger_state());
    println!("   The thumb bit flips: extension is judged away from the palm.\n");

    // ── 4. Validation rejects malformed detections ────────────────────────
    println!("4. Malformed detections are rejected, not guessed at");
    let short = vec![Landmark::default(); 20];
    println!("   20 landmarks     : {}", Hand::from_raw("Right", &short, 0.9, 640, 480).unwrap_err());
    let lms = posed("Right", [true; 5]);
    println!("   handedness \"Both\": {}", Hand::from_raw("Both", &lms, 0.9, 640, 480).unwrap_err());
    println!();
}
