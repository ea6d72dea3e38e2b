//! Demonstrates control_map: the pinch curve, cursor mapping, mute
//! hysteresis, and routing both hands through one frame.

use control_map::{
    pinch_percent, route, system_controls, track_pointer, PointerConfig, SystemState,
    PINCH_FAR, PINCH_NEAR,
};
use hand_stream::landmark::*;
use hand_stream::{Hand, Landmark};

/// Hand posed to `fingers` = [thumb, index, middle, ring, pinky] in a
/// 640×480 frame.
fn posed(label: &str, fingers: [bool; 5]) -> Hand {
    let mut lms = vec![Landmark { x: 0.5, y: 0.5, z: 0.0 }; COUNT];
    for (i, &extended) in fingers[1..].iter().enumerate() {
        let tip = INDEX_TIP + i * 4;
        lms[tip - 2].y = 0.5;
        lms[tip].y = if extended { 0.35 } else { 0.58 };
    }
    let away = if label == "Left" { 0.1 } else { -0.1 };
    lms[THUMB_MCP].x = 0.5;
    lms[THUMB_TIP].x = if fingers[0] { 0.5 + away } else { 0.5 - away * 0.5 };
    Hand::from_raw(label, &lms, 0.97, 640, 480).unwrap()
}

/// Left hand pinching: thumb tip and `other` tip `dist` pixels apart.
fn pinched(fingers: [bool; 5], other: usize, dist: i32) -> Hand {
    let mut hand = posed("Left", fingers);
    hand.points[THUMB_MCP].x = 100;
    hand.points[THUMB_TIP].x = 150;
    hand.points[THUMB_TIP].y = 200;
    hand.points[other].x = 150 + dist;
    hand.points[other].y = 200;
    hand
}

fn main() {
    println!("\n=== Control Map Demo ===\n");

    // ── 1. Pinch distance → percent ───────────────────────────────────────
    println!("1. Pinch curve: [{}, {}] px → [0, 100] %, clamped", PINCH_NEAR, PINCH_FAR);
    for dist in [10, 30, 50, 70, 90, 110, 200] {
        println!("   {:>4} px → {:>3} %", dist, pinch_percent(dist));
    }
    println!();

    // ── 2. Cursor mapping ─────────────────────────────────────────────────
    println!("2. Index tip → screen cursor  (640×480 frame, 1920×1080 screen)");
    for (scale, nx, ny) in [(1.0, 0.5, 0.5), (1.0, 0.25, 0.75), (1.5, 0.5, 0.5)] {
        let mut hand = posed("Right", [false, true, true, false, false]);
        hand.points[INDEX_TIP].x = (nx * 640.0) as i32;
        hand.points[INDEX_TIP].y = (ny * 480.0) as i32;
        let cfg = PointerConfig { scale, ..PointerConfig::default() };
        println!("   tip ({:.2}, {:.2}) × scale {:.1} → {:?}", nx, ny, scale, track_pointer(&hand, &cfg)[0]);
    }
    println!();

    // ── 3. Mute hysteresis ────────────────────────────────────────────────
    println!("3. Mute hysteresis: mute repeats while held, unmute fires once");
    let mute = posed("Left", [false, true, false, false, true]);
    let unmute = posed("Left", [true, false, false, false, true]);
    let mut state = SystemState::default();
    for (name, hand) in [
        ("mute held", &mute), ("mute held", &mute),
        ("unmute held", &unmute), ("unmute held", &unmute),
    ] {
        let event = system_controls(hand, &mut state);
        println!("   {:12} → {:<22} muted = {}", name,
                 event.map_or("(nothing)".to_string(), |e| format!("{:?}", e)),
                 state.is_muted());
    }
    println!();

    // ── 4. Volume and brightness pinches ──────────────────────────────────
    println!("4. Thumb–index spread drives volume, thumb–middle drives brightness");
    let mut state = SystemState::default();
    for dist in [30, 70, 110] {
        let hand = pinched([true, true, false, false, false], INDEX_TIP, dist);
        println!("   thumb–index  {:>3} px → {:?}", dist, system_controls(&hand, &mut state).unwrap());
    }
    let hand = pinched([true, false, true, false, false], MIDDLE_TIP, 90);
    println!("   thumb–middle  90 px → {:?}", system_controls(&hand, &mut state).unwrap());
    println!();

    // ── 5. Both hands in one frame ────────────────────────────────────────
    println!("5. Routing: right → pointer, left → system, independently");
    let cfg = PointerConfig::default();
    let mut state = SystemState::default();
    for hand in [posed("Right", [false, true, true, false, false]),
                 posed("Left", [false, true, false, false, true])] {
        let events = route(&hand, &cfg, &mut state);
        println!("   {:5} hand → {:?}", hand.handedness.as_str(), events);
    }
    assert!(state.is_muted());
    println!();
}
