//! Property tests for the frame codec, resync and value translation.

use proptest::prelude::*;
use vallox_rs485::protocol::types::{value_to_rh, value_to_speed, value_to_temp, speed_to_value};
use vallox_rs485::protocol::{Frame, Resync, WritePolicy, WRITABLE_REGISTERS};

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(s, src, dst, reg, val)| Frame::new(s, src, dst, reg, val))
}

fn frames_of(bytes: &[u8], chunks: &[usize]) -> Vec<Frame> {
    let mut resync: Resync = Resync::new();
    let mut frames = Vec::new();
    let mut rest = bytes;
    for size in chunks {
        let take = (*size).min(rest.len());
        resync.feed(&rest[..take], |f| frames.push(f));
        rest = &rest[take..];
    }
    resync.feed(rest, |f| frames.push(f));
    frames
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Encoded frames parse back to the same fields.
    #[test]
    fn prop_frame_round_trip(frame in frame_strategy()) {
        let bytes = frame.to_bytes();
        let (parsed, rest) = Frame::parse(&bytes).expect("valid frame must parse");
        prop_assert_eq!(parsed, frame);
        prop_assert!(rest.is_empty());
    }

    /// A single flipped bit anywhere in a frame is always caught.
    #[test]
    fn prop_single_bit_flip_detected(frame in frame_strategy(), bit in 0usize..48) {
        let mut bytes = frame.to_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(Frame::parse(&bytes).is_err(), "flip of bit {} went unnoticed", bit);
    }

    /// How reads split the stream never changes which frames come out.
    #[test]
    fn prop_resync_independent_of_chunking(
        frames in prop::collection::vec(frame_strategy(), 1..8),
        noise in prop::collection::vec(any::<u8>(), 0..16),
        chunks in prop::collection::vec(1usize..20, 0..12),
    ) {
        let mut stream = noise;
        for frame in &frames {
            stream.extend_from_slice(&frame.to_bytes());
        }

        let whole = frames_of(&stream, &[]);
        let chunked = frames_of(&stream, &chunks);
        prop_assert_eq!(whole, chunked);
    }

    /// Clean back-to-back frames all come out, unchanged and in order.
    #[test]
    fn prop_resync_clean_stream(frames in prop::collection::vec(frame_strategy(), 0..12)) {
        let stream: Vec<u8> = frames.iter().flat_map(|f| f.to_bytes().to_vec()).collect();
        prop_assert_eq!(frames_of(&stream, &[]), frames);
    }

    #[test]
    fn prop_speed_round_trip(level in 1u8..=8) {
        let raw = speed_to_value(level).expect("levels 1-8 are valid");
        prop_assert_eq!(value_to_speed(raw), level as i8);
    }

    #[test]
    fn prop_unknown_speed_pattern(raw in any::<u8>()) {
        let known = [0x01, 0x03, 0x07, 0x0f, 0x1f, 0x3f, 0x7f, 0xff];
        if !known.contains(&raw) {
            prop_assert_eq!(value_to_speed(raw), -1);
        }
    }

    #[test]
    fn prop_out_of_range_speed_rejected(level in 9u8..=255) {
        prop_assert!(speed_to_value(level).is_err());
        prop_assert!(speed_to_value(0).is_err());
    }

    #[test]
    fn prop_temperature_monotonic(a in any::<u8>(), b in any::<u8>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(value_to_temp(lo) <= value_to_temp(hi));
        prop_assert!((-74..=100).contains(&value_to_temp(a)));
    }

    #[test]
    fn prop_humidity_range(raw in any::<u8>()) {
        let rh = value_to_rh(raw);
        prop_assert!((25.0..=150.0).contains(&rh), "rh {} for raw {}", rh, raw);
        let hundredths = rh * 100.0;
        prop_assert!((hundredths - hundredths.round()).abs() < 1e-6);
    }

    /// Outside the allow-list nothing but a poll gets through, enabled or not.
    #[test]
    fn prop_policy_rejects_unlisted(register in 1u8..=255, enabled in any::<bool>()) {
        let listed = WRITABLE_REGISTERS.iter().any(|r| r.id() == register);
        let allowed = WritePolicy::new(enabled).is_write_allowed(register);
        prop_assert_eq!(allowed, enabled && listed);
    }
}
