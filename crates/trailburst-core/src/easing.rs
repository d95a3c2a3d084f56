//! Quadratic easing curves used by the speed ramp and the burst envelope.

/// Clamp to `[0, 1]`.
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in from `p` to `q`: `p + (q - p) * t²`.
pub fn ease_in_quad(p: f32, q: f32, t: f32) -> f32 {
    (q - p) * t * t + p
}

/// Quadratic ease-out from `p` to `q`: `p + (q - p) * -t(t - 2)`.
pub fn ease_out_quad(p: f32, q: f32, t: f32) -> f32 {
    -(q - p) * t * (t - 2.0) + p
}

/// Linear interpolation without clamping.
pub fn lerp(p: f32, q: f32, t: f32) -> f32 {
    p + (q - p) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_quad(2.0, 10.0, 0.0), 2.0);
        assert_eq!(ease_in_quad(2.0, 10.0, 1.0), 10.0);
        assert_eq!(ease_out_quad(10.0, 0.0, 0.0), 10.0);
        assert_eq!(ease_out_quad(10.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_ease_in_is_slow_at_start() {
        // Quadratic: a quarter of the way in time covers a sixteenth of the distance.
        let v = ease_in_quad(0.0, 16.0, 0.25);
        assert!((v - 1.0).abs() < 1e-6, "expected 1.0, got {v}");
    }

    #[test]
    fn test_ease_out_is_fast_at_start() {
        let v = ease_out_quad(0.0, 16.0, 0.25);
        assert!((v - 7.0).abs() < 1e-5, "expected 7.0, got {v}");
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(7.0), 1.0);
    }

    proptest! {
        #[test]
        fn ease_in_monotonic_when_rising(
            p in -1000.0f32..1000.0,
            span in 0.001f32..1000.0,
            a in 0.0f32..1.0,
            b in 0.0f32..1.0,
        ) {
            let q = p + span;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_in_quad(p, q, lo) <= ease_in_quad(p, q, hi));
        }

        #[test]
        fn ease_out_stays_between_endpoints(
            p in 0.0f32..500.0,
            t in 0.0f32..1.0,
        ) {
            let v = ease_out_quad(p, 0.0, t);
            prop_assert!(v >= -1e-3 && v <= p + 1e-3, "v={} p={}", v, p);
        }
    }
}
