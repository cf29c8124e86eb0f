//! Output limiting
//!
//! Several voices struck together can sum well past full scale. The mix bus
//! ends in a symmetric limiter so the device never sees a sample outside
//! `[-ceiling, ceiling]`.
//!
//! # Transfer Function
//!
//! ```text
//!   out
//!    c ┤        ┌────────
//!      │       ╱
//!    0 ┤──────╱──────────  in
//!      │     ╱
//!   -c ┤────┘
//! ```
//!
//! Inside the ceiling the signal passes untouched; outside it is held flat.
//! Unlike a waveshaper there is no drive stage, so quiet material is bit-exact.

/// Clamp `sample` to `[-ceiling, ceiling]`. NaN maps to silence.
#[inline]
pub fn soft_limit(sample: f32, ceiling: f32) -> f32 {
    if sample.is_nan() {
        return 0.0;
    }
    sample.clamp(-ceiling, ceiling)
}

/// Apply [`soft_limit`] to an entire buffer in place.
pub fn soft_limit_buffer(buffer: &mut [f32], ceiling: f32) {
    for sample in buffer.iter_mut() {
        *sample = soft_limit(*sample, ceiling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn passes_signal_below_ceiling() {
        assert_eq!(soft_limit(0.3, 0.8), 0.3);
        assert_eq!(soft_limit(-0.79, 0.8), -0.79);
    }

    #[test]
    fn holds_at_ceiling() {
        assert_eq!(soft_limit(1.6, 0.8), 0.8);
        assert_eq!(soft_limit(-3.0, 0.8), -0.8);
        assert_eq!(soft_limit(f32::INFINITY, 0.8), 0.8);
    }

    #[test]
    fn nan_becomes_silence() {
        assert_eq!(soft_limit(f32::NAN, 0.8), 0.0);
    }

    #[test]
    fn buffer_variant_limits_every_sample() {
        let mut buffer = [2.0, -2.0, 0.1];
        soft_limit_buffer(&mut buffer, 0.8);
        assert_eq!(buffer, [0.8, -0.8, 0.1]);
    }

    proptest! {
        #[test]
        fn output_never_exceeds_ceiling(sample in any::<f32>(), ceiling in 0.01f32..4.0) {
            let out = soft_limit(sample, ceiling);
            prop_assert!(out.abs() <= ceiling);
        }
    }
}
