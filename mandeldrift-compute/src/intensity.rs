//! Grayscale intensity from a smooth escape value.
//!
//! The normalized value wraps modulo 1 before the contrast curve, which
//! bands the exterior into repeating gradients. That banding is the intended
//! look.

/// Exponent of the contrast lift applied to the wrapped value.
pub const CONTRAST_EXPONENT: f64 = 0.5;

/// Map an escape result to a 0-255 brightness.
///
/// Interior points (`count == max_iterations`) are solid black.
#[inline]
pub fn brightness(count: u32, max_iterations: u32, smooth_iteration: f64) -> u8 {
    if count >= max_iterations {
        return 0;
    }

    let normalized = (smooth_iteration / max_iterations as f64).rem_euclid(1.0);
    let lifted = normalized.powf(CONTRAST_EXPONENT);

    // NaN saturates to 0 in the cast
    (lifted * 255.0).clamp(0.0, 255.0) as u8
}
