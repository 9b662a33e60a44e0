use crate::intensity::brightness;
use mandeldrift_core::{Complex, PixelSample};

/// |z|² bound; an orbit past radius 2 always diverges.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Iterate z ← z² + c from z = 0 until |z|² > 4 or `max_iterations` steps.
///
/// The returned sample keeps the final z, so smooth coloring does not need
/// to walk the orbit a second time.
#[inline]
pub fn iterate(c: Complex, max_iterations: u32) -> PixelSample {
    let mut z = Complex::zero();
    let mut count = 0;

    while count < max_iterations && z.norm_sq() <= ESCAPE_RADIUS_SQ {
        z = z.square() + c;
        count += 1;
    }

    PixelSample::new(count, z)
}

/// Recover z after exactly `steps` iterations by walking the orbit again.
///
/// Agrees with `iterate(c, _).z_final` whenever `steps` is the count it
/// returned.
pub fn orbit_after(c: Complex, steps: u32) -> Complex {
    let mut z = Complex::zero();
    for _ in 0..steps {
        z = z.square() + c;
    }
    z
}

/// Continuous escape value μ = n + 1 - log₂(ln|z|).
///
/// Only meaningful for escaped samples, where |z| > 2 keeps both logarithms
/// defined.
#[inline]
pub fn smooth_iteration(sample: &PixelSample) -> f64 {
    let log_z = sample.escape_modulus.ln();
    sample.iteration_count as f64 + 1.0 - log_z.ln() / std::f64::consts::LN_2
}

/// Full per-pixel pipeline: escape time, smooth value, grayscale intensity.
#[inline]
pub fn sample_brightness(c: Complex, max_iterations: u32) -> u8 {
    let sample = iterate(c, max_iterations);
    if !sample.escaped(max_iterations) {
        return 0;
    }
    brightness(
        sample.iteration_count,
        max_iterations,
        smooth_iteration(&sample),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_in_set() {
        for max in [1, 10, 80, 400] {
            let sample = iterate(Complex::zero(), max);
            assert_eq!(sample.iteration_count, max);
            assert!(!sample.escaped(max));
        }
    }

    #[test]
    fn three_escapes_in_one_step() {
        let sample = iterate(Complex::new(3.0, 0.0), 100);
        assert_eq!(sample.iteration_count, 1);
        assert_eq!(sample.escape_modulus, 3.0);
    }

    #[test]
    fn points_outside_radius_two_escape_immediately() {
        // z₁ = c, so |c| > 2 escapes after the first step
        for i in 0..64 {
            let angle = i as f64 * std::f64::consts::TAU / 64.0;
            let r = 2.0 + 0.01 + i as f64 * 0.1;
            let c = Complex::new(r * angle.cos(), r * angle.sin());
            let sample = iterate(c, 80);
            assert!(sample.iteration_count < 80, "c = {:?} did not escape", c);
            assert_eq!(sample.iteration_count, 1);
        }
    }

    #[test]
    fn main_cardioid_point_in_set() {
        let sample = iterate(Complex::new(-0.5, 0.0), 500);
        assert!(!sample.escaped(500));
    }

    #[test]
    fn boundary_point_takes_many_iterations() {
        let sample = iterate(Complex::new(-0.75, 0.1), 1000);
        assert!(sample.escaped(1000));
        assert!(sample.iteration_count > 10);
    }

    #[test]
    fn zero_depth_counts_as_interior() {
        let sample = iterate(Complex::new(5.0, 5.0), 0);
        assert_eq!(sample.iteration_count, 0);
        assert!(!sample.escaped(0));
        assert_eq!(sample_brightness(Complex::new(5.0, 5.0), 0), 0);
    }

    #[test]
    fn retained_orbit_matches_reiteration() {
        for c in [
            Complex::new(0.3, 0.5),
            Complex::new(-0.75, 0.1),
            Complex::new(-1.8, 0.01),
            Complex::new(0.26, 0.0),
        ] {
            let sample = iterate(c, 400);
            let replayed = orbit_after(c, sample.iteration_count);
            assert_eq!(sample.z_final, replayed, "orbit mismatch for {:?}", c);
        }
    }

    #[test]
    fn smooth_value_sits_near_integer_count() {
        let sample = iterate(Complex::new(0.4, 0.4), 200);
        assert!(sample.escaped(200));
        let mu = smooth_iteration(&sample);
        // |z| in (2, ~6] keeps the correction within about one band
        assert!(mu > sample.iteration_count as f64 - 1.0);
        assert!(mu < sample.iteration_count as f64 + 1.6);
    }

    #[test]
    fn interior_brightness_is_black() {
        assert_eq!(sample_brightness(Complex::new(-0.5, 0.0), 80), 0);
        assert_eq!(sample_brightness(Complex::zero(), 80), 0);
    }
}
