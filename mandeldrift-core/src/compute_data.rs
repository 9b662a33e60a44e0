// mandeldrift-core/src/compute_data.rs

use crate::Complex;

/// Result of iterating a single point.
///
/// Transient: produced and consumed while processing one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelSample {
    /// Steps taken before |z|² exceeded 4, or `max_iterations` if it never did
    pub iteration_count: u32,
    /// |z| at the step the iteration stopped. Interior points carry whatever
    /// bounded value the orbit reached.
    pub escape_modulus: f64,
    /// Final orbit value, kept so smooth coloring does not need a second pass
    pub z_final: Complex,
}

impl PixelSample {
    pub fn new(iteration_count: u32, z_final: Complex) -> Self {
        Self {
            iteration_count,
            escape_modulus: z_final.norm(),
            z_final,
        }
    }

    /// Whether the orbit left the radius-2 disk before `max_iterations`.
    #[inline]
    pub fn escaped(&self, max_iterations: u32) -> bool {
        self.iteration_count < max_iterations
    }
}
