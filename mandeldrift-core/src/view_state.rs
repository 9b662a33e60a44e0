use serde::{Deserialize, Serialize};

/// Width of the complex-plane window at zoom 1.
pub const BASE_WINDOW_WIDTH: f64 = 4.0;

/// Current camera over the complex plane.
///
/// - `center_re`/`center_im`: point shown at the middle of the surface
/// - `zoom`: magnification, always ≥ 1 (window is `4 / zoom` wide)
/// - `max_iterations`: escape-time depth for this view, derived from zoom
///
/// Mutated once per tick by the view path controller and read by everything
/// downstream of it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center_re: f64,
    pub center_im: f64,
    pub zoom: f64,
    pub max_iterations: u32,
}

impl ViewState {
    pub fn new(center_re: f64, center_im: f64, zoom: f64, max_iterations: u32) -> Self {
        Self {
            center_re,
            center_im,
            zoom,
            max_iterations,
        }
    }

    /// Width (and height) of the visible window in complex units.
    pub fn window_width(&self) -> f64 {
        BASE_WINDOW_WIDTH / self.zoom
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center_re: -0.5,
            center_im: 0.0,
            zoom: 1.0,
            max_iterations: 80,
        }
    }
}
