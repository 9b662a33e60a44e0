use crate::{Complex, ViewState};

/// Convert pixel coordinates to a point on the complex plane.
///
/// The surface maps linearly onto a window `4 / zoom` wide centered on the
/// view center. Width drives the horizontal scale and height the vertical
/// scale independently, so non-square surfaces stretch the plane rather than
/// crop it. Pixel (w/2, h/2) lands exactly on the center.
#[inline]
pub fn pixel_to_complex(
    pixel_x: f64,
    pixel_y: f64,
    view: &ViewState,
    surface_size: (u32, u32),
) -> Complex {
    let (width, height) = surface_size;
    let span = view.window_width();
    Complex::new(
        view.center_re + (pixel_x - width as f64 / 2.0) * span / width as f64,
        view.center_im + (pixel_y - height as f64 / 2.0) * span / height as f64,
    )
}

/// Inverse of [`pixel_to_complex`].
pub fn complex_to_pixel(point: Complex, view: &ViewState, surface_size: (u32, u32)) -> (f64, f64) {
    let (width, height) = surface_size;
    let span = view.window_width();
    (
        (point.re - view.center_re) * width as f64 / span + width as f64 / 2.0,
        (point.im - view.center_im) * height as f64 / span + height as f64 / 2.0,
    )
}
