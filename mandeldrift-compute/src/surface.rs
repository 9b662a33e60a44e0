//! RGBA8 overlay surface with the few drawing primitives the particle layer
//! needs. Colors are non-premultiplied, matching canvas `ImageData`.

use crate::pattern_cache::Patch;

pub struct RgbaSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Fully transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Source-over blend of one pixel. Coordinates outside the surface are
    /// clipped.
    pub fn blend_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let src_a = alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst_a = self.pixels[i + 3] as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        for c in 0..3 {
            let src = rgb[c] as f64;
            let dst = self.pixels[i + c] as f64;
            let blended = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
            self.pixels[i + c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Alpha-blended line, one sample per pixel step along the major axis.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), rgb: [u8; 3], alpha: f64) {
        let Some((from, to)) = self.clip_segment(from, to) else {
            return;
        };
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.0 + dx * t).round() as i64;
            let y = (from.1 + dy * t).round() as i64;
            self.blend_pixel(x, y, rgb, alpha);
        }
    }

    /// Clip a segment to the surface grown by one pixel on every side
    /// (Liang-Barsky). `None` if it misses or is not finite.
    fn clip_segment(
        &self,
        from: (f64, f64),
        to: (f64, f64),
    ) -> Option<((f64, f64), (f64, f64))> {
        if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let (x_max, y_max) = (self.width as f64, self.height as f64);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for (p, q) in [
            (-dx, from.0 + 1.0),
            (dx, x_max - from.0),
            (-dy, from.1 + 1.0),
            (dy, y_max - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((
            (from.0 + dx * t0, from.1 + dy * t0),
            (from.0 + dx * t1, from.1 + dy * t1),
        ))
    }

    /// Pixel box `[lo, hi]` on each axis around `center`, clipped to the
    /// surface. `None` if it misses the surface entirely.
    fn clip_box(&self, center: (f64, f64), extent: f64) -> Option<((i64, i64), (i64, i64))> {
        if self.is_empty() || !center.0.is_finite() || !center.1.is_finite() {
            return None;
        }
        let axis = |c: f64, len: u32| -> Option<(i64, i64)> {
            let lo = (c - extent).floor().max(0.0);
            let hi = (c + extent).ceil().min(len as f64 - 1.0);
            (lo <= hi).then_some((lo as i64, hi as i64))
        };
        Some((axis(center.0, self.width)?, axis(center.1, self.height)?))
    }

    /// Radial soft disk, quadratic falloff from `max_alpha` at the center to
    /// zero at `radius`.
    pub fn draw_glow(&mut self, center: (f64, f64), radius: f64, rgb: [u8; 3], max_alpha: f64) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let Some(((x0, x1), (y0, y1))) = self.clip_box(center, radius) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = ((x as f64 - center.0).powi(2) + (y as f64 - center.1).powi(2)).sqrt();
                if d >= radius {
                    continue;
                }
                let falloff = 1.0 - d / radius;
                self.blend_pixel(x, y, rgb, max_alpha * falloff * falloff);
            }
        }
    }

    /// Draw `patch` scaled to `target_size` and rotated by `rotation` radians
    /// around `center`, with `opacity` applied on top of the patch alpha.
    pub fn draw_patch_rotated(
        &mut self,
        patch: &Patch,
        center: (f64, f64),
        target_size: f64,
        rotation: f64,
        opacity: f64,
    ) {
        let patch_size = patch.size() as f64;
        if patch.size() == 0 || target_size.is_nan() || target_size <= 0.0 {
            return;
        }
        let half = target_size / 2.0;
        let extent = (half * std::f64::consts::SQRT_2).ceil();
        let Some(((x0, x1), (y0, y1))) = self.clip_box(center, extent) else {
            return;
        };
        let scale = patch_size / target_size;
        let (sin, cos) = (-rotation).sin_cos();

        for y in y0..=y1 {
            for x in x0..=x1 {
                // Inverse-rotate into patch space
                let (dx, dy) = (x as f64 - center.0, y as f64 - center.1);
                let u = (dx * cos - dy * sin + half) * scale;
                let v = (dx * sin + dy * cos + half) * scale;
                if u < 0.0 || v < 0.0 || u >= patch_size || v >= patch_size {
                    continue;
                }
                let (luma, alpha) = patch.sample(u as u32, v as u32);
                if alpha == 0 {
                    continue;
                }
                self.blend_pixel(x, y, [luma, luma, luma], alpha as f64 / 255.0 * opacity);
            }
        }
    }
}
