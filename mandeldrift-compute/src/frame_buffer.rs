use crate::surface::RgbaSurface;
use mandeldrift_core::PixelRect;

/// Brightness bytes at render resolution, row-major.
///
/// Owned by the rasterizer; reallocated only when the surface size changes.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.pixels[index] = value;
        }
    }

    /// Expand a region to opaque gray RGBA for blitting.
    pub fn rgba_region(&self, rect: PixelRect) -> Vec<u8> {
        let x_end = rect.right().min(self.width);
        let y_end = (rect.y + rect.height).min(self.height);
        let mut rgba = Vec::with_capacity(rect.area() as usize * 4);

        for y in rect.y..y_end {
            for x in rect.x..x_end {
                let v = self.pixels[self.index(x, y)];
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        rgba
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        self.rgba_region(PixelRect::new(0, 0, self.width, self.height))
    }
}

/// Presentation seam for the page shell.
///
/// `present` runs after every chunk with the columns that just changed, so
/// the display fills in progressively. `present_overlay` runs once per tick
/// after the particle layer is composited.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameBuffer, dirty: PixelRect);

    fn present_overlay(&mut self, _overlay: &RgbaSurface) {}
}

/// Discards everything. For headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &FrameBuffer, _dirty: PixelRect) {}
}
