//! Bounded cache of small pre-rendered fractal patches for the satellite
//! layer.
//!
//! Keys quantize the requested size into tens of pixels and the time value
//! into one of 20 phase buckets, so neighbouring requests share a patch even
//! though it is slightly stale. Eviction is by insertion order: a hit never
//! promotes an entry.

use crate::mandelbrot::sample_brightness;
use mandeldrift_core::{pixel_to_complex, BackgroundConfig, ViewState};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Divisor applied to the requested size before bucketing.
pub const SIZE_QUANTUM: f64 = 10.0;
/// Number of distinct time phases.
pub const TIME_BUCKETS: u32 = 20;

/// Patches look into seahorse valley.
const PATCH_CENTER: (f64, f64) = (-0.745_3, 0.112_7);
const PATCH_BASE_ZOOM: f64 = 40.0;
/// How much the patch window breathes over one cycle of time buckets.
const PATCH_BREATH: f64 = 0.25;
/// Normalized radius where the circular mask starts fading.
const MASK_INNER: f64 = 0.7;

/// (quantized size, time bucket)
pub type PatchKey = (u32, u32);

pub fn quantize(size: f64, time_value: f64) -> PatchKey {
    let size_bucket = if size.is_finite() && size > 0.0 {
        (size / SIZE_QUANTUM).floor() as u32
    } else {
        0
    };
    let time_bucket = if time_value.is_finite() {
        ((time_value * 10.0).floor() as i64).rem_euclid(TIME_BUCKETS as i64) as u32
    } else {
        0
    };
    (size_bucket, time_bucket)
}

/// Square brightness + alpha image, immutable once rendered.
#[derive(Debug, PartialEq)]
pub struct Patch {
    size: u32,
    /// Interleaved (luma, alpha) pairs, row-major
    pixels: Vec<u8>,
}

impl Patch {
    pub fn size(&self) -> u32 {
        self.size
    }

    /// (luma, alpha) at a patch pixel; transparent outside.
    pub fn sample(&self, x: u32, y: u32) -> (u8, u8) {
        if x >= self.size || y >= self.size {
            return (0, 0);
        }
        let i = (y as usize * self.size as usize + x as usize) * 2;
        (self.pixels[i], self.pixels[i + 1])
    }

    /// Uniform patch, handy for compositing tests.
    pub fn solid(size: u32, luma: u8, alpha: u8) -> Self {
        let pixels = [luma, alpha].repeat(size as usize * size as usize);
        Self { size, pixels }
    }

    /// Render a patch at reduced resolution: one escape-time sample per
    /// `step`×`step` block.
    pub fn render(size: u32, time_bucket: u32, max_iterations: u32, step: u32) -> Self {
        let step = step.max(1);
        let phase = time_bucket as f64 / TIME_BUCKETS as f64 * std::f64::consts::TAU;
        let view = ViewState::new(
            PATCH_CENTER.0,
            PATCH_CENTER.1,
            PATCH_BASE_ZOOM * (1.0 + PATCH_BREATH * phase.sin()),
            max_iterations,
        );
        let surface = (size, size);
        let half = size as f64 / 2.0;
        let mut pixels = vec![0; size as usize * size as usize * 2];

        for block_y in (0..size).step_by(step as usize) {
            for block_x in (0..size).step_by(step as usize) {
                let c = pixel_to_complex(block_x as f64, block_y as f64, &view, surface);
                let luma = sample_brightness(c, max_iterations);

                for y in block_y..(block_y + step).min(size) {
                    for x in block_x..(block_x + step).min(size) {
                        let d = ((x as f64 + 0.5 - half).powi(2) + (y as f64 + 0.5 - half).powi(2))
                            .sqrt()
                            / half;
                        let i = (y as usize * size as usize + x as usize) * 2;
                        pixels[i] = luma;
                        pixels[i + 1] = circular_mask(d);
                    }
                }
            }
        }

        Self { size, pixels }
    }
}

/// Soft-edged disk: opaque inside `MASK_INNER`, linear fade to 0 at 1.
fn circular_mask(normalized_radius: f64) -> u8 {
    if normalized_radius <= MASK_INNER {
        255
    } else if normalized_radius >= 1.0 {
        0
    } else {
        ((1.0 - (normalized_radius - MASK_INNER) / (1.0 - MASK_INNER)) * 255.0) as u8
    }
}

pub struct PatternCache {
    capacity: usize,
    max_iterations: u32,
    step: u32,
    entries: HashMap<PatchKey, Rc<Patch>>,
    /// Keys in insertion order; front is evicted first
    order: VecDeque<PatchKey>,
    hits: u64,
    misses: u64,
}

impl PatternCache {
    pub fn new(config: &BackgroundConfig) -> Self {
        Self::with_capacity(
            config.cache_capacity,
            config.patch_max_iterations,
            config.patch_step,
        )
    }

    pub fn with_capacity(capacity: usize, max_iterations: u32, step: u32) -> Self {
        Self {
            capacity,
            max_iterations,
            step,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn contains(&self, key: PatchKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Return the cached patch for this size/time bucket, rendering it on a
    /// miss.
    pub fn get_or_render(&mut self, size: f64, time_value: f64) -> Rc<Patch> {
        let key = quantize(size, time_value);
        if let Some(patch) = self.entries.get(&key) {
            self.hits += 1;
            return Rc::clone(patch);
        }

        self.misses += 1;
        let pixel_size = if size.is_finite() { size.round().max(1.0) as u32 } else { 1 };
        let patch = Rc::new(Patch::render(
            pixel_size,
            key.1,
            self.max_iterations,
            self.step,
        ));

        if self.capacity == 0 {
            return patch;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    log::trace!("pattern cache evicted {:?}", oldest);
                }
                None => break,
            }
        }
        self.entries.insert(key, Rc::clone(&patch));
        self.order.push_back(key);
        patch
    }
}
