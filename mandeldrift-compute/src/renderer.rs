//! Per-session renderer state and the per-tick data flow.

use crate::clock::AnimationClock;
use crate::frame_buffer::{FrameBuffer, FrameSink};
use crate::orbit::{AnchorPoint, OrbitCompositor, Particle};
use crate::pattern_cache::PatternCache;
use crate::rasterizer::{FrameProgress, ProgressiveRasterizer, StepOutcome};
use crate::surface::RgbaSurface;
use mandeldrift_core::{BackgroundConfig, ConfigError, PathEvent, ViewPathController, ViewState};
use serde::Serialize;

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub path: PathEvent,
    pub raster: StepOutcome,
    pub particles_drawn: usize,
}

/// Read-only snapshot for on-screen counters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RendererStats {
    pub tick: u64,
    pub zoom: f64,
    pub max_iterations: u32,
    pub fps: f64,
    pub frames_completed: u64,
    pub last_frame_ms: Option<f64>,
    pub cached_patches: usize,
    pub progress: FrameProgress,
}

impl RendererStats {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Everything one background instance owns. Each tick mutates it through
/// `&mut self`, so there is exactly one writer at a time.
pub struct RendererState {
    config: BackgroundConfig,
    clock: AnimationClock,
    path: ViewPathController,
    rasterizer: ProgressiveRasterizer,
    cache: PatternCache,
    compositor: OrbitCompositor,
    anchor: AnchorPoint,
    display_size: (u32, u32),
    warned_empty: bool,
}

impl RendererState {
    pub fn new(config: BackgroundConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let particles = Particle::layout(config.particle_count, config.particle_seed);
        Ok(Self {
            clock: AnimationClock::new(),
            path: ViewPathController::new(&config),
            rasterizer: ProgressiveRasterizer::continuous(0, 0, config.chunk_count),
            cache: PatternCache::new(&config),
            compositor: OrbitCompositor::new(particles, 0, 0),
            anchor: AnchorPoint::default(),
            display_size: (0, 0),
            warned_empty: false,
            config,
        })
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    /// Adopt a new display size. The frame buffer is reallocated at render
    /// resolution and any partial frame is thrown away.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.display_size {
            return;
        }
        self.display_size = (width, height);
        let (render_width, render_height) = self.config.render_size(width, height);
        self.rasterizer.resize(render_width, render_height);
        self.compositor.resize(width, height);
        self.warned_empty = false;
        log::debug!(
            "resized to {}x{} (render {}x{})",
            width,
            height,
            render_width,
            render_height
        );
    }

    pub fn set_anchor(&mut self, anchor: AnchorPoint) {
        self.anchor = anchor;
    }

    pub fn anchor(&self) -> AnchorPoint {
        self.anchor
    }

    pub fn request_render(&mut self) {
        self.rasterizer.request_render();
    }

    /// Run one tick: clock, then view path, then one raster chunk against
    /// the updated view, then the satellite layer.
    pub fn tick(&mut self, time_ms: f64, sink: &mut dyn FrameSink) -> TickReport {
        let tick = self.clock.advance(time_ms);
        let path = self.path.advance();

        let (width, height) = self.display_size;
        if width == 0 || height == 0 {
            if !self.warned_empty {
                log::warn!("display is {}x{}; skipping render", width, height);
                self.warned_empty = true;
            }
            // Particles keep orbiting; an empty overlay draws nothing
            let particles_drawn = self.compositor.advance(self.anchor, &mut self.cache);
            return TickReport {
                tick,
                path,
                raster: StepOutcome::Skipped,
                particles_drawn,
            };
        }

        let raster = self.rasterizer.step(self.path.view(), time_ms, sink);
        let particles_drawn = self.compositor.advance(self.anchor, &mut self.cache);
        sink.present_overlay(self.compositor.surface());

        TickReport {
            tick,
            path,
            raster,
            particles_drawn,
        }
    }

    pub fn view(&self) -> &ViewState {
        self.path.view()
    }

    pub fn zoom(&self) -> f64 {
        self.path.view().zoom
    }

    pub fn max_iterations(&self) -> u32 {
        self.path.view().max_iterations
    }

    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }

    pub fn progress(&self) -> FrameProgress {
        self.rasterizer.progress()
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.rasterizer.frame()
    }

    pub fn overlay(&self) -> &RgbaSurface {
        self.compositor.surface()
    }

    pub fn stats(&self) -> RendererStats {
        RendererStats {
            tick: self.clock.tick(),
            zoom: self.zoom(),
            max_iterations: self.max_iterations(),
            fps: self.fps(),
            frames_completed: self.rasterizer.frames_completed(),
            last_frame_ms: self.rasterizer.last_latency_ms(),
            cached_patches: self.cache.len(),
            progress: self.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_buffer::NullSink;
    use mandeldrift_core::PixelRect;

    #[derive(Default)]
    struct CountingSink {
        chunks: usize,
        overlays: usize,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, _frame: &FrameBuffer, _dirty: PixelRect) {
            self.chunks += 1;
        }

        fn present_overlay(&mut self, _overlay: &RgbaSurface) {
            self.overlays += 1;
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BackgroundConfig {
            chunk_count: 0,
            ..BackgroundConfig::default()
        };
        assert!(matches!(
            RendererState::new(config),
            Err(ConfigError::ZeroChunkCount)
        ));
    }

    #[test]
    fn ticks_before_resize_are_skipped_but_path_advances() {
        let mut state = RendererState::new(BackgroundConfig::default()).unwrap();
        let report = state.tick(0.0, &mut NullSink);
        assert_eq!(report.raster, StepOutcome::Skipped);
        assert_eq!(report.particles_drawn, 0);
        assert!(state.zoom() > 1.0);
    }

    #[test]
    fn particles_keep_orbiting_while_display_is_empty() {
        let mut state = RendererState::new(BackgroundConfig::default()).unwrap();
        let before: Vec<f64> = state.compositor.particles().iter().map(|p| p.angle).collect();

        for i in 0..5 {
            state.tick(i as f64 * 16.0, &mut NullSink);
        }

        assert!(state.compositor.global_angle() > 0.0);
        for (p, angle) in state.compositor.particles().iter().zip(before) {
            assert!((p.angle - (angle + 5.0 * p.speed)).abs() < 1e-12);
        }
        assert!(state.cache.is_empty(), "nothing drawn, nothing rendered");
    }

    #[test]
    fn anchor_far_off_screen_draws_an_empty_overlay() {
        let mut state = RendererState::new(BackgroundConfig::default()).unwrap();
        state.resize(100, 100);
        state.set_anchor(AnchorPoint::new(1e19, 50.0));

        let report = state.tick(0.0, &mut NullSink);
        assert_eq!(report.particles_drawn, 6);
        assert!(state.overlay().pixels().iter().all(|&p| p == 0));

        state.set_anchor(AnchorPoint::new(f64::MAX, -f64::MAX));
        state.tick(16.0, &mut NullSink);
        assert!(state.overlay().pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn tick_presents_chunk_and_overlay() {
        let mut state = RendererState::new(BackgroundConfig::default()).unwrap();
        state.resize(160, 120);
        state.set_anchor(AnchorPoint::new(80.0, 60.0));
        let mut sink = CountingSink::default();

        let report = state.tick(0.0, &mut sink);
        assert_eq!(report.tick, 1);
        assert!(matches!(report.raster, StepOutcome::ChunkRendered { .. }));
        assert_eq!(report.particles_drawn, 6);
        assert_eq!(sink.chunks, 1);
        assert_eq!(sink.overlays, 1);
        assert_eq!(state.frame().size(), (80, 60));
        assert_eq!((state.overlay().width(), state.overlay().height()), (160, 120));
    }

    #[test]
    fn stats_reflect_view_and_serialize() {
        let mut state = RendererState::new(BackgroundConfig::default()).unwrap();
        state.resize(64, 64);
        for i in 0..8 {
            state.tick(i as f64 * 16.0, &mut NullSink);
        }
        let stats = state.stats();
        assert_eq!(stats.tick, 8);
        assert_eq!(stats.zoom, state.zoom());
        assert_eq!(stats.max_iterations, state.max_iterations());
        assert_eq!(stats.frames_completed, 2);
        assert!(stats.fps > 0.0);

        let json = stats.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tick"], 8);
        assert_eq!(value["frames_completed"], 2);
    }
}
