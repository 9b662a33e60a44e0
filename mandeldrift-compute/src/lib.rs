pub mod chunks;
pub mod clock;
pub mod frame_buffer;
pub mod intensity;
pub mod mandelbrot;
pub mod orbit;
pub mod pattern_cache;
pub mod rasterizer;
pub mod renderer;
pub mod scheduler;
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use chunks::generate_column_chunks;
pub use clock::AnimationClock;
pub use frame_buffer::{FrameBuffer, FrameSink, NullSink};
pub use intensity::brightness;
pub use mandelbrot::{iterate, orbit_after, sample_brightness, smooth_iteration};
pub use orbit::{AnchorPoint, OrbitCompositor, Particle, Placement};
pub use pattern_cache::{quantize, Patch, PatchKey, PatternCache};
pub use rasterizer::{render_full_frame, FrameProgress, ProgressiveRasterizer, StepOutcome};
pub use renderer::{RendererState, RendererStats, TickReport};
pub use scheduler::{drive, AnimationHandle, ManualScheduler, Scheduler, TickCallback};
pub use surface::RgbaSurface;

#[cfg(target_arch = "wasm32")]
pub use web::{init_logging, CanvasSink, RafScheduler, WebBackground};

/// Native hosts install their own `log` backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(_level: log::Level) {}

// Re-export core types for convenience
pub use mandeldrift_core::*;
