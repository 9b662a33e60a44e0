//! Progressive, frame-budgeted rasterizer for the main fractal layer.
//!
//! A frame is split into column chunks and each scheduling opportunity
//! renders exactly one of them, then presents the partly filled buffer. The
//! view is sampled per call, so a chunk never mixes two view states even
//! though consecutive chunks of one frame may come from different ticks.

use crate::chunks::generate_column_chunks;
use crate::frame_buffer::{FrameBuffer, FrameSink};
use crate::mandelbrot::sample_brightness;
use mandeldrift_core::{pixel_to_complex, PixelRect, ViewState};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq)]
enum RasterState {
    Idle,
    InFlight { next_chunk: usize, started_ms: f64 },
}

/// What one scheduling call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// Surface has no pixels; nothing rendered.
    Skipped,
    /// No frame in flight and none requested.
    Idle,
    ChunkRendered { frame_index: u64, chunk_index: usize },
    /// The last chunk of a frame was rendered.
    FrameCompleted { frame_index: u64, latency_ms: f64 },
}

/// How far the frame currently being rasterized has got.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameProgress {
    /// 1-based once the first frame has started; a resize keeps the index
    pub frame_index: u64,
    pub completed_chunks: u32,
    pub total_chunks: u32,
    /// Scheduler time since the frame's first chunk
    pub elapsed_ms: f64,
    pub is_complete: bool,
}

impl FrameProgress {
    fn new(frame_index: u64, total_chunks: u32) -> Self {
        Self {
            frame_index,
            total_chunks,
            ..Self::default()
        }
    }

    /// Share of the frame's columns rendered so far, 0 to 100.
    pub fn percentage(&self) -> f64 {
        if self.total_chunks == 0 {
            return 0.0;
        }
        self.completed_chunks as f64 / self.total_chunks as f64 * 100.0
    }
}

pub struct ProgressiveRasterizer {
    buffer: FrameBuffer,
    chunks: Vec<PixelRect>,
    chunk_count: u32,
    state: RasterState,
    /// A render was requested while one was in flight
    pending: bool,
    /// Start a new frame whenever the previous one finishes
    continuous: bool,
    progress: FrameProgress,
    frames_started: u64,
    frames_completed: u64,
    last_latency_ms: Option<f64>,
}

impl ProgressiveRasterizer {
    /// Rasterizer that keeps rendering frame after frame.
    pub fn continuous(width: u32, height: u32, chunk_count: u32) -> Self {
        Self::new(width, height, chunk_count, true)
    }

    /// Rasterizer that only renders when asked via [`Self::request_render`].
    pub fn on_demand(width: u32, height: u32, chunk_count: u32) -> Self {
        Self::new(width, height, chunk_count, false)
    }

    fn new(width: u32, height: u32, chunk_count: u32, continuous: bool) -> Self {
        let chunk_count = chunk_count.max(1);
        Self {
            buffer: FrameBuffer::new(width, height),
            chunks: generate_column_chunks(width, height, chunk_count),
            chunk_count,
            state: RasterState::Idle,
            pending: false,
            continuous,
            progress: FrameProgress::new(0, chunk_count),
            frames_started: 0,
            frames_completed: 0,
            last_latency_ms: None,
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn progress(&self) -> FrameProgress {
        self.progress
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, RasterState::InFlight { .. })
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    pub fn last_latency_ms(&self) -> Option<f64> {
        self.last_latency_ms
    }

    /// Ask for a fresh render.
    ///
    /// While a frame is in flight this only raises the pending flag; at most
    /// one extra render is queued no matter how often it is called.
    pub fn request_render(&mut self) {
        self.pending = true;
    }

    /// Reallocate for a new surface size. Any in-flight frame is abandoned
    /// and restarts from chunk 0 on the next call.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.is_in_flight() {
            self.pending = true;
        }
        self.buffer = FrameBuffer::new(width, height);
        self.chunks = generate_column_chunks(width, height, self.chunk_count);
        self.state = RasterState::Idle;
        self.progress = FrameProgress::new(self.frames_started, self.chunk_count);
    }

    /// Render the next chunk of the current frame against `view`, starting a
    /// new frame first if none is in flight.
    pub fn step(&mut self, view: &ViewState, time_ms: f64, sink: &mut dyn FrameSink) -> StepOutcome {
        if self.buffer.is_empty() {
            return StepOutcome::Skipped;
        }

        if self.state == RasterState::Idle {
            if !(self.continuous || self.pending) {
                return StepOutcome::Idle;
            }
            self.pending = false;
            self.begin_frame(time_ms);
        }

        let RasterState::InFlight {
            next_chunk,
            started_ms,
        } = self.state
        else {
            return StepOutcome::Idle;
        };

        let rect = self.chunks[next_chunk];
        self.render_chunk(rect, view);
        sink.present(&self.buffer, rect);

        let completed = next_chunk + 1;
        self.progress.completed_chunks = completed as u32;
        self.progress.elapsed_ms = time_ms - started_ms;

        if completed < self.chunks.len() {
            self.state = RasterState::InFlight {
                next_chunk: completed,
                started_ms,
            };
            return StepOutcome::ChunkRendered {
                frame_index: self.frames_started,
                chunk_index: next_chunk,
            };
        }

        let latency_ms = time_ms - started_ms;
        self.progress.is_complete = true;
        self.frames_completed += 1;
        self.last_latency_ms = Some(latency_ms);
        log::debug!(
            "frame {} complete: {} chunks, {:.1}ms, {} iterations",
            self.frames_started,
            self.chunks.len(),
            latency_ms,
            view.max_iterations
        );

        let frame_index = self.frames_started;
        if self.pending {
            // Deferred request starts right away; its first chunk renders on
            // the next call
            self.pending = false;
            self.begin_frame(time_ms);
        } else {
            self.state = RasterState::Idle;
        }

        StepOutcome::FrameCompleted {
            frame_index,
            latency_ms,
        }
    }

    fn begin_frame(&mut self, time_ms: f64) {
        self.frames_started += 1;
        self.progress = FrameProgress::new(self.frames_started, self.chunks.len() as u32);
        self.state = RasterState::InFlight {
            next_chunk: 0,
            started_ms: time_ms,
        };
    }

    fn render_chunk(&mut self, rect: PixelRect, view: &ViewState) {
        let size = self.buffer.size();
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.right() {
                let c = pixel_to_complex(x as f64, y as f64, view, size);
                self.buffer
                    .set(x, y, sample_brightness(c, view.max_iterations));
            }
        }
    }
}

/// Render a whole frame in one go. Reference output for the progressive path.
pub fn render_full_frame(view: &ViewState, width: u32, height: u32) -> FrameBuffer {
    let mut buffer = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = pixel_to_complex(x as f64, y as f64, view, (width, height));
            buffer.set(x, y, sample_brightness(c, view.max_iterations));
        }
    }
    buffer
}
