//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk_count must be at least 1")]
    ZeroChunkCount,

    #[error("cache_capacity must be at least 1")]
    ZeroCacheCapacity,

    #[error("render_scale must be in (0, 1], got {0}")]
    InvalidRenderScale(f64),

    #[error("auto_zoom_speed must be in [0, 1), got {0}")]
    InvalidZoomSpeed(f64),

    #[error("max_zoom must be greater than 1, got {0}")]
    InvalidMaxZoom(f64),

    #[error("iteration_ceiling must be at least 1")]
    ZeroIterationCeiling,

    #[error("iterations_per_octave must be finite and non-negative, got {0}")]
    InvalidIterationsPerOctave(f64),

    #[error("path_phase_step must be finite, got {0}")]
    InvalidPhaseStep(f64),

    #[error("patch_step must be at least 1")]
    ZeroPatchStep,

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
