//! Background configuration and derived rendering parameters.
//!
//! Every field is optional when loaded from JSON; missing keys take the
//! defaults below. Hosts pass the parsed config to the renderer once at
//! startup.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunables for the animated background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Relative zoom change per tick (zoom *= 1 ± speed)
    pub auto_zoom_speed: f64,
    /// Number of orbiting satellites
    pub particle_count: usize,
    /// Render resolution as a fraction of display resolution
    pub render_scale: f64,
    /// Maximum number of cached satellite patches
    pub cache_capacity: usize,
    /// Column chunks per frame (one chunk per tick)
    pub chunk_count: u32,
    /// Zoom at which the path turns around and zooms back out
    pub max_zoom: f64,
    /// Hard cap on escape-time depth
    pub iteration_ceiling: u32,
    /// Depth at zoom 1
    pub base_iterations: u32,
    /// Extra depth per doubling of zoom
    pub iterations_per_octave: f64,
    /// Spiral phase advance per tick
    pub path_phase_step: f64,
    /// Seed for the particle layout, so sessions are reproducible
    pub particle_seed: u64,
    /// Escape-time depth for satellite patches
    pub patch_max_iterations: u32,
    /// Patches are sampled every `patch_step` pixels in each direction
    pub patch_step: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            auto_zoom_speed: 0.006,
            particle_count: 6,
            render_scale: 0.5,
            cache_capacity: 10,
            chunk_count: 4,
            max_zoom: 500_000.0,
            iteration_ceiling: 400,
            base_iterations: 80,
            iterations_per_octave: 12.0,
            path_phase_step: 0.002,
            particle_seed: 0x5EED_0F0B,
            patch_max_iterations: 64,
            patch_step: 2,
        }
    }
}

impl BackgroundConfig {
    /// Parse a host-supplied JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_count == 0 {
            return Err(ConfigError::ZeroChunkCount);
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        if !(self.render_scale.is_finite() && self.render_scale > 0.0 && self.render_scale <= 1.0)
        {
            return Err(ConfigError::InvalidRenderScale(self.render_scale));
        }
        if !(self.auto_zoom_speed.is_finite()
            && self.auto_zoom_speed >= 0.0
            && self.auto_zoom_speed < 1.0)
        {
            return Err(ConfigError::InvalidZoomSpeed(self.auto_zoom_speed));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom > 1.0) {
            return Err(ConfigError::InvalidMaxZoom(self.max_zoom));
        }
        if self.iteration_ceiling == 0 {
            return Err(ConfigError::ZeroIterationCeiling);
        }
        if !(self.iterations_per_octave.is_finite() && self.iterations_per_octave >= 0.0) {
            return Err(ConfigError::InvalidIterationsPerOctave(
                self.iterations_per_octave,
            ));
        }
        if !self.path_phase_step.is_finite() {
            return Err(ConfigError::InvalidPhaseStep(self.path_phase_step));
        }
        if self.patch_step == 0 {
            return Err(ConfigError::ZeroPatchStep);
        }
        Ok(())
    }

    /// Render resolution for a display of the given size.
    ///
    /// A non-zero display axis never scales below one pixel; a zero axis
    /// stays zero so the caller can skip the tick.
    pub fn render_size(&self, display_width: u32, display_height: u32) -> (u32, u32) {
        let scale = |v: u32| -> u32 {
            if v == 0 {
                0
            } else {
                ((v as f64 * self.render_scale).floor() as u32).max(1)
            }
        };
        (scale(display_width), scale(display_height))
    }
}

/// Calculate escape-time depth for a zoom level.
///
/// Uses formula: min(ceiling, floor(base + log2(zoom) * per_octave)), never
/// below 1. Zoom values below 1 (or non-finite) are treated as 1.
pub fn calculate_max_iterations(zoom: f64, config: &BackgroundConfig) -> u32 {
    let zoom = if zoom.is_finite() && zoom >= 1.0 {
        zoom
    } else {
        1.0
    };
    let depth = (config.base_iterations as f64 + libm::log2(zoom) * config.iterations_per_octave)
        .floor();
    let ceiling = config.iteration_ceiling.max(1);

    if depth.is_nan() || depth < 1.0 {
        1
    } else if depth >= ceiling as f64 {
        ceiling
    } else {
        depth as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(BackgroundConfig::default().validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_keys_with_defaults() {
        let config = BackgroundConfig::from_json(r#"{ "particle_count": 3 }"#).unwrap();
        assert_eq!(config.particle_count, 3);
        assert_eq!(config.chunk_count, 4);
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.auto_zoom_speed, 0.006);
    }

    #[test]
    fn from_json_rejects_zero_chunks() {
        let result = BackgroundConfig::from_json(r#"{ "chunk_count": 0 }"#);
        assert!(matches!(result, Err(ConfigError::ZeroChunkCount)));
    }

    #[test]
    fn from_json_rejects_negative_iterations_per_octave() {
        let result = BackgroundConfig::from_json(r#"{ "iterations_per_octave": -12.0 }"#);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidIterationsPerOctave(v)) if v == -12.0
        ));
    }

    #[test]
    fn non_finite_path_inputs_are_rejected() {
        for step in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = BackgroundConfig {
                path_phase_step: step,
                ..BackgroundConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidPhaseStep(_))),
                "phase step {} should be rejected",
                step
            );
        }
        let config = BackgroundConfig {
            iterations_per_octave: f64::NAN,
            ..BackgroundConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidIterationsPerOctave(_))
        ));
    }

    #[test]
    fn from_json_rejects_out_of_range_phase_step() {
        // 1e400 does not fit an f64, so serde_json refuses it before validation
        let result = BackgroundConfig::from_json(r#"{ "path_phase_step": 1e400 }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let result = BackgroundConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn render_scale_out_of_range_is_rejected() {
        for scale in [0.0, -0.5, 1.5, f64::NAN] {
            let config = BackgroundConfig {
                render_scale: scale,
                ..BackgroundConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidRenderScale(_))),
                "scale {} should be rejected",
                scale
            );
        }
    }

    #[test]
    fn render_size_halves_display() {
        let config = BackgroundConfig::default();
        assert_eq!(config.render_size(800, 600), (400, 300));
        assert_eq!(config.render_size(801, 1), (400, 1));
        assert_eq!(config.render_size(0, 600), (0, 300));
    }

    #[test]
    fn max_iterations_at_zoom_one_is_base() {
        let config = BackgroundConfig::default();
        assert_eq!(calculate_max_iterations(1.0, &config), 80);
        // log2(2) = 1 → 80 + 12
        assert_eq!(calculate_max_iterations(2.0, &config), 92);
    }

    #[test]
    fn max_iterations_is_monotonic_and_capped() {
        let config = BackgroundConfig::default();
        let mut zoom = 1.0;
        let mut previous = 0;
        while zoom <= config.max_zoom {
            let depth = calculate_max_iterations(zoom, &config);
            assert!(depth >= previous, "depth decreased at zoom {}", zoom);
            assert!(depth <= 400);
            previous = depth;
            zoom *= 1.01;
        }
        assert_eq!(calculate_max_iterations(1e300, &config), 400);
    }

    #[test]
    fn max_iterations_never_below_one() {
        let config = BackgroundConfig {
            base_iterations: 0,
            ..BackgroundConfig::default()
        };
        assert_eq!(calculate_max_iterations(0.25, &config), 1);
        assert_eq!(calculate_max_iterations(f64::NAN, &config), 1);
    }
}
