//! Auto-reversing zoom/pan camera path.
//!
//! The camera orbits a waypoint on a slowly breathing spiral while zooming in
//! until `max_zoom`, then zooms back out to 1. Each time it bottoms out the
//! path moves on to the next waypoint, so the animation keeps finding new
//! structure without user input.

use crate::{calculate_max_iterations, BackgroundConfig, ViewState};
use serde::{Deserialize, Serialize};

/// Points on the set boundary that stay interesting deep into a zoom.
pub const WAYPOINTS: [(f64, f64); 5] = [
    (-0.743_643_887_037_151, 0.131_825_904_205_330),
    (-0.745_3, 0.112_7),
    (0.001_643_721_971_153, -0.822_467_633_298_876),
    (-1.250_66, 0.020_12),
    (-0.160_701_35, 1.037_566_5),
];

/// Largest spiral offset from the waypoint, in complex units at zoom 1.
const SPIRAL_RADIUS: f64 = 0.05;
/// How fast the spiral radius breathes relative to the angle.
const SPIRAL_BREATH_RATE: f64 = 0.37;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    fn sign(self) -> f64 {
        match self {
            Self::In => 1.0,
            Self::Out => -1.0,
        }
    }
}

/// What happened to the path during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathEvent {
    Continued,
    /// Crossed `max_zoom`; now zooming out.
    TurnedAround,
    /// Hit zoom 1; now zooming in on a new waypoint.
    Reset { waypoint: usize },
}

/// Owns the view and advances it once per tick.
#[derive(Clone, Debug)]
pub struct ViewPathController {
    view: ViewState,
    path_phase: f64,
    direction: ZoomDirection,
    waypoint: usize,
    config: BackgroundConfig,
}

impl ViewPathController {
    pub fn new(config: &BackgroundConfig) -> Self {
        let mut controller = Self {
            view: ViewState::new(0.0, 0.0, 1.0, calculate_max_iterations(1.0, config)),
            path_phase: 0.0,
            direction: ZoomDirection::In,
            waypoint: 0,
            config: config.clone(),
        };
        controller.recompute_center();
        controller
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn direction(&self) -> ZoomDirection {
        self.direction
    }

    pub fn path_phase(&self) -> f64 {
        self.path_phase
    }

    pub fn waypoint(&self) -> usize {
        self.waypoint
    }

    /// Advance the path by one tick.
    pub fn advance(&mut self) -> PathEvent {
        self.path_phase += self.config.path_phase_step;
        self.view.zoom *= 1.0 + self.config.auto_zoom_speed * self.direction.sign();

        let mut event = PathEvent::Continued;
        if self.view.zoom > self.config.max_zoom && self.direction == ZoomDirection::In {
            self.direction = ZoomDirection::Out;
            event = PathEvent::TurnedAround;
            log::info!("view path turning around at zoom {:.1}", self.view.zoom);
        } else if self.view.zoom < 1.0 || !self.view.zoom.is_finite() {
            self.view.zoom = 1.0;
            self.direction = ZoomDirection::In;
            self.waypoint = (self.waypoint + 1) % WAYPOINTS.len();
            event = PathEvent::Reset {
                waypoint: self.waypoint,
            };
            log::info!("view path reset to waypoint {}", self.waypoint);
        }

        self.recompute_center();
        self.view.max_iterations = calculate_max_iterations(self.view.zoom, &self.config);
        event
    }

    /// Spiral position around the current waypoint, pulled in by 1/√zoom so
    /// panning slows down as the window shrinks.
    fn recompute_center(&mut self) {
        let (anchor_re, anchor_im) = WAYPOINTS[self.waypoint];
        let (angle, radius) = spiral_at(self.path_phase);
        let pull = 1.0 / self.view.zoom.sqrt();
        self.view.center_re = anchor_re + angle.cos() * radius * pull;
        self.view.center_im = anchor_im + angle.sin() * radius * pull;
    }
}

/// (angle, radius) of the spiral at a phase.
pub fn spiral_at(phase: f64) -> (f64, f64) {
    let radius = SPIRAL_RADIUS * (0.5 + 0.5 * (phase * SPIRAL_BREATH_RATE).sin());
    (phase, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zooming_in_at_zoom_one() {
        let controller = ViewPathController::new(&BackgroundConfig::default());
        assert_eq!(controller.view().zoom, 1.0);
        assert_eq!(controller.direction(), ZoomDirection::In);
        assert_eq!(controller.view().max_iterations, 80);
    }

    #[test]
    fn first_tick_zooms_by_speed() {
        let mut controller = ViewPathController::new(&BackgroundConfig::default());
        assert_eq!(controller.advance(), PathEvent::Continued);
        assert!((controller.view().zoom - 1.006).abs() < 1e-12);
    }

    #[test]
    fn turns_around_after_max_zoom() {
        let config = BackgroundConfig::default();
        let mut controller = ViewPathController::new(&config);
        let mut turned = false;
        for _ in 0..5000 {
            if controller.advance() == PathEvent::TurnedAround {
                turned = true;
                break;
            }
        }
        assert!(turned, "path never reached max zoom");
        assert!(controller.view().zoom > config.max_zoom);
        assert_eq!(controller.direction(), ZoomDirection::Out);

        let peak = controller.view().zoom;
        controller.advance();
        assert!(controller.view().zoom < peak);
    }

    #[test]
    fn reset_clamps_zoom_and_moves_to_next_waypoint() {
        let config = BackgroundConfig {
            max_zoom: 2.0,
            ..BackgroundConfig::default()
        };
        let mut controller = ViewPathController::new(&config);
        let mut reset = None;
        for _ in 0..1000 {
            if let PathEvent::Reset { waypoint } = controller.advance() {
                reset = Some(waypoint);
                break;
            }
        }
        assert_eq!(reset, Some(1));
        assert_eq!(controller.view().zoom, 1.0);
        assert_eq!(controller.direction(), ZoomDirection::In);

        let (re, im) = WAYPOINTS[1];
        let (_, radius) = spiral_at(controller.path_phase());
        let offset = ((controller.view().center_re - re).powi(2)
            + (controller.view().center_im - im).powi(2))
        .sqrt();
        assert!((offset - radius).abs() < 1e-12);
    }

    #[test]
    fn pan_offset_shrinks_with_zoom() {
        let mut controller = ViewPathController::new(&BackgroundConfig::default());
        for _ in 0..2000 {
            controller.advance();
        }
        let (re, im) = WAYPOINTS[0];
        let view = controller.view();
        let offset = ((view.center_re - re).powi(2) + (view.center_im - im).powi(2)).sqrt();
        let (_, radius) = spiral_at(controller.path_phase());
        assert!((offset - radius / view.zoom.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_never_below_one() {
        let config = BackgroundConfig {
            max_zoom: 3.0,
            auto_zoom_speed: 0.2,
            ..BackgroundConfig::default()
        };
        let mut controller = ViewPathController::new(&config);
        for _ in 0..500 {
            controller.advance();
            assert!(controller.view().zoom >= 1.0);
        }
    }
}
