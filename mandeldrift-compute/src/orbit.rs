//! Satellite layer: small fractal patches orbiting an anchor point.

use crate::pattern_cache::PatternCache;
use crate::surface::RgbaSurface;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Global angle advance per tick, in radians.
const GLOBAL_ANGLE_STEP: f64 = 0.01;
const WOBBLE_AMPLITUDE: f64 = 8.0;
const WOBBLE_RATE: f64 = 2.0;
const PULSE_AMPLITUDE: f64 = 0.15;
const PULSE_RATE: f64 = 3.0;
/// Share of the orbit angle applied as patch spin.
const SPIN_FRACTION: f64 = 0.5;

const LINE_ALPHA: f64 = 0.12;
const GLOW_ALPHA: f64 = 0.3;
const GLOW_SCALE: f64 = 0.8;
const PATCH_OPACITY: f64 = 0.85;
const WHITE: [u8; 3] = [255, 255, 255];

/// Screen position the satellites orbit. Supplied by the host and
/// recomputed on layout changes; particles never hold on to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
}

impl AnchorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub angle: f64,
    pub radius: f64,
    pub speed: f64,
    pub size: f64,
    pub phase: f64,
}

impl Particle {
    /// Evenly spaced starting angles with seeded variation in everything else.
    pub fn layout(count: usize, seed: u64) -> Vec<Particle> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..count)
            .map(|i| Particle {
                angle: i as f64 / count as f64 * TAU,
                radius: 50.0 + rng.f64() * 80.0,
                speed: 0.002 + rng.f64() * 0.004,
                size: 28.0 + rng.f64() * 20.0,
                phase: rng.f64() * TAU,
            })
            .collect()
    }
}

/// Where and how one particle is drawn this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
}

pub struct OrbitCompositor {
    particles: Vec<Particle>,
    global_angle: f64,
    surface: RgbaSurface,
}

impl OrbitCompositor {
    pub fn new(particles: Vec<Particle>, width: u32, height: u32) -> Self {
        Self {
            particles,
            global_angle: 0.0,
            surface: RgbaSurface::new(width, height),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn global_angle(&self) -> f64 {
        self.global_angle
    }

    pub fn surface(&self) -> &RgbaSurface {
        &self.surface
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.surface.width(), self.surface.height()) {
            self.surface = RgbaSurface::new(width, height);
        }
    }

    /// Position, pulsing size and spin of a particle at the current global
    /// angle.
    pub fn place(&self, particle: &Particle, anchor: AnchorPoint) -> Placement {
        let g = self.global_angle;
        let current_angle = particle.angle + g * particle.speed + particle.phase;
        let radius = particle.radius + (g * WOBBLE_RATE + particle.phase).sin() * WOBBLE_AMPLITUDE;
        let size = particle.size * (1.0 + PULSE_AMPLITUDE * (g * PULSE_RATE + particle.phase).sin());

        Placement {
            x: anchor.x + current_angle.cos() * radius,
            y: anchor.y + current_angle.sin() * radius,
            size,
            rotation: current_angle * SPIN_FRACTION,
        }
    }

    /// Advance every particle one tick and redraw the overlay.
    ///
    /// Returns the number of particles drawn.
    pub fn advance(&mut self, anchor: AnchorPoint, cache: &mut PatternCache) -> usize {
        self.global_angle += GLOBAL_ANGLE_STEP;
        for particle in &mut self.particles {
            particle.angle += particle.speed;
        }

        self.surface.clear();
        if self.surface.is_empty() {
            return 0;
        }

        let placements: Vec<Placement> = self
            .particles
            .iter()
            .map(|p| self.place(p, anchor))
            .collect();

        for placement in &placements {
            let patch = cache.get_or_render(placement.size, self.global_angle);
            let center = (placement.x, placement.y);

            self.surface
                .draw_line((anchor.x, anchor.y), center, WHITE, LINE_ALPHA);
            self.surface
                .draw_glow(center, placement.size * GLOW_SCALE, WHITE, GLOW_ALPHA);
            self.surface.draw_patch_rotated(
                &patch,
                center,
                placement.size,
                placement.rotation,
                PATCH_OPACITY,
            );
        }

        placements.len()
    }
}
