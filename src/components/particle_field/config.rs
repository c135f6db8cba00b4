//! Tunable constants for the particle field.
//!
//! Every field has a default, so a JSON override only needs to name the values
//! it changes:
//!
//! ```json
//! { "wake_radius": 100, "comet": { "interval": { "min": 20, "max": 40 } } }
//! ```

use rand::Rng;
use serde::Deserialize;

/// Closed range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span {
	pub min: f64,
	pub max: f64,
}

impl Span {
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// Uniform sample in `[min, max]`. A degenerate or inverted span yields `min`.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		if self.max > self.min {
			rng.gen_range(self.min..=self.max)
		} else {
			self.min
		}
	}

	pub fn contains(&self, value: f64) -> bool {
		(self.min..=self.max).contains(&value)
	}
}

/// Comet scheduling and geometry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CometConfig {
	/// Delay before the first comet, in seconds.
	pub first_delay: Span,
	/// Idle time between comets, in seconds.
	pub interval: Span,
	/// Crossing speed is `max(width, height) / divisor` pixels per second.
	pub speed_divisor: Span,
	/// Entry and exit points sit this far outside the viewport edge.
	pub edge_margin: f64,
	/// Disruption radius around the comet head.
	pub radius: f64,
	/// Trail points older than this (seconds) are dropped.
	pub trail_lifetime: f64,
	/// Extra time after the crossing before the comet is destroyed.
	pub grace: f64,
}

impl Default for CometConfig {
	fn default() -> Self {
		Self {
			first_delay: Span::new(8.0, 15.0),
			interval: Span::new(30.0, 60.0),
			speed_divisor: Span::new(1.2, 1.8),
			edge_margin: 40.0,
			radius: 140.0,
			trail_lifetime: 0.6,
			grace: 0.3,
		}
	}
}

/// Complete field configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Viewport pixels per particle on desktop layouts.
	pub density_desktop: f64,
	/// Viewport pixels per particle on compact layouts.
	pub density_compact: f64,
	pub min_particles_desktop: usize,
	pub min_particles_compact: usize,
	/// Fraction of particles drawn with a halo.
	pub bright_fraction: f64,
	/// Pointer wake radius.
	pub wake_radius: f64,
	/// Click burst disruption radius.
	pub burst_radius: f64,
	/// Click burst visual lifetime, in seconds.
	pub burst_lifetime: f64,
	/// Immediate displacement at full impulse force.
	pub impulse_displacement: f64,
	/// Velocity kick at full impulse force.
	pub impulse_velocity: f64,
	/// Pairs closer than this (squared pixels) are connected.
	pub connection_distance_sq: f64,
	/// Connection alpha at zero distance, before depth scaling.
	pub connection_alpha: f64,
	/// Parallax coefficient for particle positions.
	pub particle_parallax: f64,
	/// Parallax coefficient for connection line endpoints.
	pub line_parallax: f64,
	/// Upper bound on the frame delta, in milliseconds.
	pub max_frame_dt_ms: f64,
	/// Ambient particles wrap once this far outside the viewport.
	pub wrap_margin: f64,
	/// Media query that selects the compact layout.
	pub compact_query: String,
	/// Debounce before a resize re-seeds the field, in milliseconds.
	pub reinit_delay_ms: i32,
	pub comet: CometConfig,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			density_desktop: 4500.0,
			density_compact: 8000.0,
			min_particles_desktop: 80,
			min_particles_compact: 40,
			bright_fraction: 0.06,
			wake_radius: 80.0,
			burst_radius: 140.0,
			burst_lifetime: 0.6,
			impulse_displacement: 2.0,
			impulse_velocity: 1.25,
			connection_distance_sq: 16000.0,
			connection_alpha: 0.12,
			particle_parallax: 40.0,
			line_parallax: 10.0,
			max_frame_dt_ms: 40.0,
			wrap_margin: 20.0,
			compact_query: "(max-width:720px)".to_string(),
			reinit_delay_ms: 300,
			comet: CometConfig::default(),
		}
	}
}
