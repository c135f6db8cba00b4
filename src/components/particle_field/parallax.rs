//! Scroll-driven horizontal parallax.
//!
//! The page reports how far it has scrolled as a fraction in `[0, 1]`. Each
//! depth layer is shifted horizontally by
//! `(fraction - 0.5) * coefficient / depth`, so the field is centred halfway
//! through the page and the back layers (small depth values) travel furthest.
//!
//! Particles and the connection lines between them use separate coefficients.
//! Lines move less than the points they join, which gives the mesh a slight
//! depth mismatch against the particles.

use super::config::FieldConfig;
use super::particle::Depth;

/// Environment inputs read every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
	/// Horizontal scroll progress in `[0, 1]`.
	pub scroll_fraction: f64,
	/// Compact (mobile) layout: sparser field.
	pub compact: bool,
}

impl Default for ViewportState {
	fn default() -> Self {
		Self {
			scroll_fraction: 0.5,
			compact: false,
		}
	}
}

impl ViewportState {
	/// Store a new scroll fraction, clamped to `[0, 1]`. Non-finite input is ignored.
	pub fn set_scroll_fraction(&mut self, fraction: f64) {
		if fraction.is_finite() {
			self.scroll_fraction = fraction.clamp(0.0, 1.0);
		}
	}
}

/// Scroll progress for a scroll `position` within a scrollable `range`.
///
/// Single-panel layouts have a range of zero; the range is floored at one
/// pixel so the result stays finite.
pub fn scroll_fraction(position: f64, range: f64) -> f64 {
	(position / range.max(1.0)).clamp(0.0, 1.0)
}

/// Horizontal shift for a layer at `depth`.
pub fn depth_offset(scroll_fraction: f64, depth: f64, coefficient: f64) -> f64 {
	(scroll_fraction - 0.5) * (coefficient / depth)
}

/// Per-layer offsets for one frame.
///
/// Create this once per frame and look offsets up by depth while drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxOffsets {
	points: [f64; 4],
	lines: [f64; 4],
}

impl ParallaxOffsets {
	pub fn new(viewport: &ViewportState, config: &FieldConfig) -> Self {
		let per_layer = |coefficient: f64| {
			Depth::ALL.map(|depth| depth_offset(viewport.scroll_fraction, depth.value(), coefficient))
		};
		Self {
			points: per_layer(config.particle_parallax),
			lines: per_layer(config.line_parallax),
		}
	}

	/// Shift applied to a particle's drawn position.
	pub fn point(&self, depth: Depth) -> f64 {
		self.points[depth.index()]
	}

	/// Shift applied to a connection line endpoint.
	pub fn line(&self, depth: Depth) -> f64 {
		self.lines[depth.index()]
	}
}
