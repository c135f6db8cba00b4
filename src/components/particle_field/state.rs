//! Field simulation state and input handling.
//!
//! One [`FieldState`] holds everything a single field instance needs: the
//! particles, the comet scheduler, active click bursts, the last pointer
//! position, and the viewport inputs. The frame loop and input handlers
//! mutate it; the renderer only reads it.

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::burst::ClickBurst;
use super::comet::CometScheduler;
use super::config::FieldConfig;
use super::disruption::{Impulse, apply_impulse};
use super::parallax::ViewportState;
use super::particle::ParticleStore;
use super::recovery::spring_back;
use super::theme::Color;

/// Clamp a raw frame delta (milliseconds) into `[0, max_ms]`.
///
/// Long gaps happen when the tab is backgrounded; feeding them to the physics
/// would fling disrupted particles across the screen.
pub fn clamp_frame_dt(raw_ms: f64, max_ms: f64) -> f64 {
	if raw_ms.is_finite() {
		raw_ms.clamp(0.0, max_ms)
	} else {
		0.0
	}
}

/// Turns animation-frame timestamps into frame deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
	last: Option<f64>,
}

impl FrameClock {
	/// Milliseconds since the previous timestamp (zero on the first call).
	pub fn tick(&mut self, now_ms: f64) -> f64 {
		let dt = self.last.map_or(0.0, |last| now_ms - last);
		self.last = Some(now_ms);
		dt
	}
}

/// Complete state of one particle field.
pub struct FieldState {
	pub config: FieldConfig,
	pub store: ParticleStore,
	pub comets: CometScheduler,
	pub bursts: Vec<ClickBurst>,
	/// Latest pointer position; `None` while the pointer is off the page.
	pub pointer: Option<(f64, f64)>,
	pub viewport: ViewportState,
	pub width: f64,
	pub height: f64,
	/// Timestamp of the last frame, for time-keyed effects.
	pub now_ms: f64,
	palette: Vec<Color>,
	impulse: Impulse,
	clock: FrameClock,
	rng: SmallRng,
}

impl FieldState {
	pub fn new(
		config: FieldConfig,
		palette: Vec<Color>,
		width: f64,
		height: f64,
		compact: bool,
		seed: u64,
	) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let comets = CometScheduler::new(&config.comet, &mut rng);
		let mut store = ParticleStore::new(width, height);
		store.reinitialize(width, height, compact, &config, &palette, &mut rng);

		Self {
			impulse: Impulse::from_config(&config),
			config,
			store,
			comets,
			bursts: Vec::new(),
			pointer: None,
			viewport: ViewportState {
				compact,
				..ViewportState::default()
			},
			width,
			height,
			now_ms: 0.0,
			palette,
			clock: FrameClock::default(),
			rng,
		}
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		self.pointer = Some((x, y));
	}

	pub fn pointer_left(&mut self) {
		self.pointer = None;
	}

	/// Scatter particles around a click and start a burst overlay there.
	///
	/// Returns the number of particles hit.
	pub fn clicked(&mut self, x: f64, y: f64) -> usize {
		let hits = apply_impulse(
			(x, y),
			self.config.burst_radius,
			&mut self.store.particles,
			self.impulse,
		);
		self.bursts
			.push(ClickBurst::new(x, y, self.config.burst_lifetime));
		hits
	}

	/// Update the viewport inputs read by the renderer.
	pub fn set_viewport(&mut self, scroll_fraction: f64, compact: bool) {
		self.viewport.set_scroll_fraction(scroll_fraction);
		self.viewport.compact = compact;
	}

	/// Track a new viewport size. Particles keep their positions until
	/// [`FieldState::reinitialize`] runs.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.store.set_bounds(width, height);
	}

	/// Replace every particle with a fresh set sized for the current viewport.
	pub fn reinitialize(&mut self, compact: bool) {
		self.viewport.compact = compact;
		self.store.reinitialize(
			self.width,
			self.height,
			compact,
			&self.config,
			&self.palette,
			&mut self.rng,
		);
		debug!(
			"particle-field: reinitialized {} particles for {}x{}{}",
			self.store.len(),
			self.width,
			self.height,
			if compact { " (compact)" } else { "" }
		);
	}

	/// Advance one animation frame given its timestamp.
	///
	/// Returns the clamped delta that was simulated, in milliseconds.
	pub fn frame(&mut self, now_ms: f64) -> f64 {
		let raw = self.clock.tick(now_ms);
		self.step(raw, now_ms)
	}

	/// Advance the simulation by `raw_dt_ms`, clamped to the frame limit.
	///
	/// Order: drift, pointer wake, comet, spring-back, burst ageing.
	pub fn step(&mut self, raw_dt_ms: f64, now_ms: f64) -> f64 {
		let dt_ms = clamp_frame_dt(raw_dt_ms, self.config.max_frame_dt_ms);
		let dt = dt_ms / 1000.0;
		self.now_ms = now_ms;

		self.store.advance(dt_ms, now_ms, self.config.wrap_margin);

		if let Some(origin) = self.pointer {
			apply_impulse(
				origin,
				self.config.wake_radius,
				&mut self.store.particles,
				self.impulse,
			);
		}

		self.comets.tick(
			dt,
			(self.width, self.height),
			&mut self.store.particles,
			self.impulse,
			&self.config.comet,
			&mut self.rng,
		);

		spring_back(&mut self.store.particles, dt);

		self.bursts.retain_mut(|burst| burst.tick(dt));

		dt_ms
	}
}

#[cfg(test)]
mod tests {
	use super::super::particle::{Motion, test_particle};
	use super::super::theme::FieldTheme;
	use super::*;

	fn field(width: f64, height: f64, compact: bool) -> FieldState {
		FieldState::new(
			FieldConfig::default(),
			FieldTheme::default().palette,
			width,
			height,
			compact,
			17,
		)
	}

	#[test]
	fn initial_count_follows_viewport() {
		assert_eq!(field(1920.0, 1080.0, false).store.len(), 461);
		assert_eq!(field(1920.0, 1080.0, true).store.len(), 259);
	}

	#[test]
	fn reinitialize_after_resize_uses_new_area() {
		let mut state = field(1920.0, 1080.0, false);
		state.resize(900.0, 900.0);
		assert_eq!(state.store.len(), 461);

		state.reinitialize(false);
		assert_eq!(state.store.len(), 180);
		state.reinitialize(true);
		assert_eq!(state.store.len(), 101);
		assert!(state.viewport.compact);
	}

	#[test]
	fn backgrounded_tab_delta_is_clamped() {
		let mut state = field(800.0, 600.0, false);
		assert_eq!(state.step(250.0, 1000.0), 40.0);

		assert_eq!(state.frame(5000.0), 0.0);
		assert_eq!(state.frame(5250.0), 40.0);
		assert_eq!(state.frame(5266.0), 16.0);
	}

	#[test]
	fn clamp_rejects_negative_and_nan() {
		assert_eq!(clamp_frame_dt(-5.0, 40.0), 0.0);
		assert_eq!(clamp_frame_dt(f64::NAN, 40.0), 0.0);
		assert_eq!(clamp_frame_dt(12.5, 40.0), 12.5);
	}

	#[test]
	fn click_far_from_particles_only_spawns_burst() {
		let mut state = field(1920.0, 1080.0, false);
		state.store.particles = vec![
			test_particle(900.0, 900.0, 0.1, 0.0),
			test_particle(500.0, 700.0, 0.0, -0.1),
		];

		let hits = state.clicked(500.0, 500.0);

		assert_eq!(hits, 0);
		assert_eq!(state.bursts.len(), 1);
		assert_eq!(state.bursts[0].max_age, 0.6);
		assert_eq!((state.bursts[0].x, state.bursts[0].y), (500.0, 500.0));
		assert_eq!((state.store.particles[0].vx, state.store.particles[0].vy), (0.1, 0.0));
		assert_eq!((state.store.particles[1].vx, state.store.particles[1].vy), (0.0, -0.1));
		assert!(state.store.particles.iter().all(|p| !p.is_disrupted()));
	}

	#[test]
	fn bursts_expire_with_simulation_time() {
		let mut state = field(800.0, 600.0, false);
		state.store.particles.clear();
		state.clicked(100.0, 100.0);

		for frame in 0..14 {
			state.step(40.0, frame as f64 * 40.0);
		}
		assert_eq!(state.bursts.len(), 1);
		state.step(40.0, 560.0);
		state.step(40.0, 600.0);
		assert!(state.bursts.is_empty());
	}

	#[test]
	fn pointer_wake_disrupts_until_pointer_leaves() {
		let mut state = field(800.0, 600.0, false);
		state.store.particles = vec![test_particle(130.0, 100.0, 0.0, 0.0)];

		state.step(16.0, 0.0);
		assert!(!state.store.particles[0].is_disrupted());

		state.pointer_moved(100.0, 100.0);
		state.step(16.0, 16.0);
		assert!(state.store.particles[0].is_disrupted());

		state.pointer_left();
		let mut settled = false;
		for frame in 0..2000 {
			state.step(16.0, 32.0 + frame as f64 * 16.0);
			if matches!(state.store.particles[0].motion, Motion::Ambient) {
				settled = true;
				break;
			}
		}
		assert!(settled);
	}
}
