//! Particle store: kinematic and visual state for every particle in the field.

use rand::Rng;

use super::config::FieldConfig;
use super::theme::Color;

/// Parallax layer a particle belongs to.
///
/// Fixed at creation. Both ambient speed and parallax shift scale with
/// `1 / depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
	Background,
	Far,
	Mid,
	Near,
}

impl Depth {
	pub const ALL: [Depth; 4] = [Depth::Background, Depth::Far, Depth::Mid, Depth::Near];

	pub fn value(self) -> f64 {
		match self {
			Depth::Background => 0.35,
			Depth::Far => 0.6,
			Depth::Mid => 0.9,
			Depth::Near => 1.2,
		}
	}

	/// Position in [`Depth::ALL`], for per-layer lookup tables.
	pub fn index(self) -> usize {
		self as usize
	}

	pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
		Self::ALL[rng.gen_range(0..Self::ALL.len())]
	}
}

/// Snapshot taken when a particle is first knocked out of ambient drift.
#[derive(Clone, Debug, PartialEq)]
pub struct Disruption {
	pub rest_x: f64,
	pub rest_y: f64,
	pub rest_vx: f64,
	pub rest_vy: f64,
	/// Seconds since the most recent impulse touched this particle.
	pub elapsed: f64,
}

/// How a particle is currently moving.
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
	/// Free drift with ambient noise and edge wrapping.
	Ambient,
	/// Governed by the spring-back model until it settles.
	Disrupted(Disruption),
}

/// A single particle.
#[derive(Clone, Debug)]
pub struct Particle {
	pub id: usize,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub depth: Depth,
	pub color: Color,
	pub base_opacity: f64,
	/// Drawn with a soft halo.
	pub is_bright: bool,
	pub motion: Motion,
}

impl Particle {
	pub fn is_disrupted(&self) -> bool {
		matches!(self.motion, Motion::Disrupted(_))
	}

	/// Advance by velocity scaled to the 16ms reference frame.
	///
	/// Ambient particles also pick up a small deterministic wobble keyed by id
	/// and wall-clock time, then wrap across the viewport edges.
	fn advance(&mut self, dt_ms: f64, now_ms: f64, bounds: (f64, f64), margin: f64) {
		let step = dt_ms / 16.0;
		self.x += self.vx * step;
		self.y += self.vy * step;

		if self.is_disrupted() {
			return;
		}

		let phase = self.id as f64;
		self.x += ((now_ms / 4000.0 + phase) * 0.7).sin() * 0.02;
		self.y += ((now_ms / 3000.0 + phase) * 0.5).cos() * 0.01;

		let (width, height) = bounds;
		if self.x < -margin {
			self.x = width + margin;
		} else if self.x > width + margin {
			self.x = -margin;
		}
		if self.y < -margin {
			self.y = height + margin;
		} else if self.y > height + margin {
			self.y = -margin;
		}
	}
}

/// Number of particles for a viewport: area over density, with a floor.
pub fn particle_count(width: f64, height: f64, compact: bool, config: &FieldConfig) -> usize {
	let (density, floor) = if compact {
		(config.density_compact, config.min_particles_compact)
	} else {
		(config.density_desktop, config.min_particles_desktop)
	};
	let area = (width * height).max(0.0);
	((area / density.max(1.0)).round() as usize).max(floor)
}

/// Owns every particle and the bounds they wrap within.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
}

impl ParticleStore {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			particles: Vec::new(),
			width,
			height,
		}
	}

	/// Replace the whole set with `count` freshly randomized particles.
	pub fn initialize<R: Rng + ?Sized>(
		&mut self,
		count: usize,
		width: f64,
		height: f64,
		palette: &[Color],
		bright_fraction: f64,
		rng: &mut R,
	) {
		self.width = width;
		self.height = height;
		self.particles.clear();
		self.particles.reserve(count);

		for id in 0..count {
			let depth = Depth::random(rng);
			let speed_scale = 1.0 / depth.value();
			let color = if palette.is_empty() {
				Color::rgb(255, 255, 255)
			} else {
				palette[rng.gen_range(0..palette.len())]
			};

			self.particles.push(Particle {
				id,
				x: rng.gen_range(0.0..1.0) * width,
				y: rng.gen_range(0.0..1.0) * height,
				vx: rng.gen_range(-0.2..0.2) * speed_scale,
				vy: rng.gen_range(-0.1..0.1) * speed_scale,
				size: rng.gen_range(1.0..4.0),
				depth,
				color,
				base_opacity: rng.gen_range(0.2..=1.0),
				is_bright: rng.gen_bool(bright_fraction.clamp(0.0, 1.0)),
				motion: Motion::Ambient,
			});
		}
	}

	/// Discard every particle and seed a new set sized for the viewport.
	pub fn reinitialize<R: Rng + ?Sized>(
		&mut self,
		width: f64,
		height: f64,
		compact: bool,
		config: &FieldConfig,
		palette: &[Color],
		rng: &mut R,
	) {
		let count = particle_count(width, height, compact, config);
		self.initialize(count, width, height, palette, config.bright_fraction, rng);
	}

	/// Update wrap bounds without touching particles.
	pub fn set_bounds(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn bounds(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Move every particle one frame forward.
	pub fn advance(&mut self, dt_ms: f64, now_ms: f64, wrap_margin: f64) {
		let bounds = (self.width, self.height);
		for p in &mut self.particles {
			p.advance(dt_ms, now_ms, bounds, wrap_margin);
		}
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}

/// Ambient particle at rest, for tests in sibling modules.
#[cfg(test)]
pub(crate) fn test_particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
	Particle {
		id: 0,
		x,
		y,
		vx,
		vy,
		size: 2.0,
		depth: Depth::Mid,
		color: Color::rgb(255, 255, 255),
		base_opacity: 1.0,
		is_bright: false,
		motion: Motion::Ambient,
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::theme::FieldTheme;
	use super::*;

	#[test]
	fn count_matches_reference_viewports() {
		let config = FieldConfig::default();
		assert_eq!(particle_count(1920.0, 1080.0, false, &config), 461);
		assert_eq!(particle_count(1920.0, 1080.0, true, &config), 259);
	}

	#[test]
	fn count_respects_floor() {
		let config = FieldConfig::default();
		assert_eq!(particle_count(320.0, 200.0, false, &config), 80);
		assert_eq!(particle_count(320.0, 200.0, true, &config), 40);
		assert_eq!(particle_count(0.0, 0.0, false, &config), 80);
	}

	#[test]
	fn initialize_respects_ranges() {
		let mut rng = SmallRng::seed_from_u64(42);
		let palette = FieldTheme::default().palette;
		let mut store = ParticleStore::new(800.0, 600.0);
		store.initialize(500, 800.0, 600.0, &palette, 0.06, &mut rng);

		assert_eq!(store.len(), 500);
		for (i, p) in store.particles.iter().enumerate() {
			assert_eq!(p.id, i);
			assert!((0.0..=800.0).contains(&p.x) && (0.0..=600.0).contains(&p.y));
			assert!((1.0..=4.0).contains(&p.size));
			assert!((0.2..=1.0).contains(&p.base_opacity));
			assert!(palette.contains(&p.color));
			assert!(Depth::ALL.contains(&p.depth));
			let scale = 1.0 / p.depth.value();
			assert!(p.vx.abs() <= 0.2 * scale + 1e-9);
			assert!(p.vy.abs() <= 0.1 * scale + 1e-9);
			assert_eq!(p.motion, Motion::Ambient);
		}

		let bright = store.particles.iter().filter(|p| p.is_bright).count();
		assert!(bright > 0 && bright < 80, "bright count {bright}");
	}

	#[test]
	fn reinitialize_replaces_the_set() {
		let mut rng = SmallRng::seed_from_u64(7);
		let config = FieldConfig::default();
		let palette = FieldTheme::default().palette;
		let mut store = ParticleStore::new(1920.0, 1080.0);
		store.reinitialize(1920.0, 1080.0, false, &config, &palette, &mut rng);
		assert_eq!(store.len(), 461);

		store.particles[0].motion = Motion::Disrupted(Disruption {
			rest_x: 0.0,
			rest_y: 0.0,
			rest_vx: 0.0,
			rest_vy: 0.0,
			elapsed: 0.0,
		});

		store.reinitialize(1920.0, 1080.0, true, &config, &palette, &mut rng);
		assert_eq!(store.len(), 259);
		assert_eq!(store.bounds(), (1920.0, 1080.0));
		assert!(store.particles.iter().all(|p| !p.is_disrupted()));
		assert_eq!(store.particles.last().map(|p| p.id), Some(258));
	}

	#[test]
	fn ambient_particles_wrap_with_margin() {
		let mut store = ParticleStore::new(100.0, 100.0);
		let mut p = test_particle(-19.99, 50.0, -1.0, 0.0);
		p.id = 3;
		store.particles.push(p);

		store.advance(16.0, 0.0, 20.0);
		assert!((store.particles[0].x - 120.0).abs() < 1e-9);
	}

	#[test]
	fn disrupted_particles_skip_noise_and_wrap() {
		let mut store = ParticleStore::new(100.0, 100.0);
		let mut p = test_particle(-30.0, 50.0, -1.0, 0.5);
		p.motion = Motion::Disrupted(Disruption {
			rest_x: 0.0,
			rest_y: 50.0,
			rest_vx: 0.0,
			rest_vy: 0.0,
			elapsed: 0.0,
		});
		store.particles.push(p);

		store.advance(32.0, 1234.0, 20.0);
		let p = &store.particles[0];
		assert!((p.x - -32.0).abs() < 1e-9);
		assert!((p.y - 51.0).abs() < 1e-9);
	}

	#[test]
	fn depth_never_changes_while_advancing() {
		let mut rng = SmallRng::seed_from_u64(9);
		let palette = FieldTheme::default().palette;
		let mut store = ParticleStore::new(400.0, 300.0);
		store.initialize(50, 400.0, 300.0, &palette, 0.06, &mut rng);
		let before: Vec<Depth> = store.particles.iter().map(|p| p.depth).collect();

		for frame in 0..120 {
			store.advance(16.0, frame as f64 * 16.0, 20.0);
		}

		let after: Vec<Depth> = store.particles.iter().map(|p| p.depth).collect();
		assert_eq!(before, after);
	}
}
