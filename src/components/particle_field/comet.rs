//! Comets: occasional bright objects that cross the viewport edge to edge,
//! scattering any particles near their path.
//!
//! The scheduler is a two-state machine driven by simulation time. While idle
//! it counts down a random delay; when the delay runs out it launches a comet
//! and stays active until the comet has finished its crossing plus a short
//! grace period, then arms a fresh delay.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use super::config::CometConfig;
use super::disruption::{Impulse, apply_impulse};
use super::particle::Particle;

/// Viewport edge a comet enters or leaves through.
///
/// Ordered clockwise so that `(edge + 2) % 4` is the opposite edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
	Left,
	Top,
	Right,
	Bottom,
}

impl Edge {
	const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

	pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
		Self::ALL[rng.gen_range(0..Self::ALL.len())]
	}

	/// Exit edge for a comet entering through `self`.
	///
	/// `roll` in `[0, 1)` picks the opposite edge half the time and each
	/// adjacent edge a quarter of the time. Never returns `self`.
	pub fn exit(self, roll: f64) -> Self {
		let offset = (roll * 2.0 - 0.5).floor() as i64; // -1, 0 or 1
		let index = (self as i64 + 2 + offset).rem_euclid(4) as usize;
		Self::ALL[index]
	}

	/// Point `t` of the way along this edge, `margin` pixels outside it.
	pub fn point(self, t: f64, width: f64, height: f64, margin: f64) -> (f64, f64) {
		match self {
			Edge::Left => (-margin, t * height),
			Edge::Right => (width + margin, t * height),
			Edge::Top => (t * width, -margin),
			Edge::Bottom => (t * width, height + margin),
		}
	}
}

/// A recent comet position, used to draw the fading trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
	pub x: f64,
	pub y: f64,
	pub age: f64,
}

/// A comet in flight.
#[derive(Clone, Debug)]
pub struct Comet {
	pub x: f64,
	pub y: f64,
	/// Pixels per second.
	pub vx: f64,
	pub vy: f64,
	/// Seconds since launch.
	pub age: f64,
	/// Seconds needed to reach the exit point.
	pub lifetime: f64,
	/// Oldest point at the front.
	pub trail: VecDeque<TrailPoint>,
	pub radius: f64,
}

impl Comet {
	/// Launch from a random edge toward a different edge.
	pub fn spawn<R: Rng + ?Sized>(
		width: f64,
		height: f64,
		config: &CometConfig,
		rng: &mut R,
	) -> Self {
		let entry = Edge::random(rng);
		let exit = entry.exit(rng.gen_range(0.0..1.0));
		let start = entry.point(rng.gen_range(0.0..1.0), width, height, config.edge_margin);
		let end = exit.point(rng.gen_range(0.0..1.0), width, height, config.edge_margin);
		let speed = width.max(height).max(1.0) / config.speed_divisor.sample(rng).max(0.1);
		Self::between(start, end, speed, config.radius)
	}

	/// Comet travelling in a straight line from `start` to `end` at `speed`.
	pub fn between(start: (f64, f64), end: (f64, f64), speed: f64, radius: f64) -> Self {
		let (dx, dy) = (end.0 - start.0, end.1 - start.1);
		let distance = (dx * dx + dy * dy).sqrt().max(1.0);
		Self {
			x: start.0,
			y: start.1,
			vx: dx / distance * speed,
			vy: dy / distance * speed,
			age: 0.0,
			lifetime: distance / speed,
			trail: VecDeque::new(),
			radius,
		}
	}

	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	pub fn speed(&self) -> f64 {
		(self.vx * self.vx + self.vy * self.vy).sqrt()
	}

	/// Head and flare are only drawn during the crossing itself.
	pub fn is_visible(&self) -> bool {
		self.age <= self.lifetime
	}

	pub fn is_expired(&self, grace: f64) -> bool {
		self.age > self.lifetime + grace
	}

	/// Move forward `dt` seconds and update the trail.
	pub fn advance(&mut self, dt: f64, trail_lifetime: f64) {
		self.x += self.vx * dt;
		self.y += self.vy * dt;
		self.age += dt;

		self.trail.push_back(TrailPoint {
			x: self.x,
			y: self.y,
			age: 0.0,
		});
		for point in &mut self.trail {
			point.age += dt;
		}
		while self
			.trail
			.front()
			.is_some_and(|point| point.age > trail_lifetime)
		{
			self.trail.pop_front();
		}
	}
}

/// Scheduler state.
#[derive(Clone, Debug)]
pub enum CometPhase {
	/// Waiting; seconds until the next launch.
	Idle { remaining: f64 },
	Active(Comet),
}

/// Launches comets at random intervals, at most one at a time.
#[derive(Clone, Debug)]
pub struct CometScheduler {
	phase: CometPhase,
	launched: u64,
}

impl CometScheduler {
	pub fn new<R: Rng + ?Sized>(config: &CometConfig, rng: &mut R) -> Self {
		Self {
			phase: CometPhase::Idle {
				remaining: config.first_delay.sample(rng),
			},
			launched: 0,
		}
	}

	pub fn phase(&self) -> &CometPhase {
		&self.phase
	}

	pub fn comet(&self) -> Option<&Comet> {
		match &self.phase {
			CometPhase::Active(comet) => Some(comet),
			CometPhase::Idle { .. } => None,
		}
	}

	/// Total comets launched so far.
	pub fn launched(&self) -> u64 {
		self.launched
	}

	/// Advance the scheduler `dt` seconds, scattering particles near an
	/// active comet.
	#[allow(clippy::too_many_arguments)]
	pub fn tick<R: Rng + ?Sized>(
		&mut self,
		dt: f64,
		bounds: (f64, f64),
		particles: &mut [Particle],
		impulse: Impulse,
		config: &CometConfig,
		rng: &mut R,
	) {
		match &mut self.phase {
			CometPhase::Idle { remaining } => {
				*remaining -= dt;
				if *remaining <= 0.0 {
					let comet = Comet::spawn(bounds.0, bounds.1, config, rng);
					self.launched += 1;
					debug!(
						"particle-field: comet #{} launched at ({:.0}, {:.0}), crossing in {:.2}s",
						self.launched, comet.x, comet.y, comet.lifetime
					);
					self.phase = CometPhase::Active(comet);
				}
			}
			CometPhase::Active(comet) => {
				comet.advance(dt, config.trail_lifetime);
				apply_impulse(comet.position(), comet.radius, particles, impulse);
				if comet.is_expired(config.grace) {
					self.phase = CometPhase::Idle {
						remaining: config.interval.sample(rng),
					};
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::config::Span;
	use super::super::particle::test_particle;
	use super::*;

	#[test]
	fn exit_edge_is_never_the_entry_edge() {
		for entry in Edge::ALL {
			for roll in [0.0, 0.1, 0.24, 0.25, 0.5, 0.74, 0.75, 0.99] {
				assert_ne!(entry.exit(roll), entry);
			}
		}
	}

	#[test]
	fn exit_edge_favors_opposite() {
		assert_eq!(Edge::Left.exit(0.5), Edge::Right);
		assert_eq!(Edge::Top.exit(0.5), Edge::Bottom);
		assert_eq!(Edge::Left.exit(0.1), Edge::Top);
		assert_eq!(Edge::Left.exit(0.9), Edge::Bottom);
		assert_eq!(Edge::Bottom.exit(0.9), Edge::Right);
	}

	#[test]
	fn spawned_comet_lifetime_matches_path() {
		let mut rng = SmallRng::seed_from_u64(11);
		let config = CometConfig::default();

		for _ in 0..50 {
			let comet = Comet::spawn(1280.0, 720.0, &config, &mut rng);
			let speed = comet.speed();
			assert!(speed >= 1280.0 / 1.8 - 1e-6 && speed <= 1280.0 / 1.2 + 1e-6);

			let (ex, ey) = (
				comet.x + comet.vx * comet.lifetime,
				comet.y + comet.vy * comet.lifetime,
			);
			let distance = ((ex - comet.x).powi(2) + (ey - comet.y).powi(2)).sqrt();
			assert!((comet.lifetime - distance / speed).abs() < 1e-9);

			// exit lands on the margin rectangle
			let on_vertical = (ex + 40.0).abs() < 1e-6 || (ex - 1320.0).abs() < 1e-6;
			let on_horizontal = (ey + 40.0).abs() < 1e-6 || (ey - 760.0).abs() < 1e-6;
			assert!(on_vertical || on_horizontal);
		}
	}

	#[test]
	fn comet_expires_after_grace_and_not_before() {
		let config = CometConfig::default();
		let mut comet = Comet::between((0.0, 0.0), (300.0, 400.0), 1000.0, 140.0);
		assert!((comet.lifetime - 0.5).abs() < 1e-12);

		let dt = 0.016;
		while !comet.is_expired(config.grace) {
			assert!(comet.age <= comet.lifetime + config.grace);
			comet.advance(dt, config.trail_lifetime);
		}
		assert!(comet.age > 0.8);
		assert!(comet.age - dt <= 0.8 + 1e-12);
		assert!(!comet.is_visible());
	}

	#[test]
	fn trail_drops_old_points() {
		let mut comet = Comet::between((0.0, 0.0), (1000.0, 0.0), 100.0, 140.0);
		for _ in 0..100 {
			comet.advance(0.016, 0.6);
		}
		assert!(comet.trail.iter().all(|p| p.age <= 0.6));
		assert!(comet.trail.len() >= 36 && comet.trail.len() <= 38);
		let newest = comet.trail.back().copied();
		assert_eq!(newest.map(|p| (p.x, p.y)), Some(comet.position()));
	}

	#[test]
	fn scheduler_cycles_idle_active_idle() {
		let mut rng = SmallRng::seed_from_u64(5);
		let config = CometConfig::default();
		let mut scheduler = CometScheduler::new(&config, &mut rng);
		let mut particles = Vec::new();

		match scheduler.phase() {
			CometPhase::Idle { remaining } => assert!(config.first_delay.contains(*remaining)),
			CometPhase::Active(_) => panic!("scheduler starts idle"),
		}

		scheduler.tick(7.9, (800.0, 600.0), &mut particles, Impulse::default(), &config, &mut rng);
		assert!(scheduler.comet().is_none());

		scheduler.tick(7.2, (800.0, 600.0), &mut particles, Impulse::default(), &config, &mut rng);
		assert!(scheduler.comet().is_some());
		assert_eq!(scheduler.launched(), 1);

		let mut frames = 0;
		while scheduler.comet().is_some() {
			scheduler.tick(0.016, (800.0, 600.0), &mut particles, Impulse::default(), &config, &mut rng);
			frames += 1;
			assert!(frames < 1000, "comet never expired");
		}

		match scheduler.phase() {
			CometPhase::Idle { remaining } => assert!(config.interval.contains(*remaining)),
			CometPhase::Active(_) => unreachable!(),
		}
	}

	#[test]
	fn active_comet_scatters_nearby_particles() {
		let mut rng = SmallRng::seed_from_u64(1);
		let config = CometConfig {
			first_delay: Span::new(0.0, 0.0),
			..CometConfig::default()
		};
		let mut scheduler = CometScheduler::new(&config, &mut rng);
		let mut particles = Vec::new();
		scheduler.tick(0.016, (800.0, 600.0), &mut particles, Impulse::default(), &config, &mut rng);

		let (cx, cy) = scheduler.comet().map(Comet::position).unwrap();
		particles.push(test_particle(cx + 30.0, cy + 30.0, 0.0, 0.0));
		particles.push(test_particle(cx + 500.0, cy + 500.0, 0.0, 0.0));

		scheduler.tick(0.0, (800.0, 600.0), &mut particles, Impulse::default(), &config, &mut rng);
		assert!(particles[0].is_disrupted());
		assert!(!particles[1].is_disrupted());
	}
}
