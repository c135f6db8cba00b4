//! Radial impulses that knock particles out of ambient drift.
//!
//! The pointer wake, click bursts, and the comet all share one falloff: force
//! is `1 - distance / radius`, pushing particles straight away from the
//! source. The first hit snapshots the particle's rest state so the recovery
//! model can bring it home later.

use super::config::FieldConfig;
use super::particle::{Disruption, Motion, Particle};

/// Strength of a radial impulse at full force.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impulse {
	/// Immediate position offset along the push direction.
	pub displacement: f64,
	/// Velocity added along the push direction.
	pub velocity: f64,
}

impl Impulse {
	pub fn from_config(config: &FieldConfig) -> Self {
		Self {
			displacement: config.impulse_displacement,
			velocity: config.impulse_velocity,
		}
	}
}

impl Default for Impulse {
	fn default() -> Self {
		Self::from_config(&FieldConfig::default())
	}
}

/// Push every particle within `radius` of `origin` away from it.
///
/// Particles sitting on top of the source (squared distance ≤ 1) are skipped
/// since their push direction is undefined. Returns how many were hit.
pub fn apply_impulse(
	origin: (f64, f64),
	radius: f64,
	particles: &mut [Particle],
	impulse: Impulse,
) -> usize {
	if radius <= 0.0 {
		return 0;
	}
	let radius_sq = radius * radius;
	let mut hits = 0;

	for p in particles.iter_mut() {
		let (dx, dy) = (p.x - origin.0, p.y - origin.1);
		let dist_sq = dx * dx + dy * dy;
		if dist_sq >= radius_sq || dist_sq <= 1.0 {
			continue;
		}

		let dist = dist_sq.sqrt();
		let force = 1.0 - dist / radius;
		let (ux, uy) = (dx / dist, dy / dist);

		match p.motion {
			Motion::Disrupted(ref mut d) => d.elapsed = 0.0,
			Motion::Ambient => {
				p.motion = Motion::Disrupted(Disruption {
					rest_x: p.x,
					rest_y: p.y,
					rest_vx: p.vx,
					rest_vy: p.vy,
					elapsed: 0.0,
				});
			}
		}

		p.x += ux * force * impulse.displacement;
		p.y += uy * force * impulse.displacement;
		p.vx += ux * force * impulse.velocity;
		p.vy += uy * force * impulse.velocity;
		hits += 1;
	}

	hits
}
