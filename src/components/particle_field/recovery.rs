//! Spring-back model for disrupted particles.
//!
//! A disrupted particle first floats free for a second with light damping,
//! then gets pulled home by a spring that stiffens and damps harder over four
//! seconds. Once it is within 2px of its rest position and at least three
//! seconds have passed since the last impulse, it snaps home and resumes
//! ambient drift with its original velocity.

use super::particle::{Motion, Particle};

/// Seconds of free drift before the spring engages.
const DRIFT_TIME: f64 = 1.0;
/// Seconds over which spring and damping ramp to full strength.
const RAMP_TIME: f64 = 4.0;
const DRIFT_DAMPING: f64 = 0.3;
const SPRING_BASE: f64 = 0.3;
const SPRING_RAMP: f64 = 1.2;
const DAMPING_BASE: f64 = 0.8;
const DAMPING_RAMP: f64 = 1.5;
/// Extra damping once within 5px of home.
const CLOSE_BONUS: f64 = 2.0;
const CLOSE_DIST_SQ: f64 = 25.0;
const SETTLE_DIST_SQ: f64 = 4.0;
/// Minimum seconds since the last impulse before a particle may settle.
const SETTLE_TIME: f64 = 3.0;

/// Which part of the recovery a particle is in after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
	/// Not disrupted; nothing to do.
	Ambient,
	/// Floating free with light damping.
	Drifting,
	/// Being pulled home.
	Settling,
	/// Snapped home this step and returned to ambient drift.
	Settled,
}

/// Advance the recovery of a single particle by `dt` seconds.
pub fn recover(p: &mut Particle, dt: f64) -> Recovery {
	let Motion::Disrupted(ref mut d) = p.motion else {
		return Recovery::Ambient;
	};
	d.elapsed += dt;

	if d.elapsed < DRIFT_TIME {
		let damp = (1.0 - DRIFT_DAMPING * dt).max(0.0);
		p.vx *= damp;
		p.vy *= damp;
		return Recovery::Drifting;
	}

	let (dx, dy) = (d.rest_x - p.x, d.rest_y - p.y);
	let dist_sq = dx * dx + dy * dy;

	if dist_sq < SETTLE_DIST_SQ && d.elapsed > SETTLE_TIME {
		let (x, y, vx, vy) = (d.rest_x, d.rest_y, d.rest_vx, d.rest_vy);
		p.x = x;
		p.y = y;
		p.vx = vx;
		p.vy = vy;
		p.motion = Motion::Ambient;
		return Recovery::Settled;
	}

	let t = ((d.elapsed - DRIFT_TIME) / RAMP_TIME).clamp(0.0, 1.0);
	let spring = SPRING_BASE + SPRING_RAMP * t;
	let damping = DAMPING_BASE + DAMPING_RAMP * t;
	let close_bonus = if dist_sq < CLOSE_DIST_SQ {
		CLOSE_BONUS
	} else {
		0.0
	};

	p.vx += dx * spring * dt;
	p.vy += dy * spring * dt;
	let damp = (1.0 - (damping + close_bonus) * dt).max(0.0);
	p.vx *= damp;
	p.vy *= damp;
	Recovery::Settling
}

/// Run one recovery step over every disrupted particle.
///
/// Returns the number of particles that settled this step.
pub fn spring_back(particles: &mut [Particle], dt: f64) -> usize {
	particles
		.iter_mut()
		.map(|p| recover(p, dt))
		.filter(|r| *r == Recovery::Settled)
		.count()
}

#[cfg(test)]
mod tests {
	use super::super::particle::{Disruption, test_particle};
	use super::*;

	fn disrupted(x: f64, y: f64, vx: f64, vy: f64, rest: (f64, f64), elapsed: f64) -> Particle {
		let mut p = test_particle(x, y, vx, vy);
		p.motion = Motion::Disrupted(Disruption {
			rest_x: rest.0,
			rest_y: rest.1,
			rest_vx: 0.05,
			rest_vy: -0.02,
			elapsed,
		});
		p
	}

	fn elapsed(p: &Particle) -> f64 {
		match &p.motion {
			Motion::Disrupted(d) => d.elapsed,
			Motion::Ambient => f64::NAN,
		}
	}

	#[test]
	fn ambient_particles_are_ignored() {
		let mut p = test_particle(10.0, 10.0, 1.0, 1.0);
		assert_eq!(recover(&mut p, 0.016), Recovery::Ambient);
		assert_eq!((p.vx, p.vy), (1.0, 1.0));
	}

	#[test]
	fn drift_phase_only_decays_velocity() {
		// Rest is behind the particle, so any homeward pull would reverse vx.
		let mut p = disrupted(150.0, 100.0, 1.0, 0.5, (100.0, 100.0), 0.0);

		let mut last_speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
		while elapsed(&p) + 0.016 < DRIFT_TIME {
			assert_eq!(recover(&mut p, 0.016), Recovery::Drifting);
			let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
			assert!(speed < last_speed);
			assert!(p.vx > 0.0 && p.vy > 0.0);
			assert!((p.vy / p.vx - 0.5).abs() < 1e-9);
			last_speed = speed;
		}
	}

	#[test]
	fn settle_phase_pulls_toward_rest() {
		let mut p = disrupted(150.0, 100.0, 0.0, 0.0, (100.0, 100.0), 1.5);
		assert_eq!(recover(&mut p, 0.016), Recovery::Settling);
		assert!(p.vx < 0.0);
		assert_eq!(p.vy, 0.0);
	}

	#[test]
	fn spring_stiffens_over_the_ramp() {
		let mut early = disrupted(150.0, 100.0, 0.0, 0.0, (100.0, 100.0), 1.0);
		let mut late = disrupted(150.0, 100.0, 0.0, 0.0, (100.0, 100.0), 5.0);
		recover(&mut early, 0.016);
		recover(&mut late, 0.016);
		// same displacement, stronger spring late in the ramp
		assert!(late.vx.abs() > early.vx.abs());
	}

	#[test]
	fn close_and_late_particle_snaps_home() {
		let mut p = disrupted(101.0, 100.5, 0.3, 0.1, (100.0, 100.0), 3.5);

		assert_eq!(recover(&mut p, 0.016), Recovery::Settled);
		assert_eq!((p.x, p.y), (100.0, 100.0));
		assert_eq!((p.vx, p.vy), (0.05, -0.02));
		assert_eq!(p.motion, Motion::Ambient);
	}

	#[test]
	fn close_but_recent_particle_keeps_settling() {
		// within tolerance, but only 2.9s since the last impulse
		let mut p = disrupted(101.0, 100.0, 0.0, 0.0, (100.0, 100.0), 2.9);
		assert_eq!(recover(&mut p, 0.016), Recovery::Settling);
		assert!(p.is_disrupted());
	}

	#[test]
	fn late_but_distant_particle_keeps_settling() {
		let mut p = disrupted(103.0, 100.0, 0.0, 0.0, (100.0, 100.0), 10.0);
		assert_eq!(recover(&mut p, 0.016), Recovery::Settling);
		assert!(p.is_disrupted());
	}

	#[test]
	fn disrupted_particle_eventually_settles() {
		let mut particles = vec![disrupted(160.0, 70.0, 1.5, -0.8, (100.0, 100.0), 0.0)];
		let dt = 0.016;
		let mut settled_at = None;

		for frame in 0..2000 {
			let p = &mut particles[0];
			p.x += p.vx * (dt * 1000.0 / 16.0);
			p.y += p.vy * (dt * 1000.0 / 16.0);
			if spring_back(&mut particles, dt) == 1 {
				settled_at = Some(frame);
				break;
			}
		}

		let frame = settled_at.expect("particle never settled");
		assert!(frame as f64 * dt > SETTLE_TIME - dt);
		assert_eq!((particles[0].x, particles[0].y), (100.0, 100.0));
	}
}
