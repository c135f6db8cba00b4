//! Click bursts: short-lived ring-and-flash overlays. Purely visual.

/// Flash is visible for this fraction of the burst lifetime.
pub const FLASH_FRACTION: f64 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct ClickBurst {
	pub x: f64,
	pub y: f64,
	/// Seconds since the click.
	pub age: f64,
	pub max_age: f64,
}

impl ClickBurst {
	pub fn new(x: f64, y: f64, max_age: f64) -> Self {
		Self {
			x,
			y,
			age: 0.0,
			max_age,
		}
	}

	/// Age the burst. Returns `false` once it has expired.
	pub fn tick(&mut self, dt: f64) -> bool {
		self.age += dt;
		self.age <= self.max_age
	}

	/// Normalized age in `[0, 1]`.
	pub fn progress(&self) -> f64 {
		if self.max_age <= 0.0 {
			return 1.0;
		}
		(self.age / self.max_age).clamp(0.0, 1.0)
	}

	pub fn ring_radius(&self) -> f64 {
		8.0 + self.progress() * 80.0
	}

	pub fn ring_alpha(&self) -> f64 {
		(1.0 - self.progress()) * 0.35
	}

	/// Flash alpha and radius, while the flash is still showing.
	pub fn flash(&self) -> Option<(f64, f64)> {
		let t = self.progress();
		(t < FLASH_FRACTION).then(|| ((1.0 - t / FLASH_FRACTION) * 0.25, 20.0 * (1.0 - t)))
	}
}
