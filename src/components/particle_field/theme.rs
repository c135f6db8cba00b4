//! Visual theming for the particle field.
//!
//! Colors for the background, particle palette, connection lines, and the
//! comet and click-burst overlays.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Parses `#RRGGBB`. Anything else yields `None`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#')?;
		if digits.len() != 6 {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Comet overlay colors.
#[derive(Clone, Debug)]
pub struct CometStyle {
	/// Fading trail dots
	pub trail: Color,
	/// Inner stop of the head glow
	pub head: Color,
	/// Outer stop of the head glow
	pub halo: Color,
	/// Horizontal flare streak along the direction of travel
	pub streak: Color,
	/// Vertical flare spike
	pub spike: Color,
	/// Lens ghosts trailing behind the head
	pub ghost: Color,
	/// Bright core dot
	pub core: Color,
}

/// Click burst overlay colors.
#[derive(Clone, Debug)]
pub struct BurstStyle {
	/// Expanding ring stroke
	pub ring: Color,
	/// Initial radial flash
	pub flash: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct FieldTheme {
	pub name: &'static str,
	/// Solid fill applied at the start of every frame
	pub background: Color,
	/// Particle colors, picked uniformly at initialization
	pub palette: Vec<Color>,
	/// Connection line color (alpha is computed per pair)
	pub connection: Color,
	/// Connection line width in CSS pixels
	pub connection_width: f64,
	pub comet: CometStyle,
	pub burst: BurstStyle,
}

impl FieldTheme {
	/// Deep night sky with cool blues and a warm accent (default)
	pub fn night() -> Self {
		Self {
			name: "night",
			background: Color::rgb(10, 10, 26),
			palette: vec![
				Color::rgb(102, 209, 255), // Sky
				Color::rgb(75, 211, 199),  // Aqua
				Color::rgb(164, 141, 255), // Lavender
				Color::rgb(143, 176, 255), // Periwinkle
				Color::rgb(255, 199, 101), // Amber
			],
			connection: Color::rgb(140, 170, 255),
			connection_width: 0.6,
			comet: CometStyle {
				trail: Color::rgb(255, 238, 221),
				head: Color::rgba(255, 240, 220, 0.9),
				halo: Color::rgba(255, 200, 140, 0.4),
				streak: Color::rgb(255, 235, 210),
				spike: Color::rgb(220, 235, 255),
				ghost: Color::rgb(180, 215, 255),
				core: Color::rgba(255, 252, 245, 0.95),
			},
			burst: BurstStyle {
				ring: Color::rgb(180, 215, 255),
				flash: Color::rgb(220, 240, 255),
			},
		}
	}
}

impl Default for FieldTheme {
	fn default() -> Self {
		Self::night()
	}
}
