//! Colors and palettes for the particle engine.
//!
//! Each profile draws its particle, shape and glow colors from a small fixed
//! palette. Colors are chosen once per entity at creation and never change.

use rand::Rng;

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Parses `#RRGGBB` (or `RRGGBB`) into an opaque color.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#').unwrap_or(hex);
		if digits.len() != 6 || !digits.is_ascii() {
			return None;
		}
		let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
		let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
		let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
		Some(Self::rgb(r, g, b))
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// A fixed set of colors entities pick from at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Studio brand blues and violets, used by the ambient hero background.
	pub fn studio() -> Self {
		Self {
			colors: vec![
				Color::rgb(59, 130, 246),  // Blue
				Color::rgb(139, 92, 246),  // Violet
				Color::rgb(6, 182, 212),   // Cyan
				Color::rgb(16, 185, 129),  // Emerald
				Color::rgb(245, 158, 11),  // Amber
			],
		}
	}

	/// Saturated neon tones for the pointer-reactive section.
	pub fn neon() -> Self {
		Self {
			colors: vec![
				Color::rgb(0, 255, 255),  // Cyan
				Color::rgb(255, 0, 255),  // Magenta
				Color::rgb(255, 255, 0),  // Yellow
				Color::rgb(0, 255, 136),  // Mint
			],
		}
	}

	/// Cool-to-warm spectrum for the showcase.
	pub fn spectrum() -> Self {
		Self {
			colors: vec![
				Color::rgb(99, 102, 241),  // Indigo
				Color::rgb(236, 72, 153),  // Pink
				Color::rgb(14, 165, 233),  // Sky
				Color::rgb(34, 197, 94),   // Green
				Color::rgb(249, 115, 22),  // Orange
				Color::rgb(168, 85, 247),  // Purple
			],
		}
	}

	/// Builds a palette from hex strings, skipping entries that fail to parse.
	/// Returns `None` when nothing usable remains.
	pub fn from_hex_list(hexes: &[String]) -> Option<Self> {
		let colors: Vec<Color> = hexes.iter().filter_map(|h| Color::from_hex(h)).collect();
		if colors.is_empty() {
			None
		} else {
			Some(Self { colors })
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	pub fn pick<R: Rng>(&self, rng: &mut R) -> Color {
		self.get(rng.random_range(0..self.colors.len()))
	}
}
