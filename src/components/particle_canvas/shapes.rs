//! Showcase-only entities: rotating pseudo-3D shapes and expanding waves.

use std::f64::consts::TAU;

use rand::Rng;

use super::particles::wrap_coord;
use super::theme::{Color, Palette};

/// Which pseudo-3D figure a [`Geometry`] is drawn as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
	Cube,
	Sphere,
	Torus,
}

impl ShapeKind {
	const ALL: [ShapeKind; 3] = [ShapeKind::Cube, ShapeKind::Sphere, ShapeKind::Torus];
}

/// A drifting, spinning shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
	pub kind: ShapeKind,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	/// Radians.
	pub rotation: f64,
	/// Radians per frame.
	pub spin: f64,
	pub color: Color,
}

impl Geometry {
	/// Shapes cycle through the three kinds so every kind appears once there are three or more.
	pub fn spawn<R: Rng>(
		index: usize,
		palette: &Palette,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		Self {
			kind: ShapeKind::ALL[index % ShapeKind::ALL.len()],
			x: rng.random_range(0.0..width),
			y: rng.random_range(0.0..height),
			vx: rng.random_range(-0.5..0.5),
			vy: rng.random_range(-0.5..0.5),
			size: rng.random_range(20.0..50.0),
			rotation: rng.random_range(0.0..TAU),
			spin: rng.random_range(-0.02..0.02),
			color: palette.pick(rng),
		}
	}

	pub fn update(&mut self, width: f64, height: f64) {
		self.x = wrap_coord(self.x + self.vx, width);
		self.y = wrap_coord(self.y + self.vy, height);
		self.rotation = (self.rotation + self.spin).rem_euclid(TAU);
	}
}

/// An expanding ring with a perturbed border.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	/// Radius growth per frame.
	pub speed: f64,
	/// Ripples around the ring.
	pub frequency: f64,
	/// Radial displacement of the ripples, in pixels.
	pub amplitude: f64,
	pub phase: f64,
	pub color: Color,
}

impl Wave {
	pub fn spawn<R: Rng>(palette: &Palette, width: f64, height: f64, rng: &mut R) -> Self {
		Self {
			x: rng.random_range(0.0..width),
			y: rng.random_range(0.0..height),
			radius: rng.random_range(0.0..diagonal(width, height) * 0.5),
			speed: rng.random_range(0.5..1.5),
			frequency: rng.random_range(3.0_f64..8.0).round(),
			amplitude: rng.random_range(2.0..8.0),
			phase: rng.random_range(0.0..TAU),
			color: palette.pick(rng),
		}
	}

	/// Grows the ring; restarts from zero once it is wider than the canvas diagonal.
	pub fn update(&mut self, width: f64, height: f64) {
		self.radius += self.speed;
		if self.radius > diagonal(width, height) {
			self.radius = 0.0;
		}
	}

	/// Points along the ring, each displaced by `amplitude * sin(angle * frequency + phase)`.
	pub fn sample_points(&self, count: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
		(0..count).map(move |i| {
			let angle = i as f64 / count as f64 * TAU;
			let r = (self.radius + self.amplitude * (angle * self.frequency + self.phase).sin())
				.max(0.0);
			(self.x + r * angle.cos(), self.y + r * angle.sin())
		})
	}

	/// Ring alpha: fades out as the ring approaches the diagonal.
	pub fn fade(&self, width: f64, height: f64) -> f64 {
		(1.0 - self.radius / diagonal(width, height)).clamp(0.0, 1.0)
	}
}

pub fn diagonal(width: f64, height: f64) -> f64 {
	(width * width + height * height).sqrt()
}
