//! Per-frame drawing for the particle engine.
//!
//! Drawing order:
//! 1. Trail fade (translucent fill instead of a clear)
//! 2. Particles as radial-gradient dots
//! 3. Connective lines between nearby particles
//! 4. Showcase extras: wave rings, then rotating shapes
//! 5. Pointer glow (reactive profile, while hovering)
//!
//! Rendering only reads engine state.

use std::f64::consts::TAU;

use super::config::{ConnectionWindow, EngineConfig, LinkStyle};
use super::engine::Engine;
use super::particles::Particle;
use super::shapes::{Geometry, ShapeKind, Wave};
use super::surface::{Point, Surface};
use crate::error::EngineError;

/// Dots drawn along each wave ring.
const WAVE_SAMPLES: usize = 48;

/// Draws the current engine state onto `surface`.
pub fn render<S: Surface + ?Sized>(engine: &Engine, surface: &mut S) -> Result<(), EngineError> {
	let config = engine.config();
	let (width, height) = (engine.width(), engine.height());

	surface.fill_rect(
		0.0,
		0.0,
		width,
		height,
		config.background.with_alpha(config.trail_alpha),
	)?;

	let particles = engine.particles();
	for p in particles {
		draw_particle(surface, config, p)?;
	}
	draw_connections(surface, config, particles)?;

	for wave in engine.waves() {
		draw_wave(surface, wave, width, height)?;
	}
	for geometry in engine.geometries() {
		draw_geometry(surface, geometry)?;
	}

	let pointer = engine.pointer();
	if config.pointer_glow && pointer.active {
		let glow = config.palette.get(0);
		surface.fill_radial(
			(pointer.x, pointer.y),
			config.attraction_radius,
			&[(0.0, glow.with_alpha(0.15)), (1.0, glow.with_alpha(0.0))],
		)?;
	}

	Ok(())
}

fn draw_particle<S: Surface + ?Sized>(
	surface: &mut S,
	config: &EngineConfig,
	p: &Particle,
) -> Result<(), EngineError> {
	let alpha = p.display_opacity(config.min_opacity);
	surface.fill_radial(
		(p.x, p.y),
		p.size,
		&[(0.0, p.color.with_alpha(alpha)), (1.0, p.color.with_alpha(0.0))],
	)
}

/// Line alpha for a pair `distance` apart, or `None` when they are too far apart to link.
pub fn connection_alpha(distance: f64, threshold: f64, scale: f64) -> Option<f64> {
	if threshold <= 0.0 || distance >= threshold {
		None
	} else {
		Some((threshold - distance) / threshold * scale)
	}
}

/// Index range of the particles `i` is compared against.
fn connection_range(i: usize, len: usize, window: ConnectionWindow) -> std::ops::Range<usize> {
	let end = match window {
		ConnectionWindow::Next(n) => (i + 1 + n).min(len),
		ConnectionWindow::All => len,
	};
	(i + 1).min(end)..end
}

fn draw_connections<S: Surface + ?Sized>(
	surface: &mut S,
	config: &EngineConfig,
	particles: &[Particle],
) -> Result<(), EngineError> {
	for (i, a) in particles.iter().enumerate() {
		for b in &particles[connection_range(i, particles.len(), config.connection_window)] {
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let distance = (dx * dx + dy * dy).sqrt();
			let Some(alpha) =
				connection_alpha(distance, config.connection_distance, config.connection_alpha)
			else {
				continue;
			};
			let color = a.color.with_alpha(alpha);

			match config.link_style {
				LinkStyle::Straight => {
					surface.stroke_line((a.x, a.y), (b.x, b.y), color, 0.5)?;
				}
				LinkStyle::Curved => {
					let control = curve_control((a.x, a.y), (b.x, b.y), 0.5);
					surface.stroke_curve((a.x, a.y), control, (b.x, b.y), color, 0.5)?;
				}
			}
		}
	}
	Ok(())
}

/// Control point bowed off the midpoint, perpendicular to the segment.
fn curve_control(from: Point, to: Point, tension: f64) -> Point {
	let (dx, dy) = (to.0 - from.0, to.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return from;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let offset = dist * tension * 0.3;
	(
		(from.0 + to.0) / 2.0 - uy * offset,
		(from.1 + to.1) / 2.0 + ux * offset,
	)
}

fn draw_wave<S: Surface + ?Sized>(
	surface: &mut S,
	wave: &Wave,
	width: f64,
	height: f64,
) -> Result<(), EngineError> {
	let alpha = wave.fade(width, height) * 0.4;
	if alpha < 0.01 || wave.radius < 1.0 {
		return Ok(());
	}
	let color = wave.color.with_alpha(alpha);
	for point in wave.sample_points(WAVE_SAMPLES) {
		surface.fill_circle(point, 1.5, color)?;
	}
	Ok(())
}

fn draw_geometry<S: Surface + ?Sized>(surface: &mut S, g: &Geometry) -> Result<(), EngineError> {
	let center = (g.x, g.y);
	let half = g.size / 2.0;
	match g.kind {
		ShapeKind::Cube => {
			// back face offset up-right for depth
			let depth = g.size * 0.2;
			surface.stroke_square(
				(g.x + depth, g.y - depth),
				half,
				g.rotation,
				g.color.with_alpha(0.3),
				1.0,
			)?;
			surface.stroke_square(center, half, g.rotation, g.color.with_alpha(0.6), 1.5)
		}
		ShapeKind::Sphere => surface.fill_radial(
			center,
			half,
			&[
				(0.0, g.color.lighten(0.4).with_alpha(0.5)),
				(0.7, g.color.with_alpha(0.25)),
				(1.0, g.color.with_alpha(0.0)),
			],
		),
		ShapeKind::Torus => surface.stroke_arc(
			center,
			half,
			g.rotation,
			g.rotation + TAU * 0.75,
			g.color.with_alpha(0.5),
			g.size * 0.15,
		),
	}
}
