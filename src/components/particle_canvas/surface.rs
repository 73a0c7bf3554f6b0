//! The 2D drawing primitives the renderer needs.
//!
//! [`Surface`] is implemented for the browser's `CanvasRenderingContext2d`;
//! tests use a recording implementation that captures each call.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;
use crate::error::EngineError;

pub type Point = (f64, f64);

/// A 2D drawing target.
pub trait Surface {
	fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color)
	-> Result<(), EngineError>;

	fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), EngineError>;

	/// Fills a circle with a radial gradient running from the center
	/// (offset 0.0) to the rim (offset 1.0).
	fn fill_radial(
		&mut self,
		center: Point,
		radius: f64,
		stops: &[(f64, Color)],
	) -> Result<(), EngineError>;

	fn stroke_line(
		&mut self,
		from: Point,
		to: Point,
		color: Color,
		width: f64,
	) -> Result<(), EngineError>;

	fn stroke_curve(
		&mut self,
		from: Point,
		control: Point,
		to: Point,
		color: Color,
		width: f64,
	) -> Result<(), EngineError>;

	/// Strokes an arc from `start` to `end` radians.
	fn stroke_arc(
		&mut self,
		center: Point,
		radius: f64,
		start: f64,
		end: f64,
		color: Color,
		width: f64,
	) -> Result<(), EngineError>;

	/// Strokes a square of side `2 * half` rotated by `rotation` radians about its center.
	fn stroke_square(
		&mut self,
		center: Point,
		half: f64,
		rotation: f64,
		color: Color,
		width: f64,
	) -> Result<(), EngineError>;
}

impl Surface for CanvasRenderingContext2d {
	fn fill_rect(
		&mut self,
		x: f64,
		y: f64,
		w: f64,
		h: f64,
		color: Color,
	) -> Result<(), EngineError> {
		self.set_fill_style_str(&color.to_css());
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
		Ok(())
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), EngineError> {
		self.begin_path();
		self.arc(center.0, center.1, radius, 0.0, TAU)?;
		self.set_fill_style_str(&color.to_css());
		self.fill();
		Ok(())
	}

	fn fill_radial(
		&mut self,
		center: Point,
		radius: f64,
		stops: &[(f64, Color)],
	) -> Result<(), EngineError> {
		let gradient =
			self.create_radial_gradient(center.0, center.1, 0.0, center.0, center.1, radius)?;
		for (offset, color) in stops {
			gradient.add_color_stop(*offset as f32, &color.to_css())?;
		}

		self.begin_path();
		self.arc(center.0, center.1, radius, 0.0, TAU)?;
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.fill();
		Ok(())
	}

	fn stroke_line(
		&mut self,
		from: Point,
		to: Point,
		color: Color,
		width: f64,
	) -> Result<(), EngineError> {
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.stroke();
		Ok(())
	}

	fn stroke_curve(
		&mut self,
		from: Point,
		control: Point,
		to: Point,
		color: Color,
		width: f64,
	) -> Result<(), EngineError> {
		self.begin_path();
		self.move_to(from.0, from.1);
		self.quadratic_curve_to(control.0, control.1, to.0, to.1);
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.stroke();
		Ok(())
	}

	fn stroke_arc(
		&mut self,
		center: Point,
		radius: f64,
		start: f64,
		end: f64,
		color: Color,
		width: f64,
	) -> Result<(), EngineError> {
		self.begin_path();
		self.arc(center.0, center.1, radius, start, end)?;
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.stroke();
		Ok(())
	}

	fn stroke_square(
		&mut self,
		center: Point,
		half: f64,
		rotation: f64,
		color: Color,
		width: f64,
	) -> Result<(), EngineError> {
		self.save();
		let drawn = (|| -> Result<(), EngineError> {
			self.translate(center.0, center.1)?;
			self.rotate(rotation)?;
			self.set_stroke_style_str(&color.to_css());
			self.set_line_width(width);
			self.stroke_rect(-half, -half, half * 2.0, half * 2.0);
			Ok(())
		})();
		self.restore();
		drawn
	}
}
