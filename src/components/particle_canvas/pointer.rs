//! Pointer tracking in canvas backing-store coordinates.

/// Most recent pointer position and hover flag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	pub active: bool,
}

/// On-screen placement of the canvas element, as reported by
/// `getBoundingClientRect` (CSS pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasRect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

/// Converts client-space coordinates to canvas-local backing-store coordinates.
///
/// The backing store is larger than the displayed element by the device pixel
/// ratio, so the offset from the element origin is scaled by
/// `backing / displayed` on each axis.
pub fn to_canvas_coords(
	client_x: f64,
	client_y: f64,
	rect: CanvasRect,
	backing_width: f64,
	backing_height: f64,
) -> (f64, f64) {
	let scale_x = if rect.width > 0.0 {
		backing_width / rect.width
	} else {
		1.0
	};
	let scale_y = if rect.height > 0.0 {
		backing_height / rect.height
	} else {
		1.0
	};
	(
		(client_x - rect.left) * scale_x,
		(client_y - rect.top) * scale_y,
	)
}

impl PointerState {
	pub fn on_move(
		&mut self,
		client_x: f64,
		client_y: f64,
		rect: CanvasRect,
		backing_width: f64,
		backing_height: f64,
	) {
		let (x, y) = to_canvas_coords(client_x, client_y, rect, backing_width, backing_height);
		self.x = x;
		self.y = y;
	}

	pub fn on_enter(&mut self) {
		self.active = true;
	}

	/// Particles are left to relax back through the update step's decay path.
	pub fn on_leave(&mut self) {
		self.active = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RECT: CanvasRect = CanvasRect {
		left: 20.0,
		top: 100.0,
		width: 400.0,
		height: 300.0,
	};

	#[test]
	fn offsets_by_element_origin() {
		assert_eq!(to_canvas_coords(120.0, 150.0, RECT, 400.0, 300.0), (100.0, 50.0));
	}

	#[test]
	fn scales_by_device_pixel_ratio() {
		assert_eq!(to_canvas_coords(120.0, 150.0, RECT, 800.0, 600.0), (200.0, 100.0));
	}

	#[test]
	fn zero_sized_rect_does_not_divide_by_zero() {
		let rect = CanvasRect {
			width: 0.0,
			height: 0.0,
			..RECT
		};
		assert_eq!(to_canvas_coords(30.0, 110.0, rect, 800.0, 600.0), (10.0, 10.0));
	}

	#[test]
	fn enter_and_leave_toggle_hover() {
		let mut pointer = PointerState::default();
		pointer.on_enter();
		pointer.on_move(220.0, 250.0, RECT, 400.0, 300.0);
		assert!(pointer.active);
		assert_eq!((pointer.x, pointer.y), (200.0, 150.0));
		pointer.on_leave();
		assert!(!pointer.active);
		assert_eq!((pointer.x, pointer.y), (200.0, 150.0));
	}
}
