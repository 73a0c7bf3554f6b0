//! Browser implementation of [`FrameHost`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, Window};

use super::scheduler::{FrameHandle, FrameHost};
use crate::error::EngineError;

/// Slot holding the self-rescheduling frame callback.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

/// Schedules frames with `requestAnimationFrame` and owns every event
/// listener registered for one engine instance.
pub struct BrowserHost {
	window: Window,
	frame: FrameCallback,
	listeners: Vec<Listener>,
}

impl BrowserHost {
	pub fn new(window: Window, frame: FrameCallback) -> Self {
		Self {
			window,
			frame,
			listeners: Vec::new(),
		}
	}

	/// Registers `callback` for `event` on `target`; it stays alive until
	/// [`FrameHost::detach_listeners`].
	pub fn listen(
		&mut self,
		target: &EventTarget,
		event: &'static str,
		callback: Closure<dyn FnMut(Event)>,
	) -> Result<(), EngineError> {
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		self.listeners.push(Listener {
			target: target.clone(),
			event,
			callback,
		});
		Ok(())
	}

	#[cfg(test)]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}
}

impl FrameHost for BrowserHost {
	fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
		let slot = self.frame.borrow();
		let callback = slot
			.as_ref()
			.ok_or_else(|| EngineError::Host("frame callback not installed".into()))?;
		Ok(self
			.window
			.request_animation_frame(callback.as_ref().unchecked_ref())?)
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		if let Err(e) = self.window.cancel_animation_frame(handle) {
			debug!("particle canvas: cancelling frame {handle} failed: {e:?}");
		}
	}

	fn detach_listeners(&mut self) {
		for listener in self.listeners.drain(..) {
			if let Err(e) = listener.target.remove_event_listener_with_callback(
				listener.event,
				listener.callback.as_ref().unchecked_ref(),
			) {
				warn!("particle canvas: removing {} listener failed: {e:?}", listener.event);
			}
		}
	}
}
