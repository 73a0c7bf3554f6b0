//! Leptos component hosting one particle engine on a canvas.
//!
//! On mount the component sizes the canvas backing store for the device
//! pixel ratio, builds an [`Engine`] for the requested profile, registers
//! resize and pointer listeners and starts the frame scheduler. On unmount it
//! cancels the pending frame, removes every listener and drops the frame
//! callback.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlScriptElement, MouseEvent,
	Window,
};

use super::config::{ConfigOverrides, EngineConfig, Profile};
use super::engine::Engine;
use super::host::{BrowserHost, FrameCallback};
use super::pointer::CanvasRect;
use super::scheduler::FrameScheduler;
use crate::error::EngineError;

/// Element id of the optional JSON overrides script.
const OVERRIDES_ELEMENT_ID: &str = "particle-config";

/// Measured canvas placement, in CSS pixels.
#[derive(Clone, Copy, Debug)]
struct Viewport {
	/// Window inner width; picks the particle-count bucket.
	window_width: f64,
	css_width: f64,
	css_height: f64,
	pixel_ratio: f64,
}

impl Viewport {
	fn backing_size(&self) -> (f64, f64) {
		(
			(self.css_width * self.pixel_ratio).round().max(1.0),
			(self.css_height * self.pixel_ratio).round().max(1.0),
		)
	}
}

/// Everything one running engine instance owns.
struct Mounted {
	engine: Engine,
	scheduler: FrameScheduler<BrowserHost>,
	surface: CanvasRenderingContext2d,
	canvas: HtmlCanvasElement,
	profile: Profile,
	overrides: ConfigOverrides,
	fullscreen: bool,
}

impl Mounted {
	fn config_for(&self, viewport: &Viewport) -> EngineConfig {
		build_config(self.profile, &self.overrides, viewport.window_width)
	}

	/// Resizes the backing store and rebuilds every entity from scratch.
	fn reinitialize(&mut self) -> Result<(), EngineError> {
		let window = web_sys::window().ok_or(EngineError::Host("no window".into()))?;
		let viewport = measure(&window, &self.canvas, self.fullscreen)?;
		apply_backing_size(&self.canvas, &viewport)?;

		let config = self.config_for(&viewport);
		let (width, height) = viewport.backing_size();
		self.scheduler.set_target_fps(config.target_fps);
		self.engine.reinitialize(config, width, height);
		debug!(
			"particle canvas ({}): reinitialized at {}x{} with {} particles",
			self.profile.name(),
			width,
			height,
			self.engine.particles().len()
		);
		Ok(())
	}

	fn pointer_move(&mut self, ev: &MouseEvent) {
		let rect = self.canvas.get_bounding_client_rect();
		let rect = CanvasRect {
			left: rect.left(),
			top: rect.top(),
			width: rect.width(),
			height: rect.height(),
		};
		let (width, height) = (self.engine.width(), self.engine.height());
		self.engine.pointer_mut().on_move(
			ev.client_x() as f64,
			ev.client_y() as f64,
			rect,
			width,
			height,
		);
	}
}

type Shared = Rc<RefCell<Option<Mounted>>>;

/// Owning handles for one component instance.
#[derive(Clone)]
struct Mount {
	mounted: Shared,
	frame: FrameCallback,
}

impl Mount {
	fn new() -> Self {
		Self {
			mounted: Rc::new(RefCell::new(None)),
			frame: Rc::new(RefCell::new(None)),
		}
	}

	fn is_mounted(&self) -> bool {
		self.mounted.borrow().is_some()
	}

	fn start(
		&self,
		canvas: HtmlCanvasElement,
		profile: Profile,
		fullscreen: bool,
	) -> Result<(), EngineError> {
		let window = web_sys::window().ok_or(EngineError::Host("no window".into()))?;
		let surface: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or(EngineError::ContextUnavailable)?;

		let viewport = measure(&window, &canvas, fullscreen)?;
		apply_backing_size(&canvas, &viewport)?;

		let overrides = window
			.document()
			.map(|doc| load_overrides(&doc))
			.unwrap_or_default();
		let config = build_config(profile, &overrides, viewport.window_width);
		let (width, height) = viewport.backing_size();
		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let pointer_interaction = config.pointer_interaction;
		let target_fps = config.target_fps;
		let engine = Engine::new(config, width, height, seed);

		let host = BrowserHost::new(window.clone(), self.frame.clone());
		let mut scheduler = FrameScheduler::new(host, target_fps);
		if let Err(e) = self.listen(scheduler.host_mut(), &window, &canvas, pointer_interaction) {
			// releases whatever registered before the failure
			scheduler.stop();
			return Err(e);
		}

		let mounted = self.mounted.clone();
		*self.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
			let mut slot = mounted.borrow_mut();
			let Some(m) = slot.as_mut() else {
				return;
			};
			let Mounted {
				engine,
				scheduler,
				surface,
				profile,
				..
			} = m;
			if let Err(e) = scheduler.on_tick(now, || engine.frame(surface)) {
				error!("particle canvas ({}): stopped: {e}", profile.name());
			}
		}));

		if let Err(e) = scheduler.start() {
			scheduler.stop();
			self.frame.borrow_mut().take();
			return Err(e);
		}

		info!(
			"particle canvas ({}): started at {}x{} with {} particles",
			profile.name(),
			width,
			height,
			engine.particles().len()
		);
		*self.mounted.borrow_mut() = Some(Mounted {
			engine,
			scheduler,
			surface,
			canvas,
			profile,
			overrides,
			fullscreen,
		});
		Ok(())
	}

	/// Registers the resize listener, plus pointer listeners when enabled.
	fn listen(
		&self,
		host: &mut BrowserHost,
		window: &Window,
		canvas: &HtmlCanvasElement,
		pointer_interaction: bool,
	) -> Result<(), EngineError> {
		let mounted = self.mounted.clone();
		host.listen(
			window.as_ref(),
			"resize",
			Closure::new(move |_: Event| {
				if let Some(m) = mounted.borrow_mut().as_mut() {
					if let Err(e) = m.reinitialize() {
						warn!("particle canvas: resize failed: {e}");
					}
				}
			}),
		)?;
		if !pointer_interaction {
			return Ok(());
		}

		let mounted = self.mounted.clone();
		host.listen(
			canvas.as_ref(),
			"mousemove",
			Closure::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
					return;
				};
				if let Some(m) = mounted.borrow_mut().as_mut() {
					m.pointer_move(ev);
				}
			}),
		)?;
		let mounted = self.mounted.clone();
		host.listen(
			canvas.as_ref(),
			"mouseenter",
			Closure::new(move |_: Event| {
				if let Some(m) = mounted.borrow_mut().as_mut() {
					m.engine.pointer_mut().on_enter();
				}
			}),
		)?;
		let mounted = self.mounted.clone();
		host.listen(
			canvas.as_ref(),
			"mouseleave",
			Closure::new(move |_: Event| {
				if let Some(m) = mounted.borrow_mut().as_mut() {
					m.engine.pointer_mut().on_leave();
				}
			}),
		)
	}

	/// Stops the engine and breaks the frame-callback reference cycle.
	fn teardown(&self) {
		let taken = self.mounted.borrow_mut().take();
		if let Some(mut m) = taken {
			m.scheduler.stop();
			debug!(
				"particle canvas ({}): stopped on unmount after {} frames",
				m.profile.name(),
				m.engine.frames()
			);
		}
		self.frame.borrow_mut().take();
	}
}

fn build_config(profile: Profile, overrides: &ConfigOverrides, window_width: f64) -> EngineConfig {
	let mut config = EngineConfig::for_profile(profile, window_width);
	overrides.apply(&mut config);
	config
}

fn measure(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
) -> Result<Viewport, EngineError> {
	let window_width = window.inner_width()?.as_f64().unwrap_or(1024.0);
	let (css_width, css_height) = if fullscreen {
		(
			window_width,
			window.inner_height()?.as_f64().unwrap_or(768.0),
		)
	} else {
		canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.filter(|(w, h)| *w > 0.0 && *h > 0.0)
			.unwrap_or((800.0, 600.0))
	};
	Ok(Viewport {
		window_width,
		css_width,
		css_height,
		pixel_ratio: window.device_pixel_ratio().max(1.0),
	})
}

fn apply_backing_size(canvas: &HtmlCanvasElement, viewport: &Viewport) -> Result<(), EngineError> {
	let (width, height) = viewport.backing_size();
	canvas.set_width(width as u32);
	canvas.set_height(height as u32);
	let style = web_sys::HtmlElement::style(canvas);
	style.set_property("width", &format!("{}px", viewport.css_width))?;
	style.set_property("height", &format!("{}px", viewport.css_height))?;
	Ok(())
}

/// Reads page-level overrides from `<script id="particle-config">`, if present.
fn load_overrides(document: &Document) -> ConfigOverrides {
	let Some(script) = document
		.get_element_by_id(OVERRIDES_ELEMENT_ID)
		.and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
	else {
		return ConfigOverrides::default();
	};
	let Ok(json) = script.text() else {
		return ConfigOverrides::default();
	};
	match ConfigOverrides::from_json(&json) {
		Ok(overrides) => {
			info!("particle canvas: applying page overrides");
			overrides
		}
		Err(e) => {
			warn!("particle canvas: ignoring overrides: {e}");
			ConfigOverrides::default()
		}
	}
}

/// Renders an animated particle background on a canvas element.
///
/// The canvas sizes itself to its parent container; set `fullscreen = true`
/// to fill the viewport instead. If the browser cannot provide a 2D context
/// the canvas simply stays blank.
#[component]
pub fn ParticleCanvas(
	profile: Profile,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mount = Mount::new();

	let mount_init = mount.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mount_init.is_mounted() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		if let Err(e) = mount_init.start(canvas, profile, fullscreen) {
			warn!("particle canvas ({}): not started: {e}", profile.name());
		}
	});

	let handle = StoredValue::new_local(mount);
	on_cleanup(move || {
		handle.try_with_value(Mount::teardown);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-canvas"
			data-profile=profile.name()
			style="display: block; pointer-events: auto;"
		/>
	}
}
