//! studio-particles: animated canvas backgrounds for the studio site.
//!
//! This crate provides a WASM particle engine and a Leptos component that
//! mounts it on a canvas. Three visual profiles share one engine:
//! a calm ambient field, a pointer-reactive field and a denser showcase
//! scene with shapes and expanding waves.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;
pub mod error;

pub use components::particle_canvas::{Engine, EngineConfig, ParticleCanvas, Profile};
pub use error::EngineError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("studio-particles: logging initialized");
}

/// Main application component.
/// Lays out the landing page with one particle background per section.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Studio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section class="hero">
			<ParticleCanvas profile=Profile::Ambient fullscreen=true />
			<div class="hero-overlay">
				<h1>"Studio"</h1>
				<p class="subtitle">"Design and engineering for the web."</p>
			</div>
		</section>

		<section class="services">
			<div class="section-canvas">
				<ParticleCanvas profile=Profile::Reactive />
			</div>
			<h2>"What we do"</h2>
			<p>"Move the pointer across this section to pull the particles in."</p>
		</section>

		<section class="showcase">
			<div class="section-canvas">
				<ParticleCanvas profile=Profile::Showcase />
			</div>
			<h2>"Selected work"</h2>
		</section>
	}
}
