//! The consolidated particle engine.
//!
//! One engine instance owns every entity drawn on one canvas: the particle
//! store, the showcase shapes and waves, the pointer state and the RNG that
//! seeds them. The three looks differ only by [`EngineConfig`].

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::EngineConfig;
use super::particles::{Particle, ParticleStore};
use super::pointer::PointerState;
use super::render;
use super::shapes::{Geometry, Wave};
use super::surface::Surface;
use crate::error::EngineError;

/// Simulation state for one canvas.
pub struct Engine {
	config: EngineConfig,
	store: ParticleStore,
	geometries: Vec<Geometry>,
	waves: Vec<Wave>,
	pointer: PointerState,
	rng: SmallRng,
	width: f64,
	height: f64,
}

impl Engine {
	/// Creates an engine for a `width` x `height` backing store.
	///
	/// The same `seed` and config always produce the same initial scene.
	pub fn new(config: EngineConfig, width: f64, height: f64, seed: u64) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let (width, height) = (width.max(1.0), height.max(1.0));
		let (store, geometries, waves) = populate(&config, width, height, &mut rng);
		Self {
			config,
			store,
			geometries,
			waves,
			pointer: PointerState::default(),
			rng,
			width,
			height,
		}
	}

	/// Throws away every entity and rebuilds them for the new size and config.
	///
	/// This is a full reset, not a rescale. Pointer state is kept.
	pub fn reinitialize(&mut self, config: EngineConfig, width: f64, height: f64) {
		let (width, height) = (width.max(1.0), height.max(1.0));
		let (store, geometries, waves) = populate(&config, width, height, &mut self.rng);
		self.config = config;
		self.store = store;
		self.geometries = geometries;
		self.waves = waves;
		self.width = width;
		self.height = height;
	}

	/// Runs one update pass over every entity.
	pub fn step(&mut self) {
		self.store.update(&self.pointer, &self.config, &mut self.rng);
		for g in &mut self.geometries {
			g.update(self.width, self.height);
		}
		for w in &mut self.waves {
			w.update(self.width, self.height);
		}
	}

	pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), EngineError> {
		render::render(self, surface)
	}

	/// One scheduled frame: update, then render the updated state.
	pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), EngineError> {
		self.step();
		self.render(surface)
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn particles(&self) -> &[Particle] {
		&self.store.particles
	}

	#[cfg(test)]
	pub fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.store.particles
	}

	pub fn geometries(&self) -> &[Geometry] {
		&self.geometries
	}

	pub fn waves(&self) -> &[Wave] {
		&self.waves
	}

	pub fn pointer(&self) -> &PointerState {
		&self.pointer
	}

	pub fn pointer_mut(&mut self) -> &mut PointerState {
		&mut self.pointer
	}

	/// Update passes run since the last (re)initialization.
	pub fn frames(&self) -> u64 {
		self.store.frame()
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}
}

fn populate(
	config: &EngineConfig,
	width: f64,
	height: f64,
	rng: &mut SmallRng,
) -> (ParticleStore, Vec<Geometry>, Vec<Wave>) {
	let store = ParticleStore::new(config, width, height, rng);
	let geometries = (0..config.geometry_count)
		.map(|i| Geometry::spawn(i, &config.palette, width, height, rng))
		.collect();
	let waves = (0..config.wave_count)
		.map(|_| Wave::spawn(&config.palette, width, height, rng))
		.collect();
	(store, geometries, waves)
}
