//! Particle store and the per-frame update step.
//!
//! The store holds a fixed number of particles for the lifetime of one
//! engine run. Nothing is allocated or freed while animating: particles whose
//! lifetime runs out are respawned in place.

use rand::Rng;

use super::config::{BoundaryPolicy, EngineConfig};
use super::pointer::PointerState;
use super::theme::Color;

/// Remaining and maximum lifetime, in frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lifetime {
	pub remaining: f64,
	pub max: f64,
}

impl Lifetime {
	pub fn ratio(&self) -> f64 {
		if self.max > 0.0 {
			(self.remaining / self.max).clamp(0.0, 1.0)
		} else {
			0.0
		}
	}
}

/// A single particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Velocity the particle relaxes back to when nothing pulls on it.
	pub base_vx: f64,
	pub base_vy: f64,
	pub base_size: f64,
	pub size: f64,
	/// Resting opacity; the decay path never fades below it.
	pub base_opacity: f64,
	pub opacity: f64,
	pub color: Color,
	pub life: Option<Lifetime>,
}

/// Linear attraction falloff: 1 at the pointer, 0 at the radius edge.
///
/// Returns `None` outside the radius.
pub fn attraction_force(distance: f64, radius: f64) -> Option<f64> {
	if radius <= 0.0 || distance >= radius {
		None
	} else {
		Some((radius - distance) / radius)
	}
}

/// Wraps `pos` into `[0, extent)`.
pub fn wrap_coord(pos: f64, extent: f64) -> f64 {
	let wrapped = pos.rem_euclid(extent);
	// rem_euclid can round tiny negatives up to `extent`
	if wrapped >= extent { 0.0 } else { wrapped }
}

/// Mirrors `pos` back inside `[0, extent)` and points `vel` inward.
pub fn reflect_axis(pos: f64, vel: f64, extent: f64) -> (f64, f64) {
	let (pos, vel) = if pos < 0.0 {
		(-pos, vel.abs())
	} else if pos >= extent {
		(2.0 * extent - pos, -vel.abs())
	} else {
		return (pos, vel);
	};
	// A step longer than the extent, or one landing exactly on the edge,
	// can still leave the mirrored position outside.
	if (0.0..extent).contains(&pos) {
		(pos, vel)
	} else {
		(wrap_coord(pos, extent), vel)
	}
}

fn random_lifetime<R: Rng>(range: (f64, f64), rng: &mut R) -> Lifetime {
	let max = if range.1 > range.0 {
		rng.random_range(range.0..range.1)
	} else {
		range.0
	};
	Lifetime {
		remaining: max,
		max,
	}
}

fn random_in<R: Rng>(range: (f64, f64), rng: &mut R) -> f64 {
	if range.1 > range.0 {
		rng.random_range(range.0..range.1)
	} else {
		range.0
	}
}

impl Particle {
	/// Creates a particle at a uniformly random position inside the bounds.
	pub fn spawn<R: Rng>(config: &EngineConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let speed = config.speed.max(0.0);
		let (vx, vy) = if speed > 0.0 {
			(
				rng.random_range(-speed..speed),
				rng.random_range(-speed..speed),
			)
		} else {
			(0.0, 0.0)
		};
		let size = random_in(config.size_range, rng).clamp(config.min_size, config.max_size);
		let opacity =
			random_in(config.opacity_range, rng).clamp(config.min_opacity, config.max_opacity);

		Self {
			x: rng.random_range(0.0..width),
			y: rng.random_range(0.0..height),
			vx,
			vy,
			base_vx: vx,
			base_vy: vy,
			base_size: size,
			size,
			base_opacity: opacity,
			opacity,
			color: config.palette.pick(rng),
			life: config.lifetime.map(|range| random_lifetime(range, rng)),
		}
	}

	/// Advances this particle by one frame.
	///
	/// `frame` and `index` only feed the cosmetic drift term.
	#[allow(clippy::too_many_arguments)]
	pub fn update<R: Rng>(
		&mut self,
		pointer: &PointerState,
		width: f64,
		height: f64,
		config: &EngineConfig,
		frame: u64,
		index: usize,
		rng: &mut R,
	) {
		let (dx, dy) = (pointer.x - self.x, pointer.y - self.y);
		let distance = (dx * dx + dy * dy).sqrt();
		let force = if pointer.active {
			attraction_force(distance, config.attraction_radius)
		} else {
			None
		};

		match force {
			Some(force) => {
				if distance > f64::EPSILON {
					let pull = force * config.attraction_coefficient / distance;
					self.vx += dx * pull;
					self.vy += dy * pull;
					self.limit_speed(config.max_speed);
				}
				let target = self.base_size * (1.0 + force * config.size_gain);
				self.size += (target - self.size) * config.size_ease;
				self.opacity = (self.opacity + config.opacity_gain * force).min(config.max_opacity);
			}
			None => {
				self.vx = self.base_vx + (self.vx - self.base_vx) * config.velocity_damping;
				self.vy = self.base_vy + (self.vy - self.base_vy) * config.velocity_damping;
				self.size = self.base_size + (self.size - self.base_size) * config.size_decay;
				if self.opacity > self.base_opacity {
					self.opacity = (self.opacity - config.opacity_decay).max(self.base_opacity);
				}
			}
		}
		self.size = self.size.clamp(config.min_size, config.max_size);
		self.opacity = self.opacity.clamp(config.min_opacity, config.max_opacity);

		self.x += self.vx;
		self.y += self.vy;
		if config.drift != 0.0 {
			let phase = frame as f64 * 0.02 + index as f64;
			self.x += config.drift * phase.sin();
			self.y += config.drift * phase.cos();
		}

		match config.boundary {
			BoundaryPolicy::Reflect => {
				(self.x, self.vx) = reflect_axis(self.x, self.vx, width);
				(self.y, self.vy) = reflect_axis(self.y, self.vy, height);
				// keep the baseline heading the same way so damping does not undo the bounce
				self.base_vx = self.base_vx.abs().copysign(self.vx);
				self.base_vy = self.base_vy.abs().copysign(self.vy);
			}
			BoundaryPolicy::Wrap => {
				self.x = wrap_coord(self.x, width);
				self.y = wrap_coord(self.y, height);
			}
		}

		if let (Some(life), Some(range)) = (self.life.as_mut(), config.lifetime) {
			life.remaining -= 1.0;
			if life.remaining <= 0.0 {
				*life = random_lifetime(range, rng);
				self.x = rng.random_range(0.0..width);
				self.y = rng.random_range(0.0..height);
				self.size = self.base_size;
				self.opacity = self.base_opacity;
			}
		}
	}

	fn limit_speed(&mut self, max_speed: f64) {
		let speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
		if speed > max_speed && speed > 0.0 {
			let k = max_speed / speed;
			self.vx *= k;
			self.vy *= k;
		}
	}

	/// Opacity used for drawing: faded by remaining lifetime, never below the floor.
	pub fn display_opacity(&self, min_opacity: f64) -> f64 {
		match self.life {
			Some(life) => (self.opacity * life.ratio().sqrt()).max(min_opacity),
			None => self.opacity,
		}
	}
}

/// Fixed-size particle collection bound to one set of canvas dimensions.
pub struct ParticleStore {
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
	frame: u64,
}

impl ParticleStore {
	pub fn new<R: Rng>(config: &EngineConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let particles = (0..config.particle_count)
			.map(|_| Particle::spawn(config, width, height, rng))
			.collect();
		Self {
			particles,
			width,
			height,
			frame: 0,
		}
	}

	/// Advances every particle by one frame.
	pub fn update<R: Rng>(&mut self, pointer: &PointerState, config: &EngineConfig, rng: &mut R) {
		self.frame = self.frame.wrapping_add(1);
		let (width, height, frame) = (self.width, self.height, self.frame);
		for (index, p) in self.particles.iter_mut().enumerate() {
			p.update(pointer, width, height, config, frame, index, rng);
		}
	}

	/// Frames advanced since this store was created.
	pub fn frame(&self) -> u64 {
		self.frame
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::config::Profile;
	use super::*;

	fn still_config(profile: Profile) -> EngineConfig {
		EngineConfig {
			drift: 0.0,
			lifetime: None,
			..EngineConfig::for_profile(profile, 1280.0)
		}
	}

	fn particle_at(x: f64, y: f64, vx: f64, vy: f64, config: &EngineConfig) -> Particle {
		Particle {
			x,
			y,
			vx,
			vy,
			base_vx: vx,
			base_vy: vy,
			base_size: config.size_range.0,
			size: config.size_range.0,
			base_opacity: config.opacity_range.0,
			opacity: config.opacity_range.0,
			color: config.palette.get(0),
			life: None,
		}
	}

	#[test]
	fn force_is_linear_and_zero_at_radius() {
		assert_eq!(attraction_force(0.0, 120.0), Some(1.0));
		assert_eq!(attraction_force(90.0, 120.0), Some(0.25));
		assert_eq!(attraction_force(120.0, 120.0), None);
		assert_eq!(attraction_force(200.0, 120.0), None);

		let mut last = f64::INFINITY;
		for d in 0..120 {
			let f = attraction_force(d as f64, 120.0).unwrap();
			assert!(f < last);
			last = f;
		}
		// approaches zero continuously at the edge
		assert!(attraction_force(119.999, 120.0).unwrap() < 1e-4);
	}

	#[test]
	fn wrap_moves_particle_to_opposite_edge() {
		let config = EngineConfig {
			particle_count: 10,
			..still_config(Profile::Reactive)
		};
		let mut rng = SmallRng::seed_from_u64(7);
		let mut p = particle_at(399.0, 200.0, 5.0, 0.0, &config);
		p.update(&PointerState::default(), 400.0, 400.0, &config, 1, 0, &mut rng);
		assert_eq!(p.x, 4.0);
		assert_eq!(p.y, 200.0);
	}

	#[test]
	fn pointer_pulls_particle_toward_it() {
		let config = still_config(Profile::Reactive);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut p = particle_at(100.0, 190.0, 0.0, 0.0, &config);
		let pointer = PointerState {
			x: 100.0,
			y: 100.0,
			active: true,
		};
		let size_before = p.size;
		let opacity_before = p.opacity;
		p.update(&pointer, 400.0, 400.0, &config, 1, 0, &mut rng);

		let expected = 0.25 * config.attraction_coefficient;
		assert!(p.vx.abs() < 1e-12);
		assert!((p.vy + expected).abs() < 1e-12);
		assert!((p.y - (190.0 - expected)).abs() < 1e-12);
		assert!(p.size > size_before);
		assert!(p.opacity > opacity_before);
	}

	#[test]
	fn inactive_pointer_exerts_no_force() {
		let config = still_config(Profile::Reactive);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut p = particle_at(100.0, 190.0, 0.0, 0.0, &config);
		let pointer = PointerState {
			x: 100.0,
			y: 100.0,
			active: false,
		};
		p.update(&pointer, 400.0, 400.0, &config, 1, 0, &mut rng);
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
		assert_eq!((p.x, p.y), (100.0, 190.0));
	}

	#[test]
	fn released_particle_relaxes_to_baseline() {
		let config = still_config(Profile::Reactive);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut p = particle_at(200.0, 200.0, 0.5, 0.0, &config);
		p.vx = 3.0;
		p.size = config.max_size;
		p.opacity = config.max_opacity;
		for frame in 0..400 {
			p.update(&PointerState::default(), 400.0, 400.0, &config, frame, 0, &mut rng);
		}
		assert!((p.vx - 0.5).abs() < 1e-3);
		assert!((p.size - p.base_size).abs() < 1e-3);
		assert_eq!(p.opacity, p.base_opacity);
	}

	#[test]
	fn reflect_negates_velocity_and_stays_inside() {
		let config = still_config(Profile::Ambient);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut p = particle_at(399.5, 0.2, 1.0, -0.5, &config);
		p.update(&PointerState::default(), 400.0, 400.0, &config, 1, 0, &mut rng);
		assert!(p.vx < 0.0);
		assert!(p.vy > 0.0);
		assert!((0.0..400.0).contains(&p.x));
		assert!((0.0..400.0).contains(&p.y));
		assert!((p.x - 399.5).abs() < 1e-9);
		assert!((p.y - 0.3).abs() < 1e-9);
	}

	#[test]
	fn reflect_axis_handles_exact_edge_and_long_steps() {
		assert_eq!(reflect_axis(400.0, 2.0, 400.0), (0.0, -2.0));
		let (pos, vel) = reflect_axis(-900.0, -5.0, 400.0);
		assert!((0.0..400.0).contains(&pos));
		assert_eq!(vel, 5.0);
		assert_eq!(wrap_coord(-1e-18, 400.0), 0.0);
	}

	#[test]
	fn particles_stay_in_bounds_and_clamped() {
		for profile in [Profile::Ambient, Profile::Reactive, Profile::Showcase] {
			let config = EngineConfig::for_profile(profile, 1280.0);
			let mut rng = SmallRng::seed_from_u64(42);
			let (w, h) = (320.0, 240.0);
			let mut store = ParticleStore::new(&config, w, h, &mut rng);
			let count = store.particles.len();

			for frame in 0..500u32 {
				let pointer = PointerState {
					x: (frame as f64 * 3.7) % w,
					y: (frame as f64 * 1.3) % h,
					active: frame % 100 < 70,
				};
				store.update(&pointer, &config, &mut rng);
				for p in &store.particles {
					assert!((0.0..w).contains(&p.x), "{profile:?} x={}", p.x);
					assert!((0.0..h).contains(&p.y), "{profile:?} y={}", p.y);
					assert!(p.opacity >= config.min_opacity && p.opacity <= 1.0);
					assert!(p.opacity <= config.max_opacity);
					assert!(p.size > 0.0 && p.size <= config.max_size);
					assert!(p.size >= config.min_size);
					let display = p.display_opacity(config.min_opacity);
					assert!(display >= config.min_opacity && display <= 1.0);
				}
			}
			assert_eq!(store.particles.len(), count);
			assert_eq!(store.frame(), 500);
		}
	}

	#[test]
	fn expired_particles_respawn_in_place() {
		let mut config = EngineConfig::for_profile(Profile::Showcase, 1280.0);
		config.lifetime = Some((3.0, 3.0));
		config.particle_count = 12;
		let mut rng = SmallRng::seed_from_u64(3);
		let mut store = ParticleStore::new(&config, 300.0, 300.0, &mut rng);
		for _ in 0..3 {
			store.update(&PointerState::default(), &config, &mut rng);
		}
		assert_eq!(store.particles.len(), 12);
		for p in &store.particles {
			let life = p.life.unwrap();
			assert_eq!(life.remaining, 3.0);
			assert_eq!(life.max, 3.0);
		}
	}

	#[test]
	fn ambient_particles_have_no_lifetime() {
		let config = EngineConfig::for_profile(Profile::Ambient, 1280.0);
		let mut rng = SmallRng::seed_from_u64(3);
		let store = ParticleStore::new(&config, 300.0, 300.0, &mut rng);
		assert!(store.particles.iter().all(|p| p.life.is_none()));
		assert!(!store.particles.is_empty());
	}
}
