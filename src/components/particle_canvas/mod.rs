//! Canvas particle animation engine.
//!
//! One engine, three looks:
//! - **Ambient**: slow drifting dots that bounce off the edges, linked to their neighbour
//! - **Reactive**: dots pulled toward the pointer, with a glow under the cursor
//! - **Showcase**: dense linked dots with lifetimes, rotating shapes and expanding waves
//!
//! Each frame runs one update pass and one render pass, capped at the
//! profile's target frame rate.
//!
//! # Example
//!
//! ```ignore
//! use studio_particles::components::particle_canvas::{ParticleCanvas, Profile};
//!
//! view! { <ParticleCanvas profile=Profile::Ambient fullscreen=true /> }
//! ```

mod component;
pub mod config;
mod engine;
mod host;
mod particles;
pub mod pointer;
mod render;
pub mod scheduler;
mod shapes;
pub mod surface;
pub mod theme;

pub use component::ParticleCanvas;
pub use config::{BoundaryPolicy, ConfigOverrides, EngineConfig, Profile};
pub use engine::Engine;
pub use particles::{Lifetime, Particle, attraction_force};
pub use shapes::{Geometry, ShapeKind, Wave};
