//! Leptos components.

pub mod particle_canvas;
