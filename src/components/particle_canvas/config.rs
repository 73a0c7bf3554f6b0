//! Engine configuration and the three named profiles.
//!
//! Every tunable the engine reads lives in [`EngineConfig`]. The ambient,
//! reactive and showcase looks are presets of the same struct built by
//! [`EngineConfig::for_profile`], sized for the current viewport bucket.
//! Pages can override a handful of values through [`ConfigOverrides`].

use serde::Deserialize;

use super::theme::{Color, Palette};
use crate::error::EngineError;

/// Named configuration presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
	/// Slow background particles that bounce off the edges.
	Ambient,
	/// Pointer-attracted particles with a hover glow.
	Reactive,
	/// Dense particles with lifetimes, rotating shapes and expanding waves.
	Showcase,
}

/// What happens when a particle crosses the canvas edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryPolicy {
	/// Mirror back inside and negate the velocity component.
	Reflect,
	/// Reappear at the opposite edge.
	Wrap,
}

/// Which other particles each particle is checked against for connective lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionWindow {
	/// The next `n` particles in store order.
	Next(usize),
	/// Every later particle (all pairs).
	All,
}

/// How connective lines are stroked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStyle {
	Straight,
	/// Quadratic curve bowed away from the midpoint.
	Curved,
}

/// Viewport width breakpoints used to size entity collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportBucket {
	/// Narrower than 640 CSS px.
	Small,
	/// Narrower than 1024 CSS px.
	Medium,
	Large,
}

impl ViewportBucket {
	pub fn from_width(viewport_width: f64) -> Self {
		if viewport_width < 640.0 {
			ViewportBucket::Small
		} else if viewport_width < 1024.0 {
			ViewportBucket::Medium
		} else {
			ViewportBucket::Large
		}
	}
}

impl Profile {
	/// Particle count for this profile at the given viewport width.
	pub fn particle_count(self, viewport_width: f64) -> usize {
		let bucket = ViewportBucket::from_width(viewport_width);
		match (self, bucket) {
			(Profile::Ambient, ViewportBucket::Small) => 15,
			(Profile::Ambient, ViewportBucket::Medium) => 25,
			(Profile::Ambient, ViewportBucket::Large) => 40,
			(Profile::Reactive, ViewportBucket::Small) => 8,
			(Profile::Reactive, ViewportBucket::Medium) => 12,
			(Profile::Reactive, ViewportBucket::Large) => 18,
			(Profile::Showcase, ViewportBucket::Small) => 18,
			(Profile::Showcase, ViewportBucket::Medium) => 25,
			(Profile::Showcase, ViewportBucket::Large) => 60,
		}
	}

	/// Number of rotating shapes (showcase only).
	pub fn geometry_count(self, viewport_width: f64) -> usize {
		match (self, ViewportBucket::from_width(viewport_width)) {
			(Profile::Showcase, ViewportBucket::Small) => 3,
			(Profile::Showcase, _) => 6,
			_ => 0,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Profile::Ambient => "ambient",
			Profile::Reactive => "reactive",
			Profile::Showcase => "showcase",
		}
	}
}

/// Complete tunable set for one engine instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
	pub profile: Profile,
	pub particle_count: usize,
	/// Frame-rate cap; ticks closer together than `1000 / target_fps` ms are skipped.
	pub target_fps: u32,
	pub palette: Palette,
	/// Color of the trail-fade fill.
	pub background: Color,
	/// Alpha of the per-frame fill; lower values leave longer trails.
	pub trail_alpha: f64,
	pub boundary: BoundaryPolicy,

	/// Maximum initial speed per axis.
	pub speed: f64,
	/// Velocity magnitude cap.
	pub max_speed: f64,
	/// Per-frame factor pulling velocity back toward its baseline (< 1).
	pub velocity_damping: f64,
	/// Amplitude of the sinusoidal drift added to position each frame.
	pub drift: f64,

	pub size_range: (f64, f64),
	pub min_size: f64,
	pub max_size: f64,
	pub opacity_range: (f64, f64),
	pub min_opacity: f64,
	pub max_opacity: f64,
	/// Per-frame factor pulling size back toward base size (< 1).
	pub size_decay: f64,
	/// Per-frame opacity decrement when not attracted.
	pub opacity_decay: f64,

	/// Whether pointer listeners are attached at all.
	pub pointer_interaction: bool,
	pub attraction_radius: f64,
	pub attraction_coefficient: f64,
	/// Size multiplier gained at full force: target = base * (1 + force * gain).
	pub size_gain: f64,
	/// Fraction of the gap to the target size closed per attracted frame.
	pub size_ease: f64,
	/// Opacity increment per frame at full force.
	pub opacity_gain: f64,
	/// Draw a radial glow under the pointer while hovering.
	pub pointer_glow: bool,

	pub connection_distance: f64,
	/// Scales line alpha down so links stay subtle.
	pub connection_alpha: f64,
	pub connection_window: ConnectionWindow,
	pub link_style: LinkStyle,

	/// Lifetime range in frames; `None` means particles live forever.
	pub lifetime: Option<(f64, f64)>,
	pub geometry_count: usize,
	pub wave_count: usize,
}

impl EngineConfig {
	/// Builds the preset for `profile`, sized for `viewport_width` CSS pixels.
	pub fn for_profile(profile: Profile, viewport_width: f64) -> Self {
		let particle_count = profile.particle_count(viewport_width);
		let geometry_count = profile.geometry_count(viewport_width);
		match profile {
			Profile::Ambient => Self {
				profile,
				particle_count,
				target_fps: 30,
				palette: Palette::studio(),
				background: Color::rgb(10, 10, 20),
				trail_alpha: 0.1,
				boundary: BoundaryPolicy::Reflect,
				speed: 0.5,
				max_speed: 1.0,
				velocity_damping: 0.96,
				drift: 0.0,
				size_range: (1.0, 3.0),
				min_size: 0.5,
				max_size: 4.5,
				opacity_range: (0.2, 0.6),
				min_opacity: 0.1,
				max_opacity: 0.8,
				size_decay: 0.95,
				opacity_decay: 0.01,
				pointer_interaction: false,
				attraction_radius: 120.0,
				attraction_coefficient: 0.3,
				size_gain: 0.5,
				size_ease: 0.15,
				opacity_gain: 0.05,
				pointer_glow: false,
				connection_distance: 80.0,
				connection_alpha: 0.2,
				connection_window: ConnectionWindow::Next(1),
				link_style: LinkStyle::Straight,
				lifetime: None,
				geometry_count,
				wave_count: 0,
			},
			Profile::Reactive => Self {
				profile,
				particle_count,
				target_fps: 30,
				palette: Palette::neon(),
				background: Color::rgb(5, 5, 15),
				trail_alpha: 0.15,
				boundary: BoundaryPolicy::Wrap,
				speed: 0.8,
				max_speed: 4.0,
				velocity_damping: 0.96,
				drift: 0.3,
				size_range: (2.0, 4.0),
				min_size: 1.0,
				max_size: 8.0,
				opacity_range: (0.3, 0.7),
				min_opacity: 0.15,
				max_opacity: 1.0,
				size_decay: 0.92,
				opacity_decay: 0.02,
				pointer_interaction: true,
				attraction_radius: 120.0,
				attraction_coefficient: 0.5,
				size_gain: 1.0,
				size_ease: 0.2,
				opacity_gain: 0.1,
				pointer_glow: true,
				connection_distance: 100.0,
				connection_alpha: 0.3,
				connection_window: ConnectionWindow::Next(2),
				link_style: LinkStyle::Straight,
				lifetime: None,
				geometry_count,
				wave_count: 0,
			},
			Profile::Showcase => Self {
				profile,
				particle_count,
				target_fps: 30,
				palette: Palette::spectrum(),
				background: Color::rgb(8, 8, 16),
				trail_alpha: 0.05,
				boundary: BoundaryPolicy::Wrap,
				speed: 1.0,
				max_speed: 3.0,
				velocity_damping: 0.98,
				drift: 0.2,
				size_range: (1.5, 4.0),
				min_size: 0.8,
				max_size: 6.0,
				opacity_range: (0.4, 0.9),
				min_opacity: 0.1,
				max_opacity: 1.0,
				size_decay: 0.95,
				opacity_decay: 0.01,
				pointer_interaction: true,
				attraction_radius: 150.0,
				attraction_coefficient: 0.3,
				size_gain: 0.5,
				size_ease: 0.15,
				opacity_gain: 0.05,
				pointer_glow: false,
				connection_distance: 120.0,
				connection_alpha: 0.15,
				connection_window: ConnectionWindow::All,
				link_style: LinkStyle::Curved,
				lifetime: Some((200.0, 600.0)),
				geometry_count,
				wave_count: 3,
			},
		}
	}
}

/// Page-level overrides applied on top of every profile preset.
///
/// Read from a `<script id="particle-config" type="application/json">`
/// element. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
	pub target_fps: Option<u32>,
	pub particle_count: Option<usize>,
	/// Hex colors (`#RRGGBB`).
	pub palette: Option<Vec<String>>,
	pub connection_distance: Option<f64>,
	pub attraction_radius: Option<f64>,
	pub trail_alpha: Option<f64>,
}

impl ConfigOverrides {
	pub fn from_json(json: &str) -> Result<Self, EngineError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Applies the overrides, clamping each value to the range the engine supports.
	pub fn apply(&self, config: &mut EngineConfig) {
		if let Some(fps) = self.target_fps {
			config.target_fps = fps.clamp(1, 120);
		}
		if let Some(count) = self.particle_count {
			config.particle_count = count.clamp(1, 200);
		}
		if let Some(palette) = self.palette.as_deref().and_then(Palette::from_hex_list) {
			config.palette = palette;
		}
		if let Some(distance) = self.connection_distance {
			config.connection_distance = distance.max(0.0);
		}
		if let Some(radius) = self.attraction_radius {
			config.attraction_radius = radius.max(1.0);
		}
		if let Some(alpha) = self.trail_alpha {
			config.trail_alpha = alpha.clamp(0.05, 0.15);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn buckets_follow_breakpoints() {
		assert_eq!(ViewportBucket::from_width(320.0), ViewportBucket::Small);
		assert_eq!(ViewportBucket::from_width(639.9), ViewportBucket::Small);
		assert_eq!(ViewportBucket::from_width(640.0), ViewportBucket::Medium);
		assert_eq!(ViewportBucket::from_width(1023.0), ViewportBucket::Medium);
		assert_eq!(ViewportBucket::from_width(1024.0), ViewportBucket::Large);
	}

	#[test]
	fn particle_counts_stay_within_profile_ranges() {
		for width in [320.0, 800.0, 1920.0] {
			for profile in [Profile::Ambient, Profile::Reactive, Profile::Showcase] {
				let count = profile.particle_count(width);
				assert!((8..=80).contains(&count), "{profile:?} at {width}: {count}");
			}
		}
		assert!(Profile::Reactive.particle_count(320.0) < Profile::Reactive.particle_count(1920.0));
	}

	#[test]
	fn boundary_policy_differs_per_profile() {
		assert_eq!(
			EngineConfig::for_profile(Profile::Ambient, 1280.0).boundary,
			BoundaryPolicy::Reflect
		);
		assert_eq!(
			EngineConfig::for_profile(Profile::Reactive, 1280.0).boundary,
			BoundaryPolicy::Wrap
		);
		assert_eq!(
			EngineConfig::for_profile(Profile::Showcase, 1280.0).boundary,
			BoundaryPolicy::Wrap
		);
	}

	#[test]
	fn presets_are_internally_consistent() {
		for profile in [Profile::Ambient, Profile::Reactive, Profile::Showcase] {
			let c = EngineConfig::for_profile(profile, 1280.0);
			assert!(c.min_size > 0.0 && c.min_size <= c.size_range.0);
			assert!(c.size_range.1 * (1.0 + c.size_gain) <= c.max_size + 1e-9);
			assert!(c.min_opacity > 0.0 && c.min_opacity <= c.opacity_range.0);
			assert!(c.opacity_range.1 <= c.max_opacity && c.max_opacity <= 1.0);
			assert!((0.05..=0.15).contains(&c.trail_alpha));
			assert!(c.velocity_damping < 1.0 && c.size_decay < 1.0);
		}
	}

	#[test]
	fn overrides_parse_and_clamp() {
		let overrides = ConfigOverrides::from_json(
			r##"{"target_fps": 500, "palette": ["#ffffff", "#000000"], "trail_alpha": 0.9}"##,
		)
		.unwrap();
		let mut config = EngineConfig::for_profile(Profile::Reactive, 1280.0);
		overrides.apply(&mut config);
		assert_eq!(config.target_fps, 120);
		assert_eq!(config.palette.colors.len(), 2);
		assert_eq!(config.trail_alpha, 0.15);
		assert_eq!(config.attraction_radius, 120.0);
	}

	#[test]
	fn malformed_overrides_are_rejected() {
		assert!(ConfigOverrides::from_json("{\"target_fps\": \"fast\"}").is_err());
		assert!(ConfigOverrides::from_json("{\"unknown\": 1}").is_err());
	}
}
