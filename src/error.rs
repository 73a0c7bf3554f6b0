//! Error types for the particle engine.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that can stop an engine instance or prevent it from starting.
///
/// None of these reach the user: the hosting page keeps rendering without
/// the animated background.
#[derive(Debug, Error)]
pub enum EngineError {
	/// The canvas has no 2D drawing context (not attached yet, or unsupported).
	#[error("2d drawing context unavailable")]
	ContextUnavailable,

	/// A browser API call failed.
	#[error("host call failed: {0}")]
	Host(String),

	/// Page-supplied configuration overrides could not be parsed.
	#[error("invalid particle config: {0}")]
	Config(#[from] serde_json::Error),
}

impl From<JsValue> for EngineError {
	fn from(value: JsValue) -> Self {
		EngineError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
