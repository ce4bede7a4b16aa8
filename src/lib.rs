//! sticker-field: Flowfield-driven sticker animation for hero canvases.
//!
//! This crate provides a WASM-based canvas component that drifts sticker
//! sprites along a coherent-noise flowfield, with pointer attraction,
//! visibility-driven pause/resume, and keyboard pause/reset commands.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::sticker_field::{
	FieldConfig, FlowDirection, StickerFieldCanvas, prefers_reduced_motion,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("sticker-field: logging initialized");
}

/// Load field configuration from a script element with
/// id="sticker-field-config". Expected format: a JSON object with any
/// subset of [`FieldConfig`]'s fields.
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("sticker-field-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<FieldConfig>(&json_text) {
		Ok(config) => {
			info!("sticker-field: loaded host configuration");
			Some(config)
		}
		Err(e) => {
			warn!("sticker-field: failed to parse configuration: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads configuration from the DOM and renders the hero sticker field.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let mut config = load_field_config().unwrap_or_default();
	if prefers_reduced_motion() {
		config.reduced_motion = true;
	}

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Sticker Field" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="hero">
			<StickerFieldCanvas config=Some(config) fullscreen=true />
			<div class="hero-overlay">
				<p class="legend">
					<kbd>"A"</kbd>" pause "<kbd>"R"</kbd>" reset"
				</p>
			</div>
		</div>
	}
}
