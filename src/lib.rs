//! particle-field: Animated parallax particle background for the web.
//!
//! This crate provides a WASM-based canvas component that renders a drifting,
//! depth-layered particle field with pointer and click disruption, passing
//! comets, and spring-back recovery.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
mod dom;
pub mod viewport;

pub use components::particle_field::{FieldConfig, FieldTheme, ParticleFieldCanvas};

/// Id of the element holding horizontal page scroll on desktop layouts.
const SCROLLER_ID: &str = "scroller";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-field: logging initialized");
}

/// Load configuration overrides from a script element with id="field-config".
/// Expected format: JSON object with any subset of [`FieldConfig`] fields.
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("field-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<FieldConfig>(&json_text) {
		Ok(config) => {
			info!("particle-field: loaded config overrides");
			Some(config)
		}
		Err(e) => {
			warn!("particle-field: failed to parse field config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Tracks page scroll and layout, and renders the particle field behind the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config().unwrap_or_default();
	let viewport = viewport::track_viewport(&config.compact_query, SCROLLER_ID);

	view! {
		<Meta name="color-scheme" content="dark" />
		<ParticleFieldCanvas
			scroll_fraction=viewport.scroll_fraction
			compact=viewport.compact
			config=config
		/>
	}
}
