//! particle-logo: Interactive particle rendering of a brand logo.
//!
//! This crate provides a WASM canvas component that samples a logo image into
//! small colored squares which spring into place, scatter away from the
//! pointer and rebuild themselves when the page is resized.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

#[cfg(target_arch = "wasm32")]
use getrandom as _;

pub mod components;

pub use components::particle_logo::{
	ConfigError, ParticleConfig, ParticleError, ParticleField, ParticleLogoCanvas, PixelSource,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-logo: logging initialized");
}

/// Load engine overrides from a script element with id="particle-config".
/// Expected format: JSON, any subset of the `ParticleConfig` fields.
fn load_particle_config() -> Option<ParticleConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match ParticleConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"particle-logo: loaded config, stride {}, {} image sources",
				config.sampling.stride,
				config.sources.urls().len()
			);
			Some(config)
		}
		Err(e) => {
			warn!("particle-logo: ignoring particle config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Renders the hero section with the particle logo behind the brand name.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_particle_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Phila4You | Heritage Collectibles" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section id="hero" class="hero">
			<div class="hero-logo">
				<ParticleLogoCanvas config=config />
			</div>
			<div class="hero-overlay">
				<h1 class="brand">"Phila4You"</h1>
				<p class="tagline">"EST. 2009"</p>
			</div>
		</section>
	}
}

