//! canvas-drift: Ambient particle-field background for web pages.
//!
//! This crate provides a WASM-based decorative canvas component: a field of
//! glowing particles that orbit a pointer-tracked target, ripple on clicks,
//! and recolor themselves with the page theme. The [`App`] shell mounts the
//! field fullscreen and supplies the theme and reduced-motion signals it
//! consumes.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{ParticleFieldCanvas, ThemeInfo};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("canvas-drift: logging initialized");
}

/// Load an initial-theme override from a script element with id="theme-data".
/// Expected format: JSON with at least an `id` field, e.g.
/// `{ "id": "terminal-green" }`.
fn load_theme_override() -> Option<ThemeInfo> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("theme-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<ThemeInfo>(&json_text) {
		Ok(theme) => {
			info!("canvas-drift: initial theme '{}' from page data", theme.id);
			// Known ids pick up their full definition; unknown ids pass
			// through and fall back to the default fade color downstream.
			Some(ThemeInfo::from_id(&theme.id).unwrap_or(theme))
		}
		Err(e) => {
			warn!("canvas-drift: failed to parse theme data: {}", e);
			None
		}
	}
}

/// Track the `prefers-reduced-motion` media query into a signal, including
/// later preference changes.
fn watch_reduced_motion(signal: RwSignal<bool>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let Ok(Some(media)) = window.match_media("(prefers-reduced-motion: reduce)") else {
		return;
	};
	signal.set(media.matches());

	let media_events = media.clone();
	let on_change: Closure<dyn FnMut()> = Closure::new(move || {
		signal.set(media_events.matches());
	});
	let _ = media.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
	// The media query outlives the app; keep the callback for the page
	// lifetime.
	on_change.forget();
}

/// Main application component.
/// Acts as the theme authority and hosts the particle field fullscreen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let theme = RwSignal::new(load_theme_override().unwrap_or_default());
	let reduced_motion = RwSignal::new(false);
	watch_reduced_motion(reduced_motion);

	// Mirror the active theme onto the document root so the page CSS (and
	// the field's color resolver) follow it.
	Effect::new(move |_| {
		let id = theme.get().id;
		let root = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element());
		if let Some(root) = root {
			let _ = root.set_attribute("data-theme", &id);
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Canvas Drift" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="drift-stage" style="position: fixed; inset: 0;">
			<ParticleFieldCanvas theme=theme reduced_motion=reduced_motion />
		</div>
	}
}
