//! Leptos component wrapping the particle-field canvas.
//!
//! The component creates an HTML canvas element and wires up pointer
//! handlers plus window/document listeners and a theme mutation observer.
//! An animation loop runs via `requestAnimationFrame`, advancing the
//! simulation and rendering each frame. The loop pauses on blur, hidden
//! visibility, and reduced motion; teardown detaches everything so no
//! callback can outlive the mount.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MutationObserver, MutationObserverInit,
	PointerEvent, Window,
};

use super::render;
use super::state::FieldState;
use super::theme::{self, Color, PrimaryColor, ThemeInfo};

/// Bundles the simulation with its drawing context and visual state.
///
/// Exists only while the component is wired; `None` means torn down (or not
/// yet initialized), and every callback treats that as a no-op.
struct FieldContext {
	state: FieldState,
	ctx: CanvasRenderingContext2d,
	primary: PrimaryColor,
	fade: Color,
	device_width: f64,
	device_height: f64,
	running: bool,
}

/// Externally registered callbacks, detached wholesale at teardown.
struct Wiring {
	resize: Closure<dyn FnMut()>,
	blur: Closure<dyn FnMut()>,
	focus: Closure<dyn FnMut()>,
	visibility: Closure<dyn FnMut()>,
	observer: MutationObserver,
	// Kept alive for the observer; never invoked from Rust.
	_theme_cb: Closure<dyn FnMut()>,
}

type SharedContext = Rc<RefCell<Option<FieldContext>>>;
type SharedWiring = Rc<RefCell<Option<Wiring>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type SharedRafId = Rc<Cell<Option<i32>>>;

fn js_random() -> f64 {
	js_sys::Math::random()
}

/// Re-read `--color-primary` from the document root into the cache.
///
/// Malformed or missing values leave the cache untouched.
fn refresh_primary(primary: &mut PrimaryColor) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let Some(document) = window.document() else {
		return;
	};
	let Some(root) = document.document_element() else {
		return;
	};
	let Ok(Some(style)) = window.get_computed_style(&root) else {
		return;
	};
	let Ok(value) = style.get_property_value("--color-primary") else {
		return;
	};
	if !primary.update(value.trim()) {
		debug!("canvas-drift: ignoring unparsable --color-primary value");
	}
}

/// Size the backing store from layout size and device pixel ratio, leaving
/// the context transform in device-pixel space.
///
/// Returns `(width, height, device_width, device_height)` where the first
/// pair is the CSS-space surface size the simulation runs in.
fn configure_surface(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
) -> (f64, f64, f64, f64) {
	let window: Window = web_sys::window().unwrap();
	let ratio = match window.device_pixel_ratio() {
		r if r > 0.0 => r,
		_ => 1.0,
	};
	let width = canvas.client_width() as f64;
	let height = canvas.client_height() as f64;
	let device_width = (width * ratio).round();
	let device_height = (height * ratio).round();
	canvas.set_width(device_width as u32);
	canvas.set_height(device_height as u32);
	let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
	(width, height, device_width, device_height)
}

fn render_once(context: &SharedContext) {
	if let Some(ref c) = *context.borrow() {
		render::render(
			&c.state,
			&c.ctx,
			&c.primary,
			c.fade,
			c.device_width,
			c.device_height,
		);
	}
}

/// Stop the loop and cancel the in-flight frame request, if any.
fn pause(context: &SharedContext, raf_id: &SharedRafId) {
	if let Some(ref mut c) = *context.borrow_mut() {
		c.running = false;
	}
	if let Some(id) = raf_id.take() {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(id);
		}
	}
}

/// Restart the loop unless it is already running or torn down.
fn resume(context: &SharedContext, animate: &SharedClosure, raf_id: &SharedRafId) {
	{
		let mut guard = context.borrow_mut();
		let Some(ref mut c) = *guard else {
			return;
		};
		if c.running {
			return;
		}
		c.running = true;
	}
	request_frame(animate, raf_id);
}

fn request_frame(animate: &SharedClosure, raf_id: &SharedRafId) {
	if let Some(ref cb) = *animate.borrow() {
		let window: Window = web_sys::window().unwrap();
		if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			raf_id.set(Some(id));
		}
	}
}

/// Detach every listener and observer and drop all owned state.
///
/// Idempotent: safe to call on an already-torn-down component, which also
/// makes it the first step of a signal-driven rewire.
fn teardown(
	context: &SharedContext,
	wiring: &SharedWiring,
	animate: &SharedClosure,
	raf_id: &SharedRafId,
) {
	if let Some(id) = raf_id.take() {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(id);
		}
	}
	if let Some(w) = wiring.borrow_mut().take() {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback("resize", w.resize.as_ref().unchecked_ref());
			let _ = window
				.remove_event_listener_with_callback("blur", w.blur.as_ref().unchecked_ref());
			let _ = window
				.remove_event_listener_with_callback("focus", w.focus.as_ref().unchecked_ref());
			if let Some(document) = window.document() {
				let _ = document.remove_event_listener_with_callback(
					"visibilitychange",
					w.visibility.as_ref().unchecked_ref(),
				);
			}
		}
		w.observer.disconnect();
	}
	*animate.borrow_mut() = None;
	*context.borrow_mut() = None;
}

/// Renders the ambient particle field on a fullscreen canvas element.
///
/// The component takes no data; it consumes two externally supplied
/// signals. Any change to either one tears the wiring down and rebuilds it,
/// exactly as a fresh mount would. With `reduced_motion` set, no frames are
/// scheduled and a single static frame is painted instead.
#[component]
pub fn ParticleFieldCanvas(
	/// Active theme; `id` selects the trail-fade color.
	#[prop(into)]
	theme: Signal<ThemeInfo>,
	/// The user's reduced-motion preference. True suppresses the loop.
	#[prop(into)]
	reduced_motion: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let wiring: SharedWiring = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let raf_id: SharedRafId = Rc::new(Cell::new(None));

	let (context_init, wiring_init, animate_init, raf_init) = (
		context.clone(),
		wiring.clone(),
		animate.clone(),
		raf_id.clone(),
	);
	Effect::new(move |_| {
		let theme_info = theme.get();
		let reduced = reduced_motion.get();

		// Signal changes restart the wiring from scratch.
		teardown(&context_init, &wiring_init, &animate_init, &raf_init);

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		// No drawing context means no work at all, not an error.
		let Ok(Some(raw)) = canvas.get_context("2d") else {
			return;
		};
		let Ok(ctx) = raw.dyn_into::<CanvasRenderingContext2d>() else {
			return;
		};

		let (width, height, device_width, device_height) = configure_surface(&canvas, &ctx);

		let mut rng = js_random;
		let mut primary = PrimaryColor::default();
		refresh_primary(&mut primary);

		*context_init.borrow_mut() = Some(FieldContext {
			state: FieldState::new(width, height, reduced, &mut rng),
			ctx,
			primary,
			fade: theme::fade_color(&theme_info.id),
			device_width,
			device_height,
			running: false,
		});

		let window: Window = web_sys::window().unwrap();
		let document = window.document().unwrap();

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		let resize: Closure<dyn FnMut()> = Closure::new(move || {
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				let (w, h, dw, dh) = configure_surface(&canvas_resize, &c.ctx);
				let mut rng = js_random;
				c.state.resize(w, h, &mut rng);
				c.device_width = dw;
				c.device_height = dh;
				if !c.running {
					// Resetting the backing store wiped the canvas; put the
					// static frame back.
					render::render(&c.state, &c.ctx, &c.primary, c.fade, dw, dh);
				}
			}
		});
		let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

		let (context_blur, raf_blur) = (context_init.clone(), raf_init.clone());
		let blur: Closure<dyn FnMut()> = Closure::new(move || {
			pause(&context_blur, &raf_blur);
		});
		let _ = window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref());

		let (context_focus, animate_focus, raf_focus) = (
			context_init.clone(),
			animate_init.clone(),
			raf_init.clone(),
		);
		let focus: Closure<dyn FnMut()> = Closure::new(move || {
			if !reduced {
				resume(&context_focus, &animate_focus, &raf_focus);
			}
		});
		let _ = window.add_event_listener_with_callback("focus", focus.as_ref().unchecked_ref());

		let (context_vis, animate_vis, raf_vis) = (
			context_init.clone(),
			animate_init.clone(),
			raf_init.clone(),
		);
		let visibility: Closure<dyn FnMut()> = Closure::new(move || {
			let hidden = web_sys::window()
				.and_then(|w| w.document())
				.map(|d| d.hidden())
				.unwrap_or(true);
			if hidden {
				pause(&context_vis, &raf_vis);
			} else if !reduced {
				resume(&context_vis, &animate_vis, &raf_vis);
			}
		});
		let _ = document.add_event_listener_with_callback(
			"visibilitychange",
			visibility.as_ref().unchecked_ref(),
		);

		let context_theme = context_init.clone();
		let theme_cb: Closure<dyn FnMut()> = Closure::new(move || {
			if let Some(ref mut c) = *context_theme.borrow_mut() {
				refresh_primary(&mut c.primary);
			}
		});
		let observer = MutationObserver::new(theme_cb.as_ref().unchecked_ref()).unwrap();
		if let Some(root) = document.document_element() {
			let init = MutationObserverInit::new();
			init.set_attributes(true);
			init.set_attribute_filter(&Array::of1(&JsValue::from_str("data-theme")));
			let _ = observer.observe_with_options(&root, &init);
		}

		*wiring_init.borrow_mut() = Some(Wiring {
			resize,
			blur,
			focus,
			visibility,
			observer,
			_theme_cb: theme_cb,
		});

		let (context_anim, animate_inner, raf_anim) = (
			context_init.clone(),
			animate_init.clone(),
			raf_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			raf_anim.set(None);
			let mut keep_running = false;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.running {
					let mut rng = js_random;
					c.state.advance(&mut rng);
					render::render(
						&c.state,
						&c.ctx,
						&c.primary,
						c.fade,
						c.device_width,
						c.device_height,
					);
					keep_running = true;
				}
			}
			if keep_running {
				if let Some(ref cb) = *animate_inner.borrow() {
					let window: Window = web_sys::window().unwrap();
					if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
						raf_anim.set(Some(id));
					}
				}
			}
		}));

		if reduced {
			// Stay paused, but leave one composed frame on screen.
			render_once(&context_init);
		} else {
			resume(&context_init, &animate_init, &raf_init);
		}
	});

	// The teardown bundle is not Send; park it in local storage so the
	// cleanup hook only captures the Copy handle.
	let cleanup_handles = StoredValue::new_local((
		context.clone(),
		wiring.clone(),
		animate.clone(),
		raf_id.clone(),
	));
	on_cleanup(move || {
		cleanup_handles.try_with_value(|(context, wiring, animate, raf_id)| {
			teardown(context, wiring, animate, raf_id);
		});
	});

	let context_pm = context.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut c) = *context_pm.borrow_mut() {
			c.state.pointer_moved(x, y);
		}
	};

	let context_pl = context.clone();
	let on_pointerleave = move |_: PointerEvent| {
		if let Some(ref mut c) = *context_pl.borrow_mut() {
			c.state.pointer_left();
		}
	};

	let context_pd = context.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let mut rng = js_random;
		if let Some(ref mut c) = *context_pd.borrow_mut() {
			c.state.pointer_pressed(x, y, &mut rng);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			aria-hidden="true"
			on:pointermove=on_pointermove
			on:pointerleave=on_pointerleave
			on:pointerdown=on_pointerdown
			style="position: absolute; inset: 0; width: 100%; height: 100%; display: block;"
		/>
	}
}
