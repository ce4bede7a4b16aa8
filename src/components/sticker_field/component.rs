//! Leptos component wrapping the sticker field canvas.
//!
//! The component creates an HTML canvas element and drives the simulation
//! from a `requestAnimationFrame` loop. Pointer and touch events feed the
//! attraction force; the keyboard toggles pause (`A`) and resets (`R`);
//! document visibility and an `IntersectionObserver` feed the lifecycle
//! controller so the loop idles while nobody can see it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry,
	IntersectionObserverInit, KeyboardEvent, MouseEvent, TouchEvent, VisibilityState, Window,
};

use super::config::FieldConfig;
use super::field::ParticleField;
use super::lifecycle::{Lifecycle, LifecycleEvent};
use super::render;
use super::sticker::StickerSet;
use super::theme::Theme;

/// Last known pointer position in canvas space, and whether it counts.
#[derive(Clone, Debug, Default)]
struct PointerState {
	x: f64,
	y: f64,
	active: bool,
}

/// Bundles the simulation with its lifecycle, sticker set, and pointer.
struct FieldContext {
	field: ParticleField,
	lifecycle: Lifecycle,
	stickers: StickerSet,
	theme: Theme,
	pointer: PointerState,
}

/// Renders the animated sticker field on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
/// Explicit `width`/`height` override automatic sizing. `config = None`
/// uses the shipped tuning.
#[component]
pub fn StickerFieldCanvas(
	#[prop(default = None)] config: Option<FieldConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<FieldContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let key_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let visibility_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let intersect_cb: Rc<RefCell<Option<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>>> =
		Rc::new(RefCell::new(None));
	let observer: Rc<RefCell<Option<IntersectionObserver>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let (key_cb_init, visibility_cb_init, intersect_cb_init, observer_init) = (
		key_cb.clone(),
		visibility_cb.clone(),
		intersect_cb.clone(),
		observer.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = surface_size(&canvas, &window, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let config = config.clone().unwrap_or_default();
		let theme = Theme::default();
		let stickers = StickerSet::from_config(&config, &theme);
		let seed = js_sys::Date::now() as u64;

		*context_init.borrow_mut() = Some(FieldContext {
			field: ParticleField::new(config, w, h, stickers.len(), seed),
			lifecycle: Lifecycle::new(),
			stickers,
			theme,
			pointer: PointerState::default(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = surface_size(&canvas_resize, &win, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.field.adjust_count(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let context_keys = context_init.clone();
		*key_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if let Some(ref mut c) = *context_keys.borrow_mut() {
				match ev.key().to_lowercase().as_str() {
					"a" => c.lifecycle.apply(LifecycleEvent::ToggleManual),
					"r" => {
						let now = js_sys::Date::now();
						c.field.reset(now as u64, now);
						c.lifecycle.request_redraw();
					}
					_ => {}
				}
			}
		}));
		if let Some(ref cb) = *key_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let context_vis = context_init.clone();
		*visibility_cb_init.borrow_mut() = Some(Closure::new(move || {
			let visible = web_sys::window()
				.and_then(|w| w.document())
				.map(|d| d.visibility_state() == VisibilityState::Visible)
				.unwrap_or(true);
			if let Some(ref mut c) = *context_vis.borrow_mut() {
				c.lifecycle.apply(LifecycleEvent::TabVisible(visible));
			}
		}));
		if let Some(document) = window.document() {
			if let Some(ref cb) = *visibility_cb_init.borrow() {
				let _ = document.add_event_listener_with_callback(
					"visibilitychange",
					cb.as_ref().unchecked_ref(),
				);
			}
		}

		let context_io = context_init.clone();
		*intersect_cb_init.borrow_mut() = Some(Closure::new(
			move |entries: js_sys::Array, _: IntersectionObserver| {
				let Ok(entry) = entries.get(0).dyn_into::<IntersectionObserverEntry>() else {
					return;
				};
				let in_view = entry.is_intersecting() && entry.intersection_ratio() > 0.1;
				if let Some(ref mut c) = *context_io.borrow_mut() {
					c.lifecycle.apply(LifecycleEvent::InView(in_view));
				}
			},
		));
		if let Some(ref cb) = *intersect_cb_init.borrow() {
			let init = IntersectionObserverInit::new();
			let thresholds =
				js_sys::Array::of2(&JsValue::from_f64(0.0), &JsValue::from_f64(0.1));
			init.set_threshold(&JsValue::from(thresholds));
			match IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init) {
				Ok(io) => {
					io.observe(&canvas);
					*observer_init.borrow_mut() = Some(io);
				}
				Err(err) => warn!("sticker-field: intersection observer unavailable: {err:?}"),
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let now = js_sys::Date::now();
				let pointer = c.pointer.active.then_some((c.pointer.x, c.pointer.y));
				if c.lifecycle.advance(&mut c.field, pointer, now) {
					render::render(&c.field, &ctx, &c.stickers, &c.theme);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.pointer.x = ev.client_x() as f64 - rect.left();
			c.pointer.y = ev.client_y() as f64 - rect.top();
			c.pointer.active = true;
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.pointer.active = false;
		}
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut c) = *context_ts.borrow_mut() {
			apply_touch(&canvas, &ev, &mut c.pointer);
		}
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut c) = *context_tm.borrow_mut() {
			apply_touch(&canvas, &ev, &mut c.pointer);
		}
	};

	let context_te = context.clone();
	let on_touchend = move |ev: TouchEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut c) = *context_te.borrow_mut() {
			apply_touch(&canvas, &ev, &mut c.pointer);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="sticker-field-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block;"
		/>
	}
}

/// Updates the pointer from the first active touch, deactivating it when
/// the last finger lifts.
fn apply_touch(canvas: &HtmlCanvasElement, ev: &TouchEvent, pointer: &mut PointerState) {
	match ev.touches().item(0) {
		Some(touch) => {
			let rect = canvas.get_bounding_client_rect();
			pointer.x = touch.client_x() as f64 - rect.left();
			pointer.y = touch.client_y() as f64 - rect.top();
			pointer.active = true;
		}
		None => pointer.active = false,
	}
}

/// Resolves the drawing surface size: explicit props win, then the window
/// in fullscreen mode, then the parent element's client box.
fn surface_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		(
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		)
	} else {
		(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}
