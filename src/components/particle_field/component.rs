//! Leptos component wrapping the particle field canvas.
//!
//! The component creates a fixed, full-viewport canvas and hands it to a
//! [`FieldController`], which wires pointer, click, and resize listeners on the
//! window and drives the simulation and renderer from `requestAnimationFrame`.
//! When the component unmounts, the controller is dropped and every listener,
//! frame request, and pending timer goes with it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::JsCast;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, PointerEvent, TouchEvent,
	Window,
};

use super::config::FieldConfig;
use super::render;
use super::state::FieldState;
use super::theme::FieldTheme;
use crate::dom::{AnimationLoop, EventListener, Timeout};

/// Viewport size in CSS pixels.
fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Size the backing store for the device pixel ratio and scale the context
/// so drawing code can work in CSS pixels.
fn size_canvas(
	window: &Window,
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	let dpr = window.device_pixel_ratio().max(1.0);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{width}px"));
	let _ = style.set_property("height", &format!("{height}px"));
	canvas.set_width((width * dpr).round() as u32);
	canvas.set_height((height * dpr).round() as u32);
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

/// Owns a running field: its state, canvas context, listeners, and frame loop.
///
/// Dropping the controller stops everything.
struct FieldController {
	state: Rc<RefCell<FieldState>>,
	pending_reinit: Rc<RefCell<Option<Timeout>>>,
	listeners: Vec<EventListener>,
	animation: Option<AnimationLoop>,
}

impl FieldController {
	/// Start a field on `canvas`. Returns `None` (and draws nothing) if the
	/// window or a 2D context is unavailable.
	fn mount(
		canvas: HtmlCanvasElement,
		config: FieldConfig,
		theme: FieldTheme,
		scroll_fraction: Signal<f64>,
		compact: Signal<bool>,
	) -> Option<Self> {
		let Some(window) = web_sys::window() else {
			warn!("particle-field: no window, field disabled");
			return None;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("particle-field: 2d canvas context unavailable, field disabled");
			return None;
		};
		let (width, height) = viewport_size(&window)?;
		size_canvas(&window, &canvas, &ctx, width, height);

		let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
		let reinit_delay = config.reinit_delay_ms;
		let state = Rc::new(RefCell::new(FieldState::new(
			config,
			theme.palette.clone(),
			width,
			height,
			compact.get_untracked(),
			seed,
		)));
		info!(
			"particle-field: {} particles for {}x{}",
			state.borrow().store.len(),
			width,
			height
		);

		let pending_reinit: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
		let mut listeners = Vec::new();

		let state_pm = state.clone();
		listeners.extend(EventListener::new(&window, "pointermove", move |ev: PointerEvent| {
			state_pm
				.borrow_mut()
				.pointer_moved(ev.client_x() as f64, ev.client_y() as f64);
		}));

		let state_tm = state.clone();
		listeners.extend(EventListener::new(&window, "touchmove", move |ev: TouchEvent| {
			if let Some(touch) = ev.touches().get(0) {
				state_tm
					.borrow_mut()
					.pointer_moved(touch.client_x() as f64, touch.client_y() as f64);
			}
		}));

		if let Some(root) = window.document().and_then(|doc| doc.document_element()) {
			let state_pl = state.clone();
			listeners.extend(EventListener::new(&root, "pointerleave", move |_: Event| {
				state_pl.borrow_mut().pointer_left();
			}));
		}

		let state_click = state.clone();
		listeners.extend(EventListener::new(&window, "click", move |ev: MouseEvent| {
			state_click
				.borrow_mut()
				.clicked(ev.client_x() as f64, ev.client_y() as f64);
		}));

		let (state_rs, canvas_rs, ctx_rs, pending_rs) = (
			state.clone(),
			canvas.clone(),
			ctx.clone(),
			pending_reinit.clone(),
		);
		listeners.extend(EventListener::new(&window, "resize", move |_: Event| {
			let Some(win) = web_sys::window() else {
				return;
			};
			let Some((nw, nh)) = viewport_size(&win) else {
				return;
			};
			size_canvas(&win, &canvas_rs, &ctx_rs, nw, nh);
			state_rs.borrow_mut().resize(nw, nh);

			// Re-seed once resizing settles; a newer resize replaces (and clears)
			// the pending one.
			let state_reinit = state_rs.clone();
			*pending_rs.borrow_mut() = Timeout::new(reinit_delay, move || {
				state_reinit
					.borrow_mut()
					.reinitialize(compact.get_untracked());
			});
		}));

		let state_anim = state.clone();
		let animation = AnimationLoop::start(move |timestamp| {
			let mut st = state_anim.borrow_mut();
			st.set_viewport(scroll_fraction.get_untracked(), compact.get_untracked());
			st.frame(timestamp);
			if let Err(e) = render::render(&st, &ctx, &theme) {
				warn!("particle-field: frame failed to render: {:?}", e);
			}
		});
		if animation.is_none() {
			warn!("particle-field: requestAnimationFrame unavailable, field is static");
		}

		Some(Self {
			state,
			pending_reinit,
			listeners,
			animation,
		})
	}
}

impl Drop for FieldController {
	fn drop(&mut self) {
		if let Some(animation) = self.animation.take() {
			animation.stop();
		}
		self.pending_reinit.borrow_mut().take();
		self.listeners.clear();
		info!(
			"particle-field: torn down ({} particles)",
			self.state.borrow().store.len()
		);
	}
}

/// Renders the animated particle field as a fixed background canvas.
///
/// `scroll_fraction` (0..1) drives horizontal parallax and `compact` selects
/// the sparser mobile density. Both are read every frame, so the caller can
/// update them freely.
#[component]
pub fn ParticleFieldCanvas(
	#[prop(into)] scroll_fraction: Signal<f64>,
	#[prop(into)] compact: Signal<bool>,
	#[prop(default = FieldConfig::default())] config: FieldConfig,
	#[prop(default = FieldTheme::default())] theme: FieldTheme,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let controller: Rc<RefCell<Option<FieldController>>> = Rc::new(RefCell::new(None));
	let controller_init = controller.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if controller_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		*controller_init.borrow_mut() = FieldController::mount(
			canvas,
			config.clone(),
			theme.clone(),
			scroll_fraction,
			compact,
		);
	});

	let controller_cleanup = SendWrapper::new(controller);
	on_cleanup(move || {
		controller_cleanup.borrow_mut().take();
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			aria-hidden="true"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: -1;"
		/>
	}
}
