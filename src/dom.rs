//! Owned handles for browser callbacks.
//!
//! Each handle keeps its `Closure` alive and unregisters it on drop, so a
//! component can tear down every listener, frame request, and timer just by
//! dropping what it holds.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

/// An event listener that is removed when dropped.
pub struct EventListener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
	/// Listen for `event` on `target`, handing `handler` the event cast to `E`.
	///
	/// Events of another type are ignored.
	pub fn new<E, F>(target: &EventTarget, event: &'static str, mut handler: F) -> Option<Self>
	where
		E: JsCast + 'static,
		F: FnMut(E) + 'static,
	{
		let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			if let Ok(ev) = ev.dyn_into::<E>() {
				handler(ev);
			}
		});
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for EventListener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// A `requestAnimationFrame` loop that re-arms itself every frame until stopped.
pub struct AnimationLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	request: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
	/// Start calling `on_frame` with the frame timestamp (milliseconds).
	pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
		let request = Rc::new(Cell::new(None));
		let (callback_inner, request_inner) = (callback.clone(), request.clone());

		*callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			on_frame(timestamp);
			let next = match (web_sys::window(), callback_inner.borrow().as_ref()) {
				(Some(win), Some(cb)) => win.request_animation_frame(cb.as_ref().unchecked_ref()).ok(),
				_ => None,
			};
			request_inner.set(next);
		}));

		let first = callback
			.borrow()
			.as_ref()
			.and_then(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()).ok())?;
		request.set(Some(first));

		Some(Self { callback, request })
	}

	/// Cancel the pending frame and release the callback.
	pub fn stop(&self) {
		if let (Some(id), Some(window)) = (self.request.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}

impl Drop for AnimationLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

/// A one-shot `setTimeout` that is cleared if dropped before it fires.
pub struct Timeout {
	id: i32,
	_callback: Closure<dyn FnMut()>,
}

impl Timeout {
	pub fn new(delay_ms: i32, callback: impl FnOnce() + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let callback = Closure::once(callback);
		let id = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				callback.as_ref().unchecked_ref(),
				delay_ms.max(0),
			)
			.ok()?;
		Some(Self {
			id,
			_callback: callback,
		})
	}
}

impl Drop for Timeout {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			window.clear_timeout_with_handle(self.id);
		}
	}
}
