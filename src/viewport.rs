//! Page-level viewport inputs for the particle field.
//!
//! Tracks two values as signals: how far the page has scrolled (0..1) and
//! whether the compact layout media query matches. On desktop the page scrolls
//! horizontally inside a scroller element; on compact layouts the document
//! scrolls vertically.

use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use send_wrapper::SendWrapper;
use web_sys::{Event, MediaQueryList, Window};

use crate::components::particle_field::parallax::scroll_fraction;
use crate::dom::EventListener;

/// Reactive viewport inputs.
#[derive(Clone, Copy, Debug)]
pub struct ViewportSignals {
	/// Scroll progress in `[0, 1]`; 0.5 until first measured.
	pub scroll_fraction: Signal<f64>,
	/// Whether the compact layout query matches.
	pub compact: Signal<bool>,
}

/// Current scroll progress, or `None` if the scrolling element is missing.
fn measure_scroll(window: &Window, scroller_id: &str, compact: bool) -> Option<f64> {
	let document = window.document()?;
	if compact {
		let root = document.document_element()?;
		let viewport_height = window.inner_height().ok()?.as_f64()?;
		let range = root.scroll_height() as f64 - viewport_height;
		Some(scroll_fraction(window.scroll_y().ok()?, range))
	} else {
		let scroller = document.get_element_by_id(scroller_id)?;
		let range = (scroller.scroll_width() - scroller.client_width()) as f64;
		Some(scroll_fraction(scroller.scroll_left() as f64, range))
	}
}

/// Start tracking scroll progress and the compact layout query.
///
/// Listeners are removed when the calling owner is cleaned up.
pub fn track_viewport(compact_query: &str, scroller_id: &'static str) -> ViewportSignals {
	let (scroll, set_scroll) = signal(0.5);
	let (compact, set_compact) = signal(false);
	let signals = ViewportSignals {
		scroll_fraction: scroll.into(),
		compact: compact.into(),
	};

	let Some(window) = web_sys::window() else {
		warn!("particle-field: no window, viewport tracking disabled");
		return signals;
	};
	let media = window.match_media(compact_query).ok().flatten();
	if media.is_none() {
		warn!(
			"particle-field: media query {:?} unsupported, assuming desktop layout",
			compact_query
		);
	}

	let update = {
		let (window, media) = (window.clone(), media.clone());
		Rc::new(move || {
			let is_compact = media.as_ref().is_some_and(MediaQueryList::matches);
			set_compact.set(is_compact);
			if let Some(fraction) = measure_scroll(&window, scroller_id, is_compact) {
				set_scroll.set(fraction);
			}
		})
	};
	update();

	let mut listeners = Vec::new();
	for event in ["scroll", "resize"] {
		let update = update.clone();
		listeners.extend(EventListener::new(&window, event, move |_: Event| update()));
	}
	if let Some(scroller) = window
		.document()
		.and_then(|doc| doc.get_element_by_id(scroller_id))
	{
		let update = update.clone();
		listeners.extend(EventListener::new(&scroller, "scroll", move |_: Event| update()));
	}
	if let Some(media) = &media {
		let update = update.clone();
		listeners.extend(EventListener::new(media, "change", move |_: Event| update()));
	}

	let listeners = SendWrapper::new(listeners);
	on_cleanup(move || drop(listeners));

	signals
}
