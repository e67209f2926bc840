//! SVG connection layer: one line per connection, endpoints at the measured
//! centers of the two node boxes.
//!
//! Lines re-measure on every layout revision bump rather than subscribing to
//! individual position signals; the `PartialEq` memo keeps the actual DOM
//! writes down to frames where an endpoint really moved.

use leptos::prelude::*;
use web_sys::HtmlElement;
use wasm_bindgen::JsCast;

use crate::components::theme::ThemeContext;

use super::session::EditorContext;

const STROKE_LIGHT: &str = "#D1D5DB";
const STROKE_DARK: &str = "#4B5563";
const STROKE_WIDTH: f64 = 2.0;

/// Center of a node box in canvas coordinates, from offset geometry so the
/// value is independent of the current pan/zoom transform.
fn box_center(node_id: &str) -> Option<(f64, f64)> {
	let element: HtmlElement = web_sys::window()?
		.document()?
		.get_element_by_id(node_id)?
		.dyn_into()
		.ok()?;
	Some((
		element.offset_left() as f64 + element.offset_width() as f64 / 2.0,
		element.offset_top() as f64 + element.offset_height() as f64 / 2.0,
	))
}

#[component]
pub fn ConnectionLayer() -> impl IntoView {
	let cx = expect_context::<EditorContext>();

	let connections = move || {
		cx.map.with(|map| {
			map.connections
				.iter()
				.map(|c| (c.from.clone(), c.to.clone()))
				.collect::<Vec<_>>()
		})
	};

	view! {
		<svg
			id="svg-canvas"
			class="connection-layer"
			width=move || cx.viewport.with(|v| v.canvas_size.to_string())
			height=move || cx.viewport.with(|v| v.canvas_size.to_string())
		>
			<For
				each=connections
				key=|pair| pair.clone()
				children=move |(from, to): (String, String)| {
					view! { <ConnectionLine from=from to=to /> }
				}
			/>
		</svg>
	}
}

#[component]
fn ConnectionLine(from: String, to: String) -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let theme = expect_context::<ThemeContext>();
	let from = StoredValue::new(from);
	let to = StoredValue::new(to);

	// Endpoints are None while either box is not yet in the DOM; the line
	// stays hidden for those frames instead of collapsing to the origin.
	let endpoints = Memo::new(move |_| {
		cx.geometry.track();
		let a = from.with_value(|id| box_center(id))?;
		let b = to.with_value(|id| box_center(id))?;
		Some((a, b))
	});

	let stroke = move || {
		if theme.dark.get() {
			STROKE_DARK
		} else {
			STROKE_LIGHT
		}
	};

	view! {
		<line
			class="connection-line"
			class:hidden=move || endpoints.get().is_none()
			x1=move || endpoints.get().map(|((x, _), _)| x.to_string())
			y1=move || endpoints.get().map(|((_, y), _)| y.to_string())
			x2=move || endpoints.get().map(|(_, (x, _))| x.to_string())
			y2=move || endpoints.get().map(|(_, (y, _))| y.to_string())
			stroke=stroke
			stroke-width=STROKE_WIDTH.to_string()
		/>
	}
}
