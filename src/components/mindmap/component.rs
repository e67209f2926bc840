//! The editor surface: a pannable/zoomable container hosting the virtual
//! canvas, its nodes, the connection layer and the editing overlays.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent, WheelEvent};

use super::connections::ConnectionLayer;
use super::editor::{FormatToolbar, TopicContextMenu};
use super::links::LinkModal;
use super::model::{MIN_NODE_HEIGHT, MIN_NODE_WIDTH};
use super::node::NodeBox;
use super::session::EditorContext;

/// The pointer gesture in progress. All coordinates are screen pixels;
/// handlers divide by the current scale where the model is updated.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	DragNode {
		id: String,
		last_x: f64,
		last_y: f64,
		/// Set once the cursor actually traveled; a press-and-release
		/// without movement must not count as a drag.
		moved: bool,
	},
	ResizeNode {
		id: String,
		start_x: f64,
		start_y: f64,
		start_left: f64,
		start_top: f64,
		start_width: f64,
		start_height: f64,
		last_x: f64,
		last_y: f64,
	},
	Pan {
		last_x: f64,
		last_y: f64,
	},
}

/// True when the event landed on empty canvas rather than a node or one of
/// the floating overlays.
fn hit_background(ev: &MouseEvent) -> bool {
	let Some(target) = ev.target() else {
		return false;
	};
	let Some(element) = target.dyn_ref::<Element>() else {
		return false;
	};
	element
		.closest(".mindmap-node, .format-toolbar, .link-modal-overlay, .topic-context-menu")
		.ok()
		.flatten()
		.is_none()
}

/// Applies one frame of a pending resize: the top-left handle moves both the
/// size and the offset so the opposite corner stays fixed, each axis
/// independently clamped to the minimum box size.
fn apply_resize(cx: &EditorContext) {
	let Gesture::ResizeNode {
		id,
		start_x,
		start_y,
		start_left,
		start_top,
		start_width,
		start_height,
		last_x,
		last_y,
	} = cx.gesture.get_untracked()
	else {
		return;
	};
	let scale = cx.viewport.with_untracked(|v| v.scale);
	let dx = (last_x - start_x) / scale;
	let dy = (last_y - start_y) / scale;
	cx.map.update(|map| {
		if let Some(node) = map.node_mut(&id) {
			let new_width = start_width - dx;
			if new_width > MIN_NODE_WIDTH {
				node.width = Some(new_width);
				node.left = start_left + dx;
			}
			let new_height = start_height - dy;
			if new_height > MIN_NODE_HEIGHT {
				node.height = Some(new_height);
				node.top = start_top + dy;
			}
		}
	});
}

/// Window/document listeners and the frame loop owned by a mounted editor.
///
/// Held in a thread-local [`StoredValue`] slot so teardown only needs the
/// `Copy` handle; the JS closures themselves are never sent anywhere.
#[derive(Default)]
struct EditorHooks {
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize: Option<Closure<dyn FnMut()>>,
	keydown: Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>,
	running: Rc<Cell<bool>>,
}

/// The mind-map editor. Expects an [`EditorContext`] in context.
#[component]
pub fn MindmapEditor() -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let hooks = StoredValue::new_local(EditorHooks::default());

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		let window = web_sys::window().unwrap();
		let document = window.document().unwrap();

		cx.viewport.update(|v| {
			v.setup(
				container.client_width() as f64,
				container.client_height() as f64,
			)
		});

		// Re-derive min scale and recenter when the container resizes.
		let container_resize = container.clone();
		let resize: Closure<dyn FnMut()> = Closure::new(move || {
			cx.viewport.update(|v| {
				v.setup(
					container_resize.client_width() as f64,
					container_resize.client_height() as f64,
				)
			});
		});
		let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

		// Escape cancels a pending link and closes the context menu.
		let keydown: Closure<dyn FnMut(web_sys::KeyboardEvent)> =
			Closure::new(move |ev: web_sys::KeyboardEvent| {
				if ev.key() == "Escape" {
					cx.linking.update(|l| l.cancel());
					cx.topic_menu.set(None);
				}
			});
		let _ = document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());

		// Frame loop: rate-limits resize writes to one per frame and bumps
		// the layout revision so connection lines re-measure their boxes.
		let running = Rc::new(Cell::new(true));
		let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let (animate_inner, running_frame) = (animate.clone(), running.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if !running_frame.get() {
				return;
			}
			apply_resize(&cx);
			cx.geometry.update(|g| *g = g.wrapping_add(1));
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		hooks.set_value(EditorHooks {
			animate,
			resize: Some(resize),
			keydown: Some(keydown),
			running,
		});
	});

	on_cleanup(move || {
		hooks.update_value(|hooks| {
			hooks.running.set(false);
			let Some(window) = web_sys::window() else {
				return;
			};
			if let Some(cb) = hooks.resize.take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			if let (Some(cb), Some(document)) = (hooks.keydown.take(), window.document()) {
				let _ = document
					.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
			}
			hooks.animate.borrow_mut().take();
		});
	});

	let on_mousedown = move |ev: MouseEvent| {
		if !hit_background(&ev) {
			return;
		}
		cx.gesture.set(Gesture::Pan {
			last_x: ev.client_x() as f64,
			last_y: ev.client_y() as f64,
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
		match cx.gesture.get_untracked() {
			Gesture::Idle => {}
			Gesture::Pan { last_x, last_y } => {
				ev.prevent_default();
				cx.viewport.update(|v| v.pan_by(x - last_x, y - last_y));
				cx.gesture
					.set(Gesture::Pan { last_x: x, last_y: y });
			}
			Gesture::DragNode {
				id,
				last_x,
				last_y,
				moved,
			} => {
				ev.prevent_default();
				let (dx, dy) = (x - last_x, y - last_y);
				let moved = moved || dx.abs() >= 1.0 || dy.abs() >= 1.0;
				if moved {
					// Deltas are screen pixels; convert to canvas units so
					// the node tracks the cursor at any zoom level.
					let scale = cx.viewport.with_untracked(|v| v.scale);
					cx.map.update(|map| {
						if let Some(node) = map.node_mut(&id) {
							node.left += dx / scale;
							node.top += dy / scale;
						}
					});
				}
				cx.gesture.set(Gesture::DragNode {
					id,
					last_x: x,
					last_y: y,
					moved,
				});
			}
			Gesture::ResizeNode {
				id,
				start_x,
				start_y,
				start_left,
				start_top,
				start_width,
				start_height,
				..
			} => {
				ev.prevent_default();
				// Applied once per animation frame by the frame loop.
				cx.gesture.set(Gesture::ResizeNode {
					id,
					start_x,
					start_y,
					start_left,
					start_top,
					start_width,
					start_height,
					last_x: x,
					last_y: y,
				});
			}
		}
	};

	let end_gesture = move |_: MouseEvent| {
		if cx.gesture.get_untracked() != Gesture::Idle {
			cx.gesture.set(Gesture::Idle);
		}
	};

	let on_click = move |ev: MouseEvent| {
		cx.topic_menu.set(None);
		if hit_background(&ev) && cx.linking.with_untracked(|l| l.is_active()) {
			cx.linking.update(|l| l.cancel());
		}
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(container) = container_ref.get_untracked() else {
			return;
		};
		let rect = container.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let steps = if ev.delta_y() > 0.0 { -1.0 } else { 1.0 };
		cx.viewport.update(|v| {
			v.zoom_at(x, y, steps);
		});
	};

	let node_ids = move || {
		cx.map
			.with(|map| map.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>())
	};

	view! {
		<div
			class="mindmap-container"
			class:linking-mode-active=move || cx.linking.with(|l| l.is_active())
			class:panning=move || matches!(cx.gesture.get(), Gesture::Pan { .. })
			node_ref=container_ref
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=end_gesture
			on:mouseleave=end_gesture
			on:click=on_click
			on:wheel=on_wheel
		>
			<div
				id="mindmap-canvas"
				class="mindmap-canvas"
				style:width=move || cx.viewport.with(|v| format!("{}px", v.canvas_size))
				style:height=move || cx.viewport.with(|v| format!("{}px", v.canvas_size))
				style:transform=move || cx.viewport.with(|v| v.transform_css())
			>
				<ConnectionLayer />
				<For each=node_ids key=|id| id.clone() children=move |id: String| {
					view! { <NodeBox id=id /> }
				} />
			</div>
			<FormatToolbar />
			<TopicContextMenu />
			<LinkModal />
		</div>
	}
}
