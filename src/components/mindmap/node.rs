//! Node renderer: keeps one interactive box in sync with a model node.
//!
//! The model is authoritative; drag and resize write straight into it and
//! the box re-renders from signals, so saving never has to read layout back
//! out of the DOM.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent};

use crate::components::notifications::Notifier;

use super::component::Gesture;
use super::editor;
use super::markup::Markup;
use super::model::{Topic, TopicId};
use super::session::EditorContext;

fn event_element(ev: &MouseEvent) -> Option<Element> {
	ev.target()?.dyn_into::<Element>().ok()
}

/// Drags must not start from editable text, buttons or the resize handle.
fn starts_drag(ev: &MouseEvent) -> bool {
	let Some(element) = event_element(ev) else {
		return false;
	};
	if let Some(html) = element.dyn_ref::<HtmlElement>() {
		if html.is_content_editable() {
			return false;
		}
	}
	if element.closest("button").ok().flatten().is_some() {
		return false;
	}
	!element.class_list().contains("resize-handle")
}

#[component]
pub fn NodeBox(id: String) -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let notifier = expect_context::<Notifier>();
	let id = StoredValue::new(id);

	let node = Memo::new(move |_| cx.map.with(|map| id.with_value(|id| map.node(id).cloned())));

	let dragging = Memo::new(move |_| {
		matches!(
			cx.gesture.get(),
			Gesture::DragNode { id: ref g, moved: true, .. } if id.with_value(|id| g == id)
		)
	});
	let link_source = Memo::new(move |_| {
		cx.linking
			.with(|l| id.with_value(|id| l.source() == Some(id.as_str())))
	});
	// Controls stay hidden until the node has committed content, which keeps
	// them out of the way during the very first topic edit.
	let controls_hidden = Memo::new(move |_| {
		node.with(|n| match n {
			Some(n) => n.topics.iter().all(|t| t.text.is_empty()),
			None => true,
		})
	});

	let on_mousedown = move |ev: MouseEvent| {
		if !starts_drag(&ev) {
			return;
		}
		cx.gesture.set(Gesture::DragNode {
			id: id.get_value(),
			last_x: ev.client_x() as f64,
			last_y: ev.client_y() as f64,
			moved: false,
		});
	};

	let on_click = move |ev: MouseEvent| {
		if !cx.linking.with_untracked(|l| l.is_active()) {
			return;
		}
		ev.stop_propagation();
		let pair = id.with_value(|id| cx.linking.try_update(|l| l.take_target(id)).flatten());
		if let Some((from, to)) = pair {
			// Self links and duplicates are silently ignored by the model.
			cx.map.update(|map| {
				map.add_connection(&from, &to);
			});
		}
	};

	let on_resize_start = move |ev: MouseEvent| {
		ev.prevent_default();
		ev.stop_propagation();
		let Some(element) = id.with_value(|id| {
			web_sys::window()
				.and_then(|w| w.document())
				.and_then(|d| d.get_element_by_id(id))
		}) else {
			return;
		};
		let Ok(element) = element.dyn_into::<HtmlElement>() else {
			return;
		};
		let Some(n) = node.get_untracked() else {
			return;
		};
		// Auto-sized boxes adopt their measured size once resizing starts.
		cx.gesture.set(Gesture::ResizeNode {
			id: id.get_value(),
			start_x: ev.client_x() as f64,
			start_y: ev.client_y() as f64,
			start_left: n.left,
			start_top: n.top,
			start_width: n.width.unwrap_or(element.offset_width() as f64),
			start_height: n.height.unwrap_or(element.offset_height() as f64),
			last_x: ev.client_x() as f64,
			last_y: ev.client_y() as f64,
		});
	};

	let on_delete = move |ev: MouseEvent| {
		ev.stop_propagation();
		let confirmed = web_sys::window()
			.unwrap()
			.confirm_with_message("Are you sure?")
			.unwrap_or(false);
		if !confirmed {
			return;
		}
		id.with_value(|id| {
			cx.map.update(|map| {
				map.remove_node(id);
			});
		});
		cx.prune_overlays();
		notifier.success("Item deleted successfully");
	};

	let on_add_topic = move |ev: MouseEvent| {
		ev.stop_propagation();
		let topic = id.with_value(|id| {
			cx.map
				.try_update(|map| map.add_topic(id, Markup::default()))
				.flatten()
		});
		cx.editing.set(topic);
	};

	let on_begin_link = move |ev: MouseEvent| {
		ev.stop_propagation();
		cx.linking.update(|l| l.begin(id.get_value()));
	};

	let topics = move || {
		cx.map.with(|map| {
			id.with_value(|id| map.node(id).map(|n| n.topics.clone()).unwrap_or_default())
		})
	};

	view! {
		<div
			class="mindmap-node"
			id=id.get_value()
			class:dragging=dragging
			class:link-source=link_source
			style:left=move || node.with(|n| n.as_ref().map(|n| format!("{}px", n.left)))
			style:top=move || node.with(|n| n.as_ref().map(|n| format!("{}px", n.top)))
			style:width=move || node.with(|n| n.as_ref().and_then(|n| n.width).map(|w| format!("{w}px")))
			style:height=move || {
				node.with(|n| n.as_ref().and_then(|n| n.height).map(|h| format!("{h}px")))
			}
			on:mousedown=on_mousedown
			on:click=on_click
		>
			<div class="resize-handle top-left" on:mousedown=on_resize_start></div>
			<button class="delete-node-btn" title="Delete node" on:click=on_delete>
				"×"
			</button>
			<ul class="topic-list">
				<For each=topics key=|t| t.id children=move |topic: Topic| {
					view! { <TopicItem topic_id=topic.id /> }
				} />
			</ul>
			<div class="node-controls" class:hidden=controls_hidden>
				<button class="add-topic-btn node-control-btn" title="Add topic" on:click=on_add_topic>
					"+"
				</button>
				<button class="link-handle node-control-btn" title="Link to another node" on:click=on_begin_link>
					"∞"
				</button>
			</div>
		</div>
	}
}

/// One topic row: the rich-text span, its attachment indicator and the edit
/// control. The span doubles as the contenteditable surface while this topic
/// is in edit mode.
#[component]
fn TopicItem(topic_id: TopicId) -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let notifier = expect_context::<Notifier>();
	let dom_id = topic_id.dom_id();

	let topic = Memo::new(move |_| cx.map.with(|map| map.topic(topic_id).cloned()));
	let editing = Memo::new(move |_| cx.editing.get() == Some(topic_id));
	let has_links = Memo::new(move |_| topic.with(|t| t.as_ref().is_some_and(|t| !t.links.is_empty())));

	// Entering edit mode focuses the span and selects its content.
	{
		let dom_id = dom_id.clone();
		Effect::new(move |_| {
			if editing.get() {
				editor::focus_and_select(&dom_id);
			}
		});
	}

	let on_blur = move |_| editor::commit_topic(&cx, &notifier, topic_id);
	let on_keydown = editor::topic_keydown;

	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		ev.stop_propagation();
		cx.topic_menu.set(Some(editor::TopicMenu {
			topic: topic_id,
			x: ev.page_x() as f64,
			y: ev.page_y() as f64,
		}));
	};

	let on_open_links = move |ev: MouseEvent| {
		ev.stop_propagation();
		cx.link_modal.set(Some(topic_id));
	};

	let on_edit = move |ev: MouseEvent| {
		ev.stop_propagation();
		cx.editing.set(Some(topic_id));
	};

	view! {
		<li class="topic-item">
			<div class="topic-text-container" on:dblclick=on_dblclick>
				<span
					class="topic-text"
					id=dom_id
					contenteditable=move || if editing.get() { "true" } else { "false" }
					inner_html=move || topic.with(|t| t.as_ref().map(|t| t.text.to_html()).unwrap_or_default())
					on:blur=on_blur
					on:keydown=on_keydown
				></span>
				<span class="topic-link-icon" class:hidden=move || !has_links.get() on:click=on_open_links>
					"🔗"
				</span>
			</div>
			<button class="edit-topic-btn" title="Edit topic" on:click=on_edit>
				"✎"
			</button>
		</li>
	}
}
