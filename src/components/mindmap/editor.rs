//! Inline topic editing: the contenteditable lifecycle, the floating
//! formatting toolbar and the per-topic context menu.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement, KeyboardEvent, MouseEvent};

use crate::components::notifications::Notifier;

use super::markup::Markup;
use super::model::{TextCommit, TopicId};
use super::session::EditorContext;

/// Vertical gap between a node's top edge and the toolbar.
const TOOLBAR_OFFSET: f64 = 45.0;

/// An active context-menu invocation (screen position of the double click).
#[derive(Clone, Debug, PartialEq)]
pub struct TopicMenu {
	pub topic: TopicId,
	pub x: f64,
	pub y: f64,
}

fn document() -> web_sys::Document {
	web_sys::window().unwrap().document().unwrap()
}

fn topic_element(id: &str) -> Option<HtmlElement> {
	document().get_element_by_id(id)?.dyn_into().ok()
}

/// Editing commands hang off `HtmlDocument`, not the plain `Document`.
fn exec_command(command: &str) {
	if let Ok(document) = document().dyn_into::<HtmlDocument>() {
		let _ = document.exec_command(command);
	}
}

/// Focuses a freshly-editable topic span and selects all of its content, so
/// typing replaces the placeholder text.
pub fn focus_and_select(dom_id: &str) {
	if let Some(element) = topic_element(dom_id) {
		let _ = element.focus();
		exec_command("selectAll");
	}
}

/// Keyboard behavior inside the editable span: Enter (without shift)
/// commits by blurring, Ctrl/Cmd+B toggles bold.
pub fn topic_keydown(ev: KeyboardEvent) {
	if ev.key() == "Enter" && !ev.shift_key() {
		ev.prevent_default();
		if let Some(target) = ev.target() {
			if let Some(element) = target.dyn_ref::<HtmlElement>() {
				let _ = element.blur();
			}
		}
	}
	if (ev.ctrl_key() || ev.meta_key()) && ev.key() == "b" {
		ev.prevent_default();
		exec_command("bold");
	}
}

/// Commits the edited markup back into the model when edit mode ends.
///
/// The contenteditable HTML goes through [`Markup::parse_html`], so only the
/// supported inline styles survive. An empty result cascades per the model
/// rules; a removed node gets the same success toast as an explicit delete.
pub fn commit_topic(cx: &EditorContext, notifier: &Notifier, id: TopicId) {
	if cx.editing.get_untracked() != Some(id) {
		return;
	}
	cx.editing.set(None);
	let Some(element) = topic_element(&id.dom_id()) else {
		return;
	};
	let text = Markup::parse_html(&element.inner_html());
	let mut outcome = TextCommit::Kept;
	cx.map.update(|map| {
		outcome = map.commit_topic_text(id, text);
	});
	if outcome == TextCommit::NodeRemoved {
		notifier.success("Item deleted successfully");
	}
	cx.prune_overlays();
}

/// Floating bold/italic toolbar shown above the node that owns the topic
/// being edited. Pointer-down is swallowed so clicking a button does not
/// blur the editable span before the command runs.
#[component]
pub fn FormatToolbar() -> impl IntoView {
	let cx = expect_context::<EditorContext>();

	let position = Memo::new(move |_| {
		// Tracks the layout revision so zooming under an open editor keeps
		// the toolbar attached to its node.
		cx.geometry.track();
		let topic = cx.editing.get()?;
		let node_id = cx.map.with(|map| Some(map.node_of_topic(topic)?.id.clone()))?;
		let element = document().get_element_by_id(&node_id)?;
		let rect = element.get_bounding_client_rect();
		Some((rect.left(), rect.top() - TOOLBAR_OFFSET))
	});

	let exec = |command: &'static str| {
		move |_: MouseEvent| {
			exec_command(command);
		}
	};

	view! {
		<div
			class="format-toolbar"
			class:hidden=move || position.get().is_none()
			style:left=move || position.get().map(|(x, _)| format!("{x}px"))
			style:top=move || position.get().map(|(_, y)| format!("{y}px"))
			on:mousedown=move |ev: MouseEvent| ev.prevent_default()
		>
			<button class="format-btn format-btn-bold" title="Bold (Ctrl+B)" on:click=exec("bold")>
				"B"
			</button>
			<button class="format-btn format-btn-italic" title="Italic" on:click=exec("italic")>
				"I"
			</button>
		</div>
	}
}

/// Small action menu opened by double-clicking a topic. Only the links
/// action is implemented; the rest surface a notification and close.
#[component]
pub fn TopicContextMenu() -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let notifier = expect_context::<Notifier>();

	let open_links = move |ev: MouseEvent| {
		ev.stop_propagation();
		if let Some(menu) = cx.topic_menu.get_untracked() {
			cx.link_modal.set(Some(menu.topic));
		}
		cx.topic_menu.set(None);
	};

	let unimplemented = move |label: &'static str| {
		move |ev: MouseEvent| {
			ev.stop_propagation();
			notifier.error(format!("\"{label}\" is not implemented yet."));
			cx.topic_menu.set(None);
		}
	};

	view! {
		<div
			class="topic-context-menu"
			class:show=move || cx.topic_menu.get().is_some()
			style:left=move || cx.topic_menu.get().map(|m| format!("{}px", m.x))
			style:top=move || cx.topic_menu.get().map(|m| format!("{}px", m.y))
		>
			<button class="context-menu-btn" on:click=open_links>
				"Links"
			</button>
			<button class="context-menu-btn" on:click=unimplemented("Duplicate")>
				"Duplicate"
			</button>
			<button class="context-menu-btn" on:click=unimplemented("Style")>
				"Style"
			</button>
		</div>
	}
}
