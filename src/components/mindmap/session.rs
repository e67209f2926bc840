//! Map session: owns the current map's identity and title and orchestrates
//! new/load/save against the persistence API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::notifications::Notifier;

use super::component::Gesture;
use super::editor::TopicMenu;
use super::linking::LinkingState;
use super::markup::Markup;
use super::model::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, MindMap, TopicId};
use super::viewport::Viewport;
use super::wire::{self, MapDoc};

pub const DEFAULT_TITLE: &str = "Untitled Mind Map";

/// Identity of the currently open map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
	/// Backend id; `None` until the first save assigns one.
	pub map_id: Option<String>,
	pub title: String,
}

impl Default for Session {
	fn default() -> Self {
		Self {
			map_id: None,
			title: DEFAULT_TITLE.to_string(),
		}
	}
}

/// Every piece of editor state, bundled and passed through context.
///
/// One instance per editor; there is no module-global state, so a full
/// reset on "new map" cannot leave stale references behind.
#[derive(Clone, Copy)]
pub struct EditorContext {
	pub map: RwSignal<MindMap>,
	pub viewport: RwSignal<Viewport>,
	pub linking: RwSignal<LinkingState>,
	pub session: RwSignal<Session>,
	/// Topic currently open for inline editing.
	pub editing: RwSignal<Option<TopicId>>,
	/// Topic whose link modal is open.
	pub link_modal: RwSignal<Option<TopicId>>,
	/// Active context-menu invocation; a new one replaces it.
	pub topic_menu: RwSignal<Option<TopicMenu>>,
	pub gesture: RwSignal<Gesture>,
	/// Layout revision; the connection layer re-measures node boxes when it
	/// changes. Bumped once per animation frame by the editor.
	pub geometry: RwSignal<u64>,
}

impl EditorContext {
	pub fn new() -> Self {
		Self {
			map: RwSignal::new(MindMap::new()),
			viewport: RwSignal::new(Viewport::default()),
			linking: RwSignal::new(LinkingState::Idle),
			session: RwSignal::new(Session::default()),
			editing: RwSignal::new(None),
			link_modal: RwSignal::new(None),
			topic_menu: RwSignal::new(None),
			gesture: RwSignal::new(Gesture::Idle),
			geometry: RwSignal::new(0),
		}
	}

	/// Clears all transient interaction state (not the map itself).
	pub fn clear_interactions(&self) {
		self.linking.set(LinkingState::Idle);
		self.editing.set(None);
		self.link_modal.set(None);
		self.topic_menu.set(None);
		self.gesture.set(Gesture::Idle);
	}

	/// Drops overlay state that points at topics the model no longer has,
	/// e.g. after a node deletion cascaded.
	pub fn prune_overlays(&self) {
		self.map.with_untracked(|map| {
			for signal in [self.editing, self.link_modal] {
				if let Some(id) = signal.get_untracked() {
					if map.topic(id).is_none() {
						signal.set(None);
					}
				}
			}
			if let Some(menu) = self.topic_menu.get_untracked() {
				if map.topic(menu.topic).is_none() {
					self.topic_menu.set(None);
				}
			}
		});
	}

	/// Adds a node centered on the current view center and opens its first
	/// (empty) topic for editing.
	pub fn add_node_at_view_center(&self) {
		let (cx, cy) = self.viewport.with_untracked(|v| v.view_center());
		let left = cx - DEFAULT_NODE_WIDTH / 2.0;
		let top = cy - DEFAULT_NODE_HEIGHT / 2.0;
		let mut topic = None;
		self.map.update(|map| {
			let id = map.add_node(left, top);
			topic = map.add_topic(&id, Markup::default());
		});
		self.editing.set(topic);
	}
}

impl Default for EditorContext {
	fn default() -> Self {
		Self::new()
	}
}

/// Starts a blank session: empty model, reset id counter, default title,
/// recentered view.
pub fn new_map(cx: &EditorContext) {
	cx.map.set(MindMap::new());
	cx.session.set(Session::default());
	cx.clear_interactions();
	cx.viewport.update(|v| v.reset());
	log::debug!("started new map session");
}

/// Replaces the session with a stored document and fits the view.
pub fn load_map(cx: &EditorContext, doc: &MapDoc) {
	cx.clear_interactions();
	cx.map.set(wire::map_from_doc(doc));
	cx.session.set(Session {
		map_id: Some(doc.id.clone()),
		title: doc.title.clone(),
	});
	cx.viewport.update(|v| v.reset());
	log::info!(
		"loaded map {} ({} nodes)",
		doc.id,
		doc.nodes.len()
	);
}

/// Serializes the model and sends it to the persistence API. Non-blocking;
/// overlapping saves are allowed and the last response to arrive wins when
/// adopting the returned map id.
pub fn save_map(cx: &EditorContext, notifier: Notifier) {
	let request = cx.map.with_untracked(|map| {
		let session = cx.session.get_untracked();
		wire::save_request(map, session.map_id, session.title)
	});
	let session = cx.session;
	spawn_local(async move {
		match api::save_map(&request).await {
			Ok(doc) => {
				session.update(|s| s.map_id = Some(doc.id.clone()));
				log::info!("saved map {}", doc.id);
				notifier.success("Map saved successfully");
			}
			Err(api::ApiError::Unauthorized) => {}
			Err(err) => notifier.error(err.to_string()),
		}
	});
}

/// Click-to-edit title field. Enter commits, Escape reverts, an empty
/// result falls back to the default title.
#[component]
pub fn MapTitle() -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let editing = RwSignal::new(false);
	let input_ref = NodeRef::<leptos::html::Input>::new();

	Effect::new(move |_| {
		if editing.get() {
			if let Some(input) = input_ref.get() {
				let _ = input.focus();
				input.select();
			}
		}
	});

	let commit = move || {
		if !editing.get_untracked() {
			return;
		}
		editing.set(false);
		let Some(input) = input_ref.get_untracked() else {
			return;
		};
		let value = input.value().trim().to_string();
		cx.session.update(|s| {
			s.title = if value.is_empty() {
				DEFAULT_TITLE.to_string()
			} else {
				value
			};
		});
	};

	view! {
		<div class="map-title">
			{move || {
				if editing.get() {
					view! {
						<input
							type="text"
							class="map-title-input"
							node_ref=input_ref
							value=cx.session.with_untracked(|s| s.title.clone())
							on:blur=move |_| commit()
							on:keydown=move |ev: web_sys::KeyboardEvent| {
								if ev.key() == "Enter" {
									commit();
								} else if ev.key() == "Escape" {
									// Revert: drop the input without committing.
									editing.set(false);
								}
							}
						/>
					}
						.into_any()
				} else {
					view! {
						<span class="map-title-text" on:click=move |_| editing.set(true)>
							{move || cx.session.with(|s| s.title.clone())}
						</span>
					}
						.into_any()
				}
			}}
		</div>
	}
}
