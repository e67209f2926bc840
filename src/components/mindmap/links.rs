//! Link modal: attach, review and remove external links on a topic.
//!
//! Edits happen on a working copy and are written back to the model when the
//! modal closes, so cancelling half-typed input never corrupts the topic.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

use crate::components::notifications::Notifier;

use super::model::{Link, MAX_LINKS_PER_TOPIC};
use super::session::EditorContext;

/// Removes the row at `index`. The rendered rows lag the working vec for a
/// frame after a removal, so a stale index is ignored rather than trusted.
fn remove_link_at(links: &mut Vec<Link>, index: usize) {
	if index < links.len() {
		links.remove(index);
	}
}

#[component]
pub fn LinkModal() -> impl IntoView {
	let cx = expect_context::<EditorContext>();
	let notifier = expect_context::<Notifier>();

	let working = RwSignal::new(Vec::<Link>::new());
	let title_ref = NodeRef::<leptos::html::Input>::new();
	let url_ref = NodeRef::<leptos::html::Input>::new();

	// Populate the working copy each time a topic's modal opens.
	Effect::new(move |_| {
		let Some(topic) = cx.link_modal.get() else {
			return;
		};
		let links = cx
			.map
			.with_untracked(|map| map.topic(topic).map(|t| t.links.clone()))
			.unwrap_or_default();
		working.set(links);
	});

	let close = move || {
		let Some(topic) = cx.link_modal.get_untracked() else {
			return;
		};
		cx.map.update(|map| {
			map.set_topic_links(topic, working.get_untracked());
		});
		cx.link_modal.set(None);
	};

	// Escape closes (and commits) the modal while it is open. The closure
	// lives in a thread-local slot so teardown only captures the handle.
	let escape_handler = StoredValue::new_local(None::<Closure<dyn FnMut(web_sys::KeyboardEvent)>>);
	Effect::new(move |_| {
		let cb: Closure<dyn FnMut(web_sys::KeyboardEvent)> =
			Closure::new(move |ev: web_sys::KeyboardEvent| {
				if ev.key() == "Escape" && cx.link_modal.get_untracked().is_some() {
					close();
				}
			});
		if let Some(document) = web_sys::window().and_then(|w| w.document()) {
			let _ = document.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}
		escape_handler.set_value(Some(cb));
	});
	on_cleanup(move || {
		escape_handler.update_value(|slot| {
			if let (Some(document), Some(cb)) =
				(web_sys::window().and_then(|w| w.document()), slot.take())
			{
				let _ = document
					.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
			}
		});
	});

	let at_cap = Memo::new(move |_| working.with(|w| w.len() >= MAX_LINKS_PER_TOPIC));
	let remaining = Memo::new(move |_| {
		working.with(|w| MAX_LINKS_PER_TOPIC.saturating_sub(w.len()))
	});

	let on_add = move |_: MouseEvent| {
		let (Some(title_input), Some(url_input)) =
			(title_ref.get_untracked(), url_ref.get_untracked())
		else {
			return;
		};
		let title = title_input.value().trim().to_string();
		let url = url_input.value().trim().to_string();
		if title.is_empty() || url.is_empty() {
			notifier.error("Please provide both a title and a URL.");
			return;
		}
		if at_cap.get_untracked() {
			notifier.error(format!(
				"You have reached the limit of {MAX_LINKS_PER_TOPIC} links per topic."
			));
			return;
		}
		working.update(|w| w.push(Link { title, url }));
		title_input.set_value("");
		url_input.set_value("");
		let _ = title_input.focus();
	};

	let on_backdrop = move |ev: MouseEvent| {
		// Only a click on the backdrop itself closes; clicks inside the
		// dialog bubble up with a different target.
		if ev.target() == ev.current_target() {
			close();
		}
	};

	let heading = move || {
		cx.link_modal
			.get()
			.and_then(|topic| cx.map.with(|map| map.topic(topic).map(|t| t.text.plain_text())))
			.unwrap_or_default()
	};

	let rows = move || working.get().into_iter().enumerate().collect::<Vec<_>>();

	view! {
		<div
			class="link-modal-overlay"
			class:hidden=move || cx.link_modal.get().is_none()
			on:click=on_backdrop
		>
			<div class="link-modal">
				<div class="link-modal-header">
					<h3>"Links for: " {heading}</h3>
					<button class="link-modal-close" on:click=move |_| close()>
						"×"
					</button>
				</div>
				<ul class="link-list">
					<For
						each=rows
						key=|(i, link)| (*i, link.url.clone())
						children=move |(index, link): (usize, Link)| {
							view! {
								<li class="link-item">
									<a href=link.url.clone() target="_blank" rel="noopener noreferrer">
										{link.title.clone()}
									</a>
									<button
										class="remove-link-btn"
										title="Remove link"
										on:click=move |_| working.update(|w| remove_link_at(w, index))
									>
										"×"
									</button>
								</li>
							}
						}
					/>
				</ul>
				<p class="link-list-empty" class:hidden=move || !working.with(|w| w.is_empty())>
					"No links yet."
				</p>
				<div class="link-add-form" class:hidden=at_cap>
					<input type="text" class="link-title-input" placeholder="Link title" node_ref=title_ref />
					<input type="url" class="link-url-input" placeholder="https://…" node_ref=url_ref />
					<button class="add-link-btn" on:click=on_add>
						"Add link"
					</button>
					<p class="link-remaining">
						{move || format!("You can add {} more link(s).", remaining.get())}
					</p>
				</div>
				<p class="link-limit-note" class:hidden=move || !at_cap.get()>
					{format!("This topic has the maximum of {MAX_LINKS_PER_TOPIC} links.")}
				</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn link(n: usize) -> Link {
		Link {
			title: format!("link {n}"),
			url: format!("https://example.com/{n}"),
		}
	}

	#[test]
	fn removal_by_index() {
		let mut links = vec![link(0), link(1), link(2)];
		remove_link_at(&mut links, 1);
		assert_eq!(links.len(), 2);
		assert_eq!(links[1].url, "https://example.com/2");
	}

	#[test]
	fn stale_index_is_ignored() {
		let mut links = vec![link(0), link(1)];
		remove_link_at(&mut links, 1);
		// A second click on the now-gone row must not panic.
		remove_link_at(&mut links, 1);
		assert_eq!(links.len(), 1);
		remove_link_at(&mut links, 0);
		remove_link_at(&mut links, 0);
		assert!(links.is_empty());
	}
}
