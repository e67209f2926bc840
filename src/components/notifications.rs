//! Non-blocking toast notifications.
//!
//! Success toasts auto-dismiss after a few seconds; error toasts stay until
//! dismissed. Components reach the [`Notifier`] through context.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

const SUCCESS_DISMISS_MS: i32 = 4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyKind {
	Success,
	Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
	id: u64,
	kind: NotifyKind,
	message: String,
}

/// Handle for pushing notifications from anywhere in the app.
#[derive(Clone, Copy)]
pub struct Notifier {
	items: RwSignal<Vec<Notification>>,
	next_id: RwSignal<u64>,
}

impl Notifier {
	pub fn success(&self, message: impl Into<String>) {
		self.push(NotifyKind::Success, message.into());
	}

	pub fn error(&self, message: impl Into<String>) {
		let message = message.into();
		log::error!("{message}");
		self.push(NotifyKind::Error, message);
	}

	fn push(&self, kind: NotifyKind, message: String) {
		let id = self.next_id.get_untracked();
		self.next_id.set(id + 1);
		self.items.update(|items| {
			items.push(Notification { id, kind, message });
		});

		if kind == NotifyKind::Success {
			let items = self.items;
			let dismiss = Closure::once(move || {
				items.update(|list| list.retain(|n| n.id != id));
			});
			let _ = web_sys::window()
				.unwrap()
				.set_timeout_with_callback_and_timeout_and_arguments_0(
					dismiss.as_ref().unchecked_ref(),
					SUCCESS_DISMISS_MS,
				);
			dismiss.forget();
		}
	}

	fn dismiss(&self, id: u64) {
		self.items.update(|list| list.retain(|n| n.id != id));
	}
}

/// Creates the notifier, provides it as context and returns it.
pub fn provide_notifier() -> Notifier {
	let notifier = Notifier {
		items: RwSignal::new(Vec::new()),
		next_id: RwSignal::new(0),
	};
	provide_context(notifier);
	notifier
}

/// Fixed-position toast container; mount once near the app root.
#[component]
pub fn NotificationArea() -> impl IntoView {
	let notifier = expect_context::<Notifier>();

	view! {
		<div class="notification-container">
			<For
				each=move || notifier.items.get()
				key=|n| n.id
				children=move |n: Notification| {
					let id = n.id;
					let kind_class = match n.kind {
						NotifyKind::Success => "notification notification--success",
						NotifyKind::Error => "notification notification--error",
					};
					view! {
						<div class=kind_class>
							<span class="notification__icon">
								{if n.kind == NotifyKind::Success { "✓" } else { "!" }}
							</span>
							<p class="notification__message">{n.message.clone()}</p>
							<button
								class="notification__close"
								on:click=move |_| notifier.dismiss(id)
							>
								"×"
							</button>
						</div>
					}
				}
			/>
		</div>
	}
}
