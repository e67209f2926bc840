//! Saved-map dashboard: lists the user's maps, opens one into the editor,
//! creates new maps and deletes stored ones.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsValue;

use crate::api;
use crate::components::mindmap::MapDoc;
use crate::components::notifications::Notifier;

/// Human-readable date from the backend's ISO `createdAt` timestamp.
fn format_created(iso: Option<&str>) -> String {
	let Some(iso) = iso.filter(|s| !s.is_empty()) else {
		return String::new();
	};
	let date = js_sys::Date::new(&JsValue::from_str(iso));
	if date.get_time().is_nan() {
		return iso.to_string();
	}
	String::from(date.to_locale_date_string("en-US", &JsValue::UNDEFINED))
}

/// Dashboard view. `on_open` receives `Some(doc)` for a stored map and
/// `None` for "create new".
#[component]
pub fn Dashboard(on_open: Callback<Option<MapDoc>>) -> impl IntoView {
	let notifier = expect_context::<Notifier>();

	let maps = RwSignal::new(Vec::<MapDoc>::new());
	let loading = RwSignal::new(true);
	let failed = RwSignal::new(false);

	let refresh = move || {
		loading.set(true);
		failed.set(false);
		spawn_local(async move {
			match api::list_maps().await {
				Ok(docs) => {
					log::debug!("dashboard listed {} maps", docs.len());
					maps.set(docs);
				}
				Err(api::ApiError::Unauthorized) => return,
				Err(err) => {
					failed.set(true);
					notifier.error(err.to_string());
				}
			}
			loading.set(false);
		});
	};

	Effect::new(move |_| refresh());

	let on_delete = move |id: String, title: String| {
		let confirmed = web_sys::window()
			.unwrap()
			.confirm_with_message(&format!("Delete \"{title}\"?"))
			.unwrap_or(false);
		if !confirmed {
			return;
		}
		spawn_local(async move {
			match api::delete_map(&id).await {
				Ok(reply) => {
					notifier.success(reply.msg);
					refresh();
				}
				Err(api::ApiError::Unauthorized) => {}
				Err(err) => notifier.error(err.to_string()),
			}
		});
	};

	view! {
		<div class="dashboard">
			<div class="dashboard-header">
				<h2>"My Mind Maps"</h2>
			</div>
			<p class="dashboard-status" class:hidden=move || !loading.get()>
				"Loading your maps…"
			</p>
			<p class="dashboard-status dashboard-status--error" class:hidden=move || !failed.get()>
				"Could not load your maps."
			</p>
			<div class="dashboard-grid" class:hidden=loading>
				<div class="map-card map-card--new" on:click=move |_| on_open.run(None)>
					<span class="map-card-plus">"+"</span>
					<span class="map-card-title">"Create new map"</span>
				</div>
				<For
					each=move || maps.get()
					key=|doc| doc.id.clone()
					children=move |doc: MapDoc| {
						let open_doc = doc.clone();
						let delete_id = doc.id.clone();
						let delete_title = doc.title.clone();
						view! {
							<div class="map-card" on:click=move |_| on_open.run(Some(open_doc.clone()))>
								<span class="map-card-title">{doc.title.clone()}</span>
								<span class="map-card-meta">
									{format!("{} nodes", doc.nodes.len())}
								</span>
								<span class="map-card-date">{format_created(doc.created_at.as_deref())}</span>
								<button
									class="map-card-delete"
									title="Delete map"
									on:click=move |ev: web_sys::MouseEvent| {
										ev.stop_propagation();
										on_delete(delete_id.clone(), delete_title.clone());
									}
								>
									"×"
								</button>
							</div>
						}
					}
				/>
			</div>
		</div>
	}
}
