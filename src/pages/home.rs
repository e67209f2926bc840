use leptos::prelude::*;

use crate::api;
use crate::components::dashboard::Dashboard;
use crate::components::mindmap::session::{self, MapTitle};
use crate::components::mindmap::{EditorContext, MapDoc, MindmapEditor};
use crate::components::notifications::{NotificationArea, provide_notifier};
use crate::components::theme::{ThemeToggle, provide_theme};

/// Zoom button step; a couple of wheel notches per click.
const BUTTON_ZOOM_STEPS: f64 = 2.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AppView {
	Dashboard,
	Editor,
}

/// Default Home Page: the dashboard of saved maps, swapping to the editor
/// when a map is opened or created.
#[component]
pub fn Home() -> impl IntoView {
	let notifier = provide_notifier();
	provide_theme();
	let cx = EditorContext::new();
	provide_context(cx);

	let view_state = RwSignal::new(AppView::Dashboard);

	let open_map = Callback::new(move |doc: Option<MapDoc>| {
		match doc {
			Some(doc) => session::load_map(&cx, &doc),
			None => session::new_map(&cx),
		}
		view_state.set(AppView::Editor);
	});

	let back_to_maps = move |_| view_state.set(AppView::Dashboard);
	let on_add_node = move |_| cx.add_node_at_view_center();
	let on_save = move |_| session::save_map(&cx, notifier);
	let zoom_by = move |steps: f64| {
		cx.viewport.update(|v| {
			let (x, y) = (v.view_width / 2.0, v.view_height / 2.0);
			v.zoom_at(x, y, steps);
		});
	};
	let on_reset_zoom = move |_| cx.viewport.update(|v| v.reset());
	let on_logout = move |_| api::logout();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="app-shell">
				{move || match view_state.get() {
					AppView::Dashboard => {
						view! {
							<header class="toolbar">
								<h1 class="app-name">"Mind Maps"</h1>
								<div class="toolbar-spacer"></div>
								<ThemeToggle />
								<button class="toolbar-btn" title="Log out" on:click=on_logout>
									"Logout"
								</button>
							</header>
							<Dashboard on_open=open_map />
						}
							.into_any()
					}
					AppView::Editor => {
						view! {
							<header class="toolbar">
								<button class="toolbar-btn" title="Back to your maps" on:click=back_to_maps>
									"← My Maps"
								</button>
								<MapTitle />
								<div class="toolbar-spacer"></div>
								<button class="toolbar-btn" title="Add node" on:click=on_add_node>
									"+ Node"
								</button>
								<button class="toolbar-btn" title="Save map" on:click=on_save>
									"Save"
								</button>
								<div class="zoom-controls">
									<button class="toolbar-btn" title="Zoom out" on:click=move |_| zoom_by(-BUTTON_ZOOM_STEPS)>
										"−"
									</button>
									<button class="toolbar-btn zoom-reset" title="Reset view" on:click=on_reset_zoom>
										{move || format!("{}%", cx.viewport.with(|v| v.zoom_percent()))}
									</button>
									<button class="toolbar-btn" title="Zoom in" on:click=move |_| zoom_by(BUTTON_ZOOM_STEPS)>
										"+"
									</button>
								</div>
								<ThemeToggle />
								<button class="toolbar-btn" title="Log out" on:click=on_logout>
									"Logout"
								</button>
							</header>
							<MindmapEditor />
						}
							.into_any()
					}
				}}
				<NotificationArea />
			</div>
		</ErrorBoundary>
	}
}
