//! Light/dark theme state, persisted to localStorage and mirrored onto the
//! document body as a `dark-mode` class.

use leptos::prelude::*;

const THEME_KEY: &str = "theme";
const DARK: &str = "dark";
const LIGHT: &str = "light";

#[derive(Clone, Copy)]
pub struct ThemeContext {
	pub dark: RwSignal<bool>,
}

fn stored_theme() -> Option<String> {
	web_sys::window()?.local_storage().ok()??.get_item(THEME_KEY).ok()?
}

/// Creates the theme context (restoring the stored preference), provides it
/// and keeps the body class and localStorage in sync with it.
pub fn provide_theme() -> ThemeContext {
	let dark = RwSignal::new(stored_theme().as_deref() == Some(DARK));
	let theme = ThemeContext { dark };
	provide_context(theme);

	Effect::new(move |_| {
		let dark = dark.get();
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(body) = window.document().and_then(|d| d.body()) {
			let _ = if dark {
				body.class_list().add_1("dark-mode")
			} else {
				body.class_list().remove_1("dark-mode")
			};
		}
		if let Ok(Some(storage)) = window.local_storage() {
			let _ = storage.set_item(THEME_KEY, if dark { DARK } else { LIGHT });
		}
	});

	theme
}

#[component]
pub fn ThemeToggle() -> impl IntoView {
	let theme = expect_context::<ThemeContext>();

	view! {
		<button
			class="theme-toggle"
			title="Toggle dark mode"
			on:click=move |_| theme.dark.update(|d| *d = !*d)
		>
			{move || if theme.dark.get() { "☀" } else { "☾" }}
		</button>
	}
}
