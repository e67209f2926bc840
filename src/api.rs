//! Authenticated client for the persistence API.
//!
//! Thin wrappers over `window.fetch`: every request carries the stored auth
//! token, and a 401/403 response clears it and sends the user back to the
//! login entry point.

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use crate::components::mindmap::wire::{MapDoc, SaveMapRequest};

/// Base URL of the REST backend.
pub const API_URL: &str = "/api";

const TOKEN_KEY: &str = "token";
const LOGIN_PAGE: &str = "login.html";

#[derive(Debug, Error)]
pub enum ApiError {
	/// 401/403: the token was cleared and a redirect to login started.
	#[error("not authorized, redirecting to login")]
	Unauthorized,
	/// Non-success status with the backend's own message when it sent one.
	#[error("{message}")]
	Api { status: u16, message: String },
	#[error("network error: {0}")]
	Network(String),
	#[error("malformed response: {0}")]
	Decode(String),
}

fn window() -> Window {
	web_sys::window().expect("no window")
}

pub fn stored_token() -> Option<String> {
	window()
		.local_storage()
		.ok()
		.flatten()
		.and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
}

pub fn clear_token() {
	if let Ok(Some(storage)) = window().local_storage() {
		let _ = storage.remove_item(TOKEN_KEY);
	}
}

pub fn redirect_to_login() {
	let _ = window().location().set_href(LOGIN_PAGE);
}

/// Explicit logout: same path as an expired token.
pub fn logout() {
	clear_token();
	redirect_to_login();
}

fn js_err(err: JsValue) -> ApiError {
	ApiError::Network(format!("{err:?}"))
}

async fn fetch_with_auth(
	method: &str,
	path: &str,
	body: Option<String>,
) -> Result<Response, ApiError> {
	let headers = Headers::new().map_err(js_err)?;
	headers
		.set("Content-Type", "application/json")
		.map_err(js_err)?;
	if let Some(token) = stored_token() {
		headers.set("x-auth-token", &token).map_err(js_err)?;
	}

	let init = RequestInit::new();
	init.set_method(method);
	init.set_headers(headers.as_ref());
	if let Some(body) = body {
		init.set_body(&JsValue::from_str(&body));
	}

	let url = format!("{API_URL}{path}");
	let request = Request::new_with_str_and_init(&url, &init).map_err(js_err)?;
	let response = JsFuture::from(window().fetch_with_request(&request))
		.await
		.map_err(js_err)?;
	let response: Response = response.dyn_into().map_err(js_err)?;

	if response.status() == 401 || response.status() == 403 {
		log::warn!("auth rejected ({}), redirecting to login", response.status());
		clear_token();
		redirect_to_login();
		return Err(ApiError::Unauthorized);
	}
	Ok(response)
}

async fn response_text(response: &Response) -> Result<String, ApiError> {
	let text = JsFuture::from(response.text().map_err(js_err)?)
		.await
		.map_err(js_err)?;
	Ok(text.as_string().unwrap_or_default())
}

/// Surfaces the backend's `{ msg }` body verbatim, falling back to a generic
/// message for bodies that are not in that shape.
async fn error_from(response: &Response, fallback: &str) -> ApiError {
	#[derive(Deserialize)]
	struct Body {
		msg: String,
	}
	let status = response.status();
	let message = match response_text(response).await {
		Ok(text) => serde_json::from_str::<Body>(&text)
			.map(|b| b.msg)
			.unwrap_or_else(|_| fallback.to_string()),
		Err(_) => fallback.to_string(),
	};
	ApiError::Api { status, message }
}

async fn decode<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
	let text = response_text(response).await?;
	serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `GET /maps`: the caller's saved maps, newest first.
pub async fn list_maps() -> Result<Vec<MapDoc>, ApiError> {
	let response = fetch_with_auth("GET", "/maps", None).await?;
	if !response.ok() {
		return Err(error_from(&response, "Failed to fetch maps").await);
	}
	decode(&response).await
}

/// `POST /maps`: saves (or updates, when `id` is set) a map and returns the
/// stored document, id included.
pub async fn save_map(request: &SaveMapRequest) -> Result<MapDoc, ApiError> {
	let body = serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;
	let response = fetch_with_auth("POST", "/maps", Some(body)).await?;
	if !response.ok() {
		return Err(error_from(&response, "Failed to save the map").await);
	}
	decode(&response).await
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeleteReply {
	pub msg: String,
}

/// `DELETE /maps/:id`.
pub async fn delete_map(id: &str) -> Result<DeleteReply, ApiError> {
	let response = fetch_with_auth("DELETE", &format!("/maps/{id}"), None).await?;
	if !response.ok() {
		return Err(error_from(&response, "Failed to delete the map").await);
	}
	decode(&response).await
}
