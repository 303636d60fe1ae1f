use std::cell::RefCell;

use tracing::info;
use wasm_bindgen::prelude::*;

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod likes;
pub mod list;
pub mod logging;
pub mod parse;
pub mod recipe;
pub mod search;
pub mod storage;
pub mod types;

pub use crate::error::{Error, Result};

use crate::api::{ForkifyApi, RecipeApi};
use crate::app::{AppState, LikeToggle, RECIPE_FAILED, SEARCH_FAILED};
use crate::config::Config;
use crate::storage::KeyValueStore;
use crate::types::Direction;

/// The app as the browser runs it
type BrowserApp = AppState<ForkifyApi, Box<dyn KeyValueStore>>;

// One app per page, set up from JS by init_app
thread_local! {
    static APP: RefCell<Option<BrowserApp>> = const { RefCell::new(None) };
}

const NOT_READY: &str = "App not initialized. Call init_app(config_json) first.";

fn with_app<R>(f: impl FnOnce(&mut BrowserApp) -> R) -> std::result::Result<R, JsError> {
    APP.with(|app| match app.borrow_mut().as_mut() {
        Some(app) => Ok(f(app)),
        None => Err(JsError::new(NOT_READY)),
    })
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> std::result::Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Failed to encode: {}", e)))
}

#[cfg(target_arch = "wasm32")]
fn open_storage(_config: &Config) -> Box<dyn KeyValueStore> {
    match storage::LocalStorage::open() {
        Ok(local) => Box::new(local),
        Err(e) => {
            tracing::warn!("Falling back to in-memory likes: {}", e);
            Box::new(storage::MemoryStorage::new())
        }
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
fn open_storage(config: &Config) -> Box<dyn KeyValueStore> {
    info!("Keeping likes in {}", config.storage_file);
    Box::new(storage::FileStorage::open(&config.storage_file))
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "native")))]
fn open_storage(_config: &Config) -> Box<dyn KeyValueStore> {
    Box::new(storage::MemoryStorage::new())
}

/// Blank config means defaults in the browser and the environment natively
fn load_config(config_json: &str) -> Result<Config> {
    if cfg!(not(target_arch = "wasm32")) && config_json.trim().is_empty() {
        return Ok(Config::from_env());
    }
    Config::from_json(config_json)
}

/// Set up the app from a JSON config and restore likes from storage. A blank
/// config means defaults (the `FORKIFY_*` environment in native builds).
#[wasm_bindgen]
pub fn init_app(config_json: &str) -> std::result::Result<(), JsError> {
    let config = load_config(config_json)
        .map_err(|e| JsError::new(&format!("Failed to parse config: {}", e)))?;

    logging::init(&config.log_level);

    let api = ForkifyApi::new(config.api_url.clone());
    let state = AppState::new(api, open_storage(&config), config);

    APP.with(|app| {
        *app.borrow_mut() = Some(state);
    });

    Ok(())
}

#[wasm_bindgen]
pub fn is_app_ready() -> bool {
    APP.with(|app| app.borrow().is_some())
}

/// Run a search. Resolves to false when the query was blank or a newer
/// search replaced this one.
#[wasm_bindgen]
pub async fn submit_search(query: String) -> std::result::Result<bool, JsError> {
    let started = with_app(|app| {
        app.begin_search(&query)
            .map(|pending| (pending, app.api().clone()))
    })?;
    let Some((pending, api)) = started else {
        return Ok(false);
    };

    let start = js_sys::Date::now();
    let result = api.search(pending.query()).await;
    info!(
        "[perf] search query='{}' fetch={:.1}ms",
        pending.query(),
        js_sys::Date::now() - start
    );

    with_app(|app| app.finish_search(pending, result))?.map_err(|_| JsError::new(SEARCH_FAILED))
}

/// One page of the current results as a JSON array
#[wasm_bindgen]
pub fn results_page(page: usize) -> std::result::Result<String, JsError> {
    with_app(|app| to_json(app.results_page(page)))?
}

/// Prev/next navigation for a results page as JSON, `null` without a search
#[wasm_bindgen]
pub fn results_nav(page: usize) -> std::result::Result<String, JsError> {
    with_app(|app| to_json(&app.results_nav(page)))?
}

/// Load a recipe by id (a leading `#` from the URL hash is fine)
#[wasm_bindgen]
pub async fn open_recipe(id: String) -> std::result::Result<bool, JsError> {
    let started = with_app(|app| {
        app.begin_recipe(&id)
            .map(|pending| (pending, app.api().clone()))
    })?;
    let Some((pending, api)) = started else {
        return Ok(false);
    };

    let start = js_sys::Date::now();
    let result = api.recipe(pending.id()).await;
    info!(
        "[perf] recipe id='{}' fetch={:.1}ms",
        pending.id(),
        js_sys::Date::now() - start
    );

    with_app(|app| app.finish_recipe(pending, result))?.map_err(|_| JsError::new(RECIPE_FAILED))
}

/// The open recipe as JSON, `null` when none is open
#[wasm_bindgen]
pub fn current_recipe() -> std::result::Result<String, JsError> {
    with_app(|app| to_json(&app.recipe()))?
}

/// Step servings (`"inc"` or `"dec"`) and return the rescaled recipe as JSON
#[wasm_bindgen]
pub fn update_servings(direction: &str) -> std::result::Result<String, JsError> {
    let direction: Direction = direction.parse().map_err(|e: String| JsError::new(&e))?;
    with_app(|app| {
        app.update_servings(direction)
            .map_err(|e| JsError::new(&e.to_string()))
            .and_then(|recipe| to_json(recipe))
    })?
}

/// Like or unlike the open recipe. Resolves to whether it is now liked.
#[wasm_bindgen]
pub fn toggle_like() -> std::result::Result<bool, JsError> {
    with_app(|app| match app.toggle_like() {
        Ok(LikeToggle::Liked(_)) => Ok(true),
        Ok(LikeToggle::Unliked(_)) => Ok(false),
        Err(e) => Err(JsError::new(&e.to_string())),
    })?
}

#[wasm_bindgen]
pub fn is_liked(id: &str) -> std::result::Result<bool, JsError> {
    with_app(|app| app.is_liked(id))
}

/// All likes, oldest first, as a JSON array
#[wasm_bindgen]
pub fn likes() -> std::result::Result<String, JsError> {
    with_app(|app| to_json(app.likes().records()))?
}

/// Add the open recipe's ingredients to the shopping list; returns the new
/// items as JSON
#[wasm_bindgen]
pub fn add_to_list() -> std::result::Result<String, JsError> {
    with_app(|app| {
        app.add_recipe_to_list()
            .map_err(|e| JsError::new(&e.to_string()))
            .and_then(|items| to_json(&items))
    })?
}

#[wasm_bindgen]
pub fn list_items() -> std::result::Result<String, JsError> {
    with_app(|app| to_json(app.list().map(|list| list.items()).unwrap_or_default()))?
}

#[wasm_bindgen]
pub fn delete_list_item(id: &str) -> std::result::Result<(), JsError> {
    with_app(|app| app.list_mut().delete_item(id))
}

#[wasm_bindgen]
pub fn update_list_item(id: &str, quantity: f64) -> std::result::Result<bool, JsError> {
    with_app(|app| app.list_mut().update_quantity(id, quantity))
}
