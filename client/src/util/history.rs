//! Browser history updates that do not re-run the router.
//!
//! DESIGN
//! ======
//! Once a send assigns a thread id the address bar moves to `/chat/<id>`, but
//! the conversation already on screen must stay mounted. `pushState` changes
//! the URL without the navigation the router would perform.

/// Push `path` onto the session history when it differs from the current one.
pub fn push_route(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        if window.location().pathname().ok().as_deref() == Some(path) {
            return;
        }
        if let Ok(history) = window.history() {
            if let Err(e) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path)) {
                log::warn!("history push failed: path={path} error={e:?}");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = path;
    }
}
