use std::sync::Mutex;

use bibdex_core::Store;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: Mutex<Store>,
}
