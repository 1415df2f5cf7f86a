use crate::api::http::{send_json, Backend};
use crate::error::ApiError;
use crate::models::{RemoteSettings, SaveSettingsResponse, Settings, SettingsUpdate};
use crate::storage::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard};

/// Local storage key holding the backend base URL.
pub const SERVER_URL_KEY: &str = "contextos_server_url";

const SETTINGS_PATH: &str = "/api/settings";

/// Owns server URL persistence and the settings cache.
///
/// The server URL is only ever read from local storage (or the default).
/// Whatever the backend says about it is discarded.
pub struct SettingsResolver {
    store: Arc<dyn KeyValueStore>,
    backend: Backend,
    default_url: String,
    cache: Mutex<Option<Settings>>,
}

impl SettingsResolver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        backend: Backend,
        default_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            backend,
            default_url: default_url.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    pub fn resolve_server_url(&self) -> String {
        match self.store.get(SERVER_URL_KEY) {
            Ok(Some(url)) if !url.trim().is_empty() => url.trim().to_string(),
            Ok(_) => self.default_url.clone(),
            Err(e) => {
                log::warn!("local storage unavailable, using default server url: {}", e);
                self.default_url.clone()
            }
        }
    }

    /// Fetches settings from the backend. Falls back to empty keys on any failure.
    pub async fn load_settings(&self) -> Settings {
        let url = self.resolve_server_url();

        match send_json::<RemoteSettings>(self.backend.get(&url, SETTINGS_PATH)).await {
            Ok(remote) => {
                let merged = remote.merge_with(&url);
                *self.lock_cache() = Some(merged.clone());
                merged
            }
            Err(e) => {
                log::error!("failed to load settings from {}: {}", url, e);
                Settings::fallback(url)
            }
        }
    }

    pub async fn save_settings(&self, update: SettingsUpdate) -> Result<Settings, ApiError> {
        let target = match update.server_url.as_deref() {
            Some(requested) => {
                let trimmed = requested.trim();
                let url = if trimmed.is_empty() {
                    self.default_url.clone()
                } else {
                    trimmed.to_string()
                };
                if let Err(e) = self.store.set(SERVER_URL_KEY, &url) {
                    log::warn!("could not persist server url {}: {}", url, e);
                }
                url
            }
            None => self.resolve_server_url(),
        };

        let request = self
            .backend
            .post(&target, SETTINGS_PATH)
            .json(&update.backend_body());

        let response: SaveSettingsResponse = send_json(request).await.map_err(|e| {
            log::error!("failed to save settings to {}: {}", target, e);
            e
        })?;

        let merged = response.settings.merge_with(&target);
        *self.lock_cache() = Some(merged.clone());
        Ok(merged)
    }

    pub fn clear_cache(&self) {
        *self.lock_cache() = None;
    }

    pub fn peek_cache(&self) -> Option<Settings> {
        self.lock_cache().clone()
    }

    pub fn reset_server_url(&self) {
        if let Err(e) = self.store.remove(SERVER_URL_KEY) {
            log::warn!("could not remove persisted server url: {}", e);
        }
        self.clear_cache();
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<Settings>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
