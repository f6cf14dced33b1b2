use crate::client::BackendClient;
use crate::models::{PortalData, Theme};
use crate::session::SessionRegistry;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub sessions: SessionRegistry,
    pub data_path: PathBuf,
    pub data: Arc<Mutex<PortalData>>,
}

impl AppState {
    pub fn new(backend: BackendClient, data_path: PathBuf, data: PortalData) -> Self {
        Self {
            backend,
            sessions: SessionRegistry::new(),
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn theme(&self, browser: &str) -> Theme {
        let data = self.data.lock().await;
        data.themes.get(browser).copied().unwrap_or_default()
    }

    pub async fn toggle_theme(&self, browser: &str) -> Theme {
        let mut data = self.data.lock().await;
        let theme = data.themes.get(browser).copied().unwrap_or_default().toggled();
        if theme == Theme::default() {
            data.themes.remove(browser);
        } else {
            data.themes.insert(browser.to_string(), theme);
        }
        if let Err(err) = persist_data(&self.data_path, &data).await {
            warn!("failed to persist theme preference: {}", err.message);
        }
        theme
    }
}
