use crate::errors::ValidationError;
use crate::models::{AdminCredential, ColumnSet};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggingIn,
    LoggedIn(AdminCredential),
}

#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    state: SessionState,
}

impl AdminSession {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn begin_login(&mut self) {
        self.state = SessionState::LoggingIn;
    }

    pub fn complete_login(&mut self, credential: AdminCredential) {
        self.state = SessionState::LoggedIn(credential);
    }

    pub fn fail_login(&mut self) {
        self.state = SessionState::LoggedOut;
    }

    pub fn credential(&self) -> Option<&AdminCredential> {
        match &self.state {
            SessionState::LoggedIn(credential) => Some(credential),
            _ => None,
        }
    }

    pub fn require_credential(&self) -> Result<AdminCredential, ValidationError> {
        self.credential().cloned().ok_or(ValidationError::NotLoggedIn)
    }

    pub fn is_logged_in(&self) -> bool {
        self.credential().is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TabSession {
    pub admin: AdminSession,
    pub columns: Option<ColumnSet>,
    pub visible: BTreeSet<String>,
    pub dni_column: String,
    pub fecha_column: String,
}

impl TabSession {
    pub fn reset_columns(&mut self) {
        self.columns = None;
        self.visible.clear();
        self.dni_column.clear();
        self.fecha_column.clear();
    }

    // A logged-out tab has nothing the next request could use.
    fn is_vacant(&self) -> bool {
        *self.admin.state() == SessionState::LoggedOut
    }

    pub fn select_all(&mut self) {
        if let Some(columns) = &self.columns {
            self.visible = columns.iter().map(str::to_string).collect();
        }
    }

    pub fn clear_all(&mut self) {
        self.visible.clear();
    }

    // Selections missing from the column set go last.
    pub fn visible_in_order(&self) -> Vec<String> {
        let mut ordered: Vec<String> = match &self.columns {
            Some(columns) => columns
                .iter()
                .filter(|c| self.visible.contains(*c))
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };
        for column in &self.visible {
            if !ordered.contains(column) {
                ordered.push(column.clone());
            }
        }
        ordered
    }
}

// Only tabs that are logging in or logged in are stored.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    tabs: Arc<Mutex<HashMap<Uuid, TabSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self, id: Uuid) -> TabSession {
        self.tabs.lock().await.get(&id).cloned().unwrap_or_default()
    }

    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut TabSession) -> R) -> R {
        let mut tabs = self.tabs.lock().await;
        let tab = tabs.entry(id).or_default();
        let result = f(tab);
        if tab.is_vacant() {
            tabs.remove(&id);
        }
        result
    }

    pub async fn logout(&self, id: Uuid) {
        self.tabs.lock().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.tabs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tabs.lock().await.is_empty()
    }
}
