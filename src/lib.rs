pub mod app;
pub mod client;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use client::BackendClient;
pub use config::PortalConfig;
pub use state::AppState;
pub use storage::load_data;
