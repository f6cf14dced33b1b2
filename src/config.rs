use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn};

pub const DEFAULT_BACKEND_URL: &str = "https://resemin-app.onrender.com";

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub backend_url: String,
}

impl PortalConfig {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 8080),
            data_path: resolve_data_path(),
            backend_url: try_load::<String>("BACKEND_URL", DEFAULT_BACKEND_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("PORTAL_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/preferences.json")
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
