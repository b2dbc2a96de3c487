use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MIN_SPINNER: Duration = Duration::from_millis(800);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("PORT").unwrap_or(DEFAULT_PORT),
            data_path: resolve_data_path(),
            public_dir: env::var("STORE_PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("STORE_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/store.json")
}

/// Minimum spinner time for the browse tool, `STORE_MIN_SPINNER_MS`.
pub fn min_spinner() -> Duration {
    env_parsed::<u64>("STORE_MIN_SPINNER_MS")
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_MIN_SPINNER)
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid {key}={value:?}, using default");
            None
        }
    }
}
