use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::render::RasterConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory exported artifacts are written to.
    pub export_dir: PathBuf,
    pub raster_width: u32,
    pub raster_max_height: u32,
    /// Sessions untouched for this long are closed and their exports removed.
    pub session_idle_minutes: u32,
    pub session_sweep_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let session_sweep_secs = env_or("SESSION_SWEEP_SECS", 60)?;
        ensure!(session_sweep_secs > 0, "SESSION_SWEEP_SECS must be positive");

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            export_dir: std::env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("exports")),
            raster_width: env_or("RASTER_WIDTH", 800)?,
            raster_max_height: env_or("RASTER_MAX_HEIGHT", 16_384)?,
            session_idle_minutes: env_or("SESSION_IDLE_MINUTES", 60)?,
            session_sweep_secs,
        })
    }

    pub fn session_max_idle(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_idle_minutes))
    }

    pub fn raster(&self) -> RasterConfig {
        RasterConfig {
            width_px: self.raster_width,
            max_height_px: self.raster_max_height,
            ..RasterConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            export_dir: PathBuf::from("exports"),
            raster_width: 800,
            raster_max_height: 16_384,
            session_idle_minutes: 60,
            session_sweep_secs: 60,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
