//! Application configuration module.
//!
//! Manages the TOML config file holding scraper defaults such as the
//! language, certification country and title fallback.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ScraperConfig, resolve_config_path};
