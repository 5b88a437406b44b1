//! Application configuration module.
//!
//! Reads the TOML config file holding provider settings and the search
//! debounce delay, from `--dir` or `~/.config/moodreel/`.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
