use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::DEFAULT_DISPLAY_NAME;
use crate::logging::LogConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub max_log_files: usize,
    pub sled_path: String,
    /// Lesson pack to load instead of the bundled one.
    pub content_path: Option<PathBuf>,
    pub default_display_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            max_log_files: env_or_parse("LOG_MAX_FILES", 14_usize),
            sled_path: env_or("SLED_PATH", "./data/physicode.sled"),
            content_path: env_opt("CONTENT_PATH").map(PathBuf::from),
            default_display_name: env_or("DEFAULT_DISPLAY_NAME", DEFAULT_DISPLAY_NAME),
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            enable_file_logs: self.enable_file_logs,
            log_dir: self.log_dir.clone(),
            max_log_files: self.max_log_files,
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!(key, value = %raw, "Unrecognized boolean env var, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "RUST_LOG",
            "ENABLE_FILE_LOGS",
            "SLED_PATH",
            "CONTENT_PATH",
            "DEFAULT_DISPLAY_NAME",
            "LOG_MAX_FILES",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.log_level, "info");
        assert!(!cfg.enable_file_logs);
        assert_eq!(cfg.sled_path, "./data/physicode.sled");
        assert!(cfg.content_path.is_none());
        assert_eq!(cfg.max_log_files, 14);
        assert_eq!(cfg.default_display_name, DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn reads_overrides() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("ENABLE_FILE_LOGS", "yes");
        env::set_var("SLED_PATH", "/tmp/other.sled");
        env::set_var("CONTENT_PATH", "./lessons.json");

        let cfg = Config::from_env();
        assert!(cfg.enable_file_logs);
        assert_eq!(cfg.sled_path, "/tmp/other.sled");
        assert_eq!(cfg.content_path, Some(PathBuf::from("./lessons.json")));
        clear_keys(managed_keys());
    }

    #[test]
    fn blank_content_path_is_ignored() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("CONTENT_PATH", "   ");
        assert!(Config::from_env().content_path.is_none());
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("ENABLE_FILE_LOGS", "maybe");
        env::set_var("LOG_MAX_FILES", "bad");

        let cfg = Config::from_env();
        assert!(!cfg.enable_file_logs);
        assert_eq!(cfg.max_log_files, 14);
        clear_keys(managed_keys());
    }
}
