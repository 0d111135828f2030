//! Server configuration from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

use crate::event_store::EventStoreConfig;
use crate::types::{PageLimits, DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// Listen address when `DOWNLOAD_EVENTS_BIND` is unset
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Events file when `DOWNLOAD_EVENTS_FILE` is unset
pub const DEFAULT_EVENTS_FILE: &str = "events.jsonl";

/// Runtime configuration for the server binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub store: EventStoreConfig,
    pub limits: PageLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            store: EventStoreConfig::new(DEFAULT_EVENTS_FILE),
            limits: PageLimits::default(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3030))
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = parse_or("DOWNLOAD_EVENTS_BIND", lookup("DOWNLOAD_EVENTS_BIND"), default_bind());

        let events_path = match lookup("DOWNLOAD_EVENTS_FILE") {
            Some(path) if !path.trim().is_empty() => {
                let path = PathBuf::from(path);
                if path.is_absolute() {
                    path
                } else {
                    env::current_dir()
                        .unwrap_or_else(|_| PathBuf::from("."))
                        .join(path)
                }
            }
            _ => PathBuf::from(DEFAULT_EVENTS_FILE),
        };

        let limits = PageLimits {
            default_per_page: parse_or(
                "DOWNLOAD_EVENTS_DEFAULT_PER_PAGE",
                lookup("DOWNLOAD_EVENTS_DEFAULT_PER_PAGE"),
                DEFAULT_PER_PAGE,
            ),
            max_per_page: parse_or(
                "DOWNLOAD_EVENTS_MAX_PER_PAGE",
                lookup("DOWNLOAD_EVENTS_MAX_PER_PAGE"),
                MAX_PER_PAGE,
            ),
        };

        Self {
            bind,
            store: EventStoreConfig::new(events_path),
            limits,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(key, value = %value, "invalid configuration value, using default");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.store.events_path(), std::path::Path::new(DEFAULT_EVENTS_FILE));
        assert_eq!(config.limits, PageLimits::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DOWNLOAD_EVENTS_BIND", "0.0.0.0:8080"),
            ("DOWNLOAD_EVENTS_FILE", "/var/lib/events/export.jsonl"),
            ("DOWNLOAD_EVENTS_DEFAULT_PER_PAGE", "50"),
            ("DOWNLOAD_EVENTS_MAX_PER_PAGE", "500"),
        ]));
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(
            config.store.events_path(),
            std::path::Path::new("/var/lib/events/export.jsonl")
        );
        assert_eq!(config.limits.default_per_page, 50);
        assert_eq!(config.limits.ceiling(), 500);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DOWNLOAD_EVENTS_BIND", "not an address"),
            ("DOWNLOAD_EVENTS_MAX_PER_PAGE", "lots"),
        ]));
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.limits.max_per_page, MAX_PER_PAGE);
    }
}
