//! Runtime configuration read from the environment.

use std::time::Duration;

use crate::errors::{Error, Result};
use crate::forms::IdCheckPolicy;
use crate::notices::DEFAULT_NOTICE_DELAY_MS;

pub const DEFAULT_API_URL: &str = "http://localhost:3002";
pub const DEFAULT_PAGE_SIZE: usize = 5;

pub const API_URL_ENV: &str = "PRODCAT_API_URL";
pub const PAGE_SIZE_ENV: &str = "PRODCAT_PAGE_SIZE";
pub const NOTICE_DELAY_ENV: &str = "PRODCAT_NOTICE_DELAY_MS";
pub const ID_CHECK_POLICY_ENV: &str = "PRODCAT_ID_CHECK_POLICY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Gateway origin; the `/bp/products` paths are appended to it.
    pub api_base_url: String,
    pub page_size: usize,
    /// How long success/error messages stay on screen.
    pub notice_delay: Duration,
    pub id_check_policy: IdCheckPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            notice_delay: Duration::from_millis(DEFAULT_NOTICE_DELAY_MS),
            id_check_policy: IdCheckPolicy::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = read(API_URL_ENV) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = read(PAGE_SIZE_ENV) {
            config.page_size = match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(Error::config(format!(
                        "{} must be a positive integer, got '{}'",
                        PAGE_SIZE_ENV, raw
                    )))
                }
            };
        }

        if let Some(raw) = read(NOTICE_DELAY_ENV) {
            let millis = raw.parse::<u64>().map_err(|_| {
                Error::config(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    NOTICE_DELAY_ENV, raw
                ))
            })?;
            config.notice_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = read(ID_CHECK_POLICY_ENV) {
            config.id_check_policy = raw.parse()?;
        }

        Ok(config)
    }
}
