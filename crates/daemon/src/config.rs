// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `andon.toml`: floor layout, listener, CMMS, and notification settings.
//!
//! A missing file means the stock layout with the CMMS switched off.

use std::path::Path;
use std::time::Duration;

use andon_adapters::{
    CmmsError, CmmsRouter, FiixClient, FiixConfig, NotifyError, NotifyRouter,
    WebhookNotifyAdapter,
};
use andon_core::{Catalog, CatalogError, Cell, Department};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid [cmms] section: {0}")]
    Cmms(#[from] CmmsError),
    #[error("invalid [notify] section: {0}")]
    Notify(#[from] NotifyError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    #[serde(default)]
    pub cmms: Option<FiixConfig>,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub departments: Vec<Department>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub desktop: bool,
    #[serde(default = "default_notify_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { webhook_url: None, desktop: false, timeout_ms: default_notify_timeout_ms() }
    }
}

fn default_notify_timeout_ms() -> u64 {
    5_000
}

impl Config {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path: path.display().to_string(), source }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `ANDON_*` overrides.
    pub fn with_env(mut self) -> Self {
        if let Some(bind) = crate::env::bind() {
            self.server.bind = bind;
        }
        if let (Some(secret), Some(cmms)) = (crate::env::cmms_secret(), self.cmms.as_mut()) {
            cmms.secret = secret;
        }
        self
    }

    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog {
            Some(c) => Ok(Catalog::new(c.departments.clone(), c.cells.clone())?),
            None => Ok(Catalog::default()),
        }
    }

    pub fn cmms_router(&self) -> Result<CmmsRouter, ConfigError> {
        match &self.cmms {
            Some(cmms) => Ok(CmmsRouter::Fiix(FiixClient::new(cmms.clone())?)),
            None => Ok(CmmsRouter::Disabled),
        }
    }

    pub fn notify_router(&self) -> Result<NotifyRouter, ConfigError> {
        let webhook = match &self.notify.webhook_url {
            Some(url) => Some(WebhookNotifyAdapter::new(
                url.clone(),
                Duration::from_millis(self.notify.timeout_ms),
            )?),
            None => None,
        };
        Ok(NotifyRouter::new(webhook, self.notify.desktop))
    }

    /// Check everything startup will need, so a bad file fails before the
    /// lock is taken.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog()?;
        if let Some(cmms) = &self.cmms {
            cmms.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
