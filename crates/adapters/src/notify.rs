// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound notifications for board transitions.
//!
//! Delivery is best effort. Callers dispatch after a transition commits
//! and only log failures.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("webhook returned HTTP {0}")]
    Status(u16),
}

/// Adapter for sending notifications
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Send a notification with a title and message body
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS the first notification looks up a bundle identifier through
/// AppleScript, which never returns in a daemon without Automation
/// permissions. The identifier is set up front to skip that lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let message = message.to_string();
        // show() blocks on some platforms
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new().summary(&title).body(&message).show() {
                Ok(_) => tracing::debug!(%title, "desktop notification sent"),
                Err(e) => tracing::warn!(%title, error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    message: &'a str,
}

/// Posts `{"title", "message"}` as JSON to a fixed URL.
#[derive(Clone, Debug)]
pub struct WebhookNotifyAdapter {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifyAdapter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::SendFailed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl NotifyAdapter for WebhookNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { title, message })
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Fans a notification out to every configured target.
///
/// All targets are tried; the first failure is returned.
#[derive(Clone, Debug, Default)]
pub struct NotifyRouter {
    webhook: Option<WebhookNotifyAdapter>,
    desktop: Option<DesktopNotifyAdapter>,
}

impl NotifyRouter {
    pub fn new(webhook: Option<WebhookNotifyAdapter>, desktop: bool) -> Self {
        Self { webhook, desktop: desktop.then(DesktopNotifyAdapter::new) }
    }

    pub fn is_empty(&self) -> bool {
        self.webhook.is_none() && self.desktop.is_none()
    }
}

#[async_trait]
impl NotifyAdapter for NotifyRouter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut first_error = None;
        if let Some(webhook) = &self.webhook {
            if let Err(e) = webhook.notify(title, message).await {
                first_error.get_or_insert(e);
            }
        }
        if let Some(desktop) = &self.desktop {
            if let Err(e) = desktop.notify(title, message).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded notification
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NotifyCall {
        pub title: String,
        pub message: String,
    }

    #[derive(Default)]
    struct FakeNotifyState {
        calls: Vec<NotifyCall>,
        fail: bool,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every later send fail (after recording it).
        pub fn set_failing(&self, fail: bool) {
            self.inner.lock().fail = fail;
        }

        /// Get all recorded notifications
        pub fn calls(&self) -> Vec<NotifyCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
            let mut inner = self.inner.lock();
            inner.calls.push(NotifyCall { title: title.to_string(), message: message.to_string() });
            if inner.fail {
                return Err(NotifyError::SendFailed("fake failure".into()));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
