//! Desktop notification sink.
//!
//! Notifications are strictly fire-and-forget: a failure to reach the
//! notification daemon is logged at debug level and otherwise ignored, so a
//! headless session never disturbs the watcher.

use notify_rust::Notification;
use std::path::PathBuf;
use tracing::debug;

/// Fire-and-forget desktop notifier.
#[derive(Debug, Clone)]
pub struct Notifier {
    app_name: String,
    icon: Option<PathBuf>,
}

impl Notifier {
    /// Create a notifier for the given application name
    pub fn new(app_name: impl Into<String>) -> Self {
        Notifier {
            app_name: app_name.into(),
            icon: None,
        }
    }

    /// Set the icon shown with each notification
    pub fn with_icon(mut self, icon: Option<PathBuf>) -> Self {
        self.icon = icon;
        self
    }

    /// Show a notification with the given title and message.
    ///
    /// Failures are swallowed; the outcome of the sync never depends on the
    /// desktop environment.
    pub fn notify(&self, title: &str, message: &str) {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .body(message);

        if let Some(icon) = &self.icon {
            notification.icon(&icon.to_string_lossy());
        }

        if let Err(e) = notification.show() {
            debug!("failed to show notification: {}", e);
        }
    }
}
