/// Notification capability seam
///
/// Notification support is optional; consumers inject a channel and fall
/// back to the no-op implementation where the capability is missing. A
/// denied permission is reported once - there is no retry loop.

use serde::{Deserialize, Serialize};

/// Result of asking the user for notification permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// The user allowed notifications
    Granted,
    /// The user declined; the caller should inform them and move on
    Denied,
    /// The user has not decided yet
    Default,
}

/// Pluggable notification capability
///
/// Implementations must not block and must not surface delivery failures
/// beyond their own logging.
pub trait NotificationChannel: Send + Sync {
    /// Ask for permission to show notifications
    fn request_permission(&self) -> Permission;

    /// Show a notification immediately (not scheduled)
    fn show(&self, title: &str, body: &str);
}

/// Channel for environments without notification support
pub struct NoopChannel;

impl NotificationChannel for NoopChannel {
    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn show(&self, _title: &str, _body: &str) {}
}

/// Local channel that reports notifications through the log
pub struct LocalChannel;

impl NotificationChannel for LocalChannel {
    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn show(&self, title: &str, body: &str) {
        tracing::info!("Notification: {} - {}", title, body);
    }
}

/// Default notification title when the payload omits one
pub const DEFAULT_TITLE: &str = "Mnemo";

/// Default notification body when the payload omits one
pub const DEFAULT_BODY: &str = "Time to check in.";

/// Payload delivered by the external push collaborator
///
/// Wire contract: `{ notification: { title?, body? }, data?: { url? } }`.
/// All fields are optional; accessors fill in the fixed defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: Option<PushNotification>,
    #[serde(default)]
    pub data: Option<PushData>,
}

/// The user-visible part of a push payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Deep-link data attached to a push payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushData {
    #[serde(default)]
    pub url: Option<String>,
}

impl PushPayload {
    /// Title to display, defaulting when absent
    pub fn title(&self) -> &str {
        self.notification
            .as_ref()
            .and_then(|n| n.title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
    }

    /// Body to display, defaulting when absent
    pub fn body(&self) -> &str {
        self.notification
            .as_ref()
            .and_then(|n| n.body.as_deref())
            .unwrap_or(DEFAULT_BODY)
    }

    /// Deep-link target, defaulting to the application root
    pub fn target_url(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.url.as_deref())
            .unwrap_or("/")
    }
}
