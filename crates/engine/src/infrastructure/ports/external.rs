//! External service port traits (chat and notifications).

use async_trait::async_trait;
use starsign_domain::{Announcement, Notice};

use super::error::NotifyError;

/// The host's chat log and transient notification area.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Post a chat message.
    async fn announce(&self, announcement: &Announcement) -> Result<(), NotifyError>;

    /// Show a transient info/warning/error notice.
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError>;
}
