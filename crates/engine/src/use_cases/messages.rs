//! Posting to the chat/notification channel.
//!
//! A failed post never fails the transition that produced it.

use starsign_domain::{Announcement, Notice};

use crate::infrastructure::ports::NotificationPort;

pub async fn post_notice(notifier: &dyn NotificationPort, notice: Notice) {
    if let Err(e) = notifier.notify(&notice).await {
        tracing::warn!(error = %e, message = %notice.message, "Failed to post notice");
    }
}

pub async fn post_announcement(notifier: &dyn NotificationPort, announcement: Announcement) {
    if let Err(e) = notifier.announce(&announcement).await {
        tracing::warn!(
            error = %e,
            speaker = %announcement.speaker,
            title = %announcement.title,
            "Failed to post announcement"
        );
    }
}
