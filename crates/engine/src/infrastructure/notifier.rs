//! Notification adapters.

use async_trait::async_trait;
use starsign_domain::{Announcement, Notice, NoticeLevel};
use tokio::sync::Mutex;

use crate::infrastructure::ports::{NotificationPort, NotifyError};

/// Writes chat messages and notices to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationPort for TracingNotifier {
    async fn announce(&self, announcement: &Announcement) -> Result<(), NotifyError> {
        tracing::info!(
            speaker = %announcement.speaker,
            title = %announcement.title,
            has_body = announcement.body.is_some(),
            "{}",
            announcement.headline()
        );
        Ok(())
    }

    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        match notice.level {
            NoticeLevel::Info => tracing::info!(notice = %notice.message),
            NoticeLevel::Warning => tracing::warn!(notice = %notice.message),
            NoticeLevel::Error => tracing::error!(notice = %notice.message),
        }
        Ok(())
    }
}

/// Everything posted, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Posted {
    Announcement(Announcement),
    Notice(Notice),
}

/// Keeps posted messages so a caller can render or inspect them afterwards.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    posted: Mutex<Vec<Posted>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything posted so far.
    pub async fn drain(&self) -> Vec<Posted> {
        std::mem::take(&mut *self.posted.lock().await)
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.posted
            .lock()
            .await
            .iter()
            .filter_map(|p| match p {
                Posted::Notice(n) => Some(n.clone()),
                Posted::Announcement(_) => None,
            })
            .collect()
    }

    pub async fn announcements(&self) -> Vec<Announcement> {
        self.posted
            .lock()
            .await
            .iter()
            .filter_map(|p| match p {
                Posted::Announcement(a) => Some(a.clone()),
                Posted::Notice(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn announce(&self, announcement: &Announcement) -> Result<(), NotifyError> {
        self.posted
            .lock()
            .await
            .push(Posted::Announcement(announcement.clone()));
        Ok(())
    }

    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.posted.lock().await.push(Posted::Notice(notice.clone()));
        Ok(())
    }
}
