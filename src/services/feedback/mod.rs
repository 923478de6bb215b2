//! User feedback emitted by the calendar core.
//!
//! Announcements are short status lines for an assistive-technology live
//! region. Alerts are blocking messages for failures the user must
//! acknowledge. Both are queued here and drained by the host UI.

use std::collections::VecDeque;

/// Live-region politeness of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    /// Read when the user is idle
    Polite,
    /// Interrupts whatever is being read
    Assertive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Queue of pending announcements and alerts
#[derive(Debug, Default)]
pub struct Feedback {
    announcements: VecDeque<Announcement>,
    alerts: VecDeque<Alert>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announce(&mut self, message: impl Into<String>) {
        self.push_announcement(message.into(), Politeness::Polite);
    }

    pub fn announce_urgent(&mut self, message: impl Into<String>) {
        self.push_announcement(message.into(), Politeness::Assertive);
    }

    fn push_announcement(&mut self, message: String, politeness: Politeness) {
        log::debug!("Announce ({:?}): {}", politeness, message);
        self.announcements.push_back(Announcement {
            message,
            politeness,
        });
    }

    pub fn alert(&mut self, alert: Alert) {
        log::warn!("{}: {}", alert.title, alert.message);
        self.alerts.push_back(alert);
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Most recent announcement, if any
    pub fn last_announcement(&self) -> Option<&Announcement> {
        self.announcements.back()
    }

    pub fn drain_announcements(&mut self) -> Vec<Announcement> {
        self.announcements.drain(..).collect()
    }

    pub fn drain_alerts(&mut self) -> Vec<Alert> {
        self.alerts.drain(..).collect()
    }
}
