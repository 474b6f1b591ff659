//! Transient on-screen notifications
//!
//! User-visible failures and progress ("Level up!", "Chest is empty") are
//! surfaced as short messages that fade out on their own. Nothing here ever
//! blocks the frame loop.
//!
//! The queue only tracks text and lifetime. Drawing is left to whoever
//! consumes [`NotificationQueue::messages`].
//!
//! # Example
//!
//! ```rust
//! use tile_rpg::notifications::NotificationQueue;
//!
//! let mut queue = NotificationQueue::new();
//! queue.notify("Saved", 1.0);
//! queue.update(0.5);
//! assert_eq!(queue.messages().count(), 1);
//! queue.update(0.6);
//! assert_eq!(queue.messages().count(), 0);
//! ```

use std::collections::VecDeque;

use crate::constants::{MAX_NOTIFICATIONS, NOTIFICATION_SECS};

/// A single message with its remaining lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub remaining: f32,
}

impl Notification {
    /// Opacity for the renderer (0.0 - 1.0)
    ///
    /// Fully opaque until the final second, then fades linearly.
    pub fn alpha(&self) -> f32 {
        self.remaining.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct NotificationQueue {
    messages: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_capacity(MAX_NOTIFICATIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NotificationQueue {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Queues a message for `duration` seconds, dropping the oldest if full
    pub fn notify(&mut self, text: impl Into<String>, duration: f32) {
        let text = text.into();
        tracing::debug!(%text, duration, "Notification");

        if self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Notification {
            text,
            remaining: duration,
        });
    }

    /// Queues a message with the default lifetime
    pub fn push(&mut self, text: impl Into<String>) {
        self.notify(text, NOTIFICATION_SECS);
    }

    pub fn update(&mut self, dt: f32) {
        for message in self.messages.iter_mut() {
            message.remaining -= dt;
        }
        self.messages.retain(|m| m.remaining > 0.0);
    }

    /// Active messages, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &Notification> {
        self.messages.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.messages.back()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}
