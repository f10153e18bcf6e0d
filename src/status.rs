//! Transient status notifications
//!
//! Each component keeps its own `StatusBoard`. A message stays visible for
//! the configured TTL, then reads as `None`; showing a new message replaces
//! the old one.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone)]
pub struct StatusBoard {
    ttl: Duration,
    current: Option<(StatusMessage, Instant)>,
}

impl StatusBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(text.into(), StatusKind::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text.into(), StatusKind::Error);
    }

    fn show(&mut self, text: String, kind: StatusKind) {
        match kind {
            StatusKind::Success => log::info!("Status: {}", text),
            StatusKind::Error => log::warn!("Status: {}", text),
        }
        self.current = Some((StatusMessage { text, kind }, Instant::now() + self.ttl));
    }

    /// The visible message, if it has not expired
    pub fn current(&self) -> Option<&StatusMessage> {
        match &self.current {
            Some((message, expires_at)) if Instant::now() < *expires_at => Some(message),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.current().map(|m| m.text.as_str())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
