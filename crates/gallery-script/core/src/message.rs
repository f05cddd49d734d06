//! Notice display: the sink validation failures and page actions report to

use std::fmt;
use std::time::{Duration, Instant};

use maud::{html, Markup};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a notice stays up before it is removed
pub const DEFAULT_NOTICE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Bootstrap alert variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Danger,
    Warning,
    Info,
    Primary,
    Secondary,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Primary => "primary",
            Severity::Secondary => "secondary",
            Severity::Light => "light",
            Severity::Dark => "dark",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can show a message to the user
pub trait MessageSink {
    fn show(&mut self, message: &str, severity: Severity);
}

/// A posted alert
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub posted_at: Instant,
    /// Permanent notices (`alert-permanent`) are never auto-dismissed
    pub permanent: bool,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity, posted_at: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            posted_at,
            permanent: false,
        }
    }

    pub fn class_name(&self) -> String {
        let mut class = format!("alert alert-{} alert-dismissible fade show", self.severity);
        if self.permanent {
            class.push_str(" alert-permanent");
        }
        class
    }

    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        !self.permanent && now.saturating_duration_since(self.posted_at) >= timeout
    }

    /// Dismissible alert markup; each message line becomes its own line
    pub fn render(&self) -> Markup {
        html! {
            div class=(self.class_name()) role="alert" id=(format!("notice-{}", self.id)) {
                @for (i, line) in self.message.lines().enumerate() {
                    @if i > 0 {
                        br;
                    }
                    (line)
                }
                button type="button" class="btn-close" data-bs-dismiss="alert" {}
            }
        }
    }
}

/// In-memory notice list, newest first, with timed expiry
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    timeout: Duration,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_NOTICE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            notices: Vec::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Post a notice at a given time
    pub fn post_at(&mut self, message: &str, severity: Severity, now: Instant) -> Uuid {
        let notice = Notice::new(message, severity, now);
        let id = notice.id;
        self.notices.insert(0, notice);
        id
    }

    /// Post a notice that stays until dismissed
    pub fn post_permanent(&mut self, message: &str, severity: Severity) -> Uuid {
        let mut notice = Notice::new(message, severity, Instant::now());
        notice.permanent = true;
        let id = notice.id;
        self.notices.insert(0, notice);
        id
    }

    /// Remove a notice by id (the close button)
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Drop every notice whose timeout has elapsed, returning how many went
    pub fn expire(&mut self, now: Instant) -> usize {
        let timeout = self.timeout;
        let before = self.notices.len();
        self.notices.retain(|n| !n.is_expired(now, timeout));
        before - self.notices.len()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn render(&self) -> Markup {
        html! {
            @for notice in &self.notices {
                (notice.render())
            }
        }
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for NoticeBoard {
    fn show(&mut self, message: &str, severity: Severity) {
        self.post_at(message, severity, Instant::now());
    }
}

/// Sink that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn show(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Danger | Severity::Warning => {
                tracing::warn!(severity = %severity, "{}", message)
            }
            _ => tracing::info!(severity = %severity, "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut board = NoticeBoard::new();
        board.show("first", Severity::Success);
        board.show("second", Severity::Danger);

        let messages: Vec<&str> = board.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_expiry_after_timeout() {
        let start = Instant::now();
        let mut board = NoticeBoard::new();
        board.post_at("old", Severity::Info, start);
        board.post_at("new", Severity::Info, start + Duration::from_millis(1000));

        assert_eq!(board.expire(start + Duration::from_millis(2999)), 0);
        assert_eq!(board.expire(start + Duration::from_millis(3000)), 1);
        assert_eq!(board.notices()[0].message, "new");
        assert_eq!(board.expire(start + Duration::from_millis(4000)), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn test_permanent_notice_survives() {
        let mut board = NoticeBoard::with_timeout(Duration::from_millis(10));
        board.post_permanent("저장되었습니다", Severity::Success);

        assert_eq!(board.expire(Instant::now() + Duration::from_secs(60)), 0);
        assert!(board.notices()[0].class_name().ends_with("alert-permanent"));
    }

    #[test]
    fn test_dismiss() {
        let mut board = NoticeBoard::new();
        let id = board.post_at("bye", Severity::Warning, Instant::now());
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
    }

    #[test]
    fn test_render_escapes_and_breaks_lines() {
        let notice = Notice::new("이름을(를) 입력해주세요.\n<b>x</b>", Severity::Danger, Instant::now());
        let html = notice.render().into_string();

        assert!(html.contains("alert alert-danger alert-dismissible fade show"));
        assert!(html.contains("이름을(를) 입력해주세요.<br>&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains(r#"data-bs-dismiss="alert""#));
    }
}
