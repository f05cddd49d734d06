//! Page-level behaviours wired up when a page loads
//!
//! The host passes in what it found on the page (alert classes, link
//! hrefs, scroll metrics) and applies the answers; nothing here touches a
//! live document.

use std::time::{Duration, Instant};

use maud::html;

/// Alerts carrying this class are never auto-dismissed
pub const PERMANENT_ALERT_CLASS: &str = "alert-permanent";

/// Attributes set on links that leave the site
pub const EXTERNAL_LINK_ATTRS: [(&str, &str); 2] =
    [("target", "_blank"), ("rel", "noopener noreferrer")];

pub const DEFAULT_FADE_IN_STEP: Duration = Duration::from_millis(100);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 5.0;

/// Indices of the alerts (given by their class lists) that the page
/// removes after the notice timeout
pub fn dismissible_alerts<S: AsRef<str>>(alert_classes: &[S]) -> Vec<usize> {
    alert_classes
        .iter()
        .enumerate()
        .filter(|(_, classes)| {
            !classes
                .as_ref()
                .split_whitespace()
                .any(|c| c == PERMANENT_ALERT_CLASS)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Delay before each of `count` cards gets its `fade-in` class
pub fn fade_in_delays(count: usize, step: Duration) -> Vec<Duration> {
    (0..count).map(|i| step * i as u32).collect()
}

/// A link leaves the site when its href is absolute `http(s)` and does not
/// mention the current hostname. An empty hostname matches nothing.
pub fn is_external_link(href: &str, hostname: &str) -> bool {
    href.starts_with("http") && (hostname.is_empty() || !href.contains(hostname))
}

/// Submit button that shows a spinner while a request is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingButton {
    pub inner_html: String,
    pub disabled: bool,
}

impl LoadingButton {
    pub fn new(inner_html: impl Into<String>) -> Self {
        Self {
            inner_html: inner_html.into(),
            disabled: false,
        }
    }

    /// Swap in the spinner, disable the button and hand back the old HTML
    pub fn show_loading(&mut self) -> String {
        let spinner = html! {
            span class="spinner-border spinner-border-sm me-2" role="status" {}
            "처리 중..."
        };
        self.disabled = true;
        std::mem::replace(&mut self.inner_html, spinner.into_string())
    }

    pub fn hide_loading(&mut self, original_html: String) {
        self.inner_html = original_html;
        self.disabled = false;
    }
}

/// Run `callback` only if the user confirmed
pub fn confirm_action<F: FnOnce()>(confirmed: bool, callback: F) {
    if confirmed {
        callback();
    }
}

/// Fires once after input has been quiet for `delay`
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Register an input event; restarts the quiet period
    pub fn input(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once when the quiet period has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

/// Loads the next page when the viewport nears the bottom
#[derive(Debug, Clone)]
pub struct InfiniteScroll {
    threshold: f64,
    loading: bool,
}

impl InfiniteScroll {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            loading: false,
        }
    }

    /// Check a scroll event. Returns true (and starts loading) when near
    /// the bottom and no load is already running.
    pub fn should_load(&mut self, scroll_top: f64, client_height: f64, scroll_height: f64) -> bool {
        if self.loading {
            return false;
        }

        if scroll_top + client_height >= scroll_height - self.threshold {
            self.loading = true;
            return true;
        }

        false
    }

    /// The load finished (successfully or not)
    pub fn finish(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl Default for InfiniteScroll {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

/// Navigation timing marks, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTiming {
    pub navigation_start: f64,
    pub load_event_end: f64,
}

impl PageTiming {
    pub fn load_time_ms(&self) -> f64 {
        self.load_event_end - self.navigation_start
    }

    pub fn log(&self) {
        tracing::info!(load_time_ms = self.load_time_ms(), "Page load time: {}ms", self.load_time_ms());
    }
}
