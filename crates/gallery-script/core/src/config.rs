// File: src/config.rs
// Purpose: Timing and field-name settings loaded from gallery.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::message::NoticeBoard;
use crate::page::{Debouncer, InfiniteScroll};
use crate::storage::MemoryBackend;
use crate::transport::{AjaxRequest, CsrfToken, FieldValue, Method, CSRF_FIELD};

/// Script configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScriptConfig {
    #[serde(default)]
    pub notice: NoticeConfig,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Notice (alert) display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoticeConfig {
    /// Milliseconds before a notice is removed (default: 3000)
    #[serde(default = "default_notice_timeout_ms")]
    pub timeout_ms: u64,
}

/// Page behaviours
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    /// Delay between successive cards fading in (default: 100)
    #[serde(default = "default_fade_in_step_ms")]
    pub fade_in_step_ms: u64,

    /// Quiet period before a search input fires (default: 500)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Distance from the bottom, in px, that triggers the next page (default: 5)
    #[serde(default = "default_scroll_threshold_px")]
    pub scroll_threshold_px: f64,
}

/// AJAX request building
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    #[serde(default = "default_csrf_field")]
    pub csrf_field: String,
}

/// Local storage
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Byte limit for the in-memory backend; unlimited when unset
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

// Default values
fn default_notice_timeout_ms() -> u64 {
    3000
}

fn default_fade_in_step_ms() -> u64 {
    100
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_scroll_threshold_px() -> f64 {
    5.0
}

fn default_csrf_field() -> String {
    CSRF_FIELD.to_string()
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_notice_timeout_ms(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            fade_in_step_ms: default_fade_in_step_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            scroll_threshold_px: default_scroll_threshold_px(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            csrf_field: default_csrf_field(),
        }
    }
}

impl ScriptConfig {
    /// Load configuration from a TOML file; a missing file gives defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScriptConfig = toml::from_str(content).context("Invalid gallery config")?;
        Ok(config)
    }

    pub fn notice_timeout(&self) -> Duration {
        Duration::from_millis(self.notice.timeout_ms)
    }

    pub fn fade_in_step(&self) -> Duration {
        Duration::from_millis(self.page.fade_in_step_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.page.search_debounce_ms)
    }

    pub fn notice_board(&self) -> NoticeBoard {
        NoticeBoard::with_timeout(self.notice_timeout())
    }

    pub fn debouncer(&self) -> Debouncer {
        Debouncer::new(self.search_debounce())
    }

    pub fn infinite_scroll(&self) -> InfiniteScroll {
        InfiniteScroll::new(self.page.scroll_threshold_px)
    }

    /// Form field carrying the CSRF token
    pub fn csrf_field(&self) -> &str {
        &self.transport.csrf_field
    }

    /// Read the page's CSRF token from the configured field
    pub fn csrf_token(&self, html: &str) -> CsrfToken {
        CsrfToken::from_html_field(html, self.csrf_field())
    }

    /// Build an AJAX request that sends the token under the configured field
    pub fn request<I, K, V>(
        &self,
        url: impl Into<String>,
        method: Method,
        data: I,
        token: &CsrfToken,
    ) -> AjaxRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        AjaxRequest::build_with_field(url, method, data, token, self.csrf_field())
    }

    pub fn memory_backend(&self) -> MemoryBackend {
        match self.storage.quota_bytes {
            Some(quota) => MemoryBackend::with_quota(quota),
            None => MemoryBackend::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScriptConfig::default();
        assert_eq!(config.notice_timeout(), Duration::from_millis(3000));
        assert_eq!(config.fade_in_step(), Duration::from_millis(100));
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.page.scroll_threshold_px, 5.0);
        assert_eq!(config.transport.csrf_field, "csrfmiddlewaretoken");
        assert_eq!(config.storage.quota_bytes, None);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ScriptConfig::from_toml_str("").unwrap(), ScriptConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = ScriptConfig::from_toml_str(
            r#"
            [notice]
            timeout_ms = 5000

            [storage]
            quota_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.notice_timeout(), Duration::from_secs(5));
        assert_eq!(config.page.search_debounce_ms, 500);
        assert_eq!(config.storage.quota_bytes, Some(1024));
        assert_eq!(config.notice_board().timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_csrf_field_reaches_requests() {
        let config = ScriptConfig::from_toml_str(
            r#"
            [transport]
            csrf_field = "_token"
            "#,
        )
        .unwrap();
        assert_eq!(config.csrf_field(), "_token");

        let token = config.csrf_token(r#"<input type="hidden" name="_token" value="abc">"#);
        assert_eq!(token.as_str(), "abc");

        let request = config.request("/artworks/like/", Method::Post, [("artwork_id", "7")], &token);
        assert_eq!(request.body[0], ("_token".to_string(), "abc".to_string()));

        let request = ScriptConfig::default().request("/x/", Method::Post, [("a", "b")], &token);
        assert_eq!(request.body[0].0, "csrfmiddlewaretoken");
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(ScriptConfig::from_toml_str("[notice]\ntimeout_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = ScriptConfig::from_file("/nonexistent/gallery.toml").unwrap();
        assert_eq!(config, ScriptConfig::default());
    }
}
