//! AJAX request payloads with the CSRF token attached
//!
//! Only builds the request; sending it is up to the host (`fetch` in the
//! browser, an HTTP client in tests).

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Form field the server reads the CSRF token from
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

static INPUT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("input tag regex is valid"));

static NAME_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bname\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).expect("name regex is valid")
});

static VALUE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("value regex is valid")
});

/// CSRF token echoed back on unsafe requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Find the token in the page's hidden `csrfmiddlewaretoken` input.
    ///
    /// A page without one yields an empty token.
    pub fn from_html(html: &str) -> Self {
        Self::from_html_field(html, CSRF_FIELD)
    }

    /// Like [`CsrfToken::from_html`], for an input named `field`
    pub fn from_html_field(html: &str, field: &str) -> Self {
        INPUT_TAG
            .find_iter(html)
            .map(|m| m.as_str())
            .find(|tag| attr(&NAME_ATTR, tag).as_deref() == Some(field))
            .and_then(|tag| attr(&VALUE_ATTR, tag))
            .map(Self)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn attr(re: &Regex, tag: &str) -> Option<String> {
    let caps = re.captures(tag)?;
    (1..=3)
        .find_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
}

/// HTTP method of an AJAX request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// POST-like methods change server state and must carry the token
    pub fn requires_csrf(&self) -> bool {
        !matches!(self, Method::Get)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(format!("Unsupported method: {}", s)),
        }
    }
}

/// One datum of the payload: a single value or a list sent as repeated keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// Convert a JSON value. Arrays become repeated entries; other
    /// non-string values are sent in their JSON text form.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::Many(items.iter().map(json_text).collect()),
            other => FieldValue::Single(json_text(other)),
        }
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Many(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// A request ready to hand to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AjaxRequest {
    pub url: String,
    pub method: Method,
    /// Flat form body in send order; list values appear once per item
    pub body: Vec<(String, String)>,
}

impl AjaxRequest {
    /// Build the form body, putting the CSRF token first on POST-like methods
    pub fn build<I, K, V>(url: impl Into<String>, method: Method, data: I, token: &CsrfToken) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::build_with_field(url, method, data, token, CSRF_FIELD)
    }

    /// Like [`AjaxRequest::build`], sending the token under `csrf_field`
    pub fn build_with_field<I, K, V>(
        url: impl Into<String>,
        method: Method,
        data: I,
        token: &CsrfToken,
        csrf_field: &str,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut body = Vec::new();

        if method.requires_csrf() {
            body.push((csrf_field.to_string(), token.as_str().to_string()));
        }

        for (key, value) in data {
            let key = key.into();
            match value.into() {
                FieldValue::Single(v) => body.push((key, v)),
                FieldValue::Many(items) => {
                    body.extend(items.into_iter().map(|item| (key.clone(), item)));
                }
            }
        }

        Self {
            url: url.into(),
            method,
            body,
        }
    }

    /// Body as `application/x-www-form-urlencoded` text
    pub fn encoded_body(&self) -> String {
        self.body
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
