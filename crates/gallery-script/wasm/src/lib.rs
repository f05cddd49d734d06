//! Gallery Script WASM
//!
//! WebAssembly bindings for the gallery site helpers. Page scripts call
//! these from event listeners; the DOM work (toggling classes, moving
//! `<tr>` elements, inserting alerts) stays in the page.

use gallery_script_core as core;
use gallery_script_core::storage::{Storage, StorageBackend};
use gallery_script_core::{
    AjaxRequest, CsrfToken, FieldValue, MessageSink, Method, RuleSet, Severity, SortOrder,
    StorageError,
};
use serde::Serialize;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// Plain objects instead of `Map`s, so pages can read fields directly
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Non-finite input comes back the way JS prints it
#[wasm_bindgen(js_name = addCommas)]
pub fn add_commas_js(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    core::add_commas(n.trunc() as i64)
}

#[wasm_bindgen(js_name = removeCommas)]
pub fn remove_commas_js(s: &str) -> String {
    core::remove_commas(s)
}

#[wasm_bindgen(js_name = formatPhoneNumber)]
pub fn format_phone_number_js(phone_number: &str) -> String {
    core::format_phone_number(phone_number)
}

/// New value for a price input, or `undefined` to leave it as typed
#[wasm_bindgen(js_name = formatPriceInput)]
pub fn format_price_input_js(value: &str) -> Option<String> {
    core::format_price_input(value)
}

#[wasm_bindgen(js_name = validateEmail)]
pub fn validate_email_js(email: &str) -> bool {
    core::validate_email(email)
}

#[wasm_bindgen(js_name = validatePhoneNumber)]
pub fn validate_phone_number_js(phone_number: &str) -> bool {
    core::validate_phone_number(phone_number)
}

#[wasm_bindgen(js_name = validateDate)]
pub fn validate_date_js(date_string: &str) -> bool {
    core::validate_date(date_string)
}

/// Validation outcome handed back to the page
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Newline-joined errors for the danger notice, empty when valid
    pub message: String,
    /// Field name to the CSS class to apply (`is-valid` / `is-invalid`)
    pub field_classes: HashMap<String, String>,
}

/// Validate a form's values against a rule object
///
/// # Example (JavaScript)
/// ```javascript
/// const result = validateForm(
///     { title: form.title.value },
///     { title: { label: '작품명', required: true, maxLength: 100 } }
/// );
/// if (!result.isValid) showMessage(result.message, 'danger');
/// ```
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(fields: JsValue, rules: JsValue) -> Result<JsValue, JsValue> {
    let fields: HashMap<String, String> = serde_wasm_bindgen::from_value(fields)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse fields: {}", e)))?;
    let rules: RuleSet = serde_wasm_bindgen::from_value(rules)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rules: {}", e)))?;

    let result = core::validate(&fields, &rules);
    let validation = FormValidation {
        is_valid: result.is_valid,
        message: result.joined_message(),
        field_classes: result
            .states
            .iter()
            .map(|(name, state)| (name.clone(), state.css_class().to_string()))
            .collect(),
        errors: result.errors,
    };

    to_js(&validation)
}

/// New row order for a header click
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TableSort {
    /// Row indices in their new order; `null` when the key matched no header
    pub order: Option<Vec<usize>>,
    /// Value to store in `data-sort-order`
    pub sort_order: Option<SortOrder>,
}

/// Compute the new order of a table's body rows
///
/// `rows` is an array of rows, each an array of cell texts. `headers` holds
/// each header's `data-sort` key, or `null`. `previous` is the table's
/// current `data-sort-order`.
#[wasm_bindgen(js_name = sortTable)]
pub fn sort_table(
    rows: JsValue,
    column: &str,
    headers: JsValue,
    previous: Option<String>,
) -> Result<JsValue, JsValue> {
    let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rows: {}", e)))?;
    let headers: Vec<Option<String>> = serde_wasm_bindgen::from_value(headers)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse headers: {}", e)))?;
    let previous = SortOrder::parse_stored(previous.as_deref());

    let sort = match core::sort_permutation(&rows, column, &headers, previous) {
        Some((order, sort_order)) => TableSort {
            order: Some(order),
            sort_order: Some(sort_order),
        },
        None => TableSort {
            order: None,
            sort_order: previous,
        },
    };

    to_js(&sort)
}

/// Build an AJAX form body, with the CSRF token on POST-like methods
#[wasm_bindgen(js_name = buildRequestBody)]
pub fn build_request_body(data: JsValue, method: &str, csrf_token: &str) -> Result<String, JsValue> {
    let data: serde_json::Map<String, serde_json::Value> = serde_wasm_bindgen::from_value(data)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse data: {}", e)))?;
    let method: Method = method.parse().map_err(|e: String| JsValue::from_str(&e))?;

    let request = AjaxRequest::build(
        "",
        method,
        data.iter().map(|(k, v)| (k.clone(), FieldValue::from_json(v))),
        &CsrfToken::new(csrf_token),
    );

    Ok(request.encoded_body())
}

/// Pull the CSRF token out of page HTML
#[wasm_bindgen(js_name = csrfTokenFromHtml)]
pub fn csrf_token_from_html(html: &str) -> String {
    CsrfToken::from_html(html).as_str().to_string()
}

/// `window.localStorage`, when the browser allows it
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

fn js_error(e: JsValue) -> StorageError {
    StorageError::Unavailable(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }

    fn name(&self) -> &'static str {
        "localStorage"
    }
}

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

// No tracing subscriber runs in the browser, so storage failures are
// reported here instead of through the core's `tracing::warn!`
fn warn_storage(action: &str, key: &str, error: &StorageError) -> String {
    let message = format!("Failed to {} storage ({}): {}", action, key, error);
    warn(&message);
    message
}

/// Save a JSON-compatible value; failures are logged to the console
#[wasm_bindgen(js_name = storageSet)]
pub fn storage_set(key: &str, value: JsValue) {
    let result = serde_wasm_bindgen::from_value::<serde_json::Value>(value)
        .map_err(|e| StorageError::Unavailable(e.to_string()))
        .and_then(|value| Storage::new(LocalStorage).try_set(key, &value));

    if let Err(e) = result {
        warn_storage("save to", key, &e);
    }
}

/// Read a saved value, or `default` when missing, empty or unreadable.
/// A stored `null` comes back as `null`.
#[wasm_bindgen(js_name = storageGet)]
pub fn storage_get(key: &str, default: JsValue) -> JsValue {
    match Storage::new(LocalStorage).try_get::<serde_json::Value>(key) {
        Ok(Some(value)) => to_js(&value).unwrap_or(default),
        Ok(None) => default,
        Err(e) => {
            warn_storage("read from", key, &e);
            default
        }
    }
}

#[wasm_bindgen(js_name = storageRemove)]
pub fn storage_remove(key: &str) {
    if let Err(e) = Storage::new(LocalStorage).try_remove(key) {
        warn_storage("remove from", key, &e);
    }
}

/// Message sink that writes notices to the browser console
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    fn line(message: &str, severity: Severity) -> String {
        format!("[{}] {}", severity, message)
    }
}

impl MessageSink for ConsoleSink {
    fn show(&mut self, message: &str, severity: Severity) {
        let line = JsValue::from_str(&Self::line(message, severity));
        match severity {
            Severity::Danger => web_sys::console::error_1(&line),
            Severity::Warning => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

/// Validate a form and log any errors to the console; returns validity
#[wasm_bindgen(js_name = validateFormToConsole)]
pub fn validate_form_to_console(fields: JsValue, rules: JsValue) -> Result<bool, JsValue> {
    let fields: HashMap<String, String> = serde_wasm_bindgen::from_value(fields)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse fields: {}", e)))?;
    let rules: RuleSet = serde_wasm_bindgen::from_value(rules)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rules: {}", e)))?;

    Ok(core::validate_and_report(&fields, &rules, &mut ConsoleSink).is_valid)
}

/// Log the page load time to the console
#[wasm_bindgen(js_name = logPageLoad)]
pub fn log_page_load(navigation_start: f64, load_event_end: f64) {
    let timing = core::page::PageTiming {
        navigation_start,
        load_event_end,
    };
    web_sys::console::log_1(&JsValue::from_str(&format!(
        "Page load time: {}ms",
        timing.load_time_ms()
    )));
}

/// Whether a link should open in a new tab
#[wasm_bindgen(js_name = isExternalLink)]
pub fn is_external_link_js(href: &str, hostname: &str) -> bool {
    core::page::is_external_link(href, hostname)
}
