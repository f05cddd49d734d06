//! Gallery Script Core
//!
//! Pure Rust helpers behind the gallery site's pages: number and phone
//! formatting, input predicates, declarative form validation, Korean
//! numeric-aware table sorting, a key/value storage capability and the
//! notice (alert) sink. Used natively by tests and server-side rendering,
//! and by the WASM bindings in the browser.

pub mod collate;
pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod page;
pub mod predicates;
pub mod sorter;
pub mod storage;
pub mod transport;
pub mod validator;

pub use config::ScriptConfig;
pub use error::StorageError;
pub use format::*;
pub use message::{MessageSink, Notice, NoticeBoard, Severity, TracingSink};
pub use predicates::*;
pub use sorter::{sort_permutation, sort_rows, Header, Row, SortOrder, SortOutcome, SortableTable};
pub use storage::{FileBackend, MemoryBackend, Storage, StorageBackend};
pub use transport::{AjaxRequest, CsrfToken, FieldValue, Method, CSRF_FIELD};
pub use validator::{
    validate, validate_and_report, FieldRule, FieldState, FieldValues, RuleSet, ValidationResult,
};
