
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Severity
///
/// Ordinal order is meaningful: ascending sort puts blocking validation
/// errors first and informational notices last.
///

#[derive(
    Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum Severity {
    ValidationError,
    RuntimeError,
    Warning,
    Info,
}

///
/// Message
///
/// One immutable diagnostic attached to a field.
///
/// `code == 0` means uncoded. A nonzero code is unique within one field's
/// message list; inserting a duplicate is a silent no-op at the store level.
/// Messages never expire, they are removed explicitly by text, code, or by
/// clearing the field.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
    pub code: u32,
    pub help: String,
    pub handled: bool,
}

impl Message {
    #[must_use]
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            code: 0,
            help: String::new(),
            handled: false,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::ValidationError)
    }

    #[must_use]
    pub fn runtime_error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::RuntimeError)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Warning)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    #[must_use]
    pub fn with_code(mut self, code: u32) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// True when the message carries a nonzero dedup code.
    #[must_use]
    pub const fn is_coded(&self) -> bool {
        self.code != 0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
