// crates/scl-rs-dtt/src/diagnostics.rs

//! Collects the failures found by whole-document validation.

use crate::error::{ErrorKind, SclError};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use log::warn;

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the failure occurred, e.g. `LD1/MMXU1.TotW.mag.f` or `DOType MV_T`.
    pub path: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.kind, self.message)
    }
}

/// An ordered collection of [`Diagnostic`]s.
///
/// Diagnostics keep the order in which they were recorded, which is the
/// traversal order of the validation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: impl Into<String>, kind: ErrorKind, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            path: path.into(),
            kind,
            message: message.into(),
        };
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Records an error, using its `Display` output as the message.
    pub fn record_error(&mut self, path: impl Into<String>, error: &SclError) {
        self.record(path, error.kind(), error.to_string());
    }

    pub fn results(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = alloc::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
