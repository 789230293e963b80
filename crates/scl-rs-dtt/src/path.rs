// crates/scl-rs-dtt/src/path.rs

//! Data attribute paths and object references.
//!
//! A data path names a chain of data objects and data attributes below a
//! logical node: `segment ("." segment)*` with `segment = name ["(" index ")"]`.
//! An object reference prefixes it with the logical device and logical node
//! names: `LDName/LNName.DataName[.DataName[...]].DataAttributeName[...]`.

use crate::error::SclError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// One `name` or `name(index)` step of a [`DataPath`]. `name[index]` is
/// accepted on input too.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathSegment {
    pub name: String,
    pub index: Option<u32>,
}

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}({})", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

/// An ordered list of [`PathSegment`]s, e.g. `phsA.cVal.mag.f`.
///
/// The empty path is valid as a value (it is the "matched nothing yet"
/// prefix carried by errors) but is rejected by [`FromStr`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataPath {
    segments: Vec<PathSegment>,
}

impl DataPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Returns a copy of this path extended by `segment`.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Returns the first `len` segments (or the whole path if shorter).
    pub fn prefix(&self, len: usize) -> Self {
        let end = len.min(self.segments.len());
        Self {
            segments: self.segments[..end].to_vec(),
        }
    }

    /// Returns the segments from `start` onwards.
    pub fn suffix(&self, start: usize) -> Self {
        let start = start.min(self.segments.len());
        Self {
            segments: self.segments[start..].to_vec(),
        }
    }

    /// Concatenates `other` after this path.
    pub fn join(&self, other: &DataPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn starts_with(&self, other: &DataPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl From<Vec<PathSegment>> for DataPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl<'a> IntoIterator for &'a DataPath {
    type Item = &'a PathSegment;
    type IntoIter = core::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DataPath {
    type Err = SclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(invalid_path(s, "empty path"));
        }
        let segments = s
            .split('.')
            .map(|raw| parse_segment(s, raw))
            .collect::<Result<Vec<_>, SclError>>()?;
        Ok(Self { segments })
    }
}

fn parse_segment(path: &str, raw: &str) -> Result<PathSegment, SclError> {
    let (name, index) = match raw.find(['(', '[']) {
        Some(open) => {
            let (name, rest) = raw.split_at(open);
            let close = if rest.starts_with('(') { ')' } else { ']' };
            let digits = rest[1..]
                .strip_suffix(close)
                .ok_or_else(|| invalid_path(path, "unterminated index"))?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid_path(path, "index must be a decimal number"));
            }
            let index = digits
                .parse::<u32>()
                .map_err(|_| invalid_path(path, "index out of range"))?;
            (name, Some(index))
        }
        None => (raw, None),
    };

    if name.is_empty() {
        return Err(invalid_path(path, "empty segment name"));
    }
    if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(invalid_path(path, "invalid character in segment name"));
    }

    Ok(PathSegment {
        name: name.to_string(),
        index,
    })
}

fn invalid_path(path: &str, reason: &'static str) -> SclError {
    SclError::InvalidPath {
        path: path.to_string(),
        reason,
    }
}

/// A full object reference: `LDName/LNName.DataName...`.
///
/// `LDName` is the IED name followed by the logical device `inst`, and
/// `LNName` is `prefix + lnClass + inst` (`LLN0` for the LN0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    pub ld_name: String,
    pub ln_name: String,
    pub data_path: DataPath,
}

impl FromStr for ObjectReference {
    type Err = SclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ld_name, rest) = s
            .split_once('/')
            .ok_or_else(|| invalid_path(s, "missing '/' after logical device name"))?;
        if ld_name.is_empty() || rest.contains('/') {
            return Err(invalid_path(s, "malformed logical device name"));
        }
        let (ln_name, data) = rest
            .split_once('.')
            .ok_or_else(|| invalid_path(s, "missing data path after logical node name"))?;
        if ln_name.is_empty() {
            return Err(invalid_path(s, "empty logical node name"));
        }
        let data_path = data.parse::<DataPath>().map_err(|err| match err {
            SclError::InvalidPath { reason, .. } => invalid_path(s, reason),
            other => other,
        })?;

        Ok(Self {
            ld_name: ld_name.to_string(),
            ln_name: ln_name.to_string(),
            data_path,
        })
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.ld_name, self.ln_name, self.data_path)
    }
}
