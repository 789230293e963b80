// crates/scl-rs-dtt/src/error.rs

use crate::path::DataPath;
use crate::registry::TemplateKind;
use alloc::fmt;
use alloc::string::String;
use quick_xml::errors::serialize::DeError;

/// Errors that can occur while loading templates or resolving instance paths.
///
/// Every variant raised while walking a path carries the `prefix` of the path
/// that was successfully matched before the failure.
#[derive(Debug)]
pub enum SclError {
    /// An error from the underlying `quick-xml` deserializer.
    XmlParsing(DeError),

    /// A required XML attribute was missing (e.g., `DOType@id`).
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute had a value outside its schema (e.g., an unknown `bType`).
    InvalidAttributeFormat {
        attribute: &'static str,
        value: String,
    },

    /// A data path or object reference string does not follow the grammar.
    InvalidPath { path: String, reason: &'static str },

    /// A referenced template id is absent from the registry.
    UnknownTemplateReference {
        kind: TemplateKind,
        id: String,
        prefix: DataPath,
    },

    /// Two templates of the same kind share an id.
    DuplicateTemplateId { kind: TemplateKind, id: String },

    /// A type chain revisits a type id (or exceeds the configured depth).
    CyclicTypeReference { id: String, prefix: DataPath },

    /// A name or position has no counterpart in the governing template.
    StructuralMismatch {
        prefix: DataPath,
        name: String,
        reason: &'static str,
    },

    /// The declared basic type conflicts with the structure found.
    TypeMismatch {
        prefix: DataPath,
        expected: &'static str,
        found: String,
    },

    /// A leaf requiring an explicit value has none.
    MissingValue { prefix: DataPath },

    /// A bound value is not a symbol of its enumeration type.
    InvalidEnumValue {
        prefix: DataPath,
        enum_type: String,
        value: String,
    },

    /// The path stops at a structured node, which carries no value.
    IncompleteStructuredPath { prefix: DataPath },

    /// A setting value lies outside `minVal`/`maxVal` or off the `stepSize` grid.
    ValueOutOfBounds {
        prefix: DataPath,
        value: String,
        bound: &'static str,
        limit: String,
    },
}

/// The category of an [`SclError`], as recorded in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    UnknownTemplateReference,
    DuplicateTemplateId,
    CyclicTypeReference,
    StructuralMismatch,
    TypeMismatch,
    MissingValue,
    InvalidEnumValue,
    IncompleteStructuredPath,
    ValueOutOfBounds,
    InvalidPath,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnknownTemplateReference => "UnknownTemplateReference",
            ErrorKind::DuplicateTemplateId => "DuplicateTemplateId",
            ErrorKind::CyclicTypeReference => "CyclicTypeReference",
            ErrorKind::StructuralMismatch => "StructuralMismatch",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::MissingValue => "MissingValue",
            ErrorKind::InvalidEnumValue => "InvalidEnumValue",
            ErrorKind::IncompleteStructuredPath => "IncompleteStructuredPath",
            ErrorKind::ValueOutOfBounds => "ValueOutOfBounds",
            ErrorKind::InvalidPath => "InvalidPath",
            ErrorKind::Parse => "Parse",
        };
        f.write_str(name)
    }
}

impl SclError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SclError::XmlParsing(_)
            | SclError::MissingAttribute { .. }
            | SclError::InvalidAttributeFormat { .. } => ErrorKind::Parse,
            SclError::InvalidPath { .. } => ErrorKind::InvalidPath,
            SclError::UnknownTemplateReference { .. } => ErrorKind::UnknownTemplateReference,
            SclError::DuplicateTemplateId { .. } => ErrorKind::DuplicateTemplateId,
            SclError::CyclicTypeReference { .. } => ErrorKind::CyclicTypeReference,
            SclError::StructuralMismatch { .. } => ErrorKind::StructuralMismatch,
            SclError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            SclError::MissingValue { .. } => ErrorKind::MissingValue,
            SclError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            SclError::IncompleteStructuredPath { .. } => ErrorKind::IncompleteStructuredPath,
            SclError::ValueOutOfBounds { .. } => ErrorKind::ValueOutOfBounds,
        }
    }

    /// The path prefix matched before the failure, for errors raised on a path.
    pub fn prefix(&self) -> Option<&DataPath> {
        match self {
            SclError::UnknownTemplateReference { prefix, .. }
            | SclError::CyclicTypeReference { prefix, .. }
            | SclError::StructuralMismatch { prefix, .. }
            | SclError::TypeMismatch { prefix, .. }
            | SclError::MissingValue { prefix }
            | SclError::InvalidEnumValue { prefix, .. }
            | SclError::IncompleteStructuredPath { prefix }
            | SclError::ValueOutOfBounds { prefix, .. } => Some(prefix),
            _ => None,
        }
    }

    /// Fills in the matched prefix of a path error that was raised without one.
    pub(crate) fn at(mut self, matched: &DataPath) -> Self {
        if let Some(prefix) = self.prefix_mut() {
            if prefix.is_empty() {
                *prefix = matched.clone();
            }
        }
        self
    }

    fn prefix_mut(&mut self) -> Option<&mut DataPath> {
        match self {
            SclError::UnknownTemplateReference { prefix, .. }
            | SclError::CyclicTypeReference { prefix, .. }
            | SclError::StructuralMismatch { prefix, .. }
            | SclError::TypeMismatch { prefix, .. }
            | SclError::MissingValue { prefix }
            | SclError::InvalidEnumValue { prefix, .. }
            | SclError::IncompleteStructuredPath { prefix }
            | SclError::ValueOutOfBounds { prefix, .. } => Some(prefix),
            _ => None,
        }
    }
}

impl From<DeError> for SclError {
    fn from(e: DeError) -> Self {
        SclError::XmlParsing(e)
    }
}

impl fmt::Display for SclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SclError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            SclError::MissingAttribute { element, attribute } => {
                write!(f, "Missing required attribute {}@{}", element, attribute)
            }
            SclError::InvalidAttributeFormat { attribute, value } => {
                write!(f, "Invalid value '{}' for attribute {}", value, attribute)
            }
            SclError::InvalidPath { path, reason } => {
                write!(f, "Invalid path '{}': {}", path, reason)
            }
            SclError::UnknownTemplateReference { kind, id, prefix } => {
                write!(f, "Unknown {} '{}' referenced at '{}'", kind, id, prefix)
            }
            SclError::DuplicateTemplateId { kind, id } => {
                write!(f, "Duplicate {} id '{}'", kind, id)
            }
            SclError::CyclicTypeReference { id, prefix } => {
                write!(f, "Cyclic type reference to '{}' after '{}'", id, prefix)
            }
            SclError::StructuralMismatch {
                prefix,
                name,
                reason,
            } => write!(f, "'{}' after '{}': {}", name, prefix, reason),
            SclError::TypeMismatch {
                prefix,
                expected,
                found,
            } => write!(f, "Type mismatch at '{}': expected {}, found {}", prefix, expected, found),
            SclError::MissingValue { prefix } => write!(f, "Missing value at '{}'", prefix),
            SclError::InvalidEnumValue {
                prefix,
                enum_type,
                value,
            } => write!(
                f,
                "Value '{}' at '{}' is not a symbol of EnumType '{}'",
                value, prefix, enum_type
            ),
            SclError::IncompleteStructuredPath { prefix } => {
                write!(f, "Path '{}' stops at a structured node", prefix)
            }
            SclError::ValueOutOfBounds {
                prefix,
                value,
                bound,
                limit,
            } => write!(
                f,
                "Value {} at '{}' violates {} ({})",
                value, prefix, bound, limit
            ),
        }
    }
}

impl core::error::Error for SclError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;
    use alloc::string::ToString;

    #[test]
    fn test_from_de_error() {
        let xml_err =
            quick_xml::de::from_str::<crate::model::DataTypeTemplates>("<DataTypeTemplates><LNodeType")
                .unwrap_err();
        let err: SclError = xml_err.into();
        assert!(matches!(err, SclError::XmlParsing(_)));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_at_fills_only_empty_prefix() {
        let matched: DataPath = "Pos".parse().unwrap();
        let err = SclError::MissingValue {
            prefix: DataPath::new(),
        }
        .at(&matched);
        assert_eq!(err.prefix(), Some(&matched));

        let deeper: DataPath = "Pos.stVal".parse().unwrap();
        let err = SclError::MissingValue {
            prefix: deeper.clone(),
        }
        .at(&matched);
        assert_eq!(err.prefix(), Some(&deeper));
    }

    #[test]
    fn test_parse_errors_have_no_prefix() {
        let err = SclError::MissingAttribute {
            element: "DOType",
            attribute: "id",
        };
        assert!(err.prefix().is_none());
        assert_eq!(err.to_string(), "Missing required attribute DOType@id");
    }

    #[test]
    fn test_display_structural_mismatch() {
        let err = SclError::StructuralMismatch {
            prefix: DataPath::from(alloc::vec![PathSegment::new("Pos")]),
            name: "stValue".to_string(),
            reason: "no such child in template",
        };
        assert_eq!(err.to_string(), "'stValue' after 'Pos': no such child in template");
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
    }
}
