// crates/scl-rs-dtt/src/loader/utils.rs

//! Attribute conversion helpers shared by the loaders.

use crate::error::SclError;
use crate::model;
use crate::types;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

/// Returns the value of a required attribute, rejecting absent or empty ones.
pub(super) fn required(
    value: &Option<String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<String, SclError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SclError::MissingAttribute { element, attribute }),
    }
}

/// Returns an optional attribute, treating an empty string as absent.
pub(super) fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Parses an optional attribute with `FromStr`, mapping failures to
/// `InvalidAttributeFormat`.
pub(super) fn parse_optional<T: FromStr>(
    value: &Option<String>,
    attribute: &'static str,
) -> Result<Option<T>, SclError> {
    optional(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| SclError::InvalidAttributeFormat { attribute, value: v })
        })
        .transpose()
}

/// Parses an `xs:boolean` attribute (`true`, `false`, `1`, `0`).
pub(super) fn parse_bool(
    value: &Option<String>,
    attribute: &'static str,
) -> Result<Option<bool>, SclError> {
    optional(value)
        .map(|v| match v.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(SclError::InvalidAttributeFormat { attribute, value: v }),
        })
        .transpose()
}

/// Parses `@count`, which defaults to `0` (a scalar).
pub(super) fn parse_count(value: &Option<String>) -> Result<u32, SclError> {
    Ok(parse_optional::<u32>(value, "count")?.unwrap_or(0))
}

/// Converts `<Val>` elements, trimming surrounding whitespace from their text.
pub(super) fn resolve_vals(vals: &[model::Val]) -> Result<Vec<types::Val>, SclError> {
    vals.iter()
        .map(|val| {
            Ok(types::Val {
                s_group: parse_optional::<u32>(&val.s_group, "sGroup")?,
                value: val.value.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_required_rejects_empty() {
        assert_eq!(required(&some(" MV_T "), "DOType", "id").unwrap(), "MV_T");
        assert!(matches!(
            required(&some(""), "DOType", "id"),
            Err(SclError::MissingAttribute {
                element: "DOType",
                attribute: "id"
            })
        ));
        assert!(required(&None, "DOType", "id").is_err());
    }

    #[test]
    fn test_parse_bool_and_count() {
        assert_eq!(parse_bool(&some("true"), "valImport").unwrap(), Some(true));
        assert_eq!(parse_bool(&some("0"), "valImport").unwrap(), Some(false));
        assert_eq!(parse_bool(&None, "valImport").unwrap(), None);
        assert!(matches!(
            parse_bool(&some("yes"), "valImport"),
            Err(SclError::InvalidAttributeFormat { attribute: "valImport", .. })
        ));
        assert_eq!(parse_count(&None).unwrap(), 0);
        assert_eq!(parse_count(&some("4")).unwrap(), 4);
        assert!(parse_count(&some("-1")).is_err());
    }

    #[test]
    fn test_resolve_vals_trims_text() {
        let vals = [
            model::Val {
                s_group: None,
                value: "\n  on \n".to_string(),
            },
            model::Val {
                s_group: some("2"),
                value: "10".to_string(),
            },
        ];
        let resolved = resolve_vals(&vals).unwrap();
        assert_eq!(resolved[0], types::Val::new("on"));
        assert_eq!(resolved[1], types::Val::in_group(2, "10"));
    }
}
