// crates/scl-rs-dtt/src/bounds.rs

//! Range checks for integer and analogue settings (`ING` and `ASG`).
//!
//! The setting value at `setVal` or `setMag.f` is compared against the
//! sibling attributes `minVal`, `maxVal` and `stepSize` of the same data
//! object. A bound set in the instance tree wins over the template default.

use crate::chain::TemplateNode;
use crate::error::SclError;
use crate::path::{DataPath, PathSegment};
use crate::tracker::{Outcome, Tracker, Walk};
use crate::types::LogicalNode;
use alloc::string::{String, ToString};
use log::debug;

const BOUNDED_CDCS: [&str; 2] = ["ING", "ASG"];
const MIN_VAL: &str = "minVal";
const MAX_VAL: &str = "maxVal";
const STEP_SIZE: &str = "stepSize";

const EPSILON: f64 = 1e-9;

impl<'r> Tracker<'r> {
    /// Checks the setting at `path` against the range declared by its data
    /// object. Data objects of other CDCs, and settings without any value,
    /// pass unchecked.
    ///
    /// # Errors
    /// - `TypeMismatch` if the setting or a bound is not a number.
    /// - `ValueOutOfBounds` naming the violated bound.
    pub fn check_setting_bounds(&self, node: &LogicalNode, path: &DataPath) -> Result<(), SclError> {
        let walk = self.walk(node, path)?;
        let cdc = walk
            .chain
            .data_object_type()
            .map(|d| d.cdc.as_str())
            .unwrap_or_default();
        if !BOUNDED_CDCS.contains(&cdc) {
            return Ok(());
        }
        let da_name = path
            .segments()
            .get(walk.da_start)
            .map(|s| s.name.as_str())
            .unwrap_or_default();
        if [MIN_VAL, MAX_VAL, STEP_SIZE].contains(&da_name) {
            return Ok(());
        }

        let Some(raw) = leaf_value(&walk) else {
            return Ok(());
        };
        let value = parse_number(&raw, path)?;

        let bound_path = |bound: &str| {
            path.prefix(walk.da_start)
                .child(PathSegment::new(bound))
                .join(&path.suffix(walk.da_start + 1))
        };

        if let Some((min, limit)) = self.bound(node, &bound_path(MIN_VAL))? {
            if value < min {
                return Err(out_of_bounds(path, raw, MIN_VAL, limit));
            }
        }
        if let Some((max, limit)) = self.bound(node, &bound_path(MAX_VAL))? {
            if value > max {
                return Err(out_of_bounds(path, raw, MAX_VAL, limit));
            }
        }
        if let Some((step, limit)) = self.bound(node, &bound_path(STEP_SIZE))? {
            if step != 0.0 {
                let rem = abs(value % step);
                if rem > EPSILON && abs(step) - rem > EPSILON {
                    return Err(out_of_bounds(path, raw, STEP_SIZE, limit));
                }
            }
        }

        debug!("Setting '{}' of {} is within bounds", path, node.name());
        Ok(())
    }

    /// The numeric value of a bound, or `None` if the data object declares
    /// no such numeric attribute or it has no value.
    fn bound(&self, node: &LogicalNode, path: &DataPath) -> Result<Option<(f64, String)>, SclError> {
        let Ok(walk) = self.walk(node, path) else {
            return Ok(None);
        };
        if !walk.chain.current().basic_type().is_some_and(|b| b.is_numeric()) {
            return Ok(None);
        }
        match leaf_value(&walk) {
            Some(raw) => Ok(Some((parse_number(&raw, path)?, raw))),
            None => Ok(None),
        }
    }
}

/// The first bound value of the leaf, else its first template default.
fn leaf_value(walk: &Walk<'_, '_>) -> Option<String> {
    let bound = match &walk.outcome {
        Outcome::Found { dai, .. } => dai.value(),
        Outcome::Missing(_) => None,
    };
    let default = match walk.chain.current() {
        TemplateNode::DataAttribute { decl, .. } => decl.values.first().map(|v| v.value.as_str()),
        _ => None,
    };
    bound.or(default).map(ToString::to_string)
}

/// Parses a finite number. `NaN` and infinities compare false against every
/// bound, so they are rejected here.
fn parse_number(raw: &str, at: &DataPath) -> Result<f64, SclError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SclError::TypeMismatch {
            prefix: at.clone(),
            expected: "numeric value",
            found: raw.to_string(),
        }),
    }
}

fn out_of_bounds(path: &DataPath, value: String, bound: &'static str, limit: String) -> SclError {
    SclError::ValueOutOfBounds {
        prefix: path.clone(),
        value,
        bound,
        limit,
    }
}

fn abs(x: f64) -> f64 {
    if x < 0.0 { -x } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tracker::tests::{node, registry};
    use crate::types::{Dai, Doi};

    fn setting(value: &str) -> LogicalNode {
        LogicalNode::new("MMXU", "1", "MMXU_T")
            .with_doi(Doi::new("MinA").with_dai(Dai::new("setVal").with_value(value)))
    }

    fn check(ln: &LogicalNode) -> Result<(), SclError> {
        let registry = registry();
        Tracker::new(&registry).check_setting_bounds(ln, &"MinA.setVal".parse().unwrap())
    }

    #[test]
    fn test_value_within_template_bounds() {
        assert!(check(&setting("0")).is_ok());
        assert!(check(&setting("45")).is_ok());
        assert!(check(&setting("100")).is_ok());
    }

    #[test]
    fn test_value_outside_template_bounds() {
        let err = check(&setting("-5")).unwrap_err();
        assert!(matches!(
            err,
            SclError::ValueOutOfBounds { bound: "minVal", ref limit, .. } if limit == "0"
        ));
        let err = check(&setting("105")).unwrap_err();
        assert!(matches!(err, SclError::ValueOutOfBounds { bound: "maxVal", .. }));
        let err = check(&setting("42")).unwrap_err();
        assert!(matches!(err, SclError::ValueOutOfBounds { bound: "stepSize", .. }));
    }

    #[test]
    fn test_instance_bound_overrides_template_default() {
        let ln = LogicalNode::new("MMXU", "1", "MMXU_T").with_doi(
            Doi::new("MinA")
                .with_dai(Dai::new("setVal").with_value("150"))
                .with_dai(Dai::new("maxVal").with_value("200")),
        );
        assert!(check(&ln).is_ok());
    }

    #[test]
    fn test_non_numeric_setting() {
        let err = check(&setting("many")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_non_finite_setting() {
        for raw in ["NaN", "inf", "-infinity"] {
            let err = check(&setting(raw)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeMismatch, "{}", raw);
        }
    }

    #[test]
    fn test_missing_setting_and_other_cdcs_pass() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let empty = LogicalNode::new("MMXU", "1", "MMXU_T");
        assert!(tracker
            .check_setting_bounds(&empty, &"MinA.setVal".parse().unwrap())
            .is_ok());
        assert!(tracker
            .check_setting_bounds(&node(), &"TotW.mag.f".parse().unwrap())
            .is_ok());
    }
}
