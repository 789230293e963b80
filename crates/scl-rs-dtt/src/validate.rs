// crates/scl-rs-dtt/src/validate.rs

//! Whole-document validation.
//!
//! Every instance node below every logical node is checked against its
//! template. A failing node is reported once and its subtree skipped; its
//! siblings and the rest of the document are still checked. A `DOI` or `SDI`
//! without children stops at a structured node and is reported as such.

use crate::chain::TypeChain;
use crate::diagnostics::Diagnostics;
use crate::error::SclError;
use crate::instance::InstanceNode;
use crate::path::{DataPath, PathSegment};
use crate::tracker::{Tracker, check_kind};
use crate::types::{Ied, LogicalDevice, LogicalNode};
use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use log::debug;

impl<'r> Tracker<'r> {
    /// Validates the registry and then every logical node of `devices`.
    ///
    /// Diagnostic paths read `inst/LNName.path`.
    pub fn validate_document(&self, devices: &[LogicalDevice]) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.registry().verify(&mut diagnostics);
        for ld in devices {
            self.validate_logical_device(&ld.inst, ld, &mut diagnostics);
        }
        debug!(
            "Validated {} logical device(s): {} diagnostic(s)",
            devices.len(),
            diagnostics.len()
        );
        diagnostics
    }

    /// Validates the registry and the logical devices of every IED.
    ///
    /// Diagnostic paths read `LDName/LNName.path`.
    pub fn validate_ieds(&self, ieds: &[Ied]) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.registry().verify(&mut diagnostics);
        for ied in ieds {
            for ld in &ied.logical_devices {
                self.validate_logical_device(&ied.ld_name(ld), ld, &mut diagnostics);
            }
        }
        debug!(
            "Validated {} IED(s): {} diagnostic(s)",
            ieds.len(),
            diagnostics.len()
        );
        diagnostics
    }

    pub fn validate_logical_device(
        &self,
        ld_name: &str,
        ld: &LogicalDevice,
        diagnostics: &mut Diagnostics,
    ) {
        for ln in &ld.logical_nodes {
            self.validate_logical_node(ld_name, ln, diagnostics);
        }
    }

    /// Validates the instance tree of one logical node.
    pub fn validate_logical_node(
        &self,
        ld_name: &str,
        node: &LogicalNode,
        diagnostics: &mut Diagnostics,
    ) {
        let base = format!("{}/{}", ld_name, node.name());
        match TypeChain::start(self.registry(), &node.ln_type, self.config().max_depth) {
            Ok(chain) => {
                self.validate_children(&base, &chain, InstanceNode::LogicalNode(node), diagnostics)
            }
            Err(e) => diagnostics.record_error(base, &e),
        }
    }

    fn validate_children(
        &self,
        base: &str,
        chain: &TypeChain<'r>,
        instance: InstanceNode<'_>,
        diagnostics: &mut Diagnostics,
    ) {
        let mut seen = BTreeSet::new();

        for child in instance.children() {
            let segment = PathSegment {
                name: child.name().to_string(),
                index: child.index(),
            };
            let here = label(base, &chain.prefix().child(segment.clone()));

            if !seen.insert((child.name(), child.index())) {
                let duplicate = SclError::StructuralMismatch {
                    prefix: chain.prefix().clone(),
                    name: segment.to_string(),
                    reason: "duplicate instance node",
                };
                diagnostics.record_error(here, &duplicate);
                continue;
            }

            let mut next = chain.clone();
            let template = match next.step(&segment) {
                Ok(template) => template,
                Err(e) => {
                    diagnostics.record_error(here, &e);
                    continue;
                }
            };
            if let Err(e) = check_kind(&template, &child, next.prefix()) {
                diagnostics.record_error(here, &e);
                continue;
            }

            match child {
                InstanceNode::Dai(dai) => {
                    if let Err(e) = self.check_leaf(&template, dai, next.prefix()) {
                        diagnostics.record_error(here, &e);
                    }
                }
                _ if child.children().next().is_none() => diagnostics.record_error(
                    here,
                    &SclError::IncompleteStructuredPath {
                        prefix: next.prefix().clone(),
                    },
                ),
                _ => self.validate_children(base, &next, child, diagnostics),
            }
        }
    }
}

fn label(base: &str, path: &DataPath) -> String {
    format!("{}.{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tracker::tests::{node, registry};
    use crate::types::{Dai, Doi, Sdi};
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_clean_document_has_no_diagnostics() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let mut ln = node();
        // The shared fixture leaves `A.phsA` without children.
        ln.data_objects.retain(|doi| doi.name != "A");
        let mut ld = LogicalDevice::new("LD1");
        ld.logical_nodes.push(ln);
        let diagnostics = tracker.validate_document(&[ld]);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_empty_structured_nodes_are_incomplete() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let ln = node().with_doi(Doi::new("MinA"));

        let mut diagnostics = Diagnostics::new();
        tracker.validate_logical_node("LD1", &ln, &mut diagnostics);
        let found: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.path.as_str(), d.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("LD1/MMXU1.A.phsA", ErrorKind::IncompleteStructuredPath),
                ("LD1/MMXU1.MinA", ErrorKind::IncompleteStructuredPath),
            ]
        );

        // Resolving through the same node raises the same kind.
        let err = tracker.resolve_str(&ln, "A.phsA").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteStructuredPath);
    }

    #[test]
    fn test_each_defect_reported_once_in_document_order() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let ln = LogicalNode::new("MMXU", "1", "MMXU_T")
            .with_doi(Doi::new("Beh").with_dai(Dai::new("stVal").with_value("sleeping")))
            .with_doi(
                Doi::new("TotW")
                    .with_sdi(Sdi::new("mag").with_dai(Dai::new("g").with_value("1")))
                    .with_dai(Dai::new("d")),
            )
            .with_doi(Doi::new("Health"))
            .with_doi(Doi::new("A").with_sdi(Sdi::new("phsA").with_sdi(Sdi::new("cVal"))));
        let mut ld = LogicalDevice::new("LD1");
        ld.logical_nodes.push(ln);

        let diagnostics = tracker.validate_document(&[ld]);
        let found: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.path.as_str(), d.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("LD1/MMXU1.Beh.stVal", ErrorKind::InvalidEnumValue),
                ("LD1/MMXU1.TotW.mag.g", ErrorKind::StructuralMismatch),
                ("LD1/MMXU1.TotW.d", ErrorKind::MissingValue),
                ("LD1/MMXU1.Health", ErrorKind::StructuralMismatch),
                ("LD1/MMXU1.A.phsA.cVal", ErrorKind::IncompleteStructuredPath),
            ]
        );
    }

    #[test]
    fn test_duplicate_and_misplaced_nodes() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let ln = LogicalNode::new("MMXU", "1", "MMXU_T")
            .with_doi(Doi::new("Beh").with_dai(Dai::new("stVal").with_value("on")))
            .with_doi(Doi::new("Beh"))
            .with_doi(Doi::new("TotW").with_sdi(Sdi::new("d")));

        let mut diagnostics = Diagnostics::new();
        tracker.validate_logical_node("LD1", &ln, &mut diagnostics);
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, [ErrorKind::StructuralMismatch, ErrorKind::TypeMismatch]);
        assert_eq!(diagnostics.results()[1].path, "LD1/MMXU1.TotW.d");
    }

    #[test]
    fn test_unknown_ln_type_is_reported_at_the_node() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let mut diagnostics = Diagnostics::new();
        tracker.validate_logical_node("LD1", &LogicalNode::new("XCBR", "1", "XCBR_T"), &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.results()[0].path, "LD1/XCBR1");
        assert_eq!(diagnostics.results()[0].kind, ErrorKind::UnknownTemplateReference);
    }

    #[test]
    fn test_ieds_use_ld_names() {
        let registry = registry();
        let tracker = Tracker::new(&registry);
        let mut ld = LogicalDevice::new("LD1");
        ld.logical_nodes.push(
            LogicalNode::new("MMXU", "1", "MMXU_T").with_doi(Doi::new("TotW").with_dai(Dai::new("d"))),
        );
        let ied = Ied {
            name: "IED1".to_string(),
            logical_devices: vec![ld],
        };
        let diagnostics = tracker.validate_ieds(&[ied]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.results()[0].path, "IED1LD1/MMXU1.TotW.d");
    }
}
