// crates/scl-rs-dtt/src/listing.rs

//! Flat listing of the leaf attributes a logical-node type declares.

use crate::chain::{TemplateNode, TypeChain};
use crate::error::SclError;
use crate::path::DataPath;
use crate::registry::Registry;
use crate::tracker::TrackerConfig;
use crate::types::{BasicType, Fc, Val, ValKind};
use alloc::string::String;
use alloc::vec::Vec;

/// One leaf attribute of a logical-node type.
///
/// Array nodes appear once, without an index.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTemplate {
    pub path: DataPath,
    pub do_type_id: String,
    pub cdc: String,
    pub fc: Fc,
    pub b_type: BasicType,
    /// `EnumType` id of an `Enum` attribute.
    pub type_id: Option<String>,
    pub val_kind: Option<ValKind>,
    pub val_import: bool,
    pub count: u32,
    pub default_values: Vec<Val>,
}

impl AttributeTemplate {
    /// Same rule as [`DataAttributeRef::is_updatable`](crate::DataAttributeRef::is_updatable),
    /// on template flags only.
    pub fn is_updatable(&self) -> bool {
        self.val_import && matches!(self.fc, Fc::Cf | Fc::Dc | Fc::Sg | Fc::Sp | Fc::St | Fc::Se)
    }
}

/// Lists every leaf attribute below the `LNodeType` `ln_type_id`, in
/// declaration order, descending through sub-data-objects and structured
/// attributes.
///
/// # Errors
/// Fails on the first dangling reference or cyclic type chain met.
pub fn list_attribute_templates(
    registry: &Registry,
    ln_type_id: &str,
) -> Result<Vec<AttributeTemplate>, SclError> {
    let chain = TypeChain::start(registry, ln_type_id, TrackerConfig::default().max_depth)?;
    let mut out = Vec::new();
    collect(&chain, &mut out)?;
    Ok(out)
}

/// Lists the leaf attributes of one data object of an `LNodeType`.
pub fn list_data_object_attributes(
    registry: &Registry,
    ln_type_id: &str,
    do_name: &str,
) -> Result<Vec<AttributeTemplate>, SclError> {
    let mut chain = TypeChain::start(registry, ln_type_id, TrackerConfig::default().max_depth)?;
    chain.step_template(do_name)?;
    let mut out = Vec::new();
    collect(&chain, &mut out)?;
    Ok(out)
}

fn collect(chain: &TypeChain<'_>, out: &mut Vec<AttributeTemplate>) -> Result<(), SclError> {
    for name in chain.current().child_names() {
        let mut next = chain.clone();
        let node = next.step_template(name)?;
        match node {
            TemplateNode::DataAttribute {
                decl,
                fc,
                enum_type,
                ..
            } if !node.is_structured() => {
                let (do_type_id, cdc) = next
                    .data_object_type()
                    .map(|d| (d.id.clone(), d.cdc.clone()))
                    .unwrap_or_default();
                out.push(AttributeTemplate {
                    path: next.prefix().clone(),
                    do_type_id,
                    cdc,
                    fc,
                    b_type: decl.b_type,
                    type_id: enum_type.map(|e| e.id.clone()),
                    val_kind: decl.val_kind,
                    val_import: decl.val_import,
                    count: decl.count,
                    default_values: decl.values.clone(),
                });
            }
            _ => collect(&next, out)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemplateKind;
    use crate::tracker::tests::registry;
    use alloc::string::ToString;

    #[test]
    fn test_lists_leaves_in_declaration_order() {
        let registry = registry();
        let listed = list_attribute_templates(&registry, "MMXU_T").unwrap();
        let paths: Vec<_> = listed.iter().map(|a| a.path.to_string()).collect();
        assert_eq!(
            paths,
            [
                "Mod.stVal",
                "Mod.ctlModel",
                "Beh.stVal",
                "TotW.mag.f",
                "TotW.d",
                "A.phsA.cVal.mag.f",
                "A.phsA.cVal.ang.f",
                "MinA.setVal",
                "MinA.minVal",
                "MinA.maxVal",
                "MinA.stepSize",
            ]
        );
        let ctl_model = &listed[1];
        assert_eq!(ctl_model.type_id.as_deref(), Some("ctlModel"));
        assert_eq!(ctl_model.default_values, [Val::new("status-only")]);
        assert_eq!(listed[5].cdc, "CMV");
        assert_eq!(listed[5].fc, Fc::Mx);
    }

    #[test]
    fn test_lists_one_data_object() {
        let registry = registry();
        let listed = list_data_object_attributes(&registry, "MMXU_T", "MinA").unwrap();
        assert_eq!(listed.len(), 4);
        assert!(listed[0].is_updatable());
        assert!(listed.iter().skip(1).all(|a| !a.is_updatable()));
        assert!(list_data_object_attributes(&registry, "MMXU_T", "Hz").is_err());
    }

    #[test]
    fn test_unknown_lnode_type() {
        let registry = registry();
        assert!(matches!(
            list_attribute_templates(&registry, "Nope"),
            Err(SclError::UnknownTemplateReference {
                kind: TemplateKind::LNodeType,
                ..
            })
        ));
    }
}
