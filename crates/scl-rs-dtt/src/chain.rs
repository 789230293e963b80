// crates/scl-rs-dtt/src/chain.rs

//! The type chain: template nodes and the step from a node to a named child.
//!
//! A [`TypeChain`] walks the templates below one `LNodeType`, one path
//! segment at a time. It keeps the ids of the `DOType`s and `DAType`s it has
//! entered so that a chain referencing itself fails instead of looping.

use crate::error::SclError;
use crate::path::{DataPath, PathSegment};
use crate::registry::{Registry, TemplateKind};
use crate::types::{
    BasicType, DaType, DataAttribute, DataObject, DoType, EnumType, Fc, LNodeType, TypeClass,
};
use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::trace;

/// A node of the template tree, with its referenced type already resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateNode<'r> {
    /// The root of a chain.
    LNodeType(&'r LNodeType),
    /// A `DO` of an `LNodeType` or an `SDO` of a `DOType`.
    DataObject {
        decl: &'r DataObject,
        do_type: &'r DoType,
    },
    /// A `DA` of a `DOType` or a `BDA` of a `DAType`.
    ///
    /// `fc` is the functional constraint of the `DA` the attribute is
    /// reached through.
    DataAttribute {
        decl: &'r DataAttribute,
        fc: Fc,
        da_type: Option<&'r DaType>,
        enum_type: Option<&'r EnumType>,
    },
}

impl<'r> TemplateNode<'r> {
    pub fn name(&self) -> &'r str {
        match *self {
            TemplateNode::LNodeType(lnt) => &lnt.id,
            TemplateNode::DataObject { decl, .. } => &decl.name,
            TemplateNode::DataAttribute { decl, .. } => &decl.name,
        }
    }

    pub fn class(&self) -> TypeClass {
        match self {
            TemplateNode::LNodeType(_) | TemplateNode::DataObject { .. } => TypeClass::Structured,
            TemplateNode::DataAttribute { decl, .. } => decl.class(),
        }
    }

    pub fn is_structured(&self) -> bool {
        self.class() == TypeClass::Structured
    }

    pub fn count(&self) -> u32 {
        match self {
            TemplateNode::LNodeType(_) => 0,
            TemplateNode::DataObject { decl, .. } => decl.count,
            TemplateNode::DataAttribute { decl, .. } => decl.count,
        }
    }

    pub fn is_array(&self) -> bool {
        self.count() > 1
    }

    pub fn fc(&self) -> Option<Fc> {
        match self {
            TemplateNode::DataAttribute { fc, .. } => Some(*fc),
            _ => None,
        }
    }

    pub fn basic_type(&self) -> Option<BasicType> {
        match self {
            TemplateNode::DataAttribute { decl, .. } => Some(decl.b_type),
            _ => None,
        }
    }

    /// The `DOType` or `DAType` this node introduces into the chain.
    fn type_ref(&self) -> Option<(TemplateKind, &'r str)> {
        match *self {
            TemplateNode::DataObject { do_type, .. } => Some((TemplateKind::DoType, &do_type.id)),
            TemplateNode::DataAttribute {
                da_type: Some(da_type),
                ..
            } => Some((TemplateKind::DaType, &da_type.id)),
            _ => None,
        }
    }

    /// Names of the children, in declaration order (`SDO`s before `DA`s).
    pub fn child_names(&self) -> Vec<&'r str> {
        match *self {
            TemplateNode::LNodeType(lnt) => lnt.data_objects.iter().map(|d| d.name.as_str()).collect(),
            TemplateNode::DataObject { do_type, .. } => do_type
                .sub_data_objects
                .iter()
                .map(|s| s.name.as_str())
                .chain(do_type.data_attributes.iter().map(|d| d.name.as_str()))
                .collect(),
            TemplateNode::DataAttribute {
                da_type: Some(da_type),
                ..
            } => da_type.attributes.iter().map(|b| b.name.as_str()).collect(),
            TemplateNode::DataAttribute { .. } => Vec::new(),
        }
    }

    /// Human readable node kind, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TemplateNode::LNodeType(_) => "LNodeType",
            TemplateNode::DataObject { .. } => "data object",
            TemplateNode::DataAttribute { .. } => "data attribute",
        }
    }
}

/// Returns the child of `current` named `name`, resolving its type.
///
/// Errors carry an empty prefix; [`TypeChain`] fills it in.
pub fn step<'r>(
    registry: &'r Registry,
    current: &TemplateNode<'r>,
    name: &str,
) -> Result<TemplateNode<'r>, SclError> {
    match *current {
        TemplateNode::LNodeType(lnt) => match lnt.data_object(name) {
            Some(decl) => enter_data_object(registry, decl),
            None => Err(mismatch(name, "no such data object in LNodeType")),
        },
        TemplateNode::DataObject { do_type, .. } => {
            if let Some(decl) = do_type.sub_data_object(name) {
                return enter_data_object(registry, decl);
            }
            match do_type.data_attribute(name) {
                Some(decl) => {
                    let fc = decl
                        .fc
                        .ok_or_else(|| mismatch(name, "data attribute without functional constraint"))?;
                    enter_attribute(registry, decl, fc)
                }
                None => Err(mismatch(name, "no such child in DOType")),
            }
        }
        TemplateNode::DataAttribute {
            decl, fc, da_type, ..
        } => match da_type {
            Some(da_type) => match da_type.attribute(name) {
                Some(bda) => enter_attribute(registry, bda, bda.fc.unwrap_or(fc)),
                None => Err(mismatch(name, "no such child in DAType")),
            },
            None => Err(SclError::TypeMismatch {
                prefix: DataPath::new(),
                expected: "Struct",
                found: decl.b_type.to_string(),
            }),
        },
    }
}

fn enter_data_object<'r>(
    registry: &'r Registry,
    decl: &'r DataObject,
) -> Result<TemplateNode<'r>, SclError> {
    let do_type = registry.do_type(&decl.type_id)?;
    Ok(TemplateNode::DataObject { decl, do_type })
}

fn enter_attribute<'r>(
    registry: &'r Registry,
    decl: &'r DataAttribute,
    fc: Fc,
) -> Result<TemplateNode<'r>, SclError> {
    let mut da_type = None;
    let mut enum_type = None;
    match decl.b_type {
        BasicType::Struct => {
            let id = decl.type_id.as_deref().ok_or_else(|| untyped(decl, "DAType reference"))?;
            da_type = Some(registry.da_type(id)?);
        }
        BasicType::Enum => {
            let id = decl.type_id.as_deref().ok_or_else(|| untyped(decl, "EnumType reference"))?;
            enum_type = Some(registry.enum_type(id)?);
        }
        _ => {}
    }
    Ok(TemplateNode::DataAttribute {
        decl,
        fc,
        da_type,
        enum_type,
    })
}

fn untyped(decl: &DataAttribute, expected: &'static str) -> SclError {
    SclError::TypeMismatch {
        prefix: DataPath::new(),
        expected,
        found: alloc::format!("bType {} without type", decl.b_type),
    }
}

fn mismatch(name: &str, reason: &'static str) -> SclError {
    SclError::StructuralMismatch {
        prefix: DataPath::new(),
        name: name.to_string(),
        reason,
    }
}

/// A walk through the templates below one `LNodeType`.
///
/// Cloning a chain forks the walk; each fork keeps its own visited set.
#[derive(Debug, Clone)]
pub struct TypeChain<'r> {
    registry: &'r Registry,
    visited: BTreeSet<(TemplateKind, &'r str)>,
    max_depth: usize,
    prefix: DataPath,
    current: TemplateNode<'r>,
    data_object_type: Option<&'r DoType>,
}

impl<'r> TypeChain<'r> {
    /// Starts a chain at the `LNodeType` with id `ln_type`.
    pub fn start(registry: &'r Registry, ln_type: &str, max_depth: usize) -> Result<Self, SclError> {
        let lnt = registry.lnode_type(ln_type)?;
        Ok(Self {
            registry,
            visited: BTreeSet::new(),
            max_depth,
            prefix: DataPath::new(),
            current: TemplateNode::LNodeType(lnt),
            data_object_type: None,
        })
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn current(&self) -> TemplateNode<'r> {
        self.current
    }

    /// The segments matched so far.
    pub fn prefix(&self) -> &DataPath {
        &self.prefix
    }

    pub fn depth(&self) -> usize {
        self.prefix.len()
    }

    /// The innermost `DOType` entered, which owns the current attribute.
    pub fn data_object_type(&self) -> Option<&'r DoType> {
        self.data_object_type
    }

    /// Advances by one path segment, checking its index against the
    /// template `count`.
    pub fn step(&mut self, segment: &PathSegment) -> Result<TemplateNode<'r>, SclError> {
        let next = self.next(&segment.name)?;

        match (next.is_array(), segment.index) {
            (true, None) => {
                return Err(self.index_mismatch(segment, "array node requires an index"));
            }
            (true, Some(index)) if index >= next.count() => {
                return Err(self.index_mismatch(segment, "index exceeds the template count"));
            }
            (false, Some(_)) => {
                return Err(self.index_mismatch(segment, "index on a non-array node"));
            }
            _ => {}
        }

        self.commit(next, segment.clone());
        Ok(next)
    }

    /// Advances by name only, as when walking templates without instances.
    /// The index is left off the prefix.
    pub fn step_template(&mut self, name: &str) -> Result<TemplateNode<'r>, SclError> {
        let next = self.next(name)?;
        self.commit(next, PathSegment::new(name));
        Ok(next)
    }

    fn next(&self, name: &str) -> Result<TemplateNode<'r>, SclError> {
        if self.depth() >= self.max_depth {
            return Err(SclError::CyclicTypeReference {
                id: String::from(self.current.name()),
                prefix: self.prefix.clone(),
            });
        }

        let next = step(self.registry, &self.current, name).map_err(|e| e.at(&self.prefix))?;

        if let Some(type_ref) = next.type_ref() {
            if self.visited.contains(&type_ref) {
                return Err(SclError::CyclicTypeReference {
                    id: String::from(type_ref.1),
                    prefix: self.prefix.clone(),
                });
            }
        }

        trace!(
            "'{}' after '{}' resolved to {} ({:?})",
            name,
            self.prefix,
            next.kind_name(),
            next.class()
        );
        Ok(next)
    }

    fn commit(&mut self, next: TemplateNode<'r>, segment: PathSegment) {
        if let Some(type_ref) = next.type_ref() {
            self.visited.insert(type_ref);
        }
        if let TemplateNode::DataObject { do_type, .. } = next {
            self.data_object_type = Some(do_type);
        }
        self.prefix.push(segment);
        self.current = next;
    }

    fn index_mismatch(&self, segment: &PathSegment, reason: &'static str) -> SclError {
        SclError::StructuralMismatch {
            prefix: self.prefix.clone(),
            name: segment.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumVal, TemplateSection};
    use alloc::vec;

    fn registry(extra_da_types: Vec<DaType>) -> Registry {
        let mut da_types = vec![
            DaType {
                id: "AV_T".to_string(),
                attributes: vec![DataAttribute::new("f", BasicType::Float32)],
            },
            DaType {
                id: "Origin_T".to_string(),
                attributes: vec![
                    DataAttribute::new("orCat", BasicType::Enum).with_type("orCat"),
                    DataAttribute::new("orIdent", BasicType::Octet64),
                ],
            },
        ];
        da_types.extend(extra_da_types);
        Registry::load(TemplateSection {
            lnode_types: vec![LNodeType {
                id: "MMXU_T".to_string(),
                ln_class: "MMXU".to_string(),
                data_objects: vec![DataObject::new("TotW", "MV_T"), DataObject::new("A", "WYE_T")],
            }],
            do_types: vec![
                DoType {
                    id: "MV_T".to_string(),
                    cdc: "MV".to_string(),
                    sub_data_objects: vec![],
                    data_attributes: vec![
                        DataAttribute::new("mag", BasicType::Struct)
                            .with_fc(Fc::Mx)
                            .with_type("AV_T"),
                        DataAttribute::new("origin", BasicType::Struct)
                            .with_fc(Fc::St)
                            .with_type("Origin_T")
                            .with_count(4),
                        DataAttribute::new("loop", BasicType::Struct)
                            .with_fc(Fc::Cf)
                            .with_type("Loop_T"),
                    ],
                },
                DoType {
                    id: "WYE_T".to_string(),
                    cdc: "WYE".to_string(),
                    sub_data_objects: vec![DataObject::new("phsA", "MV_T")],
                    data_attributes: vec![],
                },
            ],
            da_types,
            enum_types: vec![EnumType {
                id: "orCat".to_string(),
                values: vec![EnumVal {
                    ord: 0,
                    symbol: "not-supported".to_string(),
                }],
            }],
        })
        .unwrap()
    }

    fn looping() -> Vec<DaType> {
        vec![DaType {
            id: "Loop_T".to_string(),
            attributes: vec![DataAttribute::new("again", BasicType::Struct).with_type("Loop_T")],
        }]
    }

    #[test]
    fn test_step_through_structured_attribute() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        let totw = chain.step(&PathSegment::new("TotW")).unwrap();
        assert!(totw.is_structured());
        chain.step(&PathSegment::new("mag")).unwrap();
        let leaf = chain.step(&PathSegment::new("f")).unwrap();
        assert_eq!(leaf.class(), TypeClass::Primitive);
        assert_eq!(leaf.fc(), Some(Fc::Mx));
        assert_eq!(leaf.basic_type(), Some(BasicType::Float32));
        assert_eq!(chain.prefix().to_string(), "TotW.mag.f");
        assert_eq!(chain.data_object_type().map(|d| d.cdc.as_str()), Some("MV"));
    }

    #[test]
    fn test_sub_data_object_updates_owning_do_type() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        chain.step(&PathSegment::new("A")).unwrap();
        assert_eq!(chain.data_object_type().map(|d| d.cdc.as_str()), Some("WYE"));
        chain.step(&PathSegment::new("phsA")).unwrap();
        assert_eq!(chain.data_object_type().map(|d| d.cdc.as_str()), Some("MV"));
    }

    #[test]
    fn test_unknown_child_reports_matched_prefix() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        chain.step(&PathSegment::new("TotW")).unwrap();
        match chain.step(&PathSegment::new("angle")) {
            Err(SclError::StructuralMismatch { prefix, name, .. }) => {
                assert_eq!(prefix.len(), 1);
                assert_eq!(name, "angle");
            }
            other => panic!("expected StructuralMismatch, got {:?}", other),
        }
        // A failed step leaves the chain where it was.
        assert_eq!(chain.prefix().len(), 1);
    }

    #[test]
    fn test_step_below_primitive_is_type_mismatch() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        for name in ["TotW", "mag", "f"] {
            chain.step(&PathSegment::new(name)).unwrap();
        }
        assert!(matches!(
            chain.step(&PathSegment::new("x")),
            Err(SclError::TypeMismatch { expected: "Struct", .. })
        ));
    }

    #[test]
    fn test_array_index_rules() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        chain.step(&PathSegment::new("TotW")).unwrap();

        let mut missing = chain.clone();
        assert!(matches!(
            missing.step(&PathSegment::new("origin")),
            Err(SclError::StructuralMismatch { .. })
        ));
        let mut too_large = chain.clone();
        assert!(too_large.step(&PathSegment::indexed("origin", 4)).is_err());
        let mut unexpected = chain.clone();
        assert!(unexpected.step(&PathSegment::indexed("mag", 0)).is_err());

        chain.step(&PathSegment::indexed("origin", 3)).unwrap();
        let or_cat = chain.step(&PathSegment::new("orCat")).unwrap();
        assert_eq!(or_cat.class(), TypeClass::Enumerated);
        assert_eq!(or_cat.fc(), Some(Fc::St));
        assert_eq!(chain.prefix().to_string(), "TotW.origin(3).orCat");
    }

    #[test]
    fn test_self_referencing_type_is_cyclic() {
        let registry = registry(looping());
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        chain.step(&PathSegment::new("TotW")).unwrap();
        chain.step(&PathSegment::new("loop")).unwrap();
        match chain.step(&PathSegment::new("again")) {
            Err(SclError::CyclicTypeReference { id, prefix }) => {
                assert_eq!(id, "Loop_T");
                assert_eq!(prefix.to_string(), "TotW.loop");
            }
            other => panic!("expected CyclicTypeReference, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit_is_cyclic() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 2).unwrap();
        chain.step(&PathSegment::new("TotW")).unwrap();
        chain.step(&PathSegment::new("mag")).unwrap();
        assert!(matches!(
            chain.step(&PathSegment::new("f")),
            Err(SclError::CyclicTypeReference { .. })
        ));
    }

    #[test]
    fn test_unknown_lnode_type() {
        let registry = registry(vec![]);
        assert!(matches!(
            TypeChain::start(&registry, "XCBR_T", 32),
            Err(SclError::UnknownTemplateReference {
                kind: TemplateKind::LNodeType,
                ..
            })
        ));
    }

    #[test]
    fn test_child_names_in_declaration_order() {
        let registry = registry(vec![]);
        let mut chain = TypeChain::start(&registry, "MMXU_T", 32).unwrap();
        assert_eq!(chain.current().child_names(), ["TotW", "A"]);
        chain.step(&PathSegment::new("TotW")).unwrap();
        assert_eq!(chain.current().child_names(), ["mag", "origin", "loop"]);
    }
}
