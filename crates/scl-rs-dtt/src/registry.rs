// crates/scl-rs-dtt/src/registry.rs

//! The template registry: every type template of a document, indexed by id.
//!
//! A registry is built once from a [`TemplateSection`] and is read-only
//! afterwards. Every resolution call borrows it.

use crate::diagnostics::Diagnostics;
use crate::error::{ErrorKind, SclError};
use crate::path::DataPath;
use crate::types::{BasicType, DaType, DataAttribute, DoType, EnumType, LNodeType, TemplateSection};
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use log::debug;

/// The four kinds of type templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateKind {
    LNodeType,
    DoType,
    DaType,
    EnumType,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateKind::LNodeType => "LNodeType",
            TemplateKind::DoType => "DOType",
            TemplateKind::DaType => "DAType",
            TemplateKind::EnumType => "EnumType",
        })
    }
}

/// A template returned by [`Registry::lookup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Template<'r> {
    LNodeType(&'r LNodeType),
    DoType(&'r DoType),
    DaType(&'r DaType),
    EnumType(&'r EnumType),
}

impl Template<'_> {
    pub fn kind(&self) -> TemplateKind {
        match self {
            Template::LNodeType(_) => TemplateKind::LNodeType,
            Template::DoType(_) => TemplateKind::DoType,
            Template::DaType(_) => TemplateKind::DaType,
            Template::EnumType(_) => TemplateKind::EnumType,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Template::LNodeType(t) => &t.id,
            Template::DoType(t) => &t.id,
            Template::DaType(t) => &t.id,
            Template::EnumType(t) => &t.id,
        }
    }
}

/// Id-indexed, immutable collection of type templates.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    lnode_types: BTreeMap<String, LNodeType>,
    do_types: BTreeMap<String, DoType>,
    da_types: BTreeMap<String, DaType>,
    enum_types: BTreeMap<String, EnumType>,
}

/// Inserts each template under its id, rejecting an id seen twice.
fn index<T>(
    kind: TemplateKind,
    templates: Vec<T>,
    id_of: impl Fn(&T) -> &str,
) -> Result<BTreeMap<String, T>, SclError> {
    let mut map = BTreeMap::new();
    for template in templates {
        let id = String::from(id_of(&template));
        if map.contains_key(&id) {
            return Err(SclError::DuplicateTemplateId { kind, id });
        }
        map.insert(id, template);
    }
    Ok(map)
}

impl Registry {
    /// Builds a registry from a template section.
    ///
    /// # Errors
    /// Returns `DuplicateTemplateId` if two templates of the same kind share
    /// an id. References between templates are not checked here; see
    /// [`Registry::verify`].
    pub fn load(section: TemplateSection) -> Result<Self, SclError> {
        let TemplateSection {
            lnode_types,
            do_types,
            da_types,
            mut enum_types,
        } = section;

        for enum_type in &mut enum_types {
            enum_type.values.sort_by_key(|v| v.ord);
        }

        let registry = Self {
            lnode_types: index(TemplateKind::LNodeType, lnode_types, |t| &t.id)?,
            do_types: index(TemplateKind::DoType, do_types, |t| &t.id)?,
            da_types: index(TemplateKind::DaType, da_types, |t| &t.id)?,
            enum_types: index(TemplateKind::EnumType, enum_types, |t| &t.id)?,
        };

        debug!(
            "Loaded template registry: {} LNodeType, {} DOType, {} DAType, {} EnumType",
            registry.lnode_types.len(),
            registry.do_types.len(),
            registry.da_types.len(),
            registry.enum_types.len()
        );

        Ok(registry)
    }

    /// Total number of templates of all kinds.
    pub fn len(&self) -> usize {
        self.lnode_types.len() + self.do_types.len() + self.da_types.len() + self.enum_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a template by kind and id.
    pub fn lookup(&self, kind: TemplateKind, id: &str) -> Result<Template<'_>, SclError> {
        let found = match kind {
            TemplateKind::LNodeType => self.lnode_types.get(id).map(Template::LNodeType),
            TemplateKind::DoType => self.do_types.get(id).map(Template::DoType),
            TemplateKind::DaType => self.da_types.get(id).map(Template::DaType),
            TemplateKind::EnumType => self.enum_types.get(id).map(Template::EnumType),
        };
        found.ok_or_else(|| unknown(kind, id))
    }

    pub fn lnode_type(&self, id: &str) -> Result<&LNodeType, SclError> {
        self.lnode_types
            .get(id)
            .ok_or_else(|| unknown(TemplateKind::LNodeType, id))
    }

    pub fn do_type(&self, id: &str) -> Result<&DoType, SclError> {
        self.do_types
            .get(id)
            .ok_or_else(|| unknown(TemplateKind::DoType, id))
    }

    pub fn da_type(&self, id: &str) -> Result<&DaType, SclError> {
        self.da_types
            .get(id)
            .ok_or_else(|| unknown(TemplateKind::DaType, id))
    }

    pub fn enum_type(&self, id: &str) -> Result<&EnumType, SclError> {
        self.enum_types
            .get(id)
            .ok_or_else(|| unknown(TemplateKind::EnumType, id))
    }

    /// Symbols of an enumeration type, in ordinal order.
    pub fn enumeration_values(&self, enum_type_id: &str) -> Result<Vec<&str>, SclError> {
        Ok(self.enum_type(enum_type_id)?.symbols().collect())
    }

    pub fn lnode_types(&self) -> impl Iterator<Item = &LNodeType> {
        self.lnode_types.values()
    }

    pub fn do_types(&self) -> impl Iterator<Item = &DoType> {
        self.do_types.values()
    }

    pub fn da_types(&self) -> impl Iterator<Item = &DaType> {
        self.da_types.values()
    }

    pub fn enum_types(&self) -> impl Iterator<Item = &EnumType> {
        self.enum_types.values()
    }

    /// Checks every reference between templates, recording dangling ids,
    /// `Struct`/`Enum` attributes without a type and cyclic type chains.
    ///
    /// Never fails; an empty `diagnostics` afterwards means the registry is
    /// sound. Diagnostics are recorded in id order.
    pub fn verify(&self, diagnostics: &mut Diagnostics) {
        let before = diagnostics.len();

        for lnt in self.lnode_types.values() {
            for data_object in &lnt.data_objects {
                if !self.do_types.contains_key(&data_object.type_id) {
                    record_unknown(
                        diagnostics,
                        format!("LNodeType {}.{}", lnt.id, data_object.name),
                        TemplateKind::DoType,
                        &data_object.type_id,
                    );
                }
            }
        }

        for dot in self.do_types.values() {
            for sdo in &dot.sub_data_objects {
                if !self.do_types.contains_key(&sdo.type_id) {
                    record_unknown(
                        diagnostics,
                        format!("DOType {}.{}", dot.id, sdo.name),
                        TemplateKind::DoType,
                        &sdo.type_id,
                    );
                }
            }
            for da in &dot.data_attributes {
                self.verify_attribute(diagnostics, format!("DOType {}.{}", dot.id, da.name), da);
            }
        }

        for dat in self.da_types.values() {
            for bda in &dat.attributes {
                self.verify_attribute(diagnostics, format!("DAType {}.{}", dat.id, bda.name), bda);
            }
        }

        let mut marks = BTreeMap::new();
        for id in self.do_types.keys() {
            self.visit(TemplateKind::DoType, id, &mut marks, diagnostics);
        }
        for id in self.da_types.keys() {
            self.visit(TemplateKind::DaType, id, &mut marks, diagnostics);
        }

        debug!(
            "Registry verification found {} defect(s)",
            diagnostics.len() - before
        );
    }

    fn verify_attribute(&self, diagnostics: &mut Diagnostics, path: String, attribute: &DataAttribute) {
        let kind = match attribute.b_type {
            BasicType::Struct => TemplateKind::DaType,
            BasicType::Enum => TemplateKind::EnumType,
            _ => return,
        };
        match attribute.type_id.as_deref() {
            None => diagnostics.record(
                path,
                ErrorKind::TypeMismatch,
                format!("bType {} requires a {} reference", attribute.b_type, kind),
            ),
            Some(id) if self.lookup(kind, id).is_err() => record_unknown(diagnostics, path, kind, id),
            Some(_) => {}
        }
    }

    /// Template ids a structured template refers to, among existing ones.
    fn structured_children(&self, kind: TemplateKind, id: &str) -> Vec<(TemplateKind, &str)> {
        let struct_refs = |attributes: &[DataAttribute]| -> Vec<(TemplateKind, String)> {
            attributes
                .iter()
                .filter(|a| a.b_type == BasicType::Struct)
                .filter_map(|a| a.type_id.clone())
                .map(|id| (TemplateKind::DaType, id))
                .collect()
        };

        let refs: Vec<(TemplateKind, String)> = match kind {
            TemplateKind::DoType => match self.do_types.get(id) {
                Some(dot) => dot
                    .sub_data_objects
                    .iter()
                    .map(|sdo| (TemplateKind::DoType, sdo.type_id.clone()))
                    .chain(struct_refs(&dot.data_attributes))
                    .collect(),
                None => Vec::new(),
            },
            TemplateKind::DaType => match self.da_types.get(id) {
                Some(dat) => struct_refs(&dat.attributes),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };

        refs.into_iter()
            .filter_map(|(kind, id)| match kind {
                TemplateKind::DoType => self.do_types.get_key_value(&id).map(|(k, _)| (kind, k.as_str())),
                _ => self.da_types.get_key_value(&id).map(|(k, _)| (kind, k.as_str())),
            })
            .collect()
    }

    /// Depth-first walk marking templates in progress, reporting back edges.
    fn visit<'r>(
        &'r self,
        kind: TemplateKind,
        id: &'r str,
        marks: &mut BTreeMap<(TemplateKind, &'r str), Mark>,
        diagnostics: &mut Diagnostics,
    ) {
        if marks.contains_key(&(kind, id)) {
            return;
        }
        marks.insert((kind, id), Mark::InProgress);

        for (child_kind, child_id) in self.structured_children(kind, id) {
            match marks.get(&(child_kind, child_id)) {
                Some(Mark::InProgress) => diagnostics.record(
                    format!("{} {}", kind, id),
                    ErrorKind::CyclicTypeReference,
                    format!("type chain through {} '{}' is cyclic", child_kind, child_id),
                ),
                Some(Mark::Done) => {}
                None => self.visit(child_kind, child_id, marks, diagnostics),
            }
        }

        marks.insert((kind, id), Mark::Done);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

fn unknown(kind: TemplateKind, id: &str) -> SclError {
    SclError::UnknownTemplateReference {
        kind,
        id: String::from(id),
        prefix: DataPath::new(),
    }
}

fn record_unknown(diagnostics: &mut Diagnostics, path: String, kind: TemplateKind, id: &str) {
    diagnostics.record(
        path,
        ErrorKind::UnknownTemplateReference,
        format!("Unknown {} '{}'", kind, id),
    );
}
