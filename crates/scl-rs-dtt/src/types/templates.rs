// crates/scl-rs-dtt/src/types/templates.rs

use super::{BasicType, Fc, TypeClass, Val, ValKind};
use alloc::string::String;
use alloc::vec::Vec;

/// Represents the `<DataTypeTemplates>` section.
///
/// Templates are kept in document order; duplicates are only rejected when
/// a [`Registry`](crate::Registry) is built from the section.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TemplateSection {
    pub lnode_types: Vec<LNodeType>,
    pub do_types: Vec<DoType>,
    pub da_types: Vec<DaType>,
    pub enum_types: Vec<EnumType>,
}

/// Represents `<LNodeType>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LNodeType {
    /// `@id`
    pub id: String,
    /// `@lnClass`
    pub ln_class: String,
    /// `<DO>` children, in declaration order.
    pub data_objects: Vec<DataObject>,
}

impl LNodeType {
    pub fn data_object(&self, name: &str) -> Option<&DataObject> {
        self.data_objects.iter().find(|d| d.name == name)
    }
}

/// A `<DO>` of an `LNodeType` or an `<SDO>` of a `DOType`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataObject {
    /// `@name`
    pub name: String,
    /// `@type`, the id of a `DOType`.
    pub type_id: String,
    /// `@count` (`0` for `<DO>`, which has no count).
    pub count: u32,
}

impl DataObject {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            count: 0,
        }
    }

    pub fn is_array(&self) -> bool {
        self.count > 1
    }
}

/// Represents `<DOType>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DoType {
    /// `@id`
    pub id: String,
    /// `@cdc`, the common data class.
    pub cdc: String,
    /// `<SDO>` children, in declaration order.
    pub sub_data_objects: Vec<DataObject>,
    /// `<DA>` children, in declaration order.
    pub data_attributes: Vec<DataAttribute>,
}

impl DoType {
    pub fn sub_data_object(&self, name: &str) -> Option<&DataObject> {
        self.sub_data_objects.iter().find(|s| s.name == name)
    }

    pub fn data_attribute(&self, name: &str) -> Option<&DataAttribute> {
        self.data_attributes.iter().find(|d| d.name == name)
    }
}

/// A `<DA>` of a `DOType` or a `<BDA>` of a `DAType`.
///
/// `BDA`s carry no functional constraint; they inherit the one of the `DA`
/// they are reached through.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAttribute {
    /// `@name`
    pub name: String,
    /// `@fc` (`None` for `BDA`s).
    pub fc: Option<Fc>,
    /// `@bType`
    pub b_type: BasicType,
    /// `@type`: a `DAType` id for `Struct`, an `EnumType` id for `Enum`.
    pub type_id: Option<String>,
    /// `@count`
    pub count: u32,
    /// `@valKind`
    pub val_kind: Option<ValKind>,
    /// `@valImport`
    pub val_import: bool,
    /// Default `<Val>`s declared by the template.
    pub values: Vec<Val>,
}

impl DataAttribute {
    /// A primitive attribute without functional constraint (a `BDA`).
    pub fn new(name: impl Into<String>, b_type: BasicType) -> Self {
        Self {
            name: name.into(),
            fc: None,
            b_type,
            type_id: None,
            count: 0,
            val_kind: None,
            val_import: false,
            values: Vec::new(),
        }
    }

    pub fn with_fc(mut self, fc: Fc) -> Self {
        self.fc = Some(fc);
        self
    }

    pub fn with_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_val_kind(mut self, val_kind: ValKind) -> Self {
        self.val_kind = Some(val_kind);
        self
    }

    pub fn with_val_import(mut self, val_import: bool) -> Self {
        self.val_import = val_import;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(Val::new(value));
        self
    }

    pub fn class(&self) -> TypeClass {
        self.b_type.class()
    }

    pub fn is_array(&self) -> bool {
        self.count > 1
    }
}

/// Represents `<DAType>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DaType {
    /// `@id`
    pub id: String,
    /// `<BDA>` children, in declaration order.
    pub attributes: Vec<DataAttribute>,
}

impl DaType {
    pub fn attribute(&self, name: &str) -> Option<&DataAttribute> {
        self.attributes.iter().find(|b| b.name == name)
    }
}

/// Represents `<EnumType>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnumType {
    /// `@id`
    pub id: String,
    /// `<EnumVal>` children, sorted by ordinal.
    pub values: Vec<EnumVal>,
}

impl EnumType {
    pub fn contains(&self, symbol: &str) -> bool {
        self.values.iter().any(|v| v.symbol == symbol)
    }

    /// Symbols in ordinal order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.symbol.as_str())
    }
}

/// Represents `<EnumVal ord="..">symbol</EnumVal>`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnumVal {
    pub ord: i32,
    pub symbol: String,
}
