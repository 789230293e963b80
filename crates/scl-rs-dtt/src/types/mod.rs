// crates/scl-rs-dtt/src/types/mod.rs

//! Public, ergonomic data structures for the template section and the
//! instance tree of an SCL document.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

mod ied;
mod templates;

pub use ied::{DataInstance, Dai, Doi, Ied, LogicalDevice, LogicalNode, Sdi};
pub use templates::{
    DaType, DataAttribute, DataObject, DoType, EnumType, EnumVal, LNodeType, TemplateSection,
};

/// Represents a parsed `<SCL>` document, reduced to the sections this crate works on.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SclFile {
    /// Contents of `<DataTypeTemplates>`.
    pub templates: TemplateSection,
    /// Every `<IED>` with its logical devices.
    pub ieds: Vec<Ied>,
}

/// A `<Val>` element: a value, optionally bound to a setting group.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Val {
    /// `@sGroup`
    pub s_group: Option<u32>,
    /// Element text.
    pub value: String,
}

impl Val {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            s_group: None,
            value: value.into(),
        }
    }

    pub fn in_group(s_group: u32, value: impl Into<String>) -> Self {
        Self {
            s_group: Some(s_group),
            value: value.into(),
        }
    }
}

/// Classification of a template node, as seen by the type chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Data objects and `Struct` attributes: further steps are required.
    Structured,
    /// A leaf with a primitive basic type.
    Primitive,
    /// A leaf whose value must be a symbol of an `EnumType`.
    Enumerated,
}

/// Functional constraint of a data attribute (IEC 61850-7-2 `FC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fc {
    St,
    Mx,
    Co,
    Sp,
    Sv,
    Cf,
    Dc,
    Sg,
    Se,
    Sr,
    Or,
    Bl,
    Ex,
    Xx,
}

impl Fc {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fc::St => "ST",
            Fc::Mx => "MX",
            Fc::Co => "CO",
            Fc::Sp => "SP",
            Fc::Sv => "SV",
            Fc::Cf => "CF",
            Fc::Dc => "DC",
            Fc::Sg => "SG",
            Fc::Se => "SE",
            Fc::Sr => "SR",
            Fc::Or => "OR",
            Fc::Bl => "BL",
            Fc::Ex => "EX",
            Fc::Xx => "XX",
        }
    }
}

impl FromStr for Fc {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ST" => Fc::St,
            "MX" => Fc::Mx,
            "CO" => Fc::Co,
            "SP" => Fc::Sp,
            "SV" => Fc::Sv,
            "CF" => Fc::Cf,
            "DC" => Fc::Dc,
            "SG" => Fc::Sg,
            "SE" => Fc::Se,
            "SR" => Fc::Sr,
            "OR" => Fc::Or,
            "BL" => Fc::Bl,
            "EX" => Fc::Ex,
            "XX" => Fc::Xx,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for Fc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `@valKind` of a data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValKind {
    Spec,
    Conf,
    Ro,
    Set,
}

impl ValKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValKind::Spec => "Spec",
            ValKind::Conf => "Conf",
            ValKind::Ro => "RO",
            ValKind::Set => "Set",
        }
    }

    /// `Spec` and `Conf` values are fixed in the document itself.
    pub fn requires_value(&self) -> bool {
        matches!(self, ValKind::Spec | ValKind::Conf)
    }
}

impl FromStr for ValKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Spec" => Ok(ValKind::Spec),
            "Conf" => Ok(ValKind::Conf),
            "RO" => Ok(ValKind::Ro),
            "Set" => Ok(ValKind::Set),
            _ => Err(()),
        }
    }
}

/// The predefined basic types of IEC 61850-6 (`tPredefinedBasicTypeEnum`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BasicType {
    Boolean,
    Int8,
    Int16,
    Int24,
    Int32,
    Int64,
    Int128,
    Int8U,
    Int16U,
    Int24U,
    Int32U,
    Float32,
    Float64,
    Enum,
    Dbpos,
    Tcmd,
    Quality,
    Timestamp,
    VisString32,
    VisString64,
    VisString65,
    VisString129,
    VisString255,
    Octet64,
    Unicode255,
    Struct,
    EntryTime,
    Check,
    ObjRef,
    Currency,
    PhyComAddr,
    TrgOps,
    OptFlds,
    SvOptFlds,
    LogOptFlds,
    EntryId,
    Octet6,
    Octet16,
}

impl BasicType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicType::Boolean => "BOOLEAN",
            BasicType::Int8 => "INT8",
            BasicType::Int16 => "INT16",
            BasicType::Int24 => "INT24",
            BasicType::Int32 => "INT32",
            BasicType::Int64 => "INT64",
            BasicType::Int128 => "INT128",
            BasicType::Int8U => "INT8U",
            BasicType::Int16U => "INT16U",
            BasicType::Int24U => "INT24U",
            BasicType::Int32U => "INT32U",
            BasicType::Float32 => "FLOAT32",
            BasicType::Float64 => "FLOAT64",
            BasicType::Enum => "Enum",
            BasicType::Dbpos => "Dbpos",
            BasicType::Tcmd => "Tcmd",
            BasicType::Quality => "Quality",
            BasicType::Timestamp => "Timestamp",
            BasicType::VisString32 => "VisString32",
            BasicType::VisString64 => "VisString64",
            BasicType::VisString65 => "VisString65",
            BasicType::VisString129 => "VisString129",
            BasicType::VisString255 => "VisString255",
            BasicType::Octet64 => "Octet64",
            BasicType::Unicode255 => "Unicode255",
            BasicType::Struct => "Struct",
            BasicType::EntryTime => "EntryTime",
            BasicType::Check => "Check",
            BasicType::ObjRef => "ObjRef",
            BasicType::Currency => "Currency",
            BasicType::PhyComAddr => "PhyComAddr",
            BasicType::TrgOps => "TrgOps",
            BasicType::OptFlds => "OptFlds",
            BasicType::SvOptFlds => "SvOptFlds",
            BasicType::LogOptFlds => "LogOptFlds",
            BasicType::EntryId => "EntryID",
            BasicType::Octet6 => "Octet6",
            BasicType::Octet16 => "Octet16",
        }
    }

    pub fn class(&self) -> TypeClass {
        match self {
            BasicType::Struct => TypeClass::Structured,
            BasicType::Enum => TypeClass::Enumerated,
            _ => TypeClass::Primitive,
        }
    }

    /// Integer and floating point types, the ones setting bounds apply to.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            BasicType::Int8
                | BasicType::Int16
                | BasicType::Int24
                | BasicType::Int32
                | BasicType::Int64
                | BasicType::Int128
                | BasicType::Int8U
                | BasicType::Int16U
                | BasicType::Int24U
                | BasicType::Int32U
                | BasicType::Float32
                | BasicType::Float64
        )
    }
}

impl FromStr for BasicType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BOOLEAN" => BasicType::Boolean,
            "INT8" => BasicType::Int8,
            "INT16" => BasicType::Int16,
            "INT24" => BasicType::Int24,
            "INT32" => BasicType::Int32,
            "INT64" => BasicType::Int64,
            "INT128" => BasicType::Int128,
            "INT8U" => BasicType::Int8U,
            "INT16U" => BasicType::Int16U,
            "INT24U" => BasicType::Int24U,
            "INT32U" => BasicType::Int32U,
            "FLOAT32" => BasicType::Float32,
            "FLOAT64" => BasicType::Float64,
            "Enum" => BasicType::Enum,
            "Dbpos" => BasicType::Dbpos,
            "Tcmd" => BasicType::Tcmd,
            "Quality" => BasicType::Quality,
            "Timestamp" => BasicType::Timestamp,
            "VisString32" => BasicType::VisString32,
            "VisString64" => BasicType::VisString64,
            "VisString65" => BasicType::VisString65,
            "VisString129" => BasicType::VisString129,
            "VisString255" => BasicType::VisString255,
            "Octet64" => BasicType::Octet64,
            "Unicode255" => BasicType::Unicode255,
            "Struct" => BasicType::Struct,
            "EntryTime" => BasicType::EntryTime,
            "Check" => BasicType::Check,
            "ObjRef" => BasicType::ObjRef,
            "Currency" => BasicType::Currency,
            "PhyComAddr" => BasicType::PhyComAddr,
            "TrgOps" => BasicType::TrgOps,
            "OptFlds" => BasicType::OptFlds,
            "SvOptFlds" => BasicType::SvOptFlds,
            "LogOptFlds" => BasicType::LogOptFlds,
            "EntryID" => BasicType::EntryId,
            "Octet6" => BasicType::Octet6,
            "Octet16" => BasicType::Octet16,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_type_round_trips_through_its_name() {
        for b_type in [
            BasicType::Boolean,
            BasicType::Float32,
            BasicType::Int32U,
            BasicType::Enum,
            BasicType::Struct,
            BasicType::EntryId,
            BasicType::VisString255,
        ] {
            assert_eq!(b_type.as_str().parse::<BasicType>(), Ok(b_type));
        }
        assert_eq!("float".parse::<BasicType>(), Err(()));
    }

    #[test]
    fn test_basic_type_class() {
        assert_eq!(BasicType::Struct.class(), TypeClass::Structured);
        assert_eq!(BasicType::Enum.class(), TypeClass::Enumerated);
        assert_eq!(BasicType::Float32.class(), TypeClass::Primitive);
        assert!(BasicType::Int16U.is_numeric());
        assert!(!BasicType::Quality.is_numeric());
    }

    #[test]
    fn test_fc_and_val_kind_names() {
        assert_eq!("MX".parse::<Fc>(), Ok(Fc::Mx));
        assert_eq!(Fc::Sg.as_str(), "SG");
        assert!("mx".parse::<Fc>().is_err());
        assert_eq!("RO".parse::<ValKind>(), Ok(ValKind::Ro));
        assert!(ValKind::Conf.requires_value());
        assert!(!ValKind::Set.requires_value());
    }
}
