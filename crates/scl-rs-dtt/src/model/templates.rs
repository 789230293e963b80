//! Contains model structs related to `<DataTypeTemplates>`.

use super::Val;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

/// Represents the `<DataTypeTemplates>` block.
///
/// The schema orders the four template kinds, but tools do not always
/// respect it, so the children are read as one ordered list.
#[derive(Debug, Deserialize, Default)]
pub struct DataTypeTemplates {
    #[serde(rename = "$value", default)]
    pub items: Vec<TemplateItem>,
}

#[derive(Debug, Deserialize)]
pub enum TemplateItem {
    #[serde(rename = "LNodeType")]
    LNodeType(LNodeType),
    #[serde(rename = "DOType")]
    DoType(DoType),
    #[serde(rename = "DAType")]
    DaType(DaType),
    #[serde(rename = "EnumType")]
    EnumType(EnumType),
    #[serde(other)]
    Other,
}

/// Represents `<LNodeType>`.
#[derive(Debug, Deserialize, Default)]
pub struct LNodeType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,

    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,

    #[serde(rename = "DO", default)]
    pub data_objects: Vec<Do>,
}

/// Represents `<DO>` (inside `LNodeType`).
#[derive(Debug, Deserialize, Default)]
pub struct Do {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@type", default)]
    pub type_id: Option<String>,
}

/// Represents `<DOType>`.
#[derive(Debug, Deserialize, Default)]
pub struct DoType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,

    #[serde(rename = "@cdc", default)]
    pub cdc: Option<String>,

    /// `<SDO>` and `<DA>` may interleave.
    #[serde(rename = "$value", default)]
    pub items: Vec<DoTypeItem>,
}

#[derive(Debug, Deserialize)]
pub enum DoTypeItem {
    #[serde(rename = "SDO")]
    Sdo(Sdo),
    #[serde(rename = "DA")]
    Da(Da),
    #[serde(other)]
    Other,
}

/// Represents `<SDO>`.
#[derive(Debug, Deserialize, Default)]
pub struct Sdo {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@type", default)]
    pub type_id: Option<String>,

    #[serde(rename = "@count", default)]
    pub count: Option<String>,
}

/// Represents `<DA>`. `<BDA>` shares the same attributes minus `fc`.
#[derive(Debug, Deserialize, Default)]
pub struct Da {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@fc", default)]
    pub fc: Option<String>,

    #[serde(rename = "@bType", default)]
    pub b_type: Option<String>,

    #[serde(rename = "@type", default)]
    pub type_id: Option<String>,

    #[serde(rename = "@count", default)]
    pub count: Option<String>,

    #[serde(rename = "@valKind", default)]
    pub val_kind: Option<String>,

    #[serde(rename = "@valImport", default)]
    pub val_import: Option<String>,

    #[serde(rename = "Val", default)]
    pub val: Vec<Val>,
}

/// Represents `<DAType>`.
#[derive(Debug, Deserialize, Default)]
pub struct DaType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,

    #[serde(rename = "BDA", default)]
    pub bda: Vec<Da>,
}

/// Represents `<EnumType>`.
#[derive(Debug, Deserialize, Default)]
pub struct EnumType {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,

    #[serde(rename = "EnumVal", default)]
    pub enum_val: Vec<EnumVal>,
}

/// Represents `<EnumVal ord="..">symbol</EnumVal>`.
#[derive(Debug, Deserialize, Default)]
pub struct EnumVal {
    #[serde(rename = "@ord", default)]
    pub ord: Option<String>,

    #[serde(rename = "$text", default)]
    pub value: String,
}
