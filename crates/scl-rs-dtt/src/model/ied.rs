//! Contains model structs related to `<IED>` and its instance tree.

use super::Val;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

/// Represents `<IED>`.
#[derive(Debug, Deserialize, Default)]
pub struct Ied {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "AccessPoint", default)]
    pub access_point: Vec<AccessPoint>,
}

/// Represents `<AccessPoint>`. Only `<Server>` access points hold logical devices.
#[derive(Debug, Deserialize, Default)]
pub struct AccessPoint {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "Server", default)]
    pub server: Option<Server>,
}

/// Represents `<Server>`.
#[derive(Debug, Deserialize, Default)]
pub struct Server {
    #[serde(rename = "LDevice", default)]
    pub ldevice: Vec<LDevice>,
}

/// Represents `<LDevice>`.
#[derive(Debug, Deserialize, Default)]
pub struct LDevice {
    #[serde(rename = "@inst", default)]
    pub inst: Option<String>,

    #[serde(rename = "LN0", default)]
    pub ln0: Option<Ln>,

    #[serde(rename = "LN", default)]
    pub ln: Vec<Ln>,
}

/// Represents `<LN0>` and `<LN>` (the LN0 has no `prefix`).
#[derive(Debug, Deserialize, Default)]
pub struct Ln {
    #[serde(rename = "@prefix", default)]
    pub prefix: Option<String>,

    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,

    #[serde(rename = "@inst", default)]
    pub inst: Option<String>,

    #[serde(rename = "@lnType", default)]
    pub ln_type: Option<String>,

    #[serde(rename = "DOI", default)]
    pub doi: Vec<Doi>,
}

/// Represents `<DOI>`. `<SDI>` has the same shape.
#[derive(Debug, Deserialize, Default)]
pub struct Doi {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@ix", default)]
    pub ix: Option<String>,

    /// `<SDI>` and `<DAI>` may interleave.
    #[serde(rename = "$value", default)]
    pub items: Vec<DataItem>,
}

#[derive(Debug, Deserialize)]
pub enum DataItem {
    #[serde(rename = "SDI")]
    Sdi(Doi),
    #[serde(rename = "DAI")]
    Dai(Dai),
    #[serde(other)]
    Other,
}

/// Represents `<DAI>`.
#[derive(Debug, Deserialize, Default)]
pub struct Dai {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@ix", default)]
    pub ix: Option<String>,

    #[serde(rename = "@valKind", default)]
    pub val_kind: Option<String>,

    #[serde(rename = "@valImport", default)]
    pub val_import: Option<String>,

    #[serde(rename = "Val", default)]
    pub val: Vec<Val>,
}
