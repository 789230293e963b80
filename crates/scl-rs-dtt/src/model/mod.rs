//! Internal `serde` data structures that map directly to the SCL XML schema.
//!
//! This module defines the raw structure of the `<DataTypeTemplates>` and
//! `<IED>` sections as defined by the IEC 61850-6 XSD. Attributes are kept as
//! strings; they are checked and converted by the `loader` module. Elements
//! the crate does not work on (`<Private>`, `<Text>`, `<DataSet>`, ...) are
//! skipped.

#![allow(clippy::pedantic)] // XML schema naming conventions differ from Rust

use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

pub mod ied;
pub mod templates;

pub use ied::Ied;
pub use templates::DataTypeTemplates;

/// The root `<SCL>` element.
#[derive(Debug, Deserialize, Default)]
#[serde(rename = "SCL")]
pub struct Scl {
    #[serde(rename = "IED", default)]
    pub ied: Vec<Ied>,

    #[serde(rename = "DataTypeTemplates", default)]
    pub data_type_templates: Option<DataTypeTemplates>,
}

/// Represents `<Val sGroup="..">text</Val>`, used by both `DA`/`BDA` and `DAI`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Val {
    #[serde(rename = "@sGroup", default)]
    pub s_group: Option<String>,

    #[serde(rename = "$text", default)]
    pub value: String,
}
