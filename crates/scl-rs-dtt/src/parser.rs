// crates/scl-rs-dtt/src/parser.rs

use crate::error::SclError;
use crate::loader;
use crate::model;
use crate::types::{LogicalDevice, SclFile, TemplateSection};

/// Parses a `<DataTypeTemplates>` element into a [`TemplateSection`].
///
/// The section is not checked for duplicate ids or dangling references;
/// that happens when a [`Registry`](crate::Registry) is loaded from it.
///
/// # Errors
/// Returns an `SclError` if the XML is malformed, a mandatory attribute is
/// missing, or an attribute value is outside its schema.
pub fn load_templates_from_str(xml_content: &str) -> Result<TemplateSection, SclError> {
    let templates: model::DataTypeTemplates = quick_xml::de::from_str(xml_content)?;
    loader::resolve_template_section(&templates)
}

/// Parses a single `<LDevice>` element into a [`LogicalDevice`].
///
/// # Errors
/// See [`load_templates_from_str`].
pub fn load_ldevice_from_str(xml_content: &str) -> Result<LogicalDevice, SclError> {
    let ldevice: model::ied::LDevice = quick_xml::de::from_str(xml_content)?;
    loader::resolve_logical_device(&ldevice)
}

/// Parses an `<SCL>` document, keeping its `<DataTypeTemplates>` section and
/// the logical devices of every `<IED>`. All other sections are skipped.
///
/// # Errors
/// See [`load_templates_from_str`].
pub fn load_scl_from_str(xml_content: &str) -> Result<SclFile, SclError> {
    let scl: model::Scl = quick_xml::de::from_str(xml_content)?;
    loader::resolve_scl(&scl)
}
