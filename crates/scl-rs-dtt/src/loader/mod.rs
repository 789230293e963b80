// crates/scl-rs-dtt/src/loader/mod.rs

//! Maps the deserialized `model` onto the public `types`.
//!
//! Attribute strings are checked and converted here (basic types, functional
//! constraints, counts, indices); the `model` layer never rejects a value.

use crate::error::SclError;
use crate::model;
use crate::types;
use alloc::vec::Vec;

mod ied;
mod templates;
mod utils;

pub(crate) fn resolve_template_section(
    templates: &model::DataTypeTemplates,
) -> Result<types::TemplateSection, SclError> {
    templates::resolve_templates(templates)
}

pub(crate) fn resolve_logical_device(
    ldevice: &model::ied::LDevice,
) -> Result<types::LogicalDevice, SclError> {
    ied::resolve_ldevice(ldevice)
}

/// Resolves a whole `<SCL>` document. A document without a
/// `<DataTypeTemplates>` section yields an empty template section.
pub(crate) fn resolve_scl(scl: &model::Scl) -> Result<types::SclFile, SclError> {
    let templates = scl
        .data_type_templates
        .as_ref()
        .map(templates::resolve_templates)
        .transpose()?
        .unwrap_or_default();

    let ieds = scl
        .ied
        .iter()
        .map(ied::resolve_ied)
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(types::SclFile { templates, ieds })
}
