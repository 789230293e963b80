// crates/scl-rs-dtt/src/loader/templates.rs

use super::utils::{parse_bool, parse_count, parse_optional, required, resolve_vals};
use crate::error::SclError;
use crate::model::templates as model;
use crate::types::{self, BasicType, Fc, ValKind};
use alloc::string::ToString;
use alloc::vec::Vec;

/// Resolves a `<DataTypeTemplates>` block into a `TemplateSection`, keeping
/// document order within each template kind.
pub(super) fn resolve_templates(
    templates: &model::DataTypeTemplates,
) -> Result<types::TemplateSection, SclError> {
    let mut section = types::TemplateSection::default();

    for item in &templates.items {
        match item {
            model::TemplateItem::LNodeType(lnt) => section.lnode_types.push(resolve_lnode_type(lnt)?),
            model::TemplateItem::DoType(dot) => section.do_types.push(resolve_do_type(dot)?),
            model::TemplateItem::DaType(dat) => section.da_types.push(resolve_da_type(dat)?),
            model::TemplateItem::EnumType(et) => section.enum_types.push(resolve_enum_type(et)?),
            model::TemplateItem::Other => {}
        }
    }

    Ok(section)
}

fn resolve_lnode_type(model: &model::LNodeType) -> Result<types::LNodeType, SclError> {
    let data_objects = model
        .data_objects
        .iter()
        .map(|d| {
            Ok(types::DataObject::new(
                required(&d.name, "DO", "name")?,
                required(&d.type_id, "DO", "type")?,
            ))
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(types::LNodeType {
        id: required(&model.id, "LNodeType", "id")?,
        ln_class: required(&model.ln_class, "LNodeType", "lnClass")?,
        data_objects,
    })
}

fn resolve_do_type(model: &model::DoType) -> Result<types::DoType, SclError> {
    let mut do_type = types::DoType {
        id: required(&model.id, "DOType", "id")?,
        cdc: required(&model.cdc, "DOType", "cdc")?,
        ..Default::default()
    };

    for item in &model.items {
        match item {
            model::DoTypeItem::Sdo(sdo) => {
                let mut sub = types::DataObject::new(
                    required(&sdo.name, "SDO", "name")?,
                    required(&sdo.type_id, "SDO", "type")?,
                );
                sub.count = parse_count(&sdo.count)?;
                do_type.sub_data_objects.push(sub);
            }
            model::DoTypeItem::Da(da) => {
                let fc = required(&da.fc, "DA", "fc")?;
                let fc = fc
                    .parse::<Fc>()
                    .map_err(|_| SclError::InvalidAttributeFormat {
                        attribute: "fc",
                        value: fc.to_string(),
                    })?;
                do_type
                    .data_attributes
                    .push(resolve_attribute(da, "DA")?.with_fc(fc));
            }
            model::DoTypeItem::Other => {}
        }
    }

    Ok(do_type)
}

fn resolve_da_type(model: &model::DaType) -> Result<types::DaType, SclError> {
    let attributes = model
        .bda
        .iter()
        .map(|bda| resolve_attribute(bda, "BDA"))
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(types::DaType {
        id: required(&model.id, "DAType", "id")?,
        attributes,
    })
}

/// Resolves the attributes shared by `<DA>` and `<BDA>`. The functional
/// constraint is left to the caller.
fn resolve_attribute(
    model: &model::Da,
    element: &'static str,
) -> Result<types::DataAttribute, SclError> {
    let name = required(&model.name, element, "name")?;
    let b_type_str = required(&model.b_type, element, "bType")?;
    let b_type = b_type_str
        .parse::<BasicType>()
        .map_err(|_| SclError::InvalidAttributeFormat {
            attribute: "bType",
            value: b_type_str.clone(),
        })?;

    let mut attribute = types::DataAttribute::new(name, b_type)
        .with_count(parse_count(&model.count)?)
        .with_val_import(parse_bool(&model.val_import, "valImport")?.unwrap_or(false));
    attribute.type_id = super::utils::optional(&model.type_id);
    attribute.val_kind = parse_optional::<ValKind>(&model.val_kind, "valKind")?;
    attribute.values = resolve_vals(&model.val)?;

    Ok(attribute)
}

fn resolve_enum_type(model: &model::EnumType) -> Result<types::EnumType, SclError> {
    let values = model
        .enum_val
        .iter()
        .map(|ev| {
            let ord = required(&ev.ord, "EnumVal", "ord")?;
            let ord = ord
                .parse::<i32>()
                .map_err(|_| SclError::InvalidAttributeFormat {
                    attribute: "ord",
                    value: ord.clone(),
                })?;
            Ok(types::EnumVal {
                ord,
                symbol: ev.value.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(types::EnumType {
        id: required(&model.id, "EnumType", "id")?,
        values,
    })
}
