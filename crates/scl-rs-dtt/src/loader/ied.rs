// crates/scl-rs-dtt/src/loader/ied.rs

use super::utils::{optional, parse_bool, parse_optional, required, resolve_vals};
use crate::error::SclError;
use crate::model::ied as model;
use crate::types::{self, ValKind};
use alloc::string::String;
use alloc::vec::Vec;

/// Resolves an `<IED>`, flattening the logical devices of all its servers.
pub(super) fn resolve_ied(model: &model::Ied) -> Result<types::Ied, SclError> {
    let logical_devices = model
        .access_point
        .iter()
        .filter_map(|ap| ap.server.as_ref())
        .flat_map(|server| server.ldevice.iter())
        .map(resolve_ldevice)
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(types::Ied {
        name: required(&model.name, "IED", "name")?,
        logical_devices,
    })
}

/// Resolves an `<LDevice>`. The `<LN0>` comes first, followed by the `<LN>`s.
pub(super) fn resolve_ldevice(model: &model::LDevice) -> Result<types::LogicalDevice, SclError> {
    let mut ld = types::LogicalDevice::new(required(&model.inst, "LDevice", "inst")?);

    if let Some(ln0) = &model.ln0 {
        ld.logical_nodes.push(resolve_ln(ln0, "LN0")?);
    }
    for ln in &model.ln {
        ld.logical_nodes.push(resolve_ln(ln, "LN")?);
    }

    Ok(ld)
}

fn resolve_ln(model: &model::Ln, element: &'static str) -> Result<types::LogicalNode, SclError> {
    let data_objects = model
        .doi
        .iter()
        .map(|doi| {
            let (name, ix, children) = resolve_data_item(doi, "DOI")?;
            Ok(types::Doi { name, ix, children })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(types::LogicalNode {
        prefix: optional(&model.prefix).unwrap_or_default(),
        ln_class: required(&model.ln_class, element, "lnClass")?,
        // `inst` is empty on the LN0.
        inst: optional(&model.inst).unwrap_or_default(),
        ln_type: required(&model.ln_type, element, "lnType")?,
        data_objects,
    })
}

/// Resolves the shared shape of `<DOI>` and `<SDI>`.
fn resolve_data_item(
    model: &model::Doi,
    element: &'static str,
) -> Result<(String, Option<u32>, Vec<types::DataInstance>), SclError> {
    let name = required(&model.name, element, "name")?;
    let ix = parse_optional::<u32>(&model.ix, "ix")?;

    let mut children = Vec::with_capacity(model.items.len());
    for item in &model.items {
        match item {
            model::DataItem::Sdi(sdi) => {
                let (name, ix, nested) = resolve_data_item(sdi, "SDI")?;
                children.push(types::DataInstance::Sdi(types::Sdi {
                    name,
                    ix,
                    children: nested,
                }));
            }
            model::DataItem::Dai(dai) => {
                children.push(types::DataInstance::Dai(resolve_dai(dai)?));
            }
            model::DataItem::Other => {}
        }
    }

    Ok((name, ix, children))
}

fn resolve_dai(model: &model::Dai) -> Result<types::Dai, SclError> {
    Ok(types::Dai {
        name: required(&model.name, "DAI", "name")?,
        ix: parse_optional::<u32>(&model.ix, "ix")?,
        val_kind: parse_optional::<ValKind>(&model.val_kind, "valKind")?,
        val_import: parse_bool(&model.val_import, "valImport")?,
        values: resolve_vals(&model.val)?,
    })
}
