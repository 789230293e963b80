// crates/scl-rs-dtt/src/edit.rs

//! Editing helpers layered on top of resolution.
//!
//! [`Tracker::resolve`] never touches the instance tree. The operations here
//! do, and only when called explicitly.

use crate::chain::{TemplateNode, TypeChain};
use crate::error::SclError;
use crate::path::DataPath;
use crate::tracker::{DataAttributeRef, Outcome, Tracker, attribute_ref};
use crate::types::{DataInstance, Dai, LogicalNode, Sdi, Val};
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use log::debug;

impl<'r> Tracker<'r> {
    /// Resolves `path` below `node`, first appending whatever instance nodes
    /// the path is missing: a `DOI` for the first segment, `SDI`s for
    /// sub-data-objects and structured attributes and a `DAI` for the leaf.
    ///
    /// Bound values are not checked; a freshly created leaf has none.
    pub fn resolve_or_create(
        &self,
        node: &mut LogicalNode,
        path: &DataPath,
    ) -> Result<DataAttributeRef, SclError> {
        let walk = self.walk(node, path)?;
        let partial = match walk.outcome {
            Outcome::Found { dai, address } => {
                return attribute_ref(node, &walk.chain, walk.da_start, dai, address);
            }
            Outcome::Missing(partial) => partial,
        };

        let templates = self.templates_along(&node.ln_type, path)?;
        let mut address = partial.anchor;
        for (i, segment) in path.segments().iter().enumerate().skip(partial.matched.len()) {
            let mut parent = node.node_mut(&address).ok_or_else(|| not_created(path, i))?;
            let position = if i == 0 {
                parent.append_data_object(segment)
            } else {
                let child = match templates[i] {
                    TemplateNode::DataAttribute { decl, .. } if !templates[i].is_structured() => {
                        DataInstance::Dai(Dai {
                            name: segment.name.clone(),
                            ix: segment.index,
                            val_import: Some(decl.val_import),
                            ..Dai::default()
                        })
                    }
                    _ => DataInstance::Sdi(Sdi {
                        name: segment.name.clone(),
                        ix: segment.index,
                        children: Vec::new(),
                    }),
                };
                parent.append(child)
            };
            address = address.child(position.ok_or_else(|| not_created(path, i))?);
        }
        debug!(
            "Created {} instance node(s) for '{}' in {}",
            path.len() - partial.matched.len(),
            path,
            node.name()
        );

        let walk = self.walk(node, path)?;
        match walk.outcome {
            Outcome::Found { dai, address } => attribute_ref(node, &walk.chain, walk.da_start, dai, address),
            Outcome::Missing(partial) => Err(not_created(path, partial.matched.len())),
        }
    }

    /// Binds `value` to the leaf at `path`, creating missing instance nodes
    /// and replacing any earlier values.
    ///
    /// # Errors
    /// `InvalidEnumValue` if the leaf is enumerated and `value` is not one of
    /// its symbols. The instance tree is left untouched on error.
    pub fn set_value(
        &self,
        node: &mut LogicalNode,
        path: &DataPath,
        value: &str,
    ) -> Result<DataAttributeRef, SclError> {
        self.set_values(node, path, vec![Val::new(value)])
    }

    /// Binds several values (typically one per setting group) to the leaf at `path`.
    pub fn set_values(
        &self,
        node: &mut LogicalNode,
        path: &DataPath,
        values: Vec<Val>,
    ) -> Result<DataAttributeRef, SclError> {
        let templates = self.templates_along(&node.ln_type, path)?;
        let leaf = templates
            .last()
            .copied()
            .ok_or_else(|| not_created(path, 0))?;
        if leaf.is_structured() {
            return Err(SclError::IncompleteStructuredPath {
                prefix: path.clone(),
            });
        }
        if let TemplateNode::DataAttribute {
            enum_type: Some(enum_type),
            ..
        } = leaf
        {
            if self.config().check_enum_values {
                if let Some(bad) = values.iter().find(|v| !enum_type.contains(&v.value)) {
                    return Err(SclError::InvalidEnumValue {
                        prefix: path.clone(),
                        enum_type: enum_type.id.clone(),
                        value: bad.value.clone(),
                    });
                }
            }
        }

        let mut reference = self.resolve_or_create(node, path)?;
        let mut target = node
            .node_mut(&reference.address)
            .ok_or_else(|| not_created(path, path.len()))?;
        if !target.set_values(values.clone()) {
            return Err(not_created(path, path.len()));
        }
        reference.values = values;
        Ok(reference)
    }

    /// The template node of every segment of `path`.
    fn templates_along(&self, ln_type: &str, path: &DataPath) -> Result<Vec<TemplateNode<'r>>, SclError> {
        let mut chain = TypeChain::start(self.registry(), ln_type, self.config().max_depth)?;
        path.into_iter().map(|segment| chain.step(segment)).collect()
    }
}

fn not_created(path: &DataPath, matched: usize) -> SclError {
    SclError::StructuralMismatch {
        prefix: path.prefix(matched),
        name: path
            .segments()
            .get(matched)
            .map(ToString::to_string)
            .unwrap_or_default(),
        reason: "instance node could not be created",
    }
}
