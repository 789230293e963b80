// crates/scl-rs-dtt/src/tracker.rs

//! The instance tracker: resolves a data path below a logical node by walking
//! the type chain and the instance tree in lockstep.

use crate::chain::{TemplateNode, TypeChain};
use crate::error::SclError;
use crate::instance::{InstanceAddress, InstanceNode};
use crate::path::{DataPath, ObjectReference};
use crate::registry::Registry;
use crate::types::{BasicType, Dai, Fc, Ied, LogicalNode, Val, ValKind};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::trace;

/// Name of the mode data object and its status attribute, which stay
/// updatable regardless of their template flags.
const MOD_DO_NAME: &str = "Mod";
const STVAL_DA_NAME: &str = "stVal";

/// Settings of a [`Tracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Longest path a type chain may follow before it is reported as
    /// `CyclicTypeReference`.
    pub max_depth: usize,
    /// Check bound values of `Enum` attributes against their `EnumType`.
    pub check_enum_values: bool,
    /// Report `Spec`/`Conf` leaves that have neither a bound nor a default value.
    pub require_values: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            check_enum_values: true,
            require_values: true,
        }
    }
}

impl TrackerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_enum_check(mut self, enabled: bool) -> Self {
        self.check_enum_values = enabled;
        self
    }

    pub fn with_value_check(mut self, enabled: bool) -> Self {
        self.require_values = enabled;
        self
    }
}

/// Resolves data paths against one [`Registry`].
///
/// The tracker keeps no state between calls: every call reads the instance
/// tree as it is at that moment.
#[derive(Debug, Clone, Copy)]
pub struct Tracker<'r> {
    registry: &'r Registry,
    config: TrackerConfig,
}

/// Outcome of [`Tracker::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'r> {
    /// Both the templates and the instance tree hold the whole path.
    Resolved(DataAttributeRef),
    /// The templates hold the whole path but the instance tree stops early.
    Partial(PartialMatch<'r>),
}

impl<'r> Resolution<'r> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&DataAttributeRef> {
        match self {
            Resolution::Resolved(reference) => Some(reference),
            Resolution::Partial(_) => None,
        }
    }

    pub fn partial(&self) -> Option<&PartialMatch<'r>> {
        match self {
            Resolution::Partial(partial) => Some(partial),
            Resolution::Resolved(_) => None,
        }
    }
}

/// The longest existing instance prefix of a path that the templates accept.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialMatch<'r> {
    /// Segments found in the instance tree.
    pub matched: DataPath,
    /// Address of the deepest instance node found, to append children to.
    pub anchor: InstanceAddress,
    /// Template of the first segment without an instance node.
    pub expected: TemplateNode<'r>,
}

impl PartialMatch<'_> {
    pub fn matched_len(&self) -> usize {
        self.matched.len()
    }
}

/// A fully resolved data attribute: template facts plus the bound instance values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAttributeRef {
    /// `LNName` of the logical node the path was resolved from.
    pub ln_name: String,
    /// `lnType` of that logical node.
    pub ln_type: String,
    pub path: DataPath,
    /// Id of the `DOType` owning the attribute.
    pub do_type_id: String,
    /// Common data class of that `DOType`.
    pub cdc: String,
    pub fc: Fc,
    pub b_type: BasicType,
    /// Id of the `EnumType` for `Enum` attributes.
    pub enum_type: Option<String>,
    /// `valKind` of the instance, or of the template if the instance has none.
    pub val_kind: Option<ValKind>,
    /// `valImport` of the instance, or of the template if the instance has none.
    pub val_import: bool,
    pub count: u32,
    /// Values bound at the instance leaf, one per setting group.
    pub values: Vec<Val>,
    /// Default values declared by the template.
    pub default_values: Vec<Val>,
    /// Position of the `DAI` below the logical node.
    pub address: InstanceAddress,
    da_start: usize,
}

impl DataAttributeRef {
    /// The first bound value.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(|v| v.value.as_str())
    }

    /// The first bound value, falling back to the first template default.
    pub fn effective_value(&self) -> Option<&str> {
        self.values
            .first()
            .or_else(|| self.default_values.first())
            .map(|v| v.value.as_str())
    }

    /// The data object part of the path (`DO` and `SDO` segments).
    pub fn do_path(&self) -> DataPath {
        self.path.prefix(self.da_start)
    }

    /// The data attribute part of the path (`DA` and `BDA` segments).
    pub fn da_path(&self) -> DataPath {
        self.path.suffix(self.da_start)
    }

    /// Whether the attribute may be set by an editing session: `Mod.stVal`,
    /// or a `valImport` attribute of a configuration, setting or status
    /// functional constraint.
    pub fn is_updatable(&self) -> bool {
        let is_mod_st_val = self.da_start == 1
            && self.path.first().is_some_and(|s| s.name == MOD_DO_NAME)
            && self.path.segments().get(1).is_some_and(|s| s.name == STVAL_DA_NAME);

        is_mod_st_val
            || (self.val_import
                && matches!(self.fc, Fc::Cf | Fc::Dc | Fc::Sg | Fc::Sp | Fc::St | Fc::Se))
    }

    /// The object reference of the attribute in a logical device.
    pub fn object_reference(&self, ld_name: &str) -> ObjectReference {
        ObjectReference {
            ld_name: ld_name.to_string(),
            ln_name: self.ln_name.clone(),
            data_path: self.path.clone(),
        }
    }
}

/// Result of the lockstep walk shared by resolution, editing and bound checks.
pub(crate) struct Walk<'r, 'a> {
    pub(crate) chain: TypeChain<'r>,
    pub(crate) da_start: usize,
    pub(crate) outcome: Outcome<'r, 'a>,
}

pub(crate) enum Outcome<'r, 'a> {
    Found {
        dai: &'a Dai,
        address: InstanceAddress,
    },
    Missing(PartialMatch<'r>),
}

impl<'r> Tracker<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, TrackerConfig::default())
    }

    pub fn with_config(registry: &'r Registry, config: TrackerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Resolves `path` below `node`.
    ///
    /// # Errors
    /// Fails on the first template or instance defect met along the path.
    /// A path missing from the instance tree is not an error; it yields
    /// [`Resolution::Partial`].
    pub fn resolve(&self, node: &LogicalNode, path: &DataPath) -> Result<Resolution<'r>, SclError> {
        let walk = self.walk(node, path)?;
        match walk.outcome {
            Outcome::Missing(partial) => {
                trace!(
                    "'{}' in {}: instance tree stops after '{}'",
                    path,
                    node.name(),
                    partial.matched
                );
                Ok(Resolution::Partial(partial))
            }
            Outcome::Found { dai, address } => {
                self.check_leaf(&walk.chain.current(), dai, walk.chain.prefix())?;
                let reference = attribute_ref(node, &walk.chain, walk.da_start, dai, address)?;
                trace!("'{}' in {} resolved", path, reference.ln_name);
                Ok(Resolution::Resolved(reference))
            }
        }
    }

    /// Parses `path` and resolves it below `node`.
    pub fn resolve_str(&self, node: &LogicalNode, path: &str) -> Result<Resolution<'r>, SclError> {
        self.resolve(node, &path.parse::<DataPath>()?)
    }

    /// Resolves a full object reference among the logical devices of `ieds`.
    ///
    /// The logical device is matched by `LDName` (IED name + `inst`) or by
    /// its bare `inst`.
    pub fn resolve_reference(
        &self,
        ieds: &[Ied],
        reference: &ObjectReference,
    ) -> Result<Resolution<'r>, SclError> {
        let ld = ieds
            .iter()
            .find_map(|ied| ied.find_logical_device(&reference.ld_name))
            .ok_or_else(|| SclError::StructuralMismatch {
                prefix: DataPath::new(),
                name: reference.ld_name.clone(),
                reason: "no such logical device",
            })?;
        let ln = ld
            .find_logical_node(&reference.ln_name)
            .ok_or_else(|| SclError::StructuralMismatch {
                prefix: DataPath::new(),
                name: reference.ln_name.clone(),
                reason: "no such logical node",
            })?;
        self.resolve(ln, &reference.data_path)
    }

    /// Walks the templates over the whole path, and the instance tree as far
    /// as it goes. Template defects are reported even past the end of the
    /// instance tree.
    pub(crate) fn walk<'a>(&self, node: &'a LogicalNode, path: &DataPath) -> Result<Walk<'r, 'a>, SclError> {
        if path.is_empty() {
            return Err(SclError::InvalidPath {
                path: String::new(),
                reason: "empty path",
            });
        }

        let mut chain = TypeChain::start(self.registry, &node.ln_type, self.config.max_depth)?;
        let mut instance = InstanceNode::LogicalNode(node);
        let mut address = InstanceAddress::root();
        let mut missing = None;
        let mut da_start = None;

        for (i, segment) in path.into_iter().enumerate() {
            let next = chain.step(segment)?;
            if da_start.is_none() && matches!(next, TemplateNode::DataAttribute { .. }) {
                da_start = Some(i);
            }
            if missing.is_some() {
                continue;
            }
            match instance.child(&segment.name, segment.index) {
                Some((position, child)) => {
                    check_kind(&next, &child, chain.prefix())?;
                    instance = child;
                    address = address.child(position);
                }
                None => {
                    missing = Some(PartialMatch {
                        matched: path.prefix(i),
                        anchor: address.clone(),
                        expected: next,
                    });
                }
            }
        }

        if chain.current().is_structured() {
            return Err(SclError::IncompleteStructuredPath {
                prefix: chain.prefix().clone(),
            });
        }

        let outcome = match missing {
            Some(partial) => Outcome::Missing(partial),
            None => match instance {
                InstanceNode::Dai(dai) => Outcome::Found { dai, address },
                other => {
                    return Err(SclError::TypeMismatch {
                        prefix: chain.prefix().clone(),
                        expected: "DAI",
                        found: other.kind_name().to_string(),
                    });
                }
            },
        };

        Ok(Walk {
            da_start: da_start.unwrap_or(path.len()),
            chain,
            outcome,
        })
    }

    /// Checks the values bound at a leaf against its template.
    pub(crate) fn check_leaf(
        &self,
        leaf: &TemplateNode<'_>,
        dai: &Dai,
        at: &DataPath,
    ) -> Result<(), SclError> {
        let TemplateNode::DataAttribute {
            decl, enum_type, ..
        } = *leaf
        else {
            return Ok(());
        };

        if self.config.check_enum_values {
            if let Some(enum_type) = enum_type {
                if let Some(bad) = dai.values.iter().find(|v| !enum_type.contains(&v.value)) {
                    return Err(SclError::InvalidEnumValue {
                        prefix: at.clone(),
                        enum_type: enum_type.id.clone(),
                        value: bad.value.clone(),
                    });
                }
            }
        }

        if self.config.require_values {
            let val_kind = dai.val_kind.or(decl.val_kind);
            if val_kind.is_some_and(|k| k.requires_value())
                && dai.values.is_empty()
                && decl.values.is_empty()
            {
                return Err(SclError::MissingValue { prefix: at.clone() });
            }
        }

        Ok(())
    }
}

/// Checks that an instance node has the element kind its template calls for:
/// `DOI` for data objects below the logical node, `SDI` for other structured
/// nodes and `DAI` for leaves.
pub(crate) fn check_kind(
    template: &TemplateNode<'_>,
    instance: &InstanceNode<'_>,
    at: &DataPath,
) -> Result<(), SclError> {
    let expected = match template {
        TemplateNode::DataObject { .. } if at.len() == 1 => "DOI",
        _ if template.is_structured() => "SDI",
        _ => "DAI",
    };
    if instance.kind_name() == expected {
        Ok(())
    } else {
        Err(SclError::TypeMismatch {
            prefix: at.clone(),
            expected,
            found: format!("{} for {}", instance.kind_name(), template.kind_name()),
        })
    }
}

/// Builds the reference for a leaf reached by `chain`.
pub(crate) fn attribute_ref(
    node: &LogicalNode,
    chain: &TypeChain<'_>,
    da_start: usize,
    dai: &Dai,
    address: InstanceAddress,
) -> Result<DataAttributeRef, SclError> {
    let TemplateNode::DataAttribute {
        decl,
        fc,
        enum_type,
        ..
    } = chain.current()
    else {
        return Err(SclError::IncompleteStructuredPath {
            prefix: chain.prefix().clone(),
        });
    };
    let (do_type_id, cdc) = chain
        .data_object_type()
        .map(|d| (d.id.clone(), d.cdc.clone()))
        .unwrap_or_default();

    Ok(DataAttributeRef {
        ln_name: node.name(),
        ln_type: node.ln_type.clone(),
        path: chain.prefix().clone(),
        do_type_id,
        cdc,
        fc,
        b_type: decl.b_type,
        enum_type: enum_type.map(|e| e.id.clone()),
        val_kind: dai.val_kind.or(decl.val_kind),
        val_import: dai.val_import.unwrap_or(decl.val_import),
        count: decl.count,
        values: dai.values.clone(),
        default_values: decl.values.clone(),
        address,
        da_start,
    })
}
