// src/lib.rs

#![no_std]
#![doc = "Resolves SCL (IEC 61850-6) data type templates and binds instance values to them."]
#![doc = ""]
#![doc = "This `no_std + alloc` library loads the `<DataTypeTemplates>` and `<IED>` sections"]
#![doc = "of an SCL document into typed structures and walks templates and instances in lockstep."]
#![doc = ""]
#![doc = "It supports:"]
#![doc = "- `Tracker::resolve`: Resolving a data path below a logical node to a typed attribute."]
#![doc = "- `Tracker::validate_document`: Checking a whole instance tree against its templates."]
#![doc = "- `Tracker::set_value`: Binding values, creating the missing instance nodes."]
#![doc = "- `list_attribute_templates`: Listing the leaf attributes of a logical-node type."]

extern crate alloc;

// --- Crate Modules ---

mod bounds;
mod chain;
mod diagnostics;
mod edit;
mod error;
mod instance;
mod listing;
mod loader;
mod model;
mod parser;
mod path;
mod registry;
mod tracker;
mod types;
mod validate;

// --- Public API Re-exports ---

pub use chain::{TemplateNode, TypeChain, step as step_template};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ErrorKind, SclError};
pub use instance::{Children, InstanceAddress, InstanceNode, InstanceNodeMut};
pub use listing::{AttributeTemplate, list_attribute_templates, list_data_object_attributes};
pub use parser::{load_ldevice_from_str, load_scl_from_str, load_templates_from_str};
pub use path::{DataPath, ObjectReference, PathSegment};
pub use registry::{Registry, Template, TemplateKind};
pub use tracker::{DataAttributeRef, PartialMatch, Resolution, Tracker, TrackerConfig};
pub use types::{
    BasicType, DaType, Dai, DataAttribute, DataInstance, DataObject, DoType, Doi, EnumType,
    EnumVal, Fc, Ied, LNodeType, LogicalDevice, LogicalNode, SclFile, Sdi, TemplateSection,
    TypeClass, Val, ValKind,
};
