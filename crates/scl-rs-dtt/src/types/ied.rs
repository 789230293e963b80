// crates/scl-rs-dtt/src/types/ied.rs

use super::{Val, ValKind};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Represents an `<IED>`, flattened to the logical devices of all its servers.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ied {
    /// `@name`
    pub name: String,
    /// Every `<LDevice>` of every `<AccessPoint>/<Server>`, in document order.
    pub logical_devices: Vec<LogicalDevice>,
}

impl Ied {
    /// Finds a logical device by its `LDName` (IED name + `inst`) or by bare `inst`.
    pub fn find_logical_device(&self, ld_name: &str) -> Option<&LogicalDevice> {
        self.logical_devices.iter().find(|ld| {
            ld.inst == ld_name
                || ld_name
                    .strip_prefix(self.name.as_str())
                    .is_some_and(|inst| inst == ld.inst)
        })
    }

    /// `LDName` of one of this IED's logical devices.
    pub fn ld_name(&self, ld: &LogicalDevice) -> String {
        format!("{}{}", self.name, ld.inst)
    }
}

/// Represents an `<LDevice>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LogicalDevice {
    /// `@inst`
    pub inst: String,
    /// The `<LN0>` (when present) followed by every `<LN>`, in document order.
    pub logical_nodes: Vec<LogicalNode>,
}

impl LogicalDevice {
    pub fn new(inst: impl Into<String>) -> Self {
        Self {
            inst: inst.into(),
            logical_nodes: Vec::new(),
        }
    }

    /// Finds a logical node by its `LNName` (`prefix + lnClass + inst`, or `LLN0`).
    pub fn find_logical_node(&self, ln_name: &str) -> Option<&LogicalNode> {
        self.logical_nodes.iter().find(|ln| ln.name() == ln_name)
    }

    pub fn find_logical_node_mut(&mut self, ln_name: &str) -> Option<&mut LogicalNode> {
        self.logical_nodes.iter_mut().find(|ln| ln.name() == ln_name)
    }
}

/// Represents an `<LN0>` or `<LN>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LogicalNode {
    /// `@prefix`
    pub prefix: String,
    /// `@lnClass`
    pub ln_class: String,
    /// `@inst`
    pub inst: String,
    /// `@lnType`, the id of an `LNodeType`.
    pub ln_type: String,
    /// `<DOI>` children, in document order.
    pub data_objects: Vec<Doi>,
}

impl LogicalNode {
    pub fn new(ln_class: impl Into<String>, inst: impl Into<String>, ln_type: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            ln_class: ln_class.into(),
            inst: inst.into(),
            ln_type: ln_type.into(),
            data_objects: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_doi(mut self, doi: Doi) -> Self {
        self.data_objects.push(doi);
        self
    }

    /// `LNName`: `LLN0` for the LN0, `prefix + lnClass + inst` otherwise.
    pub fn name(&self) -> String {
        if self.ln_class == "LLN0" {
            return String::from("LLN0");
        }
        format!("{}{}{}", self.prefix, self.ln_class, self.inst)
    }
}

/// Represents a `<DOI>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Doi {
    /// `@name`
    pub name: String,
    /// `@ix`
    pub ix: Option<u32>,
    /// `<SDI>` and `<DAI>` children, in document order.
    pub children: Vec<DataInstance>,
}

impl Doi {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ix: None,
            children: Vec::new(),
        }
    }

    pub fn with_index(mut self, ix: u32) -> Self {
        self.ix = Some(ix);
        self
    }

    pub fn with_sdi(mut self, sdi: Sdi) -> Self {
        self.children.push(DataInstance::Sdi(sdi));
        self
    }

    pub fn with_dai(mut self, dai: Dai) -> Self {
        self.children.push(DataInstance::Dai(dai));
        self
    }
}

/// Represents an `<SDI>`: a sub-data-object or a structured attribute instance.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sdi {
    /// `@name`
    pub name: String,
    /// `@ix`
    pub ix: Option<u32>,
    /// `<SDI>` and `<DAI>` children, in document order.
    pub children: Vec<DataInstance>,
}

impl Sdi {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ix: None,
            children: Vec::new(),
        }
    }

    pub fn with_index(mut self, ix: u32) -> Self {
        self.ix = Some(ix);
        self
    }

    pub fn with_sdi(mut self, sdi: Sdi) -> Self {
        self.children.push(DataInstance::Sdi(sdi));
        self
    }

    pub fn with_dai(mut self, dai: Dai) -> Self {
        self.children.push(DataInstance::Dai(dai));
        self
    }
}

/// Represents a `<DAI>`, the leaf of the instance tree.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dai {
    /// `@name`
    pub name: String,
    /// `@ix`
    pub ix: Option<u32>,
    /// `@valKind`, overriding the template when present.
    pub val_kind: Option<ValKind>,
    /// `@valImport`, overriding the template when present.
    pub val_import: Option<bool>,
    /// Bound `<Val>`s (one per setting group, or a single ungrouped one).
    pub values: Vec<Val>,
}

impl Dai {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_index(mut self, ix: u32) -> Self {
        self.ix = Some(ix);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(Val::new(value));
        self
    }

    pub fn with_val(mut self, val: Val) -> Self {
        self.values.push(val);
        self
    }

    /// The first bound value.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(|v| v.value.as_str())
    }
}

/// A child of a `<DOI>` or `<SDI>`.
#[derive(Debug, Clone, PartialEq)]
pub enum DataInstance {
    Sdi(Sdi),
    Dai(Dai),
}

impl DataInstance {
    pub fn name(&self) -> &str {
        match self {
            DataInstance::Sdi(sdi) => &sdi.name,
            DataInstance::Dai(dai) => &dai.name,
        }
    }

    pub fn ix(&self) -> Option<u32> {
        match self {
            DataInstance::Sdi(sdi) => sdi.ix,
            DataInstance::Dai(dai) => dai.ix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_node_names() {
        let lln0 = LogicalNode::new("LLN0", "", "LLN0_T");
        assert_eq!(lln0.name(), "LLN0");
        let xcbr = LogicalNode::new("XCBR", "1", "XCBR_T").with_prefix("Q0");
        assert_eq!(xcbr.name(), "Q0XCBR1");
    }

    #[test]
    fn test_find_logical_device_by_ld_name_or_inst() {
        let ied = Ied {
            name: "IED1".into(),
            logical_devices: alloc::vec![LogicalDevice::new("LD1"), LogicalDevice::new("PROT")],
        };
        assert_eq!(ied.find_logical_device("IED1PROT").map(|ld| ld.inst.as_str()), Some("PROT"));
        assert_eq!(ied.find_logical_device("LD1").map(|ld| ld.inst.as_str()), Some("LD1"));
        assert!(ied.find_logical_device("IED2LD1").is_none());
        assert_eq!(ied.ld_name(&ied.logical_devices[0]), "IED1LD1");
    }

    #[test]
    fn test_dai_first_value() {
        let dai = Dai::new("setVal")
            .with_val(Val::in_group(1, "10"))
            .with_val(Val::in_group(2, "20"));
        assert_eq!(dai.value(), Some("10"));
        assert_eq!(Dai::new("stVal").value(), None);
    }

    #[test]
    fn test_data_instance_name_and_index() {
        let doi = Doi::new("A")
            .with_sdi(Sdi::new("phsB").with_index(1))
            .with_dai(Dai::new("d"));
        let names: Vec<_> = doi.children.iter().map(|c| (c.name(), c.ix())).collect();
        assert_eq!(names, [("phsB", Some(1)), ("d", None)]);
    }

    #[test]
    fn test_find_logical_node_mut() {
        let mut ld = LogicalDevice::new("LD1");
        ld.logical_nodes.push(LogicalNode::new("LLN0", "", "LLN0_T"));
        ld.logical_nodes
            .push(LogicalNode::new("XCBR", "1", "XCBR_T").with_prefix("Q0"));

        let xcbr = ld.find_logical_node_mut("Q0XCBR1").unwrap();
        xcbr.data_objects.push(Doi::new("Pos"));
        assert_eq!(ld.find_logical_node("Q0XCBR1").unwrap().data_objects.len(), 1);
        assert!(ld.find_logical_node_mut("XCBR1").is_none());
    }
}
