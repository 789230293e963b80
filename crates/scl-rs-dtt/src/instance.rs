// crates/scl-rs-dtt/src/instance.rs

//! Uniform access to the levels of the instance tree.
//!
//! [`InstanceNode`] and [`InstanceNodeMut`] wrap a logical node, `DOI`, `SDI`
//! or `DAI` so that the tracker can walk any level with one set of methods.
//! An [`InstanceAddress`] names a node below a logical node by child
//! positions; it holds no borrow, so callers can keep it across mutations.

use crate::path::PathSegment;
use crate::types::{DataInstance, Dai, Doi, LogicalNode, Sdi, Val};
use alloc::vec::Vec;

/// A shared view of one instance tree node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstanceNode<'a> {
    LogicalNode(&'a LogicalNode),
    Doi(&'a Doi),
    Sdi(&'a Sdi),
    Dai(&'a Dai),
}

impl<'a> InstanceNode<'a> {
    /// The node name (`lnClass` for a logical node).
    pub fn name(&self) -> &'a str {
        match *self {
            InstanceNode::LogicalNode(ln) => &ln.ln_class,
            InstanceNode::Doi(doi) => &doi.name,
            InstanceNode::Sdi(sdi) => &sdi.name,
            InstanceNode::Dai(dai) => &dai.name,
        }
    }

    pub fn index(&self) -> Option<u32> {
        match *self {
            InstanceNode::LogicalNode(_) => None,
            InstanceNode::Doi(doi) => doi.ix,
            InstanceNode::Sdi(sdi) => sdi.ix,
            InstanceNode::Dai(dai) => dai.ix,
        }
    }

    /// The first bound value of a `DAI`.
    pub fn value(&self) -> Option<&'a str> {
        match *self {
            InstanceNode::Dai(dai) => dai.value(),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, InstanceNode::Dai(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            InstanceNode::LogicalNode(_) => "LN",
            InstanceNode::Doi(_) => "DOI",
            InstanceNode::Sdi(_) => "SDI",
            InstanceNode::Dai(_) => "DAI",
        }
    }

    /// The first child matching `name` and `index`, with its position.
    pub fn child(&self, name: &str, index: Option<u32>) -> Option<(usize, InstanceNode<'a>)> {
        self.children()
            .enumerate()
            .find(|(_, child)| child.name() == name && child.index() == index)
    }

    /// Children in document order.
    pub fn children(&self) -> Children<'a> {
        match *self {
            InstanceNode::LogicalNode(ln) => Children::Dois(ln.data_objects.iter()),
            InstanceNode::Doi(doi) => Children::Data(doi.children.iter()),
            InstanceNode::Sdi(sdi) => Children::Data(sdi.children.iter()),
            InstanceNode::Dai(_) => Children::Empty,
        }
    }
}

/// Iterator over the children of an [`InstanceNode`].
#[derive(Debug, Clone)]
pub enum Children<'a> {
    Dois(core::slice::Iter<'a, Doi>),
    Data(core::slice::Iter<'a, DataInstance>),
    Empty,
}

impl<'a> Iterator for Children<'a> {
    type Item = InstanceNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::Dois(iter) => iter.next().map(InstanceNode::Doi),
            Children::Data(iter) => iter.next().map(|child| match child {
                DataInstance::Sdi(sdi) => InstanceNode::Sdi(sdi),
                DataInstance::Dai(dai) => InstanceNode::Dai(dai),
            }),
            Children::Empty => None,
        }
    }
}

/// Child positions leading from a logical node to one of its descendants.
///
/// The empty address is the logical node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceAddress(Vec<usize>);

impl InstanceAddress {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, position: usize) -> Self {
        let mut positions = self.0.clone();
        positions.push(position);
        Self(positions)
    }
}

impl LogicalNode {
    /// Returns the node at `address`, if the tree still has one there.
    pub fn node(&self, address: &InstanceAddress) -> Option<InstanceNode<'_>> {
        let mut node = InstanceNode::LogicalNode(self);
        for &position in address.positions() {
            node = node.children().nth(position)?;
        }
        Some(node)
    }

    /// Returns a mutable view of the node at `address`.
    pub fn node_mut(&mut self, address: &InstanceAddress) -> Option<InstanceNodeMut<'_>> {
        let mut node = InstanceNodeMut::LogicalNode(self);
        for &position in address.positions() {
            node = node.into_child(position)?;
        }
        Some(node)
    }
}

/// A mutable view of one instance tree node.
#[derive(Debug)]
pub enum InstanceNodeMut<'a> {
    LogicalNode(&'a mut LogicalNode),
    Doi(&'a mut Doi),
    Sdi(&'a mut Sdi),
    Dai(&'a mut Dai),
}

impl<'a> InstanceNodeMut<'a> {
    pub fn as_node(&self) -> InstanceNode<'_> {
        match self {
            InstanceNodeMut::LogicalNode(ln) => InstanceNode::LogicalNode(ln),
            InstanceNodeMut::Doi(doi) => InstanceNode::Doi(doi),
            InstanceNodeMut::Sdi(sdi) => InstanceNode::Sdi(sdi),
            InstanceNodeMut::Dai(dai) => InstanceNode::Dai(dai),
        }
    }

    /// Descends to the child at `position`.
    pub fn into_child(self, position: usize) -> Option<InstanceNodeMut<'a>> {
        let children = match self {
            InstanceNodeMut::LogicalNode(ln) => {
                return ln.data_objects.get_mut(position).map(InstanceNodeMut::Doi);
            }
            InstanceNodeMut::Doi(doi) => &mut doi.children,
            InstanceNodeMut::Sdi(sdi) => &mut sdi.children,
            InstanceNodeMut::Dai(_) => return None,
        };
        children.get_mut(position).map(|child| match child {
            DataInstance::Sdi(sdi) => InstanceNodeMut::Sdi(sdi),
            DataInstance::Dai(dai) => InstanceNodeMut::Dai(dai),
        })
    }

    /// Appends a `DOI` below a logical node, returning its position.
    pub fn append_data_object(&mut self, segment: &PathSegment) -> Option<usize> {
        match self {
            InstanceNodeMut::LogicalNode(ln) => {
                ln.data_objects.push(Doi {
                    name: segment.name.clone(),
                    ix: segment.index,
                    children: Vec::new(),
                });
                Some(ln.data_objects.len() - 1)
            }
            _ => None,
        }
    }

    /// Appends an `SDI` or `DAI` below a `DOI` or `SDI`, returning its position.
    pub fn append(&mut self, child: DataInstance) -> Option<usize> {
        let children = match self {
            InstanceNodeMut::Doi(doi) => &mut doi.children,
            InstanceNodeMut::Sdi(sdi) => &mut sdi.children,
            _ => return None,
        };
        children.push(child);
        Some(children.len() - 1)
    }

    /// Replaces the values of a `DAI`. Returns `false` on any other node.
    pub fn set_values(&mut self, values: Vec<Val>) -> bool {
        match self {
            InstanceNodeMut::Dai(dai) => {
                dai.values = values;
                true
            }
            _ => false,
        }
    }
}
