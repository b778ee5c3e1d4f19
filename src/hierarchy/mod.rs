//! Parent/child hierarchies of every process sharing a name.
//!
//! Pure with respect to the UI: reads the process table only through
//! [`crate::system::table::ProcessTable`].

pub mod builder;

use std::collections::BTreeMap;

use serde::Serialize;

pub use builder::build_hierarchy;

/// Roots (processes named `name`) mapped to their transitive descendants.
///
/// Roots iterate in ascending pid order, descendants in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    pub name: String,
    roots: BTreeMap<u32, Vec<u32>>,
}

impl Hierarchy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roots: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, root: u32, descendants: Vec<u32>) {
        self.roots.insert(root, descendants);
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn descendant_count(&self) -> usize {
        self.roots.values().map(Vec::len).sum()
    }

    pub fn roots(&self) -> impl Iterator<Item = u32> + '_ {
        self.roots.keys().copied()
    }

    pub fn descendants(&self, root: u32) -> Option<&[u32]> {
        self.roots.get(&root).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> {
        self.roots.iter().map(|(root, d)| (*root, d.as_slice()))
    }

    pub fn as_map(&self) -> &BTreeMap<u32, Vec<u32>> {
        &self.roots
    }
}
