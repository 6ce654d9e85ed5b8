//! Graph files: a TOML description of a host collection.
//!
//! ```toml
//! [[nodes]]
//! id = "group"
//!
//! [[nodes]]
//! id = "a"
//! parent = "group"
//! position = [0.0, 10.0]
//! data = { pin = true }
//!
//! [[edges]]
//! id = "ab"
//! source = "a"
//! target = "b"
//! ```
//!
//! Parents must be declared before their children and nodes before the
//! edges that connect them.

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use forcelink_core::{
    collection::{Collection, CollectionError},
    data::DataValue,
    geometry::Point,
    host::Host,
};

/// A parsed graph file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphFile {
    nodes: Vec<NodeEntry>,
    edges: Vec<EdgeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeEntry {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    position: Option<[f32; 2]>,
    #[serde(default)]
    data: BTreeMap<String, DataValue>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeEntry {
    id: String,
    source: String,
    target: String,
}

impl GraphFile {
    /// Parses a graph file from TOML source.
    ///
    /// # Errors
    ///
    /// Returns the TOML error, which carries the offending span.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Number of node entries
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge entries
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Builds the host collection described by the file.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError`] for duplicate ids, undeclared parents and
    /// edges to undeclared nodes.
    pub fn to_collection(&self) -> Result<Collection, CollectionError> {
        let mut collection = Collection::new();

        for node in &self.nodes {
            let id = match &node.parent {
                Some(parent) => collection.add_child(&node.id, parent)?,
                None => collection.add_node(&node.id)?,
            };
            if let Some([x, y]) = node.position {
                collection.set_position(id, Point::new(x, y));
            }
            for (key, value) in &node.data {
                collection.set_data(id, key, value.clone());
            }
        }

        for edge in &self.edges {
            collection.add_edge(&edge.id, &edge.source, &edge.target)?;
        }

        debug!(nodes = self.nodes.len(), edges = self.edges.len(); "Graph file loaded");
        Ok(collection)
    }
}
