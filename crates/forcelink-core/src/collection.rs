//! In-memory element collection implementing [`Host`].
//!
//! [`Collection`] is the reference host: it keeps nodes and edges in
//! insertion order, stores per-element data and positions, fits a virtual
//! viewport, and records every notification and position write so callers
//! can inspect what a layout did.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    data::DataValue,
    geometry::{Bounds, Point},
    host::{ElementView, Host, LayoutEvent},
    identifier::Id,
};

/// Errors raised while assembling a [`Collection`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Duplicate element id: {0}")]
    DuplicateId(Id),

    #[error("Edge {edge} references missing node {node}")]
    MissingEndpoint { edge: Id, node: Id },

    #[error("Node {node} references missing parent {parent}")]
    MissingParent { node: Id, parent: Id },
}

#[derive(Debug, Clone, Copy)]
enum ElementKind {
    Node { parent: Option<Id> },
    Edge { source: Id, target: Id },
}

#[derive(Debug, Clone)]
struct Element {
    kind: ElementKind,
    data: HashMap<String, DataValue>,
    position: Option<Point>,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            data: HashMap::new(),
            position: None,
        }
    }
}

/// An in-memory graph host.
///
/// # Examples
///
/// ```
/// use forcelink_core::{collection::Collection, host::Host};
///
/// let mut collection = Collection::new();
/// let a = collection.add_node("a").unwrap();
/// let b = collection.add_node("b").unwrap();
/// collection.add_edge("ab", "a", "b").unwrap();
///
/// assert_eq!(collection.connected_edges(a), 1);
/// assert_eq!(collection.connected_edges(b), 1);
/// assert_eq!(collection.elements().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Collection {
    order: Vec<Id>,
    elements: HashMap<Id, Element>,
    bound: bool,
    listening: HashSet<Id>,
    events: Vec<LayoutEvent>,
    viewport: Option<Bounds>,
    position_writes: HashMap<Id, usize>,
    fit_count: usize,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// Creates an empty collection bound to a virtual viewport
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            elements: HashMap::new(),
            bound: true,
            listening: HashSet::new(),
            events: Vec::new(),
            viewport: None,
            position_writes: HashMap::new(),
            fit_count: 0,
        }
    }

    /// Adds a top-level node.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateId`] if the id is taken.
    pub fn add_node(&mut self, id: &str) -> Result<Id, CollectionError> {
        self.insert(Id::new(id), ElementKind::Node { parent: None })
    }

    /// Adds a node inside the compound node `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or `parent` is not a node.
    pub fn add_child(&mut self, id: &str, parent: &str) -> Result<Id, CollectionError> {
        let node = Id::new(id);
        let parent = Id::new(parent);
        if !self.is_node(parent) {
            return Err(CollectionError::MissingParent { node, parent });
        }
        self.insert(
            node,
            ElementKind::Node {
                parent: Some(parent),
            },
        )
    }

    /// Adds an edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or an endpoint is not a node.
    pub fn add_edge(
        &mut self,
        id: &str,
        source: &str,
        target: &str,
    ) -> Result<Id, CollectionError> {
        let edge = Id::new(id);
        let source = Id::new(source);
        let target = Id::new(target);
        for node in [source, target] {
            if !self.is_node(node) {
                return Err(CollectionError::MissingEndpoint { edge, node });
            }
        }
        self.insert(edge, ElementKind::Edge { source, target })
    }

    fn insert(&mut self, id: Id, kind: ElementKind) -> Result<Id, CollectionError> {
        if self.elements.contains_key(&id) {
            return Err(CollectionError::DuplicateId(id));
        }
        trace!(id:% = id, kind:? = kind; "Adding element");
        self.order.push(id);
        self.elements.insert(id, Element::new(kind));
        Ok(id)
    }

    fn is_node(&self, id: Id) -> bool {
        matches!(
            self.elements.get(&id),
            Some(Element {
                kind: ElementKind::Node { .. },
                ..
            })
        )
    }

    /// Detaches or re-attaches the collection from its viewport
    pub fn set_bound(&mut self, bound: bool) {
        self.bound = bound;
    }

    /// Number of elements (nodes and edges)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the collection has no elements
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.order.iter().copied().filter(|id| self.is_node(*id))
    }

    /// Every notification received so far, oldest first
    pub fn events(&self) -> &[LayoutEvent] {
        &self.events
    }

    /// Drains the recorded notifications
    pub fn take_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns `true` while drag interactions on `node` are forwarded
    pub fn is_listening(&self, node: Id) -> bool {
        self.listening.contains(&node)
    }

    /// Number of nodes with forwarded drag interactions
    pub fn listening_count(&self) -> usize {
        self.listening.len()
    }

    /// The viewport computed by the most recent fit, if any
    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    /// How many times the viewport was fitted
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }

    /// How many times `node` was moved through [`Host::set_position`]
    pub fn position_writes(&self, node: Id) -> usize {
        self.position_writes.get(&node).copied().unwrap_or_default()
    }
}

impl Host for Collection {
    fn is_bound(&self) -> bool {
        self.bound
    }

    fn elements(&self) -> Vec<ElementView> {
        self.order
            .iter()
            .map(|id| match self.elements[id].kind {
                ElementKind::Node { .. } => ElementView::node(*id),
                ElementKind::Edge { source, target } => ElementView::edge(*id, source, target),
            })
            .collect()
    }

    fn parent(&self, node: Id) -> Option<Id> {
        match self.elements.get(&node)?.kind {
            ElementKind::Node { parent } => parent,
            ElementKind::Edge { .. } => None,
        }
    }

    fn connected_edges(&self, node: Id) -> usize {
        self.elements
            .values()
            .filter(|element| match element.kind {
                ElementKind::Edge { source, target } => source == node || target == node,
                ElementKind::Node { .. } => false,
            })
            .count()
    }

    fn data(&self, id: Id, key: &str) -> Option<DataValue> {
        self.elements.get(&id)?.data.get(key).cloned()
    }

    fn set_data(&mut self, id: Id, key: &str, value: DataValue) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.data.insert(key.to_string(), value);
        }
    }

    fn remove_data(&mut self, id: Id, key: &str) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.data.remove(key);
        }
    }

    fn position(&self, node: Id) -> Option<Point> {
        self.elements.get(&node)?.position
    }

    fn set_position(&mut self, node: Id, position: Point) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.position = Some(position);
            *self.position_writes.entry(node).or_default() += 1;
        }
    }

    fn listen(&mut self, nodes: &[Id]) {
        self.listening.extend(nodes.iter().copied());
    }

    fn unlisten(&mut self, nodes: &[Id]) {
        for node in nodes {
            self.listening.remove(node);
        }
    }

    fn fit(&mut self, padding: f32) {
        let positions = self
            .order
            .iter()
            .filter(|id| self.is_node(**id))
            .filter_map(|id| self.elements[id].position);
        self.viewport = Bounds::from_points(positions).map(|bounds| bounds.add_padding(padding));
        self.fit_count += 1;
        debug!(viewport:? = self.viewport; "Viewport fitted");
    }

    fn notify(&mut self, event: LayoutEvent) {
        trace!(event:% = event; "Layout notification");
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_keep_insertion_order() {
        let mut collection = Collection::new();
        collection.add_node("order_b").unwrap();
        collection.add_node("order_a").unwrap();
        collection.add_edge("order_ba", "order_b", "order_a").unwrap();

        let ids: Vec<String> = collection
            .elements()
            .iter()
            .map(|element| element.id().to_string())
            .collect();
        assert_eq!(ids, ["order_b", "order_a", "order_ba"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut collection = Collection::new();
        collection.add_node("dup").unwrap();

        assert_eq!(
            collection.add_node("dup"),
            Err(CollectionError::DuplicateId(Id::new("dup")))
        );
    }

    #[test]
    fn test_edge_requires_nodes() {
        let mut collection = Collection::new();
        collection.add_node("present").unwrap();

        let err = collection
            .add_edge("dangling", "present", "absent")
            .unwrap_err();
        assert_eq!(
            err,
            CollectionError::MissingEndpoint {
                edge: Id::new("dangling"),
                node: Id::new("absent"),
            }
        );
    }

    #[test]
    fn test_parent_and_children() {
        let mut collection = Collection::new();
        let group = collection.add_node("group").unwrap();
        let child = collection.add_child("child", "group").unwrap();

        assert_eq!(collection.parent(child), Some(group));
        assert_eq!(collection.parent(group), None);
        assert!(collection.add_child("orphan", "nowhere").is_err());
    }

    #[test]
    fn test_connected_edges_counts_self_loop_once() {
        let mut collection = Collection::new();
        let a = collection.add_node("loop_a").unwrap();
        collection.add_edge("loop_aa", "loop_a", "loop_a").unwrap();

        assert_eq!(collection.connected_edges(a), 1);
    }

    #[test]
    fn test_data_round_trip() {
        let mut collection = Collection::new();
        let a = collection.add_node("data_a").unwrap();

        collection.set_data(a, "pin", DataValue::from(true));
        assert!(collection.flag(a, "pin"));

        collection.remove_data(a, "pin");
        assert!(!collection.flag(a, "pin"));
        assert_eq!(collection.data(a, "pin"), None);
    }

    #[test]
    fn test_fit_uses_positioned_nodes() {
        let mut collection = Collection::new();
        let a = collection.add_node("fit_a").unwrap();
        let b = collection.add_node("fit_b").unwrap();
        collection.add_node("fit_unplaced").unwrap();

        collection.set_position(a, Point::new(0.0, 0.0));
        collection.set_position(b, Point::new(100.0, 50.0));
        collection.fit(10.0);

        let viewport = collection.viewport().unwrap();
        assert_eq!(viewport.min_x(), -10.0);
        assert_eq!(viewport.max_y(), 60.0);
        assert_eq!(collection.fit_count(), 1);
    }

    #[test]
    fn test_listen_and_unlisten() {
        let mut collection = Collection::new();
        let a = collection.add_node("listen_a").unwrap();

        collection.listen(&[a]);
        assert!(collection.is_listening(a));

        collection.unlisten(&[a]);
        assert!(!collection.is_listening(a));
        assert_eq!(collection.listening_count(), 0);
    }

    #[test]
    fn test_position_writes_are_counted() {
        let mut collection = Collection::new();
        let a = collection.add_node("writes_a").unwrap();

        assert_eq!(collection.position_writes(a), 0);
        collection.set_position(a, Point::new(1.0, 1.0));
        collection.set_position(a, Point::new(2.0, 2.0));
        assert_eq!(collection.position_writes(a), 2);
    }
}
