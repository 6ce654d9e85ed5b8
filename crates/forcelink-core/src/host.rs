//! The host side of a layout: the element collection being positioned.
//!
//! A [`Host`] is whatever owns the nodes and edges on screen. The layout
//! reads element structure and data from it, writes positions back, asks it
//! to fit its viewport, and reports lifecycle progress through
//! [`Host::notify`].

use std::fmt;

use crate::{data::DataValue, geometry::Point, identifier::Id};

/// Read-only projection of one host element.
///
/// Nodes carry no endpoints. Edges carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementView {
    id: Id,
    source: Option<Id>,
    target: Option<Id>,
}

impl ElementView {
    /// Creates the view of a node
    pub fn node(id: Id) -> Self {
        Self {
            id,
            source: None,
            target: None,
        }
    }

    /// Creates the view of an edge between `source` and `target`
    pub fn edge(id: Id, source: Id, target: Id) -> Self {
        Self {
            id,
            source: Some(source),
            target: Some(target),
        }
    }

    /// Returns the element id
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the source endpoint, `None` for nodes
    pub fn source(&self) -> Option<Id> {
        self.source
    }

    /// Returns the target endpoint, `None` for nodes
    pub fn target(&self) -> Option<Id> {
        self.target
    }

    /// Returns both endpoints if the element is an edge
    pub fn endpoints(&self) -> Option<(Id, Id)> {
        self.source.zip(self.target)
    }

    /// Returns `true` for edges
    pub fn is_edge(&self) -> bool {
        self.endpoints().is_some()
    }

    /// Returns `true` for nodes
    pub fn is_node(&self) -> bool {
        !self.is_edge()
    }
}

/// Lifecycle notifications a layout emits to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutEvent {
    /// Emitted before any work.
    LayoutStart,
    /// Emitted on the first position sync of a run and again at termination.
    LayoutReady,
    /// Emitted on termination and on an explicit stop request.
    LayoutStop,
}

impl LayoutEvent {
    /// Host-facing event name
    pub fn name(self) -> &'static str {
        match self {
            LayoutEvent::LayoutStart => "layoutstart",
            LayoutEvent::LayoutReady => "layoutready",
            LayoutEvent::LayoutStop => "layoutstop",
        }
    }
}

impl fmt::Display for LayoutEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer interaction on a node, forwarded by the host while it listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The pointer grabbed the node.
    DragStart(Id),
    /// The node position changed under the pointer; the host position is current.
    DragMove(Id),
    /// The pointer released the node.
    DragEnd(Id),
}

impl Interaction {
    /// Returns the node the interaction targets
    pub fn node(self) -> Id {
        match self {
            Interaction::DragStart(id) | Interaction::DragMove(id) | Interaction::DragEnd(id) => {
                id
            }
        }
    }
}

/// Capabilities a layout needs from the element collection it positions.
pub trait Host {
    /// Returns `false` when the collection is not attached to a live viewport.
    ///
    /// An unbound host gets a no-op run.
    fn is_bound(&self) -> bool;

    /// All elements in collection order.
    fn elements(&self) -> Vec<ElementView>;

    /// The compound parent of `node`, if any.
    fn parent(&self, node: Id) -> Option<Id>;

    /// Number of edges incident to `node`.
    fn connected_edges(&self, node: Id) -> usize;

    /// Reads one data key of an element.
    fn data(&self, id: Id, key: &str) -> Option<DataValue>;

    /// Writes one data key of an element.
    fn set_data(&mut self, id: Id, key: &str, value: DataValue);

    /// Removes one data key of an element.
    fn remove_data(&mut self, id: Id, key: &str);

    /// Current position of a node.
    fn position(&self, node: Id) -> Option<Point>;

    /// Moves a node.
    fn set_position(&mut self, node: Id, position: Point);

    /// Starts forwarding drag interactions on `nodes` to the layout.
    fn listen(&mut self, nodes: &[Id]);

    /// Stops forwarding drag interactions on `nodes`.
    fn unlisten(&mut self, nodes: &[Id]);

    /// Fits the viewport to the content, leaving `padding` around it.
    fn fit(&mut self, padding: f32);

    /// Receives a lifecycle notification.
    fn notify(&mut self, event: LayoutEvent);

    /// Returns whether the data flag `key` is set on `id`.
    fn flag(&self, id: Id, key: &str) -> bool {
        self.data(id, key).is_some_and(|value| value.is_truthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_view_kinds() {
        let node = ElementView::node(Id::new("v_n"));
        let edge = ElementView::edge(Id::new("v_e"), Id::new("v_a"), Id::new("v_b"));

        assert!(node.is_node());
        assert_eq!(node.endpoints(), None);
        assert!(edge.is_edge());
        assert_eq!(edge.endpoints(), Some((Id::new("v_a"), Id::new("v_b"))));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(LayoutEvent::LayoutStart.to_string(), "layoutstart");
        assert_eq!(LayoutEvent::LayoutReady.to_string(), "layoutready");
        assert_eq!(LayoutEvent::LayoutStop.to_string(), "layoutstop");
    }

    #[test]
    fn test_interaction_node() {
        let id = Id::new("drag_target");
        assert_eq!(Interaction::DragStart(id).node(), id);
        assert_eq!(Interaction::DragMove(id).node(), id);
        assert_eq!(Interaction::DragEnd(id).node(), id);
    }
}
