//! What a run will hand to the engine.
//!
//! [`LayoutPlan`] is the host collection filtered down to what the engine
//! simulates: participating nodes, deduplicated links, pending pin changes
//! and the step budget. Computing it reads the host but never mutates it.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use forcelink_core::{
    data::keys,
    host::{ElementView, Host},
    identifier::Id,
};

use crate::config::LayoutConfig;

/// One engine link, created from the first host edge between its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    edge: Id,
    source: Id,
    target: Id,
}

impl Link {
    /// Returns the host edge the link was created from
    pub fn edge(&self) -> Id {
        self.edge
    }

    /// Returns the source node
    pub fn source(&self) -> Id {
        self.source
    }

    /// Returns the target node
    pub fn target(&self) -> Id {
        self.target
    }
}

/// Pin change requested through node data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinChange {
    /// `pin` is set: fix the node, then flip the flag to `unpin`.
    Pin,
    /// `unpin` is set: release the node and clear the flag.
    Unpin,
}

/// A pin change for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinAction {
    node: Id,
    change: PinChange,
}

impl PinAction {
    /// Returns the node to pin or release
    pub fn node(&self) -> Id {
        self.node
    }

    /// Returns the requested change
    pub fn change(&self) -> PinChange {
        self.change
    }
}

/// Why a host node does not take part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionReason {
    /// The node is a compound parent of other nodes.
    Parent,
    /// No edge touches the node.
    Isolated,
}

/// A host node left out of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    node: Id,
    reason: ExclusionReason,
}

impl Exclusion {
    /// Returns the excluded node
    pub fn node(&self) -> Id {
        self.node
    }

    /// Returns why the node was excluded
    pub fn reason(&self) -> ExclusionReason {
        self.reason
    }
}

/// The engine's view of a host collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutPlan {
    budget: u64,
    nodes: Vec<Id>,
    links: Vec<Link>,
    pins: Vec<PinAction>,
    excluded: Vec<Exclusion>,
    merged_edges: Vec<Id>,
    dangling_edges: Vec<Id>,
}

impl LayoutPlan {
    /// Computes the plan for `host` under `config`.
    ///
    /// An unbound host yields an empty plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use forcelink::{config::LayoutConfig, plan::LayoutPlan};
    /// use forcelink_core::collection::Collection;
    ///
    /// let mut host = Collection::new();
    /// host.add_node("a").unwrap();
    /// host.add_node("b").unwrap();
    /// host.add_node("lonely").unwrap();
    /// host.add_edge("ab", "a", "b").unwrap();
    /// host.add_edge("ba", "b", "a").unwrap();
    ///
    /// let plan = LayoutPlan::from_host(&host, &LayoutConfig::default());
    /// assert_eq!(plan.nodes().len(), 2);
    /// assert_eq!(plan.links().len(), 1);
    /// assert_eq!(plan.excluded().len(), 1);
    /// ```
    pub fn from_host(host: &impl Host, config: &LayoutConfig) -> Self {
        if !host.is_bound() {
            debug!("Host is not bound to a viewport, planning nothing");
            return Self::default();
        }

        let elements = host.elements();
        let parents: HashSet<Id> = elements
            .iter()
            .filter(|element| element.is_node())
            .filter_map(|element| host.parent(element.id()))
            .collect();

        let mut plan = Self {
            budget: config.step_budget(),
            ..Self::default()
        };

        for node in elements.iter().filter(|element| element.is_node()) {
            let id = node.id();
            if parents.contains(&id) {
                plan.exclude(id, ExclusionReason::Parent);
            } else if host.connected_edges(id) == 0 {
                plan.exclude(id, ExclusionReason::Isolated);
            } else {
                plan.nodes.push(id);
            }
        }

        let participating: HashSet<Id> = plan.nodes.iter().copied().collect();
        let mut seen = HashSet::new();
        for (edge, source, target) in elements.iter().filter_map(edge_parts) {
            if !seen.insert(Id::pair_key(source, target)) {
                plan.merged_edges.push(edge);
            } else if participating.contains(&source) && participating.contains(&target) {
                plan.links.push(Link {
                    edge,
                    source,
                    target,
                });
            } else {
                plan.dangling_edges.push(edge);
            }
        }

        for &node in &plan.nodes {
            let change = if host.flag(node, keys::PIN) {
                PinChange::Pin
            } else if host.flag(node, keys::UNPIN) {
                PinChange::Unpin
            } else {
                continue;
            };
            plan.pins.push(PinAction { node, change });
        }

        debug!(
            nodes = plan.nodes.len(),
            links = plan.links.len(),
            pins = plan.pins.len(),
            excluded = plan.excluded.len(),
            merged_edges = plan.merged_edges.len(),
            budget = plan.budget;
            "Layout plan computed"
        );
        plan
    }

    fn exclude(&mut self, node: Id, reason: ExclusionReason) {
        self.excluded.push(Exclusion { node, reason });
    }

    /// Returns the number of steps the run may take
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Participating nodes in host order
    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    /// Returns `true` if no node participates
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks whether `node` participates
    pub fn contains(&self, node: Id) -> bool {
        self.nodes.contains(&node)
    }

    /// Deduplicated links in host order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Pending pin changes in node order
    pub fn pins(&self) -> &[PinAction] {
        &self.pins
    }

    /// Nodes left out of the simulation
    pub fn excluded(&self) -> &[Exclusion] {
        &self.excluded
    }

    /// Edges merged into an earlier edge between the same endpoints
    pub fn merged_edges(&self) -> &[Id] {
        &self.merged_edges
    }

    /// Edges dropped because an endpoint does not participate
    pub fn dangling_edges(&self) -> &[Id] {
        &self.dangling_edges
    }
}

fn edge_parts(element: &ElementView) -> Option<(Id, Id, Id)> {
    element
        .endpoints()
        .map(|(source, target)| (element.id(), source, target))
}


#[cfg(test)]
mod proptest_tests {
    use forcelink_core::collection::Collection;
    use proptest::prelude::*;

    use super::*;

    fn edges_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0usize..6, 0usize..6), 0..24)
    }

    fn build(edges: &[(usize, usize)]) -> Collection {
        let mut host = Collection::new();
        for node in 0..6 {
            host.add_node(&format!("p_{node}")).unwrap();
        }
        for (idx, (source, target)) in edges.iter().enumerate() {
            host.add_edge(
                &format!("pe_{idx}"),
                &format!("p_{source}"),
                &format!("p_{target}"),
            )
            .unwrap();
        }
        host
    }

    /// Every unordered endpoint pair appears in exactly one link.
    fn check_links_are_unique_pairs(edges: Vec<(usize, usize)>) -> Result<(), TestCaseError> {
        let plan = LayoutPlan::from_host(&build(&edges), &LayoutConfig::default());

        let pairs: HashSet<_> = plan
            .links()
            .iter()
            .map(|link| Id::pair_key(link.source(), link.target()))
            .collect();
        prop_assert_eq!(pairs.len(), plan.links().len());

        let expected: HashSet<_> = edges.iter().map(|(s, t)| (s.min(t), s.max(t))).collect();
        prop_assert_eq!(plan.links().len(), expected.len());
        prop_assert_eq!(plan.links().len() + plan.merged_edges().len(), edges.len());
        Ok(())
    }

    /// Only nodes touched by an edge participate.
    fn check_isolated_nodes_never_participate(
        edges: Vec<(usize, usize)>,
    ) -> Result<(), TestCaseError> {
        let plan = LayoutPlan::from_host(&build(&edges), &LayoutConfig::default());

        let touched: HashSet<_> = edges.iter().flat_map(|(s, t)| [*s, *t]).collect();
        prop_assert_eq!(plan.nodes().len(), touched.len());
        for exclusion in plan.excluded() {
            prop_assert_eq!(exclusion.reason(), ExclusionReason::Isolated);
            prop_assert!(!plan.contains(exclusion.node()));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn links_are_unique_pairs(edges in edges_strategy()) {
            check_links_are_unique_pairs(edges)?;
        }

        #[test]
        fn isolated_nodes_never_participate(edges in edges_strategy()) {
            check_isolated_nodes_never_participate(edges)?;
        }
    }
}
