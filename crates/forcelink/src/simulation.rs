//! The engine side of a layout: external force simulations.
//!
//! The adapter never computes forces itself. It asks a [`SimulationFactory`]
//! for a [`Simulation`] over the graph it built, steps it, and reads node
//! positions back. Optional capabilities (moving and pinning nodes) report
//! whether the engine supports them instead of failing.

use std::error::Error;

use forcelink_core::{geometry::Point, identifier::Id};

use crate::{config::LayoutConfig, error::EngineError};

/// Result of a single simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The engine can take further steps.
    Continue,
    /// The engine considers the layout finished.
    Done,
}

impl StepOutcome {
    /// Maps the boolean stop signal engines commonly return.
    pub fn from_stop(stop: bool) -> Self {
        if stop { Self::Done } else { Self::Continue }
    }

    /// Returns `true` for [`StepOutcome::Done`]
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// Notifications an engine queues between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEvent {
    /// The engine converged; no further steps are needed.
    Stable,
    /// The engine finished a cycle of internal iterations.
    Cycle,
}

/// A running force simulation.
pub trait Simulation {
    /// Error raised by a failing step.
    type Error: Error + Send + Sync + 'static;

    /// Advances the simulation by one step.
    fn step(&mut self) -> Result<StepOutcome, Self::Error>;

    /// Current position of a node, `None` if the engine does not know it.
    fn node_position(&self, id: Id) -> Option<Point>;

    /// Moves a node. Returns `false` if the engine does not support it.
    fn set_node_position(&mut self, id: Id, position: Point) -> bool {
        let _ = (id, position);
        false
    }

    /// Pins or releases a node. Returns `false` if the engine does not support it.
    fn pin_node(&mut self, id: Id, pinned: bool) -> bool {
        let _ = (id, pinned);
        false
    }

    /// Takes the next queued notification, if any.
    fn poll_event(&mut self) -> Option<SimulationEvent> {
        None
    }
}

/// Creates simulations over graphs of type `G`.
pub trait SimulationFactory<G> {
    /// The simulation produced.
    type Simulation: Simulation;

    /// Creates a simulation for `graph`.
    ///
    /// `config` carries layout settings only; host references are never part
    /// of it.
    fn create(&self, graph: G, config: &LayoutConfig) -> Result<Self::Simulation, EngineError>;
}

impl<G, S, F> SimulationFactory<G> for F
where
    S: Simulation,
    F: Fn(G, &LayoutConfig) -> Result<S, EngineError>,
{
    type Simulation = S;

    fn create(&self, graph: G, config: &LayoutConfig) -> Result<S, EngineError> {
        self(graph, config)
    }
}

/// Handle of an engine running outside the caller's thread.
pub trait WorkerHandle {
    /// Asks the worker to stop. Called at most once per stop or destroy.
    fn terminate(&mut self);
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, convert::Infallible};

    use super::*;
    use crate::graph::SimulationGraph;

    struct Frozen {
        positions: HashMap<Id, Point>,
    }

    impl Simulation for Frozen {
        type Error = Infallible;

        fn step(&mut self) -> Result<StepOutcome, Infallible> {
            Ok(StepOutcome::Done)
        }

        fn node_position(&self, id: Id) -> Option<Point> {
            self.positions.get(&id).copied()
        }
    }

    #[test]
    fn test_step_outcome_from_stop() {
        assert_eq!(StepOutcome::from_stop(true), StepOutcome::Done);
        assert_eq!(StepOutcome::from_stop(false), StepOutcome::Continue);
        assert!(StepOutcome::Done.is_done());
    }

    #[test]
    fn test_optional_capabilities_default_to_unsupported() {
        let id = Id::new("frozen_node");
        let mut simulation = Frozen {
            positions: HashMap::from([(id, Point::new(1.0, 2.0))]),
        };

        assert!(!simulation.set_node_position(id, Point::default()));
        assert!(!simulation.pin_node(id, true));
        assert_eq!(simulation.poll_event(), None);
        assert_eq!(simulation.node_position(id), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_closure_factory() {
        let factory = |graph: SimulationGraph, _: &LayoutConfig| -> Result<Frozen, EngineError> {
            Ok(Frozen {
                positions: graph.nodes().map(|id| (id, Point::default())).collect(),
            })
        };

        let mut graph = SimulationGraph::new();
        graph.add_node(Id::new("closure_node"));

        let simulation = factory.create(graph, &LayoutConfig::default()).unwrap();
        assert_eq!(
            simulation.node_position(Id::new("closure_node")),
            Some(Point::default())
        );
    }
}
