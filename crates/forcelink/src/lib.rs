//! Forcelink - drive an external force-directed layout engine from a graph host.
//!
//! The adapter holds no physics of its own. It filters a host collection
//! into a [`LayoutPlan`](plan::LayoutPlan), builds the engine's graph through
//! an injected [`GraphBuilder`](graph::GraphBuilder), steps the engine
//! produced by an injected [`SimulationFactory`](simulation::SimulationFactory),
//! and copies positions back onto the host while forwarding user drags into
//! the engine.
//!
//! # Overview
//!
//! - [`LayoutAdapter`] - The run loop and its state machine.
//! - [`config`] - Layout settings with documented defaults.
//! - [`plan`] - Node filtering, edge dedup, pin changes and step budget.
//! - [`graph`] - Engine graph construction.
//! - [`simulation`] - The engine interface.

pub mod adapter;
pub mod config;
pub mod error;
pub mod graph;
pub mod plan;
pub mod simulation;
pub mod state;

pub use forcelink_core::{collection, data, geometry, host, identifier};

pub use adapter::{LayoutAdapter, Tick};
pub use error::LayoutError;
pub use state::{RunState, RunSummary, Termination};
