//! The layout adapter: drives an external simulation over a host collection.
//!
//! A run goes through four phases:
//!
//! 1. **Plan**: filter the host collection ([`LayoutPlan`]).
//! 2. **Build**: hand the plan to the [`GraphBuilder`] and the resulting graph
//!    to the [`SimulationFactory`]; apply pending pin changes.
//! 3. **Step**: each [`LayoutAdapter::tick`] advances the simulation once and,
//!    when animating, copies positions back onto the host.
//! 4. **Finish**: a final sync, `layoutstop` and `layoutready`.
//!
//! Hosts that want to stay responsive call [`LayoutAdapter::start`] once and
//! then [`LayoutAdapter::tick`] from their animation scheduling, every
//! [`LayoutAdapter::refresh_interval`]. [`LayoutAdapter::run`] drives a whole
//! run synchronously.

use std::time::Duration;

use log::{debug, info, trace, warn};

use forcelink_core::{
    data::{DataValue, keys},
    host::{Host, Interaction, LayoutEvent},
};

use crate::{
    config::LayoutConfig,
    error::LayoutError,
    graph::{GraphBuilder, PetgraphBuilder},
    plan::{LayoutPlan, PinChange},
    simulation::{Simulation, SimulationEvent, SimulationFactory, WorkerHandle},
    state::{RunState, RunSummary, Termination},
};

/// Result of advancing a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The run continues; call [`LayoutAdapter::tick`] again.
    Continue,
    /// The run ended.
    Finished(RunSummary),
    /// No run is active.
    Inactive,
}

/// Drives a force simulation over a [`Host`].
///
/// The graph builder and simulation factory are injected, so the adapter
/// works with any engine that implements [`Simulation`].
///
/// # Examples
///
/// ```rust,no_run
/// use forcelink::{
///     LayoutAdapter, config::LayoutConfig, error::EngineError, graph::SimulationGraph,
/// };
/// # use forcelink::simulation::{Simulation, StepOutcome};
/// # use forcelink_core::{geometry::Point, identifier::Id};
/// # struct Engine;
/// # impl Engine {
/// #     fn new(_: SimulationGraph, _: &LayoutConfig) -> Self { Engine }
/// # }
/// # impl Simulation for Engine {
/// #     type Error = std::convert::Infallible;
/// #     fn step(&mut self) -> Result<StepOutcome, Self::Error> { Ok(StepOutcome::Done) }
/// #     fn node_position(&self, _: Id) -> Option<Point> { None }
/// # }
/// use forcelink_core::collection::Collection;
///
/// let factory = |graph: SimulationGraph, config: &LayoutConfig| -> Result<Engine, EngineError> {
///     Ok(Engine::new(graph, config))
/// };
/// let mut adapter = LayoutAdapter::with_factory(LayoutConfig::default(), factory)
///     .expect("default configuration is valid");
///
/// let mut host = Collection::new();
/// let summary = adapter.run(&mut host).expect("layout failed");
/// println!("{} steps", summary.steps());
/// ```
pub struct LayoutAdapter<B, F>
where
    B: GraphBuilder,
    F: SimulationFactory<B::Graph>,
{
    config: LayoutConfig,
    builder: B,
    factory: F,
    state: RunState,
    plan: Option<LayoutPlan>,
    simulation: Option<F::Simulation>,
    worker: Option<Box<dyn WorkerHandle>>,
    remaining: u64,
    steps: u64,
    synced: bool,
    summary: Option<RunSummary>,
}

impl<F> LayoutAdapter<PetgraphBuilder, F>
where
    F: SimulationFactory<<PetgraphBuilder as GraphBuilder>::Graph>,
{
    /// Creates an adapter building [`SimulationGraph`](crate::graph::SimulationGraph)s.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Config`] if the configuration is invalid.
    pub fn with_factory(config: LayoutConfig, factory: F) -> Result<Self, LayoutError> {
        Self::new(config, PetgraphBuilder, factory)
    }
}

impl<B, F> LayoutAdapter<B, F>
where
    B: GraphBuilder,
    F: SimulationFactory<B::Graph>,
{
    /// Creates an adapter with an injected graph builder and simulation factory.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Config`] if the configuration is invalid.
    pub fn new(config: LayoutConfig, builder: B, factory: F) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            builder,
            factory,
            state: RunState::Idle,
            plan: None,
            simulation: None,
            worker: None,
            remaining: 0,
            steps: 0,
            synced: false,
            summary: None,
        })
    }

    /// Returns the run configuration
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns the current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the steps left in the budget of the current run
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns the steps taken in the current or last run
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns the plan of the current or last run
    pub fn plan(&self) -> Option<&LayoutPlan> {
        self.plan.as_ref()
    }

    /// Returns the simulation of the active run
    pub fn simulation(&self) -> Option<&F::Simulation> {
        self.simulation.as_ref()
    }

    /// Returns the summary of the last finished run
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// How often a host should call [`tick`](Self::tick)
    pub fn refresh_interval(&self) -> Duration {
        self.config.refresh_interval()
    }

    /// Attaches the handle of an engine running in a worker.
    ///
    /// The worker is told to terminate on [`stop`](Self::stop) or
    /// [`destroy`](Self::destroy).
    pub fn attach_worker(&mut self, worker: impl WorkerHandle + 'static) {
        self.worker = Some(Box::new(worker));
    }

    /// Runs a layout to completion.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if graph building or the engine fails. The host
    /// has received `layoutstop` by then.
    pub fn run(&mut self, host: &mut impl Host) -> Result<RunSummary, LayoutError> {
        let mut tick = self.start(host)?;
        loop {
            match tick {
                Tick::Continue => tick = self.tick(host)?,
                Tick::Finished(summary) => return Ok(summary),
                Tick::Inactive => {
                    return Ok(RunSummary::new(self.steps, Termination::Destroyed));
                }
            }
        }
    }

    /// Starts a run: emits `layoutstart`, plans, builds the simulation and
    /// applies pin changes.
    ///
    /// With nothing to simulate, the run finishes immediately.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if graph building or engine creation fails.
    pub fn start(&mut self, host: &mut impl Host) -> Result<Tick, LayoutError> {
        if self.state.is_active() {
            warn!(state:% = self.state; "Starting a new run over an active one");
            self.release(host);
        }

        self.steps = 0;
        self.synced = false;
        self.summary = None;
        host.notify(LayoutEvent::LayoutStart);

        let plan = LayoutPlan::from_host(host, &self.config);
        info!(
            nodes = plan.nodes().len(),
            links = plan.links().len(),
            budget = plan.budget();
            "Starting layout"
        );
        let empty = plan.is_empty();
        self.remaining = plan.budget();
        self.plan = Some(plan);
        self.state = RunState::Running;

        if empty {
            debug!("Nothing to simulate");
            return Ok(Tick::Finished(self.finish(host, Termination::Empty)));
        }

        let simulation = match self.create_simulation() {
            Ok(simulation) => simulation,
            Err(err) => return Err(self.fail(host, err)),
        };
        self.simulation = Some(simulation);

        self.apply_pins(host);
        if let Some(plan) = &self.plan {
            host.listen(plan.nodes());
        }
        Ok(Tick::Continue)
    }

    fn create_simulation(&self) -> Result<F::Simulation, LayoutError> {
        let Some(plan) = &self.plan else {
            return Err(LayoutError::Graph("no plan to build from".to_string()));
        };
        let graph = self.builder.build(plan)?;
        self.factory
            .create(graph, &self.config)
            .map_err(LayoutError::Simulation)
    }

    fn apply_pins(&mut self, host: &mut impl Host) {
        let (Some(plan), Some(simulation)) = (&self.plan, self.simulation.as_mut()) else {
            return;
        };
        for pin in plan.pins() {
            let node = pin.node();
            let supported = match pin.change() {
                PinChange::Pin => {
                    let supported = simulation.pin_node(node, true);
                    host.remove_data(node, keys::PIN);
                    host.set_data(node, keys::UNPIN, DataValue::from(true));
                    supported
                }
                PinChange::Unpin => {
                    let supported = simulation.pin_node(node, false);
                    host.remove_data(node, keys::UNPIN);
                    supported
                }
            };
            if supported {
                debug!(node:% = node, change:? = pin.change(); "Pin change applied");
            } else {
                warn!(node:% = node; "Engine does not support pinning");
            }
        }
    }

    /// Takes one step of the active run.
    ///
    /// A pending stop request or an exhausted budget finishes the run without
    /// stepping. Otherwise the simulation steps once; a `Stable` event or a
    /// `Done` outcome ends the run after this step.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Simulation`] if the step fails. The host has
    /// received `layoutstop` by then.
    pub fn tick(&mut self, host: &mut impl Host) -> Result<Tick, LayoutError> {
        match self.state {
            RunState::Idle | RunState::Stopped => return Ok(Tick::Inactive),
            RunState::Stopping => {
                return Ok(Tick::Finished(
                    self.finish(host, Termination::StopRequested),
                ));
            }
            RunState::Running => {}
        }

        if self.remaining == 0 {
            return Ok(Tick::Finished(
                self.finish(host, Termination::BudgetExhausted),
            ));
        }

        let Some(simulation) = self.simulation.as_mut() else {
            return Ok(Tick::Finished(self.finish(host, Termination::Empty)));
        };

        self.remaining -= 1;
        self.steps += 1;
        let outcome = match simulation.step() {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fail(host, LayoutError::simulation(err))),
        };
        trace!(step = self.steps, remaining = self.remaining, outcome:? = outcome; "Simulation step");

        let mut termination = None;
        while let Some(event) = simulation.poll_event() {
            match event {
                SimulationEvent::Stable => {
                    debug!(step = self.steps; "Simulation reported stable");
                    self.remaining = 0;
                    termination = Some(Termination::Stable);
                }
                SimulationEvent::Cycle => trace!(step = self.steps; "Simulation cycle"),
            }
        }
        if outcome.is_done() {
            self.remaining = 0;
            termination.get_or_insert(Termination::Completed);
        }

        if self.remaining == 0 {
            let termination = termination.unwrap_or(Termination::BudgetExhausted);
            return Ok(Tick::Finished(self.finish(host, termination)));
        }
        if self.config.animate() {
            self.sync(host);
        }
        Ok(Tick::Continue)
    }

    /// Copies simulation positions onto every participating, non-dragged node.
    ///
    /// The viewport is fitted only when at least one node participates.
    fn sync(&mut self, host: &mut impl Host) {
        let mut participants = 0;
        if let (Some(plan), Some(simulation)) = (&self.plan, &self.simulation) {
            participants = plan.nodes().len();
            for &node in plan.nodes() {
                if host.flag(node, keys::DRAGGING) {
                    trace!(node:% = node; "Skipping dragged node");
                    continue;
                }
                match simulation.node_position(node) {
                    Some(position) if position.is_finite() => host.set_position(node, position),
                    Some(position) => {
                        warn!(node:% = node, position:? = position; "Ignoring non-finite position");
                    }
                    None => trace!(node:% = node; "Engine has no position for node"),
                }
            }
        }

        if self.config.fit() && participants > 0 {
            host.fit(self.config.padding());
        }
        if !self.synced {
            self.synced = true;
            host.notify(LayoutEvent::LayoutReady);
        }
    }

    fn finish(&mut self, host: &mut impl Host, termination: Termination) -> RunSummary {
        self.sync(host);
        host.notify(LayoutEvent::LayoutStop);
        host.notify(LayoutEvent::LayoutReady);
        self.release(host);

        let summary = RunSummary::new(self.steps, termination);
        self.summary = Some(summary);
        info!(steps = self.steps, termination:? = termination; "Layout finished");
        summary
    }

    fn fail(&mut self, host: &mut impl Host, err: LayoutError) -> LayoutError {
        warn!(error:% = err, step = self.steps; "Layout failed");
        host.notify(LayoutEvent::LayoutStop);
        self.release(host);
        self.summary = Some(RunSummary::new(self.steps, Termination::Failed));
        err
    }

    /// Drops the simulation and stops listening; the run becomes `Stopped`.
    fn release(&mut self, host: &mut impl Host) {
        if self.simulation.take().is_some() {
            if let Some(plan) = &self.plan {
                host.unlisten(plan.nodes());
            }
        }
        self.remaining = 0;
        self.state = RunState::Stopped;
    }

    /// Handles a drag interaction forwarded by the host.
    ///
    /// Returns `true` if the interaction concerned a participating node.
    /// Drag start and end toggle the node's `dragging` flag; a drag move
    /// while the flag is set pushes the host position into the simulation.
    pub fn handle_interaction(&mut self, host: &mut impl Host, interaction: Interaction) -> bool {
        let node = interaction.node();
        if !self.plan.as_ref().is_some_and(|plan| plan.contains(node)) {
            return false;
        }

        match interaction {
            Interaction::DragEnd(_) => {
                host.remove_data(node, keys::DRAGGING);
                true
            }
            _ if !self.state.is_active() => false,
            Interaction::DragStart(_) => {
                host.set_data(node, keys::DRAGGING, DataValue::from(true));
                true
            }
            Interaction::DragMove(_) => {
                if !host.flag(node, keys::DRAGGING) {
                    return true;
                }
                let (Some(simulation), Some(position)) =
                    (self.simulation.as_mut(), host.position(node))
                else {
                    return true;
                };
                if !simulation.set_node_position(node, position) {
                    debug!(node:% = node; "Engine does not support moving nodes");
                }
                true
            }
        }
    }

    /// Requests the active run to stop.
    ///
    /// Emits `layoutstop` and terminates an attached worker. The next
    /// [`tick`](Self::tick) finishes the run. A no-op without an active run
    /// or when a stop is already pending.
    pub fn stop(&mut self, host: &mut impl Host) {
        if self.state != RunState::Running {
            return;
        }
        info!(steps = self.steps, remaining = self.remaining; "Stop requested");
        self.state = RunState::Stopping;
        self.remaining = 0;
        self.terminate_worker();
        host.notify(LayoutEvent::LayoutStop);
    }

    /// Tears down the adapter's run without notifying the host.
    ///
    /// Terminates an attached worker, stops listening and drops the
    /// simulation. Idempotent.
    pub fn destroy(&mut self, host: &mut impl Host) {
        self.terminate_worker();
        if self.state.is_active() {
            debug!(steps = self.steps; "Destroying active layout run");
            self.release(host);
            self.summary = Some(RunSummary::new(self.steps, Termination::Destroyed));
        }
    }

    fn terminate_worker(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            debug!("Terminating layout worker");
            worker.terminate();
        }
    }
}
