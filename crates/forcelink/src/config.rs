//! Configuration types for force-directed layout runs.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! partial document only overrides the keys it names and every other key
//! keeps the documented default.
//!
//! # Overview
//!
//! - [`LayoutConfig`] - Top-level run settings: budget, cadence, sync and fit behavior.
//! - [`AsyncConfig`] - Stepping in cycles; caps the budget at `max_iterations / steps_per_cycle`.
//! - [`PhysicsConfig`] - Engine coefficients, passed through to the simulation untouched.
//!
//! # Example
//!
//! ```
//! # use forcelink::config::LayoutConfig;
//! let config = LayoutConfig::default();
//! assert_eq!(config.iterations(), 10_000);
//! assert!(config.animate());
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation failures
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Top-level layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Iteration budget of a run.
    iterations: u64,

    /// Tick pacing hint for hosts driving the layout, in milliseconds.
    refresh_interval: u64,

    /// Steps between updates for engines running in a worker.
    refresh_iterations: u64,

    /// Movement threshold below which the engine may report stability.
    stable_threshold: f64,

    /// Sync positions after every step instead of only at termination.
    animate: bool,

    /// Fit the viewport after every sync.
    fit: bool,

    /// Padding left around content when fitting the viewport.
    padding: f32,

    /// Cycle-based stepping settings.
    #[serde(rename = "async")]
    asynchronous: AsyncConfig,

    /// Engine coefficients.
    physics: PhysicsConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            refresh_interval: 16,
            refresh_iterations: 10,
            stable_threshold: 2.0,
            animate: true,
            fit: true,
            padding: 30.0,
            asynchronous: AsyncConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Returns the configured iteration budget
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns the tick pacing hint.
    ///
    /// Zero when cycle-based stepping is disabled, since there is nothing
    /// to pace against.
    pub fn refresh_interval(&self) -> Duration {
        if self.asynchronous().is_some() {
            Duration::from_millis(self.refresh_interval)
        } else {
            Duration::ZERO
        }
    }

    /// Returns how many steps a worker engine runs between updates
    pub fn refresh_iterations(&self) -> u64 {
        self.refresh_iterations
    }

    /// Returns the stability threshold handed to the engine
    pub fn stable_threshold(&self) -> f64 {
        self.stable_threshold
    }

    /// Returns whether positions are synced after every step
    pub fn animate(&self) -> bool {
        self.animate
    }

    /// Returns whether the viewport is fitted after every sync
    pub fn fit(&self) -> bool {
        self.fit
    }

    /// Returns the viewport fit padding
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Returns the cycle-based stepping settings, or `None` when disabled
    pub fn asynchronous(&self) -> Option<&AsyncConfig> {
        self.asynchronous.enabled.then_some(&self.asynchronous)
    }

    /// Returns the engine coefficients
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Number of steps a run may take.
    ///
    /// With cycle-based stepping the budget is capped at
    /// `max_iterations / steps_per_cycle`, rounded to the nearest step.
    ///
    /// ```
    /// # use forcelink::config::LayoutConfig;
    /// assert_eq!(LayoutConfig::default().step_budget(), 33);
    /// assert_eq!(
    ///     LayoutConfig::default().with_async(false).step_budget(),
    ///     10_000
    /// );
    /// ```
    pub fn step_budget(&self) -> u64 {
        match self.asynchronous() {
            Some(cycles) if cycles.max_iterations > 0 && cycles.steps_per_cycle > 0 => {
                let per_cycle =
                    (cycles.max_iterations as f64 / cycles.steps_per_cycle as f64).round() as u64;
                per_cycle.min(self.iterations)
            }
            _ => self.iterations,
        }
    }

    /// Sets the iteration budget
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets whether positions are synced after every step
    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Sets whether the viewport is fitted after every sync
    pub fn with_fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    /// Sets the viewport fit padding
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Enables or disables cycle-based stepping
    pub fn with_async(mut self, enabled: bool) -> Self {
        self.asynchronous.enabled = enabled;
        self
    }

    /// Replaces the cycle-based stepping settings
    pub fn with_async_config(mut self, asynchronous: AsyncConfig) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    /// Replaces the engine coefficients
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::invalid("iterations", "must be positive"));
        }
        non_negative("stable_threshold", self.stable_threshold)?;
        non_negative("padding", f64::from(self.padding))?;
        if self.asynchronous.enabled && self.asynchronous.steps_per_cycle == 0 {
            return Err(ConfigError::invalid(
                "async.steps_per_cycle",
                "must be positive",
            ));
        }
        if self.step_budget() == 0 {
            return Err(ConfigError::invalid(
                "async.max_iterations",
                format!(
                    "{} iterations in cycles of {} leave no step to take",
                    self.asynchronous.max_iterations, self.asynchronous.steps_per_cycle
                ),
            ));
        }
        self.physics.validate()
    }
}

/// Cycle-based stepping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncConfig {
    /// Whether cycle-based stepping is in effect.
    enabled: bool,

    /// Total engine iterations across all cycles.
    max_iterations: u64,

    /// Engine iterations per cycle.
    steps_per_cycle: u64,

    /// Whether the engine waits for the host between steps.
    wait_for_step: bool,
}

impl Default for AsyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_iterations: 1000,
            steps_per_cycle: 30,
            wait_for_step: false,
        }
    }
}

impl AsyncConfig {
    /// Creates enabled settings with the given iteration counts
    pub fn new(max_iterations: u64, steps_per_cycle: u64) -> Self {
        Self {
            max_iterations,
            steps_per_cycle,
            ..Self::default()
        }
    }

    /// Returns the total engine iterations across all cycles
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Returns the engine iterations per cycle
    pub fn steps_per_cycle(&self) -> u64 {
        self.steps_per_cycle
    }

    /// Returns whether the engine waits for the host between steps
    pub fn wait_for_step(&self) -> bool {
        self.wait_for_step
    }
}

/// Force-simulation coefficients.
///
/// The adapter never interprets these; they are validated and handed to the
/// engine as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Ideal length of links (springs).
    spring_length: f64,

    /// Hooke's law coefficient; 1 is a solid spring.
    spring_coeff: f64,

    /// Coulomb's law coefficient. Negative values repel.
    gravity: f64,

    /// Barnes-Hut tolerance in `(0, 1]`; 1 degenerates to brute force.
    theta: f64,

    /// Drag coefficient in `[0, 1)`, slows the system down.
    drag_coeff: f64,

    /// Integration time step.
    time_step: f64,

    /// Engine-side iteration cap.
    iterations: u64,

    /// Engine-side fit hint.
    fit: bool,

    /// Maximum movement still considered stable.
    stable_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            spring_length: 100.0,
            spring_coeff: 0.0008,
            gravity: -1.2,
            theta: 0.8,
            drag_coeff: 0.02,
            time_step: 20.0,
            iterations: 10_000,
            fit: true,
            stable_threshold: 0.000_009,
        }
    }
}

impl PhysicsConfig {
    /// Returns the ideal link length
    pub fn spring_length(&self) -> f64 {
        self.spring_length
    }

    /// Returns the spring coefficient
    pub fn spring_coeff(&self) -> f64 {
        self.spring_coeff
    }

    /// Returns the repulsion coefficient
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Returns the Barnes-Hut tolerance
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Returns the drag coefficient
    pub fn drag_coeff(&self) -> f64 {
        self.drag_coeff
    }

    /// Returns the integration time step
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Returns the engine-side iteration cap
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns the engine-side fit hint
    pub fn fit(&self) -> bool {
        self.fit
    }

    /// Returns the engine-side stability threshold
    pub fn stable_threshold(&self) -> f64 {
        self.stable_threshold
    }

    /// Sets the ideal link length
    pub fn with_spring_length(mut self, spring_length: f64) -> Self {
        self.spring_length = spring_length;
        self
    }

    /// Sets the Barnes-Hut tolerance
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Sets the drag coefficient
    pub fn with_drag_coeff(mut self, drag_coeff: f64) -> Self {
        self.drag_coeff = drag_coeff;
        self
    }

    /// Sets the integration time step
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("physics.spring_length", self.spring_length)?;
        finite("physics.spring_coeff", self.spring_coeff)?;
        finite("physics.gravity", self.gravity)?;
        finite("physics.theta", self.theta)?;
        if self.theta <= 0.0 || self.theta > 1.0 {
            return Err(ConfigError::invalid(
                "physics.theta",
                format!("must be in (0, 1], got {}", self.theta),
            ));
        }
        finite("physics.drag_coeff", self.drag_coeff)?;
        if !(0.0..1.0).contains(&self.drag_coeff) {
            return Err(ConfigError::invalid(
                "physics.drag_coeff",
                format!("must be in [0, 1), got {}", self.drag_coeff),
            ));
        }
        finite("physics.time_step", self.time_step)?;
        if self.time_step <= 0.0 {
            return Err(ConfigError::invalid("physics.time_step", "must be positive"));
        }
        non_negative("physics.stable_threshold", self.stable_threshold)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}
