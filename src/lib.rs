//! Stochastic simulation of chemical reaction networks with the Gillespie
//! next-reaction method.
//!
//! A [`Network`] is loaded once and shared read-only; each trajectory runs in
//! its own [`SimulationEngine`] with an injected [`UniformSource`].

pub mod dependency;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod network;
pub mod queue;
pub mod reaction;
pub mod report;
pub mod rng;
pub mod stats;

#[cfg(feature = "python")]
mod python;

pub use dependency::DependencyGraph;
pub use engine::{Event, EventObserver, RunOutcome, RunPhase, SimulationEngine, Step};
pub use ensemble::{
    EnsembleResult, EventLog, EventRecord, MultiRun, SimulationOptions, SingleRun, run_ensemble,
    run_many, run_single,
};
pub use error::SimError;
pub use network::Network;
pub use queue::{EventQueue, Scheduled};
pub use reaction::{Reaction, ReactionKind};
pub use rng::{ReplaySource, UniformSource, derive_seed};
pub use stats::{RunAggregator, SpeciesSummary};
