//! Drives one or many trajectories over a shared [`Network`].
//!
//! A single run records every event that moves a displayed species and keeps
//! the per-reaction fire counts. Several runs only keep each run's final
//! displayed counts, which feed the mean/variance summary. Runs own their
//! engine state and random stream, so they are spread across a rayon pool.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::info;

use crate::engine::{Event, EventObserver, RunOutcome, SimulationEngine};
use crate::error::SimError;
use crate::network::Network;
use crate::rng::{UniformSource, derive_seed};
use crate::stats::{RunAggregator, SpeciesSummary};

#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub n_runs: usize,
    pub seed: Option<u64>,
    /// Size of a dedicated rayon pool; `None` uses the global pool.
    pub n_threads: Option<usize>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            n_runs: 1,
            seed: None,
            n_threads: None,
        }
    }
}

/// Displayed species whose count changed in one applied event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub time: f64,
    pub reaction: usize,
    /// `(species, count after the event)` in display order.
    pub changed: Vec<(usize, i64)>,
}

#[derive(Clone, Debug)]
pub struct SingleRun {
    pub events: Vec<EventRecord>,
    pub outcome: RunOutcome,
}

#[derive(Clone, Debug)]
pub struct MultiRun {
    /// Final displayed counts, one row per run in run order.
    pub finals: Vec<Vec<i64>>,
    pub summary: Vec<SpeciesSummary>,
}

#[derive(Clone, Debug)]
pub enum EnsembleResult {
    Single(SingleRun),
    Multi(MultiRun),
}

/// Collects [`EventRecord`]s for reactions that shift a displayed species.
pub struct EventLog {
    watched: Vec<Vec<usize>>,
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new(network: &Network) -> Self {
        let watched = network
            .reactions()
            .iter()
            .map(|reaction| {
                let mut seen = Vec::new();
                for &species in network.displays() {
                    let consumed = reaction.reactants().iter().filter(|&&s| s == species).count();
                    let produced = reaction.products().iter().filter(|&&s| s == species).count();
                    if consumed != produced && !seen.contains(&species) {
                        seen.push(species);
                    }
                }
                seen
            })
            .collect();
        Self {
            watched,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }
}

impl EventObserver for EventLog {
    fn on_event(&mut self, event: &Event<'_>) {
        let watched = &self.watched[event.reaction];
        if watched.is_empty() {
            return;
        }
        self.records.push(EventRecord {
            time: event.time,
            reaction: event.reaction,
            changed: watched.iter().map(|&s| (s, event.counts[s])).collect(),
        });
    }
}

pub fn run_ensemble(
    network: &Network,
    options: &SimulationOptions,
) -> Result<EnsembleResult, SimError> {
    match options.n_runs {
        0 => Err(SimError::InvalidArgument(
            "number of runs must be greater than zero".into(),
        )),
        1 => {
            let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(options.seed, 0));
            run_single(network, &mut rng).map(EnsembleResult::Single)
        }
        _ => run_many(network, options).map(EnsembleResult::Multi),
    }
}

pub fn run_single<U: UniformSource + ?Sized>(
    network: &Network,
    rng: &mut U,
) -> Result<SingleRun, SimError> {
    info!(
        reactions = network.n_reactions(),
        horizon = network.horizon(),
        "single run starting"
    );
    let mut log = EventLog::new(network);
    let outcome = SimulationEngine::new(network).run(rng, &mut log)?;
    info!(events = outcome.events, "single run complete");
    Ok(SingleRun {
        events: log.into_records(),
        outcome,
    })
}

pub fn run_many(network: &Network, options: &SimulationOptions) -> Result<MultiRun, SimError> {
    if options.n_runs == 0 {
        return Err(SimError::InvalidArgument(
            "number of runs must be greater than zero".into(),
        ));
    }
    info!(
        runs = options.n_runs,
        threads = ?options.n_threads,
        reactions = network.n_reactions(),
        horizon = network.horizon(),
        "ensemble starting"
    );

    let mut finals = vec![Vec::new(); options.n_runs];
    let mut simulate = || -> Result<(), SimError> {
        finals
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(run, slot)| {
                let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(options.seed, run as u64));
                let outcome = SimulationEngine::new(network).run(&mut rng, &mut ())?;
                *slot = outcome.displayed(network);
                Ok(())
            })
    };

    match options.n_threads {
        Some(n) => ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?
            .install(|| simulate())?,
        None => simulate()?,
    };

    let mut aggregator = RunAggregator::new(network.displays().len());
    for counts in &finals {
        aggregator.record(counts);
    }
    let summary = aggregator.summarize(network.displays());
    info!(runs = aggregator.runs(), "ensemble complete");
    Ok(MultiRun { finals, summary })
}
