//! Next-reaction event loop for a single trajectory.
//!
//! Every reaction sits in the [`EventQueue`] with an absolute fire time. The
//! loop takes the earliest one, applies it, and re-times only the reactions
//! listed as its dependents. Reactions with zero propensity are parked one
//! time unit past the horizon so they sort after every real event.

use tracing::{debug, trace};

use crate::error::SimError;
use crate::network::Network;
use crate::queue::{EventQueue, Scheduled};
use crate::rng::UniformSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    RunStart,
    Stepping,
    RunEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Fired(usize),
    Finished,
}

/// A reaction that has just been applied, with the counts after it.
#[derive(Clone, Copy, Debug)]
pub struct Event<'a> {
    pub time: f64,
    pub reaction: usize,
    pub counts: &'a [i64],
}

pub trait EventObserver {
    fn on_event(&mut self, event: &Event<'_>);
}

impl EventObserver for () {
    fn on_event(&mut self, _event: &Event<'_>) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// Time of the first event past the horizon, which was not applied.
    pub end_time: f64,
    pub counts: Vec<i64>,
    pub fired: Vec<u64>,
    pub events: u64,
}

impl RunOutcome {
    pub fn displayed(&self, network: &Network) -> Vec<i64> {
        network.displays().iter().map(|&s| self.counts[s]).collect()
    }
}

pub struct SimulationEngine<'a> {
    network: &'a Network,
    state: Vec<i64>,
    fired: Vec<u64>,
    queue: EventQueue<usize>,
    time: f64,
    events: u64,
    phase: RunPhase,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self {
            network,
            state: network.initial_counts().to_vec(),
            fired: vec![0; network.n_reactions()],
            queue: EventQueue::with_capacity(network.n_reactions()),
            time: 0.0,
            events: 0,
            phase: RunPhase::RunStart,
        }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn counts(&self) -> &[i64] {
        &self.state
    }

    pub fn fired(&self) -> &[u64] {
        &self.fired
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn queue(&self) -> &EventQueue<usize> {
        &self.queue
    }

    pub fn next_fire_time(&self, reaction: usize) -> Option<f64> {
        self.queue.time_of(reaction)
    }

    /// Resets counts, clock and fire counters, then schedules every reaction
    /// from the initial counts.
    pub fn start<U: UniformSource + ?Sized>(&mut self, rng: &mut U) {
        self.state.copy_from_slice(self.network.initial_counts());
        self.fired.fill(0);
        self.time = 0.0;
        self.events = 0;
        let entries = (0..self.network.n_reactions())
            .map(|reaction| Scheduled {
                item: reaction,
                time: self.sample_fire_time(reaction, rng),
            })
            .collect();
        self.queue = EventQueue::build(entries, self.network.n_reactions());
        self.phase = RunPhase::Stepping;
    }

    pub fn step<U: UniformSource + ?Sized>(&mut self, rng: &mut U) -> Result<Step, SimError> {
        match self.phase {
            RunPhase::RunStart => {
                return Err(SimError::InvalidArgument(
                    "step called before the run was started".into(),
                ));
            }
            RunPhase::RunEnd => return Ok(Step::Finished),
            RunPhase::Stepping => {}
        }
        let next = self.queue.peek_min().ok_or(SimError::EmptyQueue)?;
        self.time = next.time;
        if self.time > self.network.horizon() {
            self.phase = RunPhase::RunEnd;
            return Ok(Step::Finished);
        }

        let network = self.network;
        let fired = next.item;
        self.fired[fired] += 1;
        self.events += 1;
        network.reaction(fired).apply(&mut self.state);
        trace!(time = self.time, reaction = fired, "reaction fired");

        for &dep in network.dependents(fired) {
            self.queue.remove(dep);
            let time = self.sample_fire_time(dep, rng);
            self.queue.insert(dep, time);
        }
        Ok(Step::Fired(fired))
    }

    /// Runs one full trajectory, reporting every applied event to `observer`.
    pub fn run<U, O>(&mut self, rng: &mut U, observer: &mut O) -> Result<RunOutcome, SimError>
    where
        U: UniformSource + ?Sized,
        O: EventObserver + ?Sized,
    {
        self.start(rng);
        while let Step::Fired(reaction) = self.step(rng)? {
            observer.on_event(&Event {
                time: self.time,
                reaction,
                counts: &self.state,
            });
        }
        debug!(
            end_time = self.time,
            events = self.events,
            "run reached horizon"
        );
        Ok(RunOutcome {
            end_time: self.time,
            counts: self.state.clone(),
            fired: self.fired.clone(),
            events: self.events,
        })
    }

    fn sample_fire_time<U: UniformSource + ?Sized>(&self, reaction: usize, rng: &mut U) -> f64 {
        let propensity = self.network.reaction(reaction).propensity(&self.state);
        let u = rng.open_unit();
        if propensity > 0.0 {
            self.time + (-u.ln() / propensity)
        } else {
            self.network.horizon() + 1.0
        }
    }
}
