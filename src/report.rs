//! Plain-text rendering of events and run summaries.

use std::io::{self, Write};

use crate::ensemble::{EnsembleResult, EventRecord, MultiRun, SingleRun};
use crate::stats::SpeciesSummary;

fn write_counts<W: Write>(
    out: &mut W,
    counts: impl IntoIterator<Item = (usize, i64)>,
) -> io::Result<()> {
    let line = counts
        .into_iter()
        .map(|(species, count)| format!("S{species} = {count}"))
        .collect::<Vec<_>>()
        .join("; ");
    writeln!(out, "{line}")
}

pub fn write_event<W: Write>(out: &mut W, event: &EventRecord) -> io::Result<()> {
    writeln!(out, "Simulation time = {} :", event.time)?;
    write_counts(out, event.changed.iter().copied())
}

pub fn write_run_summary<W: Write>(
    out: &mut W,
    run: usize,
    displays: &[usize],
    finals: &[i64],
) -> io::Result<()> {
    writeln!(out, "Simulation summary for run #{run} :")?;
    write_counts(out, displays.iter().copied().zip(finals.iter().copied()))
}

pub fn write_fire_counts<W: Write>(out: &mut W, fired: &[u64]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Simulation Summary:")?;
    for (reaction, count) in fired.iter().enumerate() {
        writeln!(out, "Reaction {reaction} fired {count} time(s)")?;
    }
    Ok(())
}

pub fn write_statistics<W: Write>(out: &mut W, summary: &[SpeciesSummary]) -> io::Result<()> {
    let join = |value: fn(&SpeciesSummary) -> f64| {
        summary
            .iter()
            .map(|s| format!("S{} = {}", s.species, value(s)))
            .collect::<Vec<_>>()
            .join("; ")
    };
    writeln!(out)?;
    writeln!(out, "Simulation Summary:")?;
    writeln!(out, "Means")?;
    writeln!(out, "{}", join(|s: &SpeciesSummary| s.mean))?;
    writeln!(out, "Variances")?;
    writeln!(out, "{}", join(|s: &SpeciesSummary| s.variance))
}

pub fn write_single<W: Write>(out: &mut W, run: &SingleRun) -> io::Result<()> {
    for event in &run.events {
        write_event(out, event)?;
    }
    write_fire_counts(out, &run.outcome.fired)
}

pub fn write_multi<W: Write>(out: &mut W, displays: &[usize], runs: &MultiRun) -> io::Result<()> {
    for (run, finals) in runs.finals.iter().enumerate() {
        write_run_summary(out, run, displays, finals)?;
    }
    write_statistics(out, &runs.summary)
}

pub fn write_result<W: Write>(
    out: &mut W,
    displays: &[usize],
    result: &EnsembleResult,
) -> io::Result<()> {
    match result {
        EnsembleResult::Single(run) => write_single(out, run),
        EnsembleResult::Multi(runs) => write_multi(out, displays, runs),
    }
}
