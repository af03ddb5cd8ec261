use numpy::{PyArray1, PyArrayMethods};
use pyo3::prelude::*;

use crate::ensemble::{SimulationOptions, run_ensemble, run_many};
use crate::error::SimError;
use crate::network::Network;
use crate::report::write_result;

/// Final displayed counts as an `(n_runs, n_displays)` array.
#[pyfunction(signature = (definition, n_runs, seed=None, n_threads=None))]
pub fn simulate(
    py: Python<'_>,
    definition: &str,
    n_runs: usize,
    seed: Option<u64>,
    n_threads: Option<usize>,
) -> PyResult<Py<PyAny>> {
    let network: Network = definition.parse()?;
    let width = network.displays().len();
    let options = SimulationOptions {
        n_runs,
        seed,
        n_threads,
    };
    let runs = py.detach(move || run_many(&network, &options))?;
    let flat: Vec<i64> = runs.finals.concat();
    let array = PyArray1::from_vec(py, flat).reshape([n_runs, width])?;
    Ok(array.into_any().unbind())
}

/// Text report: per-event lines for a single run, per-run and summary
/// statistics otherwise.
#[pyfunction(signature = (definition, n_runs, seed=None, n_threads=None))]
pub fn simulate_report(
    py: Python<'_>,
    definition: &str,
    n_runs: usize,
    seed: Option<u64>,
    n_threads: Option<usize>,
) -> PyResult<String> {
    let network: Network = definition.parse()?;
    let options = SimulationOptions {
        n_runs,
        seed,
        n_threads,
    };
    let text = py.detach(move || -> Result<String, SimError> {
        let result = run_ensemble(&network, &options)?;
        let mut out = Vec::new();
        write_result(&mut out, network.displays(), &result)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    })?;
    Ok(text)
}

#[pymodule]
fn nextreact(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(simulate, module)?)?;
    module.add_function(wrap_pyfunction!(simulate_report, module)?)?;
    Ok(())
}
