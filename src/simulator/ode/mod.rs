mod closure;

use closure::KineticProblem;
use diffsol::{
    error::{DiffsolError, OdeSolverError},
    OdeBuilder, OdeSolverMethod, OdeSolverStopReason,
};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::CellError;
use crate::simulator::model::BoundModel;

type M = nalgebra::DMatrix<f64>;

const RTOL: f64 = 1e-4;
const ATOL: f64 = 1e-4;
const H0: f64 = 1e-3;

/// Tolerances and initial step of the BDF integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    pub rtol: f64,
    pub atol: f64,
    pub h0: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: RTOL,
            atol: ATOL,
            h0: H0,
        }
    }
}

/// Integrate `model` from `t0` to `t1` starting at the concentrations `y0`.
///
/// Returns the concentrations at `t1` in metabolite order.
pub fn solve(
    model: BoundModel,
    y0: &[f64],
    t0: f64,
    t1: f64,
    options: &SolverOptions,
) -> Result<Vec<f64>, CellError> {
    let nstates = model.nstates();
    if y0.len() != nstates {
        return Err(CellError::ResultLength {
            expected: nstates,
            got: y0.len(),
        });
    }
    if nstates == 0 || t1 <= t0 {
        return Ok(y0.to_vec());
    }

    let problem = OdeBuilder::<M>::new()
        .atol(vec![options.atol; nstates])
        .rtol(options.rtol)
        .t0(t0)
        .h0(options.h0)
        .build_from_eqn(KineticProblem::new(model, DVector::from_column_slice(y0)))?;

    let mut solver = problem.bdf::<diffsol::NalgebraLU<f64>>()?;

    match solver.set_stop_time(t1) {
        Ok(_) => loop {
            match solver.step() {
                Ok(OdeSolverStopReason::TstopReached) => break,
                Ok(_) => continue,
                Err(DiffsolError::OdeSolverError(OdeSolverError::StepSizeTooSmall { .. })) => {
                    return Err(CellError::StepSizeTooSmall {
                        time: solver.state().t,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        },
        Err(DiffsolError::OdeSolverError(OdeSolverError::StopTimeAtCurrentTime)) => {}
        Err(err) => return Err(err.into()),
    }

    Ok(solver.state().y.as_slice().to_vec())
}
