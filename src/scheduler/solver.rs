use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    default_solver, variable,
};
use log::{info, trace};
use std::time::Instant;

use crate::error::ModelError;
use crate::scheduler::config::SolverConfig;
use crate::scheduler::milp::{MilpModel, Sense, VarDomain};

/// Hands the model to HiGHS and returns one value per model variable.
///
/// Model variables stay anonymous on the solver side; the model's name table
/// is the only place names live, so ids with NULs or spaces are safe.
pub(crate) fn solve_milp(model: &MilpModel, config: &SolverConfig) -> Result<Vec<f64>, ModelError> {
    let start_time = Instant::now();

    let mut problem_vars = ProblemVariables::new();
    let mut handles: Vec<Variable> = Vec::with_capacity(model.variables().len());
    for definition in model.variables() {
        handles.push(problem_vars.add(match definition.domain {
            VarDomain::Binary => variable().binary(),
            VarDomain::NonNegative => variable().min(0.0),
        }));
    }

    let objective: Expression = model
        .objective()
        .iter()
        .map(|(weight, var)| *weight * handles[var.index()])
        .sum();

    let mut solver_model = problem_vars
        .minimise(objective)
        .using(default_solver)
        .set_option("time_limit", config.time_limit_seconds)
        .set_option("threads", config.threads)
        .set_option("random_seed", config.random_seed)
        .set_option(
            "log_to_console",
            if config.log_to_console { "true" } else { "false" },
        );

    for item in model.constraints() {
        let lhs: Expression = item
            .lhs
            .terms()
            .iter()
            .map(|(coefficient, var)| *coefficient * handles[var.index()])
            .sum();

        let rhs = item.rhs;
        let emitted = match item.sense {
            Sense::Eq => constraint!(lhs == rhs),
            Sense::Geq => constraint!(lhs >= rhs),
        };
        solver_model.add_constraint(emitted);
    }

    trace!(
        "submitting model with {} variables and {} constraints",
        model.variables().len(),
        model.constraints().len()
    );

    let solution = solver_model.solve().map_err(|error| match error {
        ResolutionError::Infeasible => ModelError::SolveFailed("infeasible".to_string()),
        ResolutionError::Unbounded => ModelError::SolveFailed("unbounded".to_string()),
        other => ModelError::Solver(other.to_string()),
    })?;

    info!("solver finished in {:.2?}", start_time.elapsed());

    Ok(handles
        .iter()
        .map(|handle| solution.value(*handle))
        .collect())
}
