use std::collections::BTreeMap;
use std::sync::Arc;

use itertools::Itertools;
use log::{info, trace};

use crate::error::{Error, InternalError, ModelError};
use crate::scheduler::config::{self, SolverConfig};
use crate::scheduler::milp::{LinearExpr, MilpModel, Sense, VarDomain, VarId};
use crate::scheduler::solver::solve_milp;
use crate::types::{Course, Schedule, SchedulingProblem, SchedulingProblemSolution, Shift,
    ShiftType, Student};

/// Identifies one student/shift decision: (student number, course id, kind,
/// shift number).
type DecisionKey = (String, String, ShiftType, i32);

/// The state of one decision after variable fixing: a constant, or a binary
/// variable the solver decides.
#[derive(Debug, Clone, Copy)]
enum Assignment {
    Fixed(bool),
    Var(VarId),
}

/// The MILP rendition of one scheduling problem. Building it performs
/// variable fixing, emits enrollment coverage constraints and accumulates
/// the overlap and overcrowding penalties; `solve` hands it to the solver
/// and decodes the result into validated schedules.
#[derive(Debug)]
pub struct SchedulingModel {
    problem: SchedulingProblem,
    milp: MilpModel,
    assignments: BTreeMap<DecisionKey, Assignment>,
}

impl SchedulingModel {
    pub fn new(problem: SchedulingProblem) -> Result<Self, ModelError> {
        info!(
            "building model for {} students and {} courses",
            problem.students().len(),
            problem.courses().len()
        );

        let mut milp = MilpModel::new();
        let mut assignments: BTreeMap<DecisionKey, Assignment> = BTreeMap::new();

        for student in problem.students().values() {
            prepare_student_assignments(&mut milp, &mut assignments, student);
            add_student_enrollments(&mut milp, &assignments, student)?;
            add_student_overlaps(&mut milp, &assignments, student);
        }

        for ((course_id, kind, number), students) in problem.possible_students_by_shift() {
            if let Some(course) = problem.courses().get(&course_id) {
                if let Some(shift) = course.shift(kind, number) {
                    add_shift_capacity(&mut milp, &assignments, course, shift, &students)?;
                }
            }
        }

        info!(
            "model has {} variables and {} constraints",
            milp.variables().len(),
            milp.constraints().len()
        );

        Ok(SchedulingModel {
            problem,
            milp,
            assignments,
        })
    }

    pub fn problem(&self) -> &SchedulingProblem {
        &self.problem
    }

    /// Canonical text form of the objective; stable across runs.
    pub fn objective_string(&self) -> String {
        self.milp.render_objective()
    }

    /// Canonical text forms of the constraints, in emission order.
    pub fn constraint_strings(&self) -> Vec<String> {
        self.milp.render_constraints()
    }

    /// Runs the solver and decodes the variable assignment into one complete
    /// schedule per student.
    pub fn solve(&self, config: &SolverConfig) -> Result<SchedulingProblemSolution, Error> {
        let values = solve_milp(&self.milp, config)?;

        let mut student_shifts: BTreeMap<String, Vec<(Arc<Course>, Shift)>> = self
            .problem
            .students()
            .keys()
            .map(|number| (number.clone(), Vec::new()))
            .collect();

        for ((student_number, course_id, kind, number), assignment) in &self.assignments {
            let selected = match assignment {
                Assignment::Fixed(value) => *value,
                // HiGHS can report near-integral values for binaries.
                Assignment::Var(var) => values[var.index()] >= 0.5,
            };
            if !selected {
                continue;
            }

            if let Some(course) = self.problem.courses().get(course_id) {
                if let Some(shift) = course.shift(*kind, *number) {
                    if let Some(shifts) = student_shifts.get_mut(student_number) {
                        shifts.push((Arc::clone(course), shift.clone()));
                    }
                }
            }
        }

        let mut final_schedules = BTreeMap::new();
        for (number, shifts) in student_shifts {
            let schedule =
                Schedule::new(shifts).map_err(|error| InternalError(error.to_string()))?;
            final_schedules.insert(number, schedule);
        }

        SchedulingProblemSolution::new(self.problem.clone(), final_schedules)
            .map_err(|error| InternalError(error.to_string()).into())
    }
}

fn decision_key(student: &Student, course: &Course, shift: &Shift) -> DecisionKey {
    (
        student.number().to_string(),
        course.id().to_string(),
        shift.kind(),
        shift.number(),
    )
}

/// Variable fixing: assigned shifts become the constant 1, unassignable ones
/// the constant 0, and only the remaining possible shifts get a binary.
fn prepare_student_assignments(
    milp: &mut MilpModel,
    assignments: &mut BTreeMap<DecisionKey, Assignment>,
    student: &Student,
) {
    for (course, shift) in student.assigned_shifts() {
        assignments.insert(decision_key(student, course, shift), Assignment::Fixed(true));
    }
    for (course, shift) in student.unassignable_enrolled_shifts() {
        assignments.insert(decision_key(student, course, shift), Assignment::Fixed(false));
    }

    let mut variable_count = 0usize;
    for (course, shift) in student.possible_shifts() {
        let key = decision_key(student, course, shift);
        if assignments.contains_key(&key) {
            continue;
        }

        let name = format!("{}_{}_{}", student.number(), course.id(), shift.name());
        let var = milp.add_variable(name, VarDomain::Binary);
        assignments.insert(key, Assignment::Var(var));
        variable_count += 1;
    }

    trace!(
        "student {}: {} open shift decisions",
        student.number(),
        variable_count
    );
}

/// One `Σ = 1` coverage constraint per (enrolled course, shift type). With
/// every term fixed the constraint is checked here instead of being emitted.
fn add_student_enrollments(
    milp: &mut MilpModel,
    assignments: &BTreeMap<DecisionKey, Assignment>,
    student: &Student,
) -> Result<(), ModelError> {
    for course in student.enrollments().values() {
        for (kind, by_number) in course.shifts() {
            let mut lhs = LinearExpr::new();
            for shift in by_number.values() {
                match assignments.get(&decision_key(student, course, shift)) {
                    Some(Assignment::Fixed(true)) => lhs.add_constant(1.0),
                    Some(Assignment::Fixed(false)) | None => {}
                    Some(Assignment::Var(var)) => lhs.add_term(1.0, *var),
                }
            }

            milp.add_constraint(lhs, Sense::Eq, 1.0).map_err(|_| {
                ModelError::Infeasible(format!(
                    "student {} cannot take exactly one {} shift of course {}",
                    student.number(),
                    kind,
                    course.id()
                ))
            })?;
        }
    }

    Ok(())
}

/// Walks the ordered pairs of a student's possible shifts and charges each
/// overlapping pair to the objective. Pairs fixed on both sides stay out of
/// the objective: a constant cannot be optimised.
fn add_student_overlaps(
    milp: &mut MilpModel,
    assignments: &BTreeMap<DecisionKey, Assignment>,
    student: &Student,
) {
    let possible = student.possible_shifts();

    for (&(course1, shift1), &(course2, shift2)) in possible.iter().tuple_combinations() {
        // Alternatives of one (course, type) slot are already mutually
        // exclusive through the coverage constraint.
        if course1.id() == course2.id() && shift1.kind() == shift2.kind() {
            continue;
        }
        if !shift1.overlaps(shift2) {
            continue;
        }

        let first = assignments.get(&decision_key(student, course1, shift1)).copied();
        let second = assignments.get(&decision_key(student, course2, shift2)).copied();
        let weight = config::overlap_weight(student, course1, shift1, course2, shift2);

        match (first, second) {
            // A pair with a fixed-0 side cannot clash; a pair fixed to 1 on
            // both sides clashes no matter what the solver does.
            (Some(Assignment::Fixed(_)), Some(Assignment::Fixed(_))) => {}
            (Some(Assignment::Fixed(fixed)), Some(Assignment::Var(var)))
            | (Some(Assignment::Var(var)), Some(Assignment::Fixed(fixed))) => {
                if fixed {
                    milp.add_objective_term(weight, var);
                }
            }
            (Some(Assignment::Var(var1)), Some(Assignment::Var(var2))) => {
                let name = format!(
                    "{}_{}_{}_{}_{}",
                    student.number(),
                    course1.id(),
                    shift1.name(),
                    course2.id(),
                    shift2.name()
                );
                let overlap_var = milp.add_variable(name, VarDomain::Binary);

                // overlap >= v1 + v2 - 1 linearises the AND of two binaries.
                let mut lhs = LinearExpr::new();
                lhs.add_term(1.0, overlap_var);
                lhs.add_term(-1.0, var1);
                lhs.add_term(-1.0, var2);
                let _ = milp.add_constraint(lhs, Sense::Geq, -1.0);

                milp.add_objective_term(weight, overlap_var);
            }
            _ => {}
        }
    }
}

/// One overflow variable per shift that still has open candidates. Residual
/// capacity already consumed by fixed students may go negative, keeping the
/// inevitable share of the overflow in the objective.
fn add_shift_capacity(
    milp: &mut MilpModel,
    assignments: &BTreeMap<DecisionKey, Assignment>,
    course: &Arc<Course>,
    shift: &Shift,
    students: &std::collections::BTreeSet<String>,
) -> Result<(), ModelError> {
    let mut residual_capacity = shift.capacity();
    let mut open_vars: Vec<VarId> = Vec::new();

    for student_number in students {
        let key = (
            student_number.clone(),
            course.id().to_string(),
            shift.kind(),
            shift.number(),
        );

        match assignments.get(&key) {
            // Candidates come from possible shifts, so a fixed entry here is
            // always a 1.
            Some(Assignment::Fixed(true)) => residual_capacity -= 1,
            Some(Assignment::Var(var)) => open_vars.push(*var),
            _ => {}
        }
    }

    if open_vars.is_empty() {
        return Ok(());
    }

    let name = format!("{}_{}_OVERCROWD", course.id(), shift.name());
    let overcrowd_var = milp.add_variable(name, VarDomain::NonNegative);

    let mut lhs = LinearExpr::new();
    lhs.add_term(1.0, overcrowd_var);
    for var in &open_vars {
        lhs.add_term(-1.0, *var);
    }

    milp.add_constraint(lhs, Sense::Geq, -f64::from(residual_capacity))
        .map_err(|_| {
            ModelError::Infeasible(format!(
                "unsatisfiable capacity bound on shift {} of course {}",
                shift.name(),
                course.id()
            ))
        })?;

    milp.add_objective_term(config::overcrowd_weight(course, shift), overcrowd_var);
    Ok(())
}
