use std::collections::HashMap;
use std::fmt::Write as _;

/// Opaque handle of a model variable. Names may contain arbitrary bytes;
/// solvers only ever see the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarDomain {
    Binary,
    /// Continuous with a lower bound of zero.
    NonNegative,
}

#[derive(Debug, Clone)]
pub struct VariableDef {
    pub name: String,
    pub domain: VarDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Geq,
}

/// An affine accumulator: `Σ coefficient·variable + constant`. Fixed 0/1
/// assignments enter as constants and are folded away before emission.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    terms: Vec<(f64, VarId)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        LinearExpr::default()
    }

    pub fn add_term(&mut self, coefficient: f64, var: VarId) {
        self.terms.push((coefficient, var));
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn terms(&self) -> &[(f64, VarId)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }
}

/// A constraint in normalized form: the left side carries only variable
/// terms, the constant has been folded into `rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub lhs: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

/// A constraint whose left side held no variables and whose constant part
/// contradicts it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrivialConflict {
    pub constant: f64,
    pub sense: Sense,
    pub rhs: f64,
}

/// A minimisation MILP under construction. Variable order, constraint order
/// and objective term order all follow insertion order, so identical inputs
/// build identical models.
#[derive(Debug, Default)]
pub struct MilpModel {
    variables: Vec<VariableDef>,
    constraints: Vec<Constraint>,
    objective: Vec<(f64, VarId)>,
    objective_index: HashMap<VarId, usize>,
}

impl MilpModel {
    pub fn new() -> Self {
        MilpModel::default()
    }

    pub fn add_variable(&mut self, name: impl Into<String>, domain: VarDomain) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VariableDef {
            name: name.into(),
            domain,
        });

        id
    }

    /// Adds `weight · var` to the objective, merging coefficients of a
    /// variable that already appears.
    pub fn add_objective_term(&mut self, weight: f64, var: VarId) {
        match self.objective_index.get(&var) {
            Some(&position) => self.objective[position].0 += weight,
            None => {
                self.objective_index.insert(var, self.objective.len());
                self.objective.push((weight, var));
            }
        }
    }

    /// Normalizes and stores a constraint. Trivially true constraints are
    /// dropped (returns `Ok(false)`); trivially violated ones are reported
    /// instead of being handed to the solver.
    pub fn add_constraint(
        &mut self,
        lhs: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) -> Result<bool, TrivialConflict> {
        let folded_rhs = rhs - lhs.constant;

        if lhs.terms.is_empty() {
            let satisfied = match sense {
                Sense::Eq => folded_rhs == 0.0,
                Sense::Geq => folded_rhs <= 0.0,
            };

            return if satisfied {
                Ok(false)
            } else {
                Err(TrivialConflict {
                    constant: lhs.constant,
                    sense,
                    rhs,
                })
            };
        }

        self.constraints.push(Constraint {
            lhs: LinearExpr {
                terms: lhs.terms,
                constant: 0.0,
            },
            sense,
            rhs: folded_rhs,
        });

        Ok(true)
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(f64, VarId)] {
        &self.objective
    }

    /// Canonical text form of the objective, `0` when empty.
    pub fn render_objective(&self) -> String {
        if self.objective.is_empty() {
            return "0".to_string();
        }

        self.render_terms(&self.objective)
    }

    /// Canonical text forms of the constraints, in emission order.
    pub fn render_constraints(&self) -> Vec<String> {
        self.constraints
            .iter()
            .map(|constraint| {
                let op = match constraint.sense {
                    Sense::Eq => "=",
                    Sense::Geq => ">=",
                };

                format!(
                    "{} {} {}",
                    self.render_terms(&constraint.lhs.terms),
                    op,
                    render_number(constraint.rhs)
                )
            })
            .collect()
    }

    fn render_terms(&self, terms: &[(f64, VarId)]) -> String {
        let mut out = String::new();

        for (position, (coefficient, var)) in terms.iter().enumerate() {
            let name = &self.variables[var.0].name;
            let magnitude = coefficient.abs();

            if position == 0 {
                if *coefficient < 0.0 {
                    out.push('-');
                }
            } else if *coefficient < 0.0 {
                out.push_str(" - ");
            } else {
                out.push_str(" + ");
            }

            if magnitude == 1.0 {
                out.push_str(name);
            } else {
                let _ = write!(out, "{} {}", render_number(magnitude), name);
            }
        }

        out
    }
}

/// Integral coefficients print without a decimal part; `10000`, not
/// `10000.0`.
fn render_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
