//! Quadratic programs over binary and bounded integer variables.
//!
//! A [`QuadraticProgram`] holds an objective `constant + Σ a_i x_i +
//! Σ_{i<=j} q_ij x_i x_j` and any number of linear constraints. Variables are
//! referenced by their index in declaration order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::error::{OptError, OptResult};

/// Tolerance used when checking constraints, bounds and integrality.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    Binary,
    Integer,
}

/// A decision variable with inclusive integer bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub vartype: VarType,
    pub lowerbound: i64,
    pub upperbound: i64,
}

impl Variable {
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vartype: VarType::Binary,
            lowerbound: 0,
            upperbound: 1,
        }
    }

    pub fn integer(name: impl Into<String>, lowerbound: i64, upperbound: i64) -> Self {
        Self {
            name: name.into(),
            vartype: VarType::Integer,
            lowerbound,
            upperbound,
        }
    }

    /// Whether `value` is integral and within bounds.
    pub fn admits(&self, value: f64) -> bool {
        (value - value.round()).abs() <= FEASIBILITY_TOLERANCE
            && value >= self.lowerbound as f64 - FEASIBILITY_TOLERANCE
            && value <= self.upperbound as f64 + FEASIBILITY_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjSense {
    #[default]
    Minimize,
    Maximize,
}

impl ObjSense {
    /// `1` for minimization, `-1` for maximization.
    pub fn sign(self) -> f64 {
        match self {
            ObjSense::Minimize => 1.0,
            ObjSense::Maximize => -1.0,
        }
    }

    /// Whether `a` is strictly better than `b` under this sense.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            ObjSense::Minimize => a < b,
            ObjSense::Maximize => a > b,
        }
    }
}

/// Objective `constant + Σ linear + Σ quadratic`.
///
/// Quadratic keys are stored with `i <= j`; entries that cancel to zero are
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadraticObjective {
    pub sense: ObjSense,
    pub constant: f64,
    pub linear: BTreeMap<usize, f64>,
    #[serde(with = "quadratic_terms")]
    pub quadratic: BTreeMap<(usize, usize), f64>,
}

impl QuadraticObjective {
    pub fn new(sense: ObjSense) -> Self {
        Self {
            sense,
            ..Self::default()
        }
    }

    pub fn add_linear(&mut self, i: usize, coef: f64) {
        accumulate(&mut self.linear, i, coef);
    }

    pub fn add_quadratic(&mut self, i: usize, j: usize, coef: f64) {
        accumulate(&mut self.quadratic, (i.min(j), i.max(j)), coef);
    }

    pub fn linear_coefficient(&self, i: usize) -> f64 {
        self.linear.get(&i).copied().unwrap_or(0.0)
    }

    pub fn quadratic_coefficient(&self, i: usize, j: usize) -> f64 {
        self.quadratic
            .get(&(i.min(j), i.max(j)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Value at `x`; indices missing from `x` count as zero.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let value = |i: usize| x.get(i).copied().unwrap_or(0.0);
        let linear: f64 = self.linear.iter().map(|(i, a)| a * value(*i)).sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .map(|((i, j), q)| q * value(*i) * value(*j))
            .sum();
        self.constant + linear + quadratic
    }

    fn max_index(&self) -> Option<usize> {
        let linear = self.linear.keys().copied().max();
        let quadratic = self.quadratic.keys().map(|(_, j)| *j).max();
        linear.max(quadratic)
    }
}

fn accumulate<K: Ord>(map: &mut BTreeMap<K, f64>, key: K, coef: f64) {
    match map.entry(key) {
        Entry::Occupied(mut entry) => {
            *entry.get_mut() += coef;
            if *entry.get() == 0.0 {
                entry.remove();
            }
        }
        Entry::Vacant(entry) => {
            if coef != 0.0 {
                entry.insert(coef);
            }
        }
    }
}

/// Quadratic terms serialize as `[i, j, coef]` triples, since JSON maps
/// cannot have tuple keys.
mod quadratic_terms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        terms: &BTreeMap<(usize, usize), f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(terms.iter().map(|(&(i, j), &c)| (i, j, c)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(usize, usize), f64>, D::Error> {
        let entries: Vec<(usize, usize, f64)> = Vec::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|(i, j, c)| ((i.min(j), i.max(j)), c))
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintSense::Le => "<=",
            ConstraintSense::Ge => ">=",
            ConstraintSense::Eq => "==",
        };
        f.write_str(s)
    }
}

/// `Σ a_i x_i (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub linear: BTreeMap<usize, f64>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.linear
            .iter()
            .map(|(i, a)| a * x.get(*i).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_satisfied(&self, x: &[f64]) -> bool {
        let lhs = self.evaluate(x);
        match self.sense {
            ConstraintSense::Le => lhs <= self.rhs + FEASIBILITY_TOLERANCE,
            ConstraintSense::Ge => lhs >= self.rhs - FEASIBILITY_TOLERANCE,
            ConstraintSense::Eq => (lhs - self.rhs).abs() <= FEASIBILITY_TOLERANCE,
        }
    }
}

/// An optimization problem with a quadratic objective and linear constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticProgram {
    name: String,
    variables: Vec<Variable>,
    objective: QuadraticObjective,
    linear_constraints: Vec<LinearConstraint>,
}

impl QuadraticProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            objective: QuadraticObjective::default(),
            linear_constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- variables ---

    /// Add a variable and return its index.
    pub fn add_variable(&mut self, variable: Variable) -> OptResult<usize> {
        if self.variable_index(&variable.name).is_some() {
            return Err(OptError::DuplicateVariable(variable.name));
        }
        if variable.lowerbound > variable.upperbound {
            return Err(OptError::InvalidProblem(format!(
                "variable '{}' has lower bound {} above upper bound {}",
                variable.name, variable.lowerbound, variable.upperbound
            )));
        }
        if variable.vartype == VarType::Binary
            && (variable.lowerbound < 0 || variable.upperbound > 1)
        {
            return Err(OptError::InvalidProblem(format!(
                "binary variable '{}' must have bounds within [0, 1]",
                variable.name
            )));
        }
        self.variables.push(variable);
        Ok(self.variables.len() - 1)
    }

    pub fn binary_var(&mut self, name: impl Into<String>) -> OptResult<usize> {
        self.add_variable(Variable::binary(name))
    }

    pub fn integer_var(
        &mut self,
        name: impl Into<String>,
        lowerbound: i64,
        upperbound: i64,
    ) -> OptResult<usize> {
        self.add_variable(Variable::integer(name, lowerbound, upperbound))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables.get(index)
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn num_binary_vars(&self) -> usize {
        self.count_vars(VarType::Binary)
    }

    pub fn num_integer_vars(&self) -> usize {
        self.count_vars(VarType::Integer)
    }

    fn count_vars(&self, vartype: VarType) -> usize {
        self.variables
            .iter()
            .filter(|v| v.vartype == vartype)
            .count()
    }

    // --- objective ---

    pub fn objective(&self) -> &QuadraticObjective {
        &self.objective
    }

    /// Replace the objective after checking its variable indices.
    pub fn set_objective(&mut self, objective: QuadraticObjective) -> OptResult<()> {
        if let Some(index) = objective.max_index() {
            self.check_index(index)?;
        }
        self.objective = objective;
        Ok(())
    }

    pub fn minimize(
        &mut self,
        constant: f64,
        linear: impl IntoIterator<Item = (usize, f64)>,
        quadratic: impl IntoIterator<Item = ((usize, usize), f64)>,
    ) -> OptResult<()> {
        self.set_sense_objective(ObjSense::Minimize, constant, linear, quadratic)
    }

    pub fn maximize(
        &mut self,
        constant: f64,
        linear: impl IntoIterator<Item = (usize, f64)>,
        quadratic: impl IntoIterator<Item = ((usize, usize), f64)>,
    ) -> OptResult<()> {
        self.set_sense_objective(ObjSense::Maximize, constant, linear, quadratic)
    }

    fn set_sense_objective(
        &mut self,
        sense: ObjSense,
        constant: f64,
        linear: impl IntoIterator<Item = (usize, f64)>,
        quadratic: impl IntoIterator<Item = ((usize, usize), f64)>,
    ) -> OptResult<()> {
        let mut objective = QuadraticObjective::new(sense);
        objective.constant = constant;
        for (i, a) in linear {
            objective.add_linear(i, a);
        }
        for ((i, j), q) in quadratic {
            objective.add_quadratic(i, j, q);
        }
        self.set_objective(objective)
    }

    // --- constraints ---

    pub fn linear_constraints(&self) -> &[LinearConstraint] {
        &self.linear_constraints
    }

    /// Add `Σ a_i x_i sense rhs`. An empty name becomes `c<k>`.
    pub fn add_linear_constraint(
        &mut self,
        name: impl Into<String>,
        linear: impl IntoIterator<Item = (usize, f64)>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> OptResult<usize> {
        let mut name = name.into();
        if name.is_empty() {
            name = format!("c{}", self.linear_constraints.len());
        }
        let mut row = BTreeMap::new();
        for (i, a) in linear {
            self.check_index(i)?;
            accumulate(&mut row, i, a);
        }
        self.linear_constraints.push(LinearConstraint {
            name,
            linear: row,
            sense,
            rhs,
        });
        Ok(self.linear_constraints.len() - 1)
    }

    // --- evaluation ---

    pub fn objective_value(&self, x: &[f64]) -> OptResult<f64> {
        self.check_dimension(x)?;
        Ok(self.objective.evaluate(x))
    }

    /// Bounds, integrality and every constraint hold at `x`.
    pub fn is_feasible(&self, x: &[f64]) -> bool {
        x.len() == self.variables.len()
            && self.variables.iter().zip(x).all(|(v, value)| v.admits(*value))
            && self.linear_constraints.iter().all(|c| c.is_satisfied(x))
    }

    /// No constraints and only binary variables.
    pub fn is_qubo(&self) -> bool {
        self.linear_constraints.is_empty() && self.num_integer_vars() == 0
    }

    pub fn check_dimension(&self, x: &[f64]) -> OptResult<()> {
        if x.len() != self.variables.len() {
            return Err(OptError::DimensionMismatch {
                expected: self.variables.len(),
                got: x.len(),
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> OptResult<()> {
        if index >= self.variables.len() {
            return Err(OptError::VariableIndexOutOfRange {
                index,
                num_vars: self.variables.len(),
            });
        }
        Ok(())
    }

    // --- rendering ---

    /// Render in a CPLEX-LP-like text format.
    pub fn to_lp_string(&self) -> String {
        let name = |i: usize| self.variables[i].name.as_str();
        let mut out = String::new();

        out.push_str("\\ This file has been generated by knapq\n");
        out.push_str(&format!("\\ Problem name: {}\n\n", self.name));

        out.push_str(match self.objective.sense {
            ObjSense::Minimize => "Minimize\n",
            ObjSense::Maximize => "Maximize\n",
        });
        let terms: Vec<(f64, String)> = self
            .objective
            .linear
            .iter()
            .map(|(i, a)| (*a, name(*i).to_string()))
            .collect();
        let quadratic: Vec<(f64, String)> = self
            .objective
            .quadratic
            .iter()
            .map(|((i, j), q)| {
                let term = if i == j {
                    format!("{}^2", name(*i))
                } else {
                    format!("{}*{}", name(*i), name(*j))
                };
                (2.0 * q, term)
            })
            .collect();
        out.push_str(" obj: ");
        let mut line = render_terms(&terms);
        if !quadratic.is_empty() {
            if !line.is_empty() {
                line.push_str(" + ");
            }
            line.push_str(&format!("[ {} ]/2", render_terms(&quadratic)));
        }
        if self.objective.constant != 0.0 {
            if line.is_empty() {
                line = format_coef(self.objective.constant);
            } else {
                line.push_str(&signed(self.objective.constant, ""));
            }
        } else if line.is_empty() {
            line.push('0');
        }
        out.push_str(&line);
        out.push('\n');

        out.push_str("Subject To\n");
        for c in &self.linear_constraints {
            let row: Vec<(f64, String)> = c
                .linear
                .iter()
                .map(|(i, a)| (*a, name(*i).to_string()))
                .collect();
            let lhs = if row.is_empty() {
                "0".to_string()
            } else {
                render_terms(&row)
            };
            let sense = match c.sense {
                ConstraintSense::Eq => "=",
                ConstraintSense::Le => "<=",
                ConstraintSense::Ge => ">=",
            };
            out.push_str(&format!(" {}: {} {} {}\n", c.name, lhs, sense, format_coef(c.rhs)));
        }

        let integers: Vec<&Variable> = self
            .variables
            .iter()
            .filter(|v| v.vartype == VarType::Integer)
            .collect();
        if !integers.is_empty() {
            out.push_str("\nBounds\n");
            for v in &integers {
                out.push_str(&format!(" {} <= {} <= {}\n", v.lowerbound, v.name, v.upperbound));
            }
        }

        let binaries: Vec<&str> = self
            .variables
            .iter()
            .filter(|v| v.vartype == VarType::Binary)
            .map(|v| v.name.as_str())
            .collect();
        if !binaries.is_empty() {
            out.push_str(&format!("\nBinaries\n {}\n", binaries.join(" ")));
        }
        if !integers.is_empty() {
            let names: Vec<&str> = integers.iter().map(|v| v.name.as_str()).collect();
            out.push_str(&format!("\nGenerals\n {}\n", names.join(" ")));
        }
        out.push_str("End\n");
        out
    }
}

impl fmt::Display for QuadraticProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lp_string())
    }
}

fn format_coef(c: f64) -> String {
    if c.fract() == 0.0 && c.abs() < 1e15 {
        format!("{}", c as i64)
    } else {
        format!("{c}")
    }
}

fn signed(coef: f64, term: &str) -> String {
    let sep = if term.is_empty() { "" } else { " " };
    if coef < 0.0 {
        format!(" - {}{}{}", format_coef(-coef), sep, term)
    } else {
        format!(" + {}{}{}", format_coef(coef), sep, term)
    }
}

fn render_terms(terms: &[(f64, String)]) -> String {
    let mut out = String::new();
    for (k, (coef, term)) in terms.iter().enumerate() {
        if k == 0 {
            if *coef < 0.0 {
                out.push_str(&format!("-{} {}", format_coef(-coef), term));
            } else {
                out.push_str(&format!("{} {}", format_coef(*coef), term));
            }
        } else {
            out.push_str(&signed(*coef, term));
        }
    }
    out
}
