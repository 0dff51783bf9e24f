//! Bounded integer variables to binary expansions.

use tracing::debug;

use super::QuadraticProgramConverter;
use crate::error::{OptError, OptResult};
use crate::problems::{QuadraticObjective, QuadraticProgram, VarType};

/// A source variable expressed as `offset + Σ coef · y_k` over target binaries.
#[derive(Debug, Clone, PartialEq)]
struct Encoding {
    offset: f64,
    terms: Vec<(usize, f64)>,
}

/// Replaces every integer variable `x ∈ [lb, ub]` by
/// `lb + Σ c_k · x@k` with binary `x@k`.
///
/// The coefficients are `1, 2, ..., 2^(p-1)` plus a final `ub - lb - (2^p - 1)`
/// where `p = floor(log2(ub - lb))`, so every value in the range has an
/// encoding and no encoding exceeds `ub`. Binary variables pass through
/// unchanged and the expansion keeps declaration order.
#[derive(Debug, Clone, Default)]
pub struct IntegerToBinary {
    encodings: Option<Vec<Encoding>>,
    dst_num_vars: usize,
}

impl IntegerToBinary {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Binary expansion coefficients for a variable spanning `range` values above
/// its lower bound.
pub(crate) fn encoding_coefficients(range: u64) -> Vec<u64> {
    if range == 0 {
        return Vec::new();
    }
    let power = range.ilog2();
    let mut coeffs: Vec<u64> = (0..power).map(|i| 1u64 << i).collect();
    coeffs.push(range - ((1u64 << power) - 1));
    coeffs
}

impl QuadraticProgramConverter for IntegerToBinary {
    fn convert(&mut self, problem: &QuadraticProgram) -> OptResult<QuadraticProgram> {
        let mut dst = QuadraticProgram::new(problem.name());
        let mut encodings = Vec::with_capacity(problem.num_vars());

        for var in problem.variables() {
            let encoding = match var.vartype {
                VarType::Binary => {
                    let k = dst.add_variable(var.clone())?;
                    Encoding {
                        offset: 0.0,
                        terms: vec![(k, 1.0)],
                    }
                }
                VarType::Integer => {
                    let range = var.upperbound.abs_diff(var.lowerbound);
                    let coeffs = encoding_coefficients(range);
                    let mut terms = Vec::with_capacity(coeffs.len());
                    for (k, c) in coeffs.iter().enumerate() {
                        let index = dst.binary_var(format!("{}@{k}", var.name))?;
                        terms.push((index, *c as f64));
                    }
                    debug!(variable = %var.name, ?coeffs, "expanded integer variable");
                    Encoding {
                        offset: var.lowerbound as f64,
                        terms,
                    }
                }
            };
            encodings.push(encoding);
        }

        let src = problem.objective();
        let mut objective = QuadraticObjective::new(src.sense);
        objective.constant = src.constant;
        for (&i, &a) in &src.linear {
            let e = &encodings[i];
            objective.constant += a * e.offset;
            for &(k, c) in &e.terms {
                objective.add_linear(k, a * c);
            }
        }
        for (&(i, j), &q) in &src.quadratic {
            let (ei, ej) = (&encodings[i], &encodings[j]);
            objective.constant += q * ei.offset * ej.offset;
            for &(k, c) in &ej.terms {
                objective.add_linear(k, q * ei.offset * c);
            }
            for &(k, c) in &ei.terms {
                objective.add_linear(k, q * ej.offset * c);
                for &(l, d) in &ej.terms {
                    objective.add_quadratic(k, l, q * c * d);
                }
            }
        }
        dst.set_objective(objective)?;

        for constraint in problem.linear_constraints() {
            let mut rhs = constraint.rhs;
            let mut row = Vec::new();
            for (&i, &a) in &constraint.linear {
                let e = &encodings[i];
                rhs -= a * e.offset;
                row.extend(e.terms.iter().map(|&(k, c)| (k, a * c)));
            }
            dst.add_linear_constraint(constraint.name.clone(), row, constraint.sense, rhs)?;
        }

        self.dst_num_vars = dst.num_vars();
        self.encodings = Some(encodings);
        Ok(dst)
    }

    fn interpret(&self, x: &[f64]) -> OptResult<Vec<f64>> {
        let encodings = self
            .encodings
            .as_ref()
            .ok_or(OptError::NotConverted("IntegerToBinary"))?;
        if x.len() != self.dst_num_vars {
            return Err(OptError::DimensionMismatch {
                expected: self.dst_num_vars,
                got: x.len(),
            });
        }
        Ok(encodings
            .iter()
            .map(|e| e.offset + e.terms.iter().map(|&(k, c)| c * x[k]).sum::<f64>())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::ConstraintSense;

    #[test]
    fn test_encoding_coefficients() {
        assert!(encoding_coefficients(0).is_empty());
        assert_eq!(encoding_coefficients(1), vec![1]);
        assert_eq!(encoding_coefficients(2), vec![1, 1]);
        assert_eq!(encoding_coefficients(3), vec![1, 2]);
        assert_eq!(encoding_coefficients(4), vec![1, 2, 1]);
        assert_eq!(encoding_coefficients(16), vec![1, 2, 4, 8, 1]);
    }

    #[test]
    fn test_encoding_covers_range() {
        for range in 1..40u64 {
            let coeffs = encoding_coefficients(range);
            assert_eq!(coeffs.iter().sum::<u64>(), range);
            let mut reachable = vec![false; range as usize + 1];
            for mask in 0u32..(1 << coeffs.len()) {
                let v: u64 = coeffs
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| mask >> k & 1 == 1)
                    .map(|(_, c)| c)
                    .sum();
                reachable[v as usize] = true;
            }
            assert!(reachable.iter().all(|r| *r), "range {range}");
        }
    }

    fn mixed_program() -> QuadraticProgram {
        let mut qp = QuadraticProgram::new("mixed");
        let x = qp.binary_var("x").unwrap();
        let z = qp.integer_var("z", 2, 5).unwrap();
        qp.minimize(1.0, [(x, 3.0), (z, -2.0)], [((x, z), 1.5), ((z, z), 0.5)])
            .unwrap();
        qp.add_linear_constraint("c", [(x, 1.0), (z, 2.0)], ConstraintSense::Eq, 8.0)
            .unwrap();
        qp
    }

    #[test]
    fn test_variables_expanded_in_place() {
        let out = IntegerToBinary::new().convert(&mixed_program()).unwrap();
        let names: Vec<&str> = out.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["x", "z@0", "z@1"]);
        assert_eq!(out.num_integer_vars(), 0);
    }

    #[test]
    fn test_constraint_rhs_shifted() {
        let out = IntegerToBinary::new().convert(&mixed_program()).unwrap();
        let c = &out.linear_constraints()[0];
        // x + 2(2 + y0 + 2 y1) = 8
        assert_eq!(c.rhs, 4.0);
        assert_eq!(c.linear[&1], 2.0);
        assert_eq!(c.linear[&2], 4.0);
    }

    #[test]
    fn test_objective_preserved_on_every_assignment() {
        let src = mixed_program();
        let mut conv = IntegerToBinary::new();
        let out = conv.convert(&src).unwrap();

        for mask in 0u32..(1 << out.num_vars()) {
            let y: Vec<f64> = (0..out.num_vars())
                .map(|k| f64::from(mask >> k & 1))
                .collect();
            let x = conv.interpret(&y).unwrap();
            let expected = src.objective_value(&x).unwrap();
            let got = out.objective_value(&y).unwrap();
            assert!((expected - got).abs() < 1e-9, "mask {mask:b}");
            assert_eq!(
                src.linear_constraints()[0].is_satisfied(&x),
                out.linear_constraints()[0].is_satisfied(&y)
            );
        }
    }

    #[test]
    fn test_interpret() {
        let mut conv = IntegerToBinary::new();
        assert!(conv.interpret(&[]).is_err());
        conv.convert(&mixed_program()).unwrap();
        assert_eq!(conv.interpret(&[1.0, 1.0, 1.0]).unwrap(), vec![1.0, 5.0]);
        assert_eq!(conv.interpret(&[0.0, 0.0, 0.0]).unwrap(), vec![0.0, 2.0]);
        assert!(matches!(
            conv.interpret(&[0.0]),
            Err(OptError::DimensionMismatch { expected: 3, got: 1 })
        ));
    }
}
