//! Wall-clock timings of benchmark operations.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use knapq_bench::{BenchParams, HarnessConfig, Operation};
use serde::{Deserialize, Serialize};

/// One timed operation at one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub operation: Operation,
    pub params: BenchParams,
    pub seconds: f64,
    /// Rendered result, or the error message if the operation failed.
    pub outcome: String,
    pub ok: bool,
}

impl Timing {
    pub fn new(
        operation: Operation,
        params: BenchParams,
        elapsed: Duration,
        outcome: Result<String, String>,
    ) -> Self {
        let ok = outcome.is_ok();
        Self {
            operation,
            params,
            seconds: elapsed.as_secs_f64(),
            outcome: outcome.unwrap_or_else(|e| e),
            ok,
        }
    }
}

/// All timings of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingReport {
    pub config: HarnessConfig,
    pub timings: Vec<Timing>,
}

impl TimingReport {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            timings: Vec::new(),
        }
    }

    pub fn push(&mut self, timing: Timing) {
        self.timings.push(timing);
    }

    pub fn failures(&self) -> usize {
        self.timings.iter().filter(|t| !t.ok).count()
    }

    /// Total seconds spent per operation.
    pub fn totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for t in &self.timings {
            *totals.entry(t.operation.to_string()).or_insert(0.0) += t.seconds;
        }
        totals
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<14} {:>6} {:>12}  result", "operation", "params", "time (ms)")?;
        for t in &self.timings {
            writeln!(
                f,
                "{:<14} {:>6} {:>12.3}  {}",
                t.operation.name(),
                t.params.to_string(),
                t.seconds * 1e3,
                t.outcome
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> TimingReport {
        let mut report = TimingReport::new(HarnessConfig::default());
        let params = BenchParams::new(2, 2);
        report.push(Timing::new(
            Operation::Qaoa,
            params,
            Duration::from_millis(3),
            Ok("fval=3".into()),
        ));
        report.push(Timing::new(
            Operation::Qaoa,
            BenchParams::new(2, 4),
            Duration::from_millis(5),
            Ok("fval=4".into()),
        ));
        report.push(Timing::new(
            Operation::Grover,
            params,
            Duration::from_millis(1),
            Err("backend down".into()),
        ));
        report
    }

    #[test]
    fn test_totals_and_failures() {
        let report = report();
        assert_eq!(report.failures(), 1);
        let totals = report.totals();
        assert!((totals["qaoa"] - 0.008).abs() < 1e-12);
        assert!((totals["grover"] - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["timings"][0]["operation"], "qaoa");
        assert_eq!(json["timings"][2]["ok"], false);
        assert_eq!(json["config"]["shots"], 1);
    }

    #[test]
    fn test_table_rows() {
        let table = report().to_string();
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("2x4"));
        assert!(table.contains("backend down"));
    }
}
