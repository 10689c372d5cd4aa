//! One-line summaries of retrieved arrays.

use std::fmt;

use chrono::{DateTime, Utc};
use netcdf_parser::{ArraySummary, DataArray};
use ocads_common::{Scenario, Variable};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SummaryLine {
    pub variable: Variable,
    pub scenario: Scenario,
    #[serde(flatten)]
    pub summary: ArraySummary,
    pub time_start: Option<DateTime<Utc>>,
    pub time_end: Option<DateTime<Utc>>,
}

impl SummaryLine {
    pub fn new(variable: Variable, scenario: Scenario, array: &DataArray) -> Self {
        let times = array.times().unwrap_or_default();
        Self {
            variable,
            scenario,
            summary: array.summary(),
            time_start: times.first().copied(),
            time_end: times.last().copied(),
        }
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        write!(
            f,
            "{}/{}: {}({}) shape={:?} units={} valid={}/{} min={} max={} mean={}",
            self.variable,
            self.scenario,
            s.name,
            s.dims.join(","),
            s.shape,
            s.units.as_deref().unwrap_or("-"),
            s.valid,
            s.count,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
        )?;
        if let (Some(start), Some(end)) = (self.time_start, self.time_end) {
            write!(f, " time={}..{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}
