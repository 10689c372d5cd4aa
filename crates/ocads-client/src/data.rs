//! Nested variable → scenario → array mapping.

use netcdf_parser::DataArray;
use ocads_common::{Scenario, Variable};

/// Arrays keyed by variable, then scenario, in the order first requested.
///
/// Inserting an existing key replaces the value in place.
#[derive(Debug, Clone, Default)]
pub struct OcadsData {
    entries: Vec<(Variable, Vec<(Scenario, DataArray)>)>,
}

impl OcadsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the scenario map of `variable`, keeping its
    /// position if already present.
    pub fn reset_variable(&mut self, variable: Variable) {
        match self.entries.iter_mut().find(|(v, _)| *v == variable) {
            Some((_, scenarios)) => scenarios.clear(),
            None => self.entries.push((variable, Vec::new())),
        }
    }

    pub fn insert(&mut self, variable: Variable, scenario: Scenario, array: DataArray) {
        let index = match self.entries.iter().position(|(v, _)| *v == variable) {
            Some(index) => index,
            None => {
                self.entries.push((variable, Vec::new()));
                self.entries.len() - 1
            }
        };
        let scenarios = &mut self.entries[index].1;
        match scenarios.iter_mut().find(|(s, _)| *s == scenario) {
            Some((_, existing)) => *existing = array,
            None => scenarios.push((scenario, array)),
        }
    }

    pub fn get(&self, variable: Variable, scenario: Scenario) -> Option<&DataArray> {
        self.scenario_entries(variable)?
            .iter()
            .find(|(s, _)| *s == scenario)
            .map(|(_, array)| array)
    }

    /// Outer keys in insertion order.
    pub fn variables(&self) -> Vec<Variable> {
        self.entries.iter().map(|(v, _)| *v).collect()
    }

    /// Inner keys of `variable` in insertion order.
    pub fn scenarios(&self, variable: Variable) -> Vec<Scenario> {
        self.scenario_entries(variable)
            .map(|entries| entries.iter().map(|(s, _)| *s).collect())
            .unwrap_or_default()
    }

    /// Every (variable, scenario, array) triple, variables outer.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, Scenario, &DataArray)> {
        self.entries.iter().flat_map(|(variable, scenarios)| {
            scenarios
                .iter()
                .map(move |(scenario, array)| (*variable, *scenario, array))
        })
    }

    /// Number of outer keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scenario_entries(&self, variable: Variable) -> Option<&Vec<(Scenario, DataArray)>> {
        self.entries
            .iter()
            .find(|(v, _)| *v == variable)
            .map(|(_, scenarios)| scenarios)
    }
}
