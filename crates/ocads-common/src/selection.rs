//! Request normalisation and validation.
//!
//! Callers may pass a single name or a list of names for both variables and
//! scenarios. Both forms become a [`NameList`], and a [`Request`] is only
//! built once every name has been checked against its allow-list.

use crate::catalog::{Scenario, Variable};
use crate::error::OcadsResult;
use crate::naming::MedianFile;

/// One or more names, always held as a sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList(Vec<String>);

impl NameList {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for NameList {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for NameList {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for NameList {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for NameList {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for NameList {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Variable> for NameList {
    fn from(variable: Variable) -> Self {
        Self(vec![variable.as_str().to_string()])
    }
}

impl From<Scenario> for NameList {
    fn from(scenario: Scenario) -> Self {
        Self(vec![scenario.as_str().to_string()])
    }
}

impl FromIterator<String> for NameList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A fully validated request, in the order the names were given.
///
/// Duplicates are kept: each occurrence is fetched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub variables: Vec<Variable>,
    pub scenarios: Vec<Scenario>,
}

impl Request {
    /// Check every variable, then every scenario, failing on the first
    /// unknown name.
    pub fn parse(variables: impl Into<NameList>, scenarios: impl Into<NameList>) -> OcadsResult<Self> {
        let variables = variables.into();
        let scenarios = scenarios.into();

        let variables = variables
            .iter()
            .map(Variable::parse)
            .collect::<OcadsResult<Vec<_>>>()?;
        let scenarios = scenarios
            .iter()
            .map(Scenario::parse)
            .collect::<OcadsResult<Vec<_>>>()?;

        Ok(Self {
            variables,
            scenarios,
        })
    }

    /// Files to retrieve: variables outer, scenarios inner.
    pub fn files(&self) -> impl Iterator<Item = MedianFile> + '_ {
        self.variables.iter().flat_map(move |&variable| {
            self.scenarios
                .iter()
                .map(move |&scenario| MedianFile::new(variable, scenario))
        })
    }

    /// Number of (variable, scenario) pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.variables.len() * self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcadsError;

    #[test]
    fn test_single_name_equals_one_element_list() {
        assert_eq!(NameList::from("pHT"), NameList::from(vec!["pHT"]));
        assert_eq!(NameList::from("pHT".to_string()), NameList::from(["pHT"]));
    }

    #[test]
    fn test_names_are_not_transformed() {
        let list = NameList::from(vec![" pHT", "pHT", "pHT"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice()[0], " pHT");
    }

    #[test]
    fn test_request_preserves_order_and_duplicates() {
        let request = Request::parse(["Salinity", "Aragonite", "Salinity"], "ssp126").unwrap();
        assert_eq!(
            request.variables,
            vec![Variable::Salinity, Variable::Aragonite, Variable::Salinity]
        );
        assert_eq!(request.len(), 3);
    }

    #[test]
    fn test_variables_checked_before_scenarios() {
        let err = Request::parse("bogus_var", "bogus_scen").unwrap_err();
        assert!(matches!(err, OcadsError::UnknownVariable { .. }));
        assert_eq!(err.name(), "bogus_var");
    }

    #[test]
    fn test_any_invalid_entry_rejects_whole_request() {
        let err = Request::parse(["pHT", "DIC"], ["historical", "ssp999"]).unwrap_err();
        assert!(matches!(err, OcadsError::UnknownScenario { ref name, .. } if name == "ssp999"));
    }

    #[test]
    fn test_files_variables_outer() {
        let request = Request::parse(["DIC", "TA"], ["historical", "ssp585"]).unwrap();
        let names: Vec<String> = request.files().map(|f| f.filename()).collect();
        assert_eq!(
            names,
            vec![
                "DIC_median_historical.nc",
                "DIC_median_ssp585.nc",
                "TA_median_historical.nc",
                "TA_median_ssp585.nc",
            ]
        );
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let request = Request::parse(Vec::<String>::new(), "historical").unwrap();
        assert!(request.is_empty());
    }
}
