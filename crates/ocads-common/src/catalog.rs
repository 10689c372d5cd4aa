//! Fixed allow-lists of variables and scenarios published by OCADS.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OcadsError;

/// Ocean-chemistry variables available as median files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    /// Aragonite saturation state
    Aragonite,
    /// Carbonate ion concentration
    CO3,
    /// Calcite saturation state
    Calcite,
    /// Dissolved inorganic carbon
    DIC,
    /// Hydrogen ion concentration (total scale)
    H,
    /// Free hydrogen ion concentration
    Hfree,
    /// Revelle factor
    RF,
    Salinity,
    /// Total alkalinity
    TA,
    Temperature,
    /// Fugacity of CO2
    #[serde(rename = "fCO2")]
    FCO2,
    /// Partial pressure of CO2
    #[serde(rename = "pCO2")]
    PCO2,
    /// pH on the total scale
    #[serde(rename = "pHT")]
    PHT,
}

impl Variable {
    /// Every variable in archive order.
    pub const ALL: [Variable; 13] = [
        Variable::Aragonite,
        Variable::CO3,
        Variable::Calcite,
        Variable::DIC,
        Variable::H,
        Variable::Hfree,
        Variable::RF,
        Variable::Salinity,
        Variable::TA,
        Variable::Temperature,
        Variable::FCO2,
        Variable::PCO2,
        Variable::PHT,
    ];

    /// Identifier as it appears in file names and requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::Aragonite => "Aragonite",
            Variable::CO3 => "CO3",
            Variable::Calcite => "Calcite",
            Variable::DIC => "DIC",
            Variable::H => "H",
            Variable::Hfree => "Hfree",
            Variable::RF => "RF",
            Variable::Salinity => "Salinity",
            Variable::TA => "TA",
            Variable::Temperature => "Temperature",
            Variable::FCO2 => "fCO2",
            Variable::PCO2 => "pCO2",
            Variable::PHT => "pHT",
        }
    }

    /// Name of the array inside the downloaded file.
    ///
    /// Most files store the array under the request identifier; the
    /// temperature files use a lower-case name.
    pub fn file_variable_name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            other => other.as_str(),
        }
    }

    /// Identifiers of every variable, for error messages and listings.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Variable::as_str).collect()
    }

    /// Parse a request identifier. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Result<Self, OcadsError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == name)
            .ok_or_else(|| OcadsError::UnknownVariable {
                name: name.to_string(),
                allowed: Self::names(),
            })
    }
}

impl FromStr for Variable {
    type Err = OcadsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emissions scenarios the archive was modelled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Historical,
    Ssp119,
    Ssp126,
    Ssp245,
    Ssp370,
    Ssp585,
}

impl Scenario {
    /// Every scenario in archive order.
    pub const ALL: [Scenario; 6] = [
        Scenario::Historical,
        Scenario::Ssp119,
        Scenario::Ssp126,
        Scenario::Ssp245,
        Scenario::Ssp370,
        Scenario::Ssp585,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Historical => "historical",
            Scenario::Ssp119 => "ssp119",
            Scenario::Ssp126 => "ssp126",
            Scenario::Ssp245 => "ssp245",
            Scenario::Ssp370 => "ssp370",
            Scenario::Ssp585 => "ssp585",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Scenario::as_str).collect()
    }

    /// Parse a scenario identifier. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Result<Self, OcadsError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| OcadsError::UnknownScenario {
                name: name.to_string(),
                allowed: Self::names(),
            })
    }
}

impl FromStr for Scenario {
    type Err = OcadsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
