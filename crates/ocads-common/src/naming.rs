//! Deterministic file names and download locations.

use std::fmt;

use crate::catalog::{Scenario, Variable};

/// Directory holding the median files on the NCEI archive.
pub const DEFAULT_BASE_URL: &str =
    "https://www.ncei.noaa.gov/data/oceans/ncei/ocads/data/0259391/nc/median/";

/// Mirror download location. The same URL serves every file; only the cached
/// file name tells them apart.
pub const DEFAULT_MIRROR_URL: &str = "https://osf.io/download/ac7zg/";

/// One median file, identified by its variable and scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MedianFile {
    pub variable: Variable,
    pub scenario: Scenario,
}

impl MedianFile {
    pub fn new(variable: Variable, scenario: Scenario) -> Self {
        Self { variable, scenario }
    }

    /// `{variable}_median_{scenario}.nc`
    pub fn filename(&self) -> String {
        format!("{}_median_{}.nc", self.variable, self.scenario)
    }

    /// Full URL of the file under `base_url`.
    ///
    /// A missing trailing slash on `base_url` is tolerated.
    pub fn url(&self, base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{}{}", base_url, self.filename())
        } else {
            format!("{}/{}", base_url, self.filename())
        }
    }

    /// URL on the default NCEI archive.
    pub fn primary_url(&self) -> String {
        self.url(DEFAULT_BASE_URL)
    }
}

impl fmt::Display for MedianFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename())
    }
}
