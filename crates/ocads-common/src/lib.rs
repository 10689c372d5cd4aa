//! Common types shared by the OCADS retrieval crates.
//!
//! The OCADS archive (NOAA NCEI data set 0259391) publishes one NetCDF file
//! per (variable, scenario) pair holding the ensemble median of that
//! variable. This crate owns the fixed allow-lists, the request
//! normalisation and validation, and the deterministic file naming.

pub mod catalog;
pub mod error;
pub mod naming;
pub mod selection;

pub use catalog::{Scenario, Variable};
pub use error::{OcadsError, OcadsResult};
pub use naming::{MedianFile, DEFAULT_BASE_URL, DEFAULT_MIRROR_URL};
pub use selection::{NameList, Request};
