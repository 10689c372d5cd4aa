//! Retrieval of OCADS ensemble-median files.
//!
//! For each requested (variable, scenario) pair the client:
//!
//! 1. builds `{variable}_median_{scenario}.nc` and its archive URL
//! 2. fetches the file into the local cache, or reuses the cached copy
//! 3. on a read timeout only, fetches the same file name once from the mirror
//! 4. opens the file and extracts the variable as a [`DataArray`]
//!
//! Requests are validated up front; an unknown name fails the call before
//! anything is downloaded. Pairs are processed one at a time.
//!
//! ```ignore
//! let data = ocads_client::download_ocads_data(["pHT", "Temperature"], ["historical", "ssp585"]).await?;
//! let ph = data.get(Variable::PHT, Scenario::Ssp585).unwrap();
//! ```

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod retrieve;

pub use client::{download_ocads_data, OcadsClient};
pub use config::{default_cache_dir, ClientConfig};
pub use data::OcadsData;
pub use error::{ClientError, ClientResult, FetchError};
pub use fetch::{Fetcher, HttpFetcher};
pub use retrieve::retrieve_with_fallback;

pub use netcdf_parser::DataArray;
pub use ocads_common::{NameList, Scenario, Variable};
