//! NetCDF reader for OCADS ensemble-median files.
//!
//! Each median file holds one gridded variable (plus its coordinate
//! variables). This crate opens such a file and extracts a single named
//! variable as a [`DataArray`]: values, dimension names, attributes and the
//! one-dimensional coordinates of every dimension.
//!
//! # Decoding
//!
//! Values are read as `f64` and decoded the way CF-aware readers do by
//! default:
//!
//! - values equal to `_FillValue` or `missing_value` become `NaN`
//! - `scale_factor` and `add_offset` are applied to the remaining values
//!
//! The attributes consumed by decoding are removed from
//! [`DataArray::attributes`].
//!
//! # System requirements
//!
//! The `netcdf` crate links against libnetcdf and libhdf5
//! (`libhdf5-dev libnetcdf-dev` on Debian-based systems).

pub mod array;
pub mod error;
pub mod native;
pub mod time;

pub use array::{ArraySummary, AttrValue, Coordinate, DataArray};
pub use error::{NetCdfError, NetCdfResult};
pub use native::{open_dataset, silence_hdf5_errors, Dataset};
pub use time::decode_cf_time;
