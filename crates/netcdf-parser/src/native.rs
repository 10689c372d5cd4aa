//! Native NetCDF access using the netcdf library.
//!
//! The netcdf library wraps libnetcdf/HDF5 and needs a file path, which is
//! what the download cache hands us.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Once;

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use crate::array::{decode_values, AttrValue, Coordinate, DataArray, ENCODING_ATTRIBUTES};
use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when probing for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call repeatedly; only the first call has an effect.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// An open NetCDF file.
pub struct Dataset {
    path: PathBuf,
    file: netcdf::File,
}

/// Open a NetCDF file for reading.
pub fn open_dataset<P: AsRef<Path>>(path: P) -> NetCdfResult<Dataset> {
    Dataset::open(path)
}

impl Dataset {
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref();
        if !path.exists() {
            return Err(NetCdfError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }

        let file = netcdf::open(path).map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Opened NetCDF dataset");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of every variable in the file, coordinates included.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Global attributes.
    pub fn attributes(&self) -> BTreeMap<String, AttrValue> {
        collect_attributes(self.file.attributes())
    }

    /// Extract one variable with its dimensions, attributes and coordinates.
    pub fn variable(&self, name: &str) -> NetCdfResult<DataArray> {
        let var = self.file.variable(name).ok_or_else(|| {
            NetCdfError::MissingData(format!(
                "variable '{}' in {} (available: {})",
                name,
                self.path.display(),
                self.variable_names().join(", ")
            ))
        })?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let raw: Vec<f64> = var.get_values::<f64, _>(..).map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e))
        })?;

        let mut attributes = collect_attributes(var.attributes());
        let decoded = decode_values(raw, &attributes);
        for encoding in ENCODING_ATTRIBUTES {
            attributes.remove(encoding);
        }

        let values = ArrayD::from_shape_vec(IxDyn(&shape), decoded).map_err(|e| {
            NetCdfError::InvalidFormat(format!(
                "Variable {} has {:?} dimensions but mismatched data: {}",
                name, shape, e
            ))
        })?;

        let mut coords = BTreeMap::new();
        for dim in &dims {
            if let Some(coord) = self.coordinate(dim) {
                coords.insert(dim.clone(), coord);
            }
        }

        debug!(
            variable = %name,
            dims = ?dims,
            shape = ?shape,
            coords = coords.len(),
            "Extracted variable"
        );

        Ok(DataArray {
            name: name.to_string(),
            dims,
            values,
            attributes,
            coords,
        })
    }

    /// Read the coordinate variable of a dimension, if the file has one.
    fn coordinate(&self, dim: &str) -> Option<Coordinate> {
        let var = self.file.variable(dim)?;
        if var.dimensions().len() != 1 {
            return None;
        }

        let raw: Vec<f64> = match var.get_values::<f64, _>(..) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(dimension = %dim, error = %e, "Skipping non-numeric coordinate");
                return None;
            }
        };

        let mut attributes = collect_attributes(var.attributes());
        let values = decode_values(raw, &attributes);
        for encoding in ENCODING_ATTRIBUTES {
            attributes.remove(encoding);
        }

        Some(Coordinate { values, attributes })
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn collect_attributes<'a>(
    attrs: impl Iterator<Item = netcdf::Attribute<'a>>,
) -> BTreeMap<String, AttrValue> {
    let mut out = BTreeMap::new();
    for attr in attrs {
        let name = attr.name().to_string();
        match attr.value() {
            Ok(value) => {
                if let Some(value) = convert_attr(value) {
                    out.insert(name, value);
                }
            }
            Err(e) => debug!(attribute = %name, error = %e, "Unreadable attribute"),
        }
    }
    out
}

/// Map a netcdf attribute onto the numeric/text split used by [`AttrValue`].
fn convert_attr(value: netcdf::AttributeValue) -> Option<AttrValue> {
    use netcdf::AttributeValue as V;

    let converted = match value {
        V::Str(s) => AttrValue::Text(s),
        V::Strs(v) => AttrValue::Text(v.join("\n")),
        V::Doubles(v) => AttrValue::Numbers(v),
        V::Floats(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Shorts(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Ushorts(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Ints(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Uints(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Schars(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Uchars(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        V::Longlongs(v) => AttrValue::Numbers(v.into_iter().map(|x| x as f64).collect()),
        V::Ulonglongs(v) => AttrValue::Numbers(v.into_iter().map(|x| x as f64).collect()),
        scalar => AttrValue::Number(f64::try_from(scalar).ok()?),
    };
    Some(converted)
}
