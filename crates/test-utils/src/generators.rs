//! Synthetic median files.
//!
//! The generated files mimic the OCADS layout: a `time × lat × lon` data
//! variable with CF coordinate variables for each dimension.

use std::path::Path;

/// Shape and encoding of a generated median file.
#[derive(Debug, Clone)]
pub struct MedianFileSpec {
    /// Name of the data variable inside the file
    pub variable: String,
    pub times: usize,
    pub lats: usize,
    pub lons: usize,
    /// When set, values are stored packed with this `(scale_factor, add_offset)`
    pub packing: Option<(f64, f64)>,
    /// Flat indices written as the `_FillValue`
    pub missing: Vec<usize>,
    pub units: String,
}

/// Fill value used by generated files.
pub const FILL_VALUE: f64 = -9999.0;

impl MedianFileSpec {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            times: 2,
            lats: 3,
            lons: 4,
            packing: None,
            missing: Vec::new(),
            units: "1".to_string(),
        }
    }

    pub fn with_shape(mut self, times: usize, lats: usize, lons: usize) -> Self {
        self.times = times;
        self.lats = lats;
        self.lons = lons;
        self
    }

    pub fn with_packing(mut self, scale_factor: f64, add_offset: f64) -> Self {
        self.packing = Some((scale_factor, add_offset));
        self
    }

    pub fn with_missing(mut self, flat_indices: Vec<usize>) -> Self {
        self.missing = flat_indices;
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn len(&self) -> usize {
        self.times * self.lats * self.lons
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoded value at `(t, y, x)`: `t * 100 + y * 10 + x`.
///
/// Easy to verify after a round trip through the reader.
pub fn expected_value(t: usize, y: usize, x: usize) -> f64 {
    (t * 100 + y * 10 + x) as f64
}

/// Decoded values in row-major order, `NaN` at the missing indices.
pub fn expected_values(spec: &MedianFileSpec) -> Vec<f64> {
    let mut values = Vec::with_capacity(spec.len());
    for t in 0..spec.times {
        for y in 0..spec.lats {
            for x in 0..spec.lons {
                values.push(expected_value(t, y, x));
            }
        }
    }
    for &i in &spec.missing {
        values[i] = f64::NAN;
    }
    values
}

/// Write a median file to `path`.
pub fn write_median_file(path: &Path, spec: &MedianFileSpec) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_attribute("title", "synthetic ensemble median")?;

    file.add_dimension("time", spec.times)?;
    file.add_dimension("lat", spec.lats)?;
    file.add_dimension("lon", spec.lons)?;

    {
        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", "days since 1850-01-01 00:00:00")?;
        time.put_attribute("calendar", "standard")?;
        let days: Vec<f64> = (0..spec.times).map(|t| (t * 365) as f64).collect();
        time.put_values(&days, ..)?;
    }
    {
        let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
        lat.put_attribute("units", "degrees_north")?;
        let values: Vec<f64> = (0..spec.lats).map(|y| -89.5 + y as f64).collect();
        lat.put_values(&values, ..)?;
    }
    {
        let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
        lon.put_attribute("units", "degrees_east")?;
        let values: Vec<f64> = (0..spec.lons).map(|x| 0.5 + x as f64).collect();
        lon.put_values(&values, ..)?;
    }

    let decoded = expected_values(spec);
    let stored: Vec<f64> = decoded
        .iter()
        .map(|&v| {
            if v.is_nan() {
                FILL_VALUE
            } else if let Some((scale, offset)) = spec.packing {
                (v - offset) / scale
            } else {
                v
            }
        })
        .collect();

    let mut data = file.add_variable::<f64>(&spec.variable, &["time", "lat", "lon"])?;
    data.put_attribute("_FillValue", FILL_VALUE)?;
    data.put_attribute("units", spec.units.as_str())?;
    data.put_attribute("long_name", format!("ensemble median {}", spec.variable).as_str())?;
    if let Some((scale, offset)) = spec.packing {
        data.put_attribute("scale_factor", scale)?;
        data.put_attribute("add_offset", offset)?;
    }
    data.put_values(&stored, ..)?;

    Ok(())
}

/// Bytes of a freshly written median file, for serving over HTTP.
pub fn median_file_bytes(spec: &MedianFileSpec) -> Vec<u8> {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("fixture.nc");
    write_median_file(&path, spec).expect("write median fixture");
    std::fs::read(&path).expect("read median fixture")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_values_layout() {
        let spec = MedianFileSpec::new("pHT").with_shape(2, 2, 3);
        let values = expected_values(&spec);
        assert_eq!(values.len(), 12);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1.0);
        assert_eq!(values[3], 10.0);
        assert_eq!(values[6], 100.0);
    }

    #[test]
    fn test_expected_values_missing() {
        let spec = MedianFileSpec::new("pHT").with_missing(vec![5]);
        let values = expected_values(&spec);
        assert!(values[5].is_nan());
        assert!(!values[4].is_nan());
    }
}
