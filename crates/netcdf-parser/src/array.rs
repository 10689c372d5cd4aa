//! Labeled in-memory arrays extracted from a dataset.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ndarray::ArrayD;
use serde::Serialize;

use crate::time::decode_cf_time;

/// Attributes consumed when decoding packed values.
pub(crate) const ENCODING_ATTRIBUTES: [&str; 4] =
    ["_FillValue", "missing_value", "scale_factor", "add_offset"];

/// Value of a variable or global attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Numbers(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One-dimensional coordinate of a dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub values: Vec<f64>,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Coordinate {
    pub fn units(&self) -> Option<&str> {
        self.attributes.get("units").and_then(AttrValue::as_str)
    }

    /// Decode CF time values (`<unit> since <date>`), if this coordinate
    /// carries them on a supported calendar.
    pub fn as_datetimes(&self) -> Option<Vec<DateTime<Utc>>> {
        let calendar = self.attributes.get("calendar").and_then(AttrValue::as_str);
        decode_cf_time(&self.values, self.units()?, calendar)
    }
}

/// A named n-dimensional array with its dimension labels, attributes and
/// coordinates.
#[derive(Debug, Clone)]
pub struct DataArray {
    /// Name of the variable inside the file
    pub name: String,
    /// Dimension names, outermost first
    pub dims: Vec<String>,
    /// Decoded values
    pub values: ArrayD<f64>,
    pub attributes: BTreeMap<String, AttrValue>,
    /// Coordinates keyed by dimension name; dimensions without a coordinate
    /// variable are absent
    pub coords: BTreeMap<String, Coordinate>,
}

impl DataArray {
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn units(&self) -> Option<&str> {
        self.attributes.get("units").and_then(AttrValue::as_str)
    }

    pub fn long_name(&self) -> Option<&str> {
        self.attributes.get("long_name").and_then(AttrValue::as_str)
    }

    pub fn coord(&self, dim: &str) -> Option<&Coordinate> {
        self.coords.get(dim)
    }

    /// Decoded `time` coordinate, when present.
    pub fn times(&self) -> Option<Vec<DateTime<Utc>>> {
        self.coord("time")?.as_datetimes()
    }

    /// Count, extrema and mean over the non-NaN values.
    pub fn summary(&self) -> ArraySummary {
        let mut valid = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for &v in self.values.iter().filter(|v| !v.is_nan()) {
            valid += 1;
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        ArraySummary {
            name: self.name.clone(),
            dims: self.dims.clone(),
            shape: self.shape().to_vec(),
            units: self.units().map(str::to_string),
            count: self.len(),
            valid,
            min: (valid > 0).then_some(min),
            max: (valid > 0).then_some(max),
            mean: (valid > 0).then(|| sum / valid as f64),
        }
    }
}

/// Compact description of a [`DataArray`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySummary {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub units: Option<String>,
    pub count: usize,
    /// Number of non-missing values
    pub valid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Apply fill-value masking, then scale and offset.
pub(crate) fn decode_values(raw: Vec<f64>, attributes: &BTreeMap<String, AttrValue>) -> Vec<f64> {
    let fill_values: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| attributes.get(*name))
        .flat_map(|value| match value {
            AttrValue::Number(v) => vec![*v],
            AttrValue::Numbers(v) => v.clone(),
            AttrValue::Text(_) => Vec::new(),
        })
        .collect();
    let scale_factor = attributes.get("scale_factor").and_then(AttrValue::as_f64);
    let add_offset = attributes.get("add_offset").and_then(AttrValue::as_f64);

    if fill_values.is_empty() && scale_factor.is_none() && add_offset.is_none() {
        return raw;
    }

    let scale = scale_factor.unwrap_or(1.0);
    let offset = add_offset.unwrap_or(0.0);

    raw.into_iter()
        .map(|val| {
            if fill_values.iter().any(|&fill| fill == val) {
                f64::NAN
            } else {
                val * scale + offset
            }
        })
        .collect()
}
