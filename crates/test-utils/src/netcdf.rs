//! NetCDF fixture writer built on the `netcdf` crate.
//!
//! Files are NetCDF-4 (HDF5), the format xarray writes by default. Supports
//! fixed dimensions, one unlimited dimension, numeric and text attributes,
//! and `double` / `float` / `short` / `int` variables.
//!
//! ```no_run
//! use test_utils::netcdf::{GridWriter, Values};
//!
//! let mut w = GridWriter::new();
//! w.dimension("x", 3);
//! w.variable("x", &["x"], Values::Double(vec![1.0, 2.0, 3.0]))
//!     .text_attr("units", "m");
//! let file = w.write_temp().unwrap();
//! ```

use std::error::Error;
use std::path::Path;

/// Error type for fixture writes (libnetcdf or temp-file I/O).
pub type WriteResult<T> = Result<T, Box<dyn Error>>;

/// Variable or attribute payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Double(Vec<f64>),
    Float(Vec<f32>),
    Short(Vec<i16>),
    Int(Vec<i32>),
}

impl Values {
    fn len(&self) -> usize {
        match self {
            Values::Double(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Short(v) => v.len(),
            Values::Int(v) => v.len(),
        }
    }

    /// Single-element payloads become scalar attributes.
    fn to_attribute(&self) -> netcdf::AttributeValue {
        match self {
            Values::Double(v) if v.len() == 1 => v[0].into(),
            Values::Float(v) if v.len() == 1 => v[0].into(),
            Values::Short(v) if v.len() == 1 => v[0].into(),
            Values::Int(v) if v.len() == 1 => v[0].into(),
            Values::Double(v) => v.clone().into(),
            Values::Float(v) => v.clone().into(),
            Values::Short(v) => v.clone().into(),
            Values::Int(v) => v.clone().into(),
        }
    }
}

#[derive(Debug, Clone)]
enum AttrValue {
    Text(String),
    Numbers(Values),
}

#[derive(Debug, Clone)]
struct Dim {
    name: String,
    len: usize,
    unlimited: bool,
}

/// A variable being assembled; returned by [`GridWriter::variable`].
#[derive(Debug, Clone)]
pub struct VarBuilder {
    name: String,
    dims: Vec<usize>,
    attrs: Vec<(String, AttrValue)>,
    values: Values,
}

impl VarBuilder {
    pub fn text_attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.attrs.push((name.to_string(), AttrValue::Text(value.to_string())));
        self
    }

    pub fn attr(&mut self, name: &str, value: Values) -> &mut Self {
        self.attrs.push((name.to_string(), AttrValue::Numbers(value)));
        self
    }

    pub fn double_attr(&mut self, name: &str, value: f64) -> &mut Self {
        self.attr(name, Values::Double(vec![value]))
    }
}

/// Collects dimensions and variables, then writes them in one go.
#[derive(Debug, Clone, Default)]
pub struct GridWriter {
    dims: Vec<Dim>,
    vars: Vec<VarBuilder>,
}

impl GridWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(&mut self, name: &str, len: usize) -> &mut Self {
        self.dims.push(Dim {
            name: name.to_string(),
            len,
            unlimited: false,
        });
        self
    }

    /// The unlimited dimension; `len` is the number of records written.
    pub fn unlimited_dimension(&mut self, name: &str, len: usize) -> &mut Self {
        self.dims.push(Dim {
            name: name.to_string(),
            len,
            unlimited: true,
        });
        self
    }

    /// Add a variable. Panics if a dimension name is unknown or the value
    /// count does not match the shape.
    pub fn variable(&mut self, name: &str, dims: &[&str], values: Values) -> &mut VarBuilder {
        let ids: Vec<usize> = dims
            .iter()
            .map(|d| {
                self.dims
                    .iter()
                    .position(|dim| dim.name == *d)
                    .unwrap_or_else(|| panic!("unknown dimension {d}"))
            })
            .collect();
        let expected: usize = ids.iter().map(|&i| self.dims[i].len).product();
        assert_eq!(values.len(), expected, "value count for {name}");

        self.vars.push(VarBuilder {
            name: name.to_string(),
            dims: ids,
            attrs: Vec::new(),
            values,
        });
        let last = self.vars.len() - 1;
        &mut self.vars[last]
    }

    /// Drop a variable added earlier.
    pub fn remove_variable(&mut self, name: &str) -> &mut Self {
        self.vars.retain(|v| v.name != name);
        self
    }

    pub fn write(&self, path: &Path) -> WriteResult<()> {
        let mut file = netcdf::create(path)?;

        for dim in &self.dims {
            if dim.unlimited {
                file.add_unlimited_dimension(&dim.name)?;
            } else {
                file.add_dimension(&dim.name, dim.len)?;
            }
        }

        // Define everything first; `_FillValue` must precede any data.
        for var in &self.vars {
            let dims: Vec<&str> = var
                .dims
                .iter()
                .map(|&i| self.dims[i].name.as_str())
                .collect();
            let mut nc_var = match &var.values {
                Values::Double(_) => file.add_variable::<f64>(&var.name, &dims)?,
                Values::Float(_) => file.add_variable::<f32>(&var.name, &dims)?,
                Values::Short(_) => file.add_variable::<i16>(&var.name, &dims)?,
                Values::Int(_) => file.add_variable::<i32>(&var.name, &dims)?,
            };
            for (name, value) in &var.attrs {
                match value {
                    AttrValue::Text(s) => nc_var.put_attribute(name, s.as_str())?,
                    AttrValue::Numbers(values) => {
                        nc_var.put_attribute(name, values.to_attribute())?
                    }
                };
            }
        }

        for var in &self.vars {
            // Explicit ranges so unlimited dimensions grow to their length.
            let extents: Vec<netcdf::Extent> = var
                .dims
                .iter()
                .map(|&i| (0..self.dims[i].len).into())
                .collect();
            let mut nc_var = file
                .variable_mut(&var.name)
                .ok_or_else(|| format!("variable {} was not defined", var.name))?;
            match &var.values {
                Values::Double(v) => nc_var.put_values(v, extents.as_slice())?,
                Values::Float(v) => nc_var.put_values(v, extents.as_slice())?,
                Values::Short(v) => nc_var.put_values(v, extents.as_slice())?,
                Values::Int(v) => nc_var.put_values(v, extents.as_slice())?,
            }
        }

        // Dropping the handle closes the file.
        drop(file);
        Ok(())
    }

    /// Write to a fresh temporary `.nc` file that lives as long as the handle.
    pub fn write_temp(&self) -> WriteResult<tempfile::NamedTempFile> {
        let file = tempfile::Builder::new()
            .prefix("weather_test_")
            .suffix(".nc")
            .tempfile()?;
        self.write(file.path())?;
        Ok(file)
    }
}
