//! File access through the native netcdf library.
//!
//! libnetcdf reads every NetCDF flavour (CDF-1/2/5 and NetCDF-4/HDF5), so
//! this is the only backend. Header validation is libnetcdf's; a corrupt
//! file surfaces as [`NetCdfError::Library`].

use std::ops::Range;
use std::path::Path;
use std::sync::Once;

use crate::error::NetCdfResult;
use crate::variable::{Attribute, AttributeValue, VariableInfo};
use crate::NetCdfError;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call multiple times; [`NativeFile::open`] calls it for you.
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

/// A file opened through libnetcdf.
pub struct NativeFile {
    file: netcdf::File,
    variables: Vec<VariableInfo>,
}

impl NativeFile {
    pub fn open(path: &Path) -> NetCdfResult<Self> {
        silence_hdf5_errors();

        let file = netcdf::open(path)?;
        let variables = file.variables().map(|var| catalog_entry(&var)).collect();

        Ok(Self { file, variables })
    }

    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    fn variable(&self, name: &str) -> NetCdfResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| NetCdfError::missing(format!("variable '{}'", name)))
    }

    pub fn read_raw_value(&self, name: &str, index: &[usize]) -> NetCdfResult<f64> {
        let var = self.variable(name)?;
        let extents: Vec<netcdf::Extent> = index.iter().map(|&i| i.into()).collect();
        Ok(var.get_value::<f64, _>(extents.as_slice())?)
    }

    pub fn read_raw_series(
        &self,
        name: &str,
        time: Range<usize>,
        y: usize,
        x: usize,
    ) -> NetCdfResult<Vec<f64>> {
        if time.is_empty() {
            return Ok(Vec::new());
        }
        let var = self.variable(name)?;
        Ok(var.get_values::<f64, _>((time, y, x))?)
    }

    pub fn read_raw_all(&self, name: &str) -> NetCdfResult<Vec<f64>> {
        let var = self.variable(name)?;
        Ok(var.get_values::<f64, _>(..)?)
    }
}

fn catalog_entry(var: &netcdf::Variable) -> VariableInfo {
    let dimensions = var.dimensions().iter().map(|d| d.name().to_string()).collect();
    let shape = var.dimensions().iter().map(|d| d.len()).collect();

    let attributes = var
        .attributes()
        .filter_map(|attr| {
            let name = attr.name().to_string();
            get_attr(var, &name).map(|value| Attribute { name, value })
        })
        .collect();

    VariableInfo::new(var.name().to_string(), dimensions, shape, attributes)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Text or scalar numeric attribute; other shapes are skipped.
fn get_attr(var: &netcdf::Variable, name: &str) -> Option<AttributeValue> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(AttributeValue::Text(s)),
        other => f64::try_from(other)
            .ok()
            .map(|v| AttributeValue::Numbers(vec![v])),
    }
}
