//! Format detection and the file handle.

use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::NativeFile;
use crate::variable::VariableInfo;

/// On-disk NetCDF flavour, detected from the first four bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// CDF-1
    Classic,
    /// CDF-2
    Offset64,
    /// CDF-5
    Data64,
    /// NetCDF-4 (an HDF5 container)
    Hdf5,
}

impl FileFormat {
    pub fn sniff(magic: &[u8; 4]) -> Option<Self> {
        match magic {
            b"CDF\x01" => Some(FileFormat::Classic),
            b"CDF\x02" => Some(FileFormat::Offset64),
            b"CDF\x05" => Some(FileFormat::Data64),
            b"\x89HDF" => Some(FileFormat::Hdf5),
            _ => None,
        }
    }

    pub fn is_classic(&self) -> bool {
        !matches!(self, FileFormat::Hdf5)
    }
}

/// An open NetCDF file.
///
/// Reads return physical values: `_FillValue` / `missing_value` become NaN
/// and `scale_factor` / `add_offset` are applied. Only the catalog is read on
/// open; data is fetched per request.
pub struct GridFile {
    path: PathBuf,
    format: FileFormat,
    inner: NativeFile,
}

impl GridFile {
    pub fn open(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        let path = path.as_ref();

        // libnetcdf also opens other containers (e.g. Zarr stores); only
        // hand it files with a NetCDF signature.
        let mut magic = [0u8; 4];
        File::open(path)?.read_exact(&mut magic)?;
        let format = FileFormat::sniff(&magic).ok_or_else(|| {
            NetCdfError::invalid(format!("{} is not a NetCDF file", path.display()))
        })?;

        let inner = NativeFile::open(path)?;
        debug!(path = %path.display(), ?format, "Opened NetCDF file");

        Ok(Self {
            path: path.to_path_buf(),
            format,
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn variables(&self) -> &[VariableInfo] {
        self.inner.variables()
    }

    pub fn variable(&self, name: &str) -> Option<&VariableInfo> {
        self.variables().iter().find(|v| v.name == name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    fn require(&self, name: &str) -> NetCdfResult<&VariableInfo> {
        self.variable(name)
            .ok_or_else(|| NetCdfError::missing(format!("variable '{}'", name)))
    }

    /// Read a single element.
    pub fn read_value(&self, name: &str, index: &[usize]) -> NetCdfResult<f64> {
        let info = self.require(name)?;
        if !info.contains(index) {
            return Err(NetCdfError::OutOfBounds {
                variable: name.to_string(),
                index: index.to_vec(),
                shape: info.shape.clone(),
            });
        }

        let raw = self.inner.read_raw_value(name, index)?;
        Ok(info.packing.unpack(raw))
    }

    /// Read the values of a `(time, y, x)` variable at one grid cell.
    pub fn read_series(
        &self,
        name: &str,
        time: Range<usize>,
        y: usize,
        x: usize,
    ) -> NetCdfResult<Vec<f64>> {
        let info = self.require(name)?;
        if info.ndim() != 3 {
            return Err(NetCdfError::invalid(format!(
                "variable '{}' has {} dimensions, expected 3",
                name,
                info.ndim()
            )));
        }
        if time.is_empty() {
            return Ok(Vec::new());
        }
        let last = [time.end - 1, y, x];
        if !info.contains(&last) {
            return Err(NetCdfError::OutOfBounds {
                variable: name.to_string(),
                index: last.to_vec(),
                shape: info.shape.clone(),
            });
        }

        let raw = self.inner.read_raw_series(name, time, y, x)?;
        Ok(unpack_all(info, raw))
    }

    /// Read a whole variable in row-major order.
    pub fn read_all(&self, name: &str) -> NetCdfResult<Vec<f64>> {
        let info = self.require(name)?;
        let raw = self.inner.read_raw_all(name)?;
        Ok(unpack_all(info, raw))
    }
}

fn unpack_all(info: &VariableInfo, mut values: Vec<f64>) -> Vec<f64> {
    if !info.packing.is_identity() {
        for v in values.iter_mut() {
            *v = info.packing.unpack(*v);
        }
    }
    values
}
