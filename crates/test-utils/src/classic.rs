//! Hand-assembled classic-format byte images.
//!
//! [`ClassicBytes`] lays out a small CDF-1 file by hand so tests can check
//! the classic flavour and damage a header in controlled ways. The corrupt
//! images below declare counts far larger than the file.

use std::io::Write;

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;

const NC_CHAR: u32 = 2;
const NC_DOUBLE: u32 = 6;

#[derive(Debug, Clone)]
struct ClassicVar {
    name: String,
    dims: Vec<usize>,
    units: Option<String>,
    values: Vec<f64>,
}

/// CDF-1 file with fixed dimensions and `double` variables only.
#[derive(Debug, Clone, Default)]
pub struct ClassicBytes {
    dims: Vec<(String, usize)>,
    vars: Vec<ClassicVar>,
}

impl ClassicBytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(&mut self, name: &str, len: usize) -> &mut Self {
        self.dims.push((name.to_string(), len));
        self
    }

    /// Add a variable. Panics on an unknown dimension or a shape mismatch.
    pub fn variable(
        &mut self,
        name: &str,
        dims: &[&str],
        values: Vec<f64>,
        units: Option<&str>,
    ) -> &mut Self {
        let ids: Vec<usize> = dims
            .iter()
            .map(|d| {
                self.dims
                    .iter()
                    .position(|(n, _)| n == d)
                    .unwrap_or_else(|| panic!("unknown dimension {d}"))
            })
            .collect();
        let expected: usize = ids.iter().map(|&i| self.dims[i].1).product();
        assert_eq!(values.len(), expected, "value count for {name}");

        self.vars.push(ClassicVar {
            name: name.to_string(),
            dims: ids,
            units: units.map(str::to_string),
            values,
        });
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Header size does not depend on the begin offsets.
        let header_len = self.header(&vec![0; self.vars.len()]).len();

        let mut begins = Vec::new();
        let mut offset = header_len;
        for var in &self.vars {
            begins.push(offset as u32);
            offset += var.values.len() * 8;
        }

        let mut out = self.header(&begins);
        for var in &self.vars {
            for v in &var.values {
                out.extend(v.to_be_bytes());
            }
        }
        out
    }

    fn header(&self, begins: &[u32]) -> Vec<u8> {
        let mut out = b"CDF\x01".to_vec();
        put_u32(&mut out, 0); // numrecs

        if self.dims.is_empty() {
            put_absent(&mut out);
        } else {
            put_u32(&mut out, NC_DIMENSION);
            put_u32(&mut out, self.dims.len() as u32);
            for (name, len) in &self.dims {
                put_name(&mut out, name);
                put_u32(&mut out, *len as u32);
            }
        }

        // global attributes
        put_absent(&mut out);

        if self.vars.is_empty() {
            put_absent(&mut out);
            return out;
        }
        put_u32(&mut out, NC_VARIABLE);
        put_u32(&mut out, self.vars.len() as u32);
        for (var, &begin) in self.vars.iter().zip(begins) {
            put_name(&mut out, &var.name);
            put_u32(&mut out, var.dims.len() as u32);
            for &id in &var.dims {
                put_u32(&mut out, id as u32);
            }
            match &var.units {
                Some(units) => {
                    put_u32(&mut out, NC_ATTRIBUTE);
                    put_u32(&mut out, 1);
                    put_name(&mut out, "units");
                    put_u32(&mut out, NC_CHAR);
                    put_u32(&mut out, units.len() as u32);
                    out.extend_from_slice(units.as_bytes());
                    pad_to4(&mut out);
                }
                None => put_absent(&mut out),
            }
            put_u32(&mut out, NC_DOUBLE);
            put_u32(&mut out, (var.values.len() * 8) as u32);
            put_u32(&mut out, begin);
        }
        out
    }
}

/// CDF-1 header whose dimension list claims `0x7FFF_FFFF` entries but holds one.
pub fn oversized_dimension_count() -> Vec<u8> {
    let mut out = b"CDF\x01".to_vec();
    put_u32(&mut out, 0);
    put_u32(&mut out, NC_DIMENSION);
    put_u32(&mut out, 0x7FFF_FFFF);
    put_name(&mut out, "x");
    put_u32(&mut out, 1);
    out
}

/// CDF-5 header with a global `double` attribute of `0x0FFF_FFFF_FFFF`
/// elements followed by a single value.
pub fn oversized_attribute_length() -> Vec<u8> {
    let mut out = b"CDF\x05".to_vec();
    put_u64(&mut out, 0); // numrecs
    put_u32(&mut out, 0); // no dimensions
    put_u64(&mut out, 0);
    put_u32(&mut out, NC_ATTRIBUTE);
    put_u64(&mut out, 1);
    put_u64(&mut out, 5);
    out.extend_from_slice(b"title");
    pad_to4(&mut out);
    put_u32(&mut out, NC_DOUBLE);
    put_u64(&mut out, 0x0FFF_FFFF_FFFF);
    out.extend(1.0f64.to_be_bytes());
    out
}

/// Write raw bytes to a temporary `.nc` file.
pub fn write_bytes_temp(bytes: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("weather_raw_")
        .suffix(".nc")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

fn pad_to4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend(v.to_be_bytes());
}

fn put_u64(out: &mut Vec<u8>, v: u64) {
    out.extend(v.to_be_bytes());
}

fn put_absent(out: &mut Vec<u8>) {
    put_u32(out, 0);
    put_u32(out, 0);
}

fn put_name(out: &mut Vec<u8>, name: &str) {
    put_u32(out, name.len() as u32);
    out.extend_from_slice(name.as_bytes());
    pad_to4(out);
}
