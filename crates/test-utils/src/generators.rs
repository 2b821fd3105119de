//! Test data generators for synthetic weather datasets.
//!
//! Every field value is a closed-form function of its `(t, y, x)` index,
//! so tests can compute the expected value at any cell without reading the
//! generated data back.
//!
//! Fields are row-major `(time, latitude, longitude)`, time outermost.

/// 2025-06-01T00:00:00Z as seconds since the Unix epoch.
pub const JUNE_1_2025: i64 = 1_748_736_000;

/// Six hours in seconds.
pub const SIX_HOURS: i64 = 6 * 3_600;

/// Evenly spaced instants, as seconds since the Unix epoch.
///
/// # Example
///
/// ```
/// use test_utils::{epoch_times, JUNE_1_2025, SIX_HOURS};
///
/// let times = epoch_times(JUNE_1_2025, SIX_HOURS, 4);
/// assert_eq!(times.len(), 4);
/// assert_eq!(times[3] - times[0], 18 * 3_600);
/// ```
pub fn epoch_times(start: i64, step: i64, count: usize) -> Vec<i64> {
    (0..count as i64).map(|i| start + i * step).collect()
}

/// Evenly spaced coordinate values; `step` may be negative.
///
/// ```
/// use test_utils::regular_axis;
///
/// assert_eq!(regular_axis(50.0, -0.5, 3), vec![50.0, 49.5, 49.0]);
/// ```
pub fn regular_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// 2 m temperature in Kelvin at one cell.
///
/// Whole-number offsets keep the Celsius conversion easy to predict:
/// `temperature_kelvin(0, 0, 0)` is 280 K.
pub fn temperature_kelvin(t: usize, y: usize, x: usize) -> f64 {
    280.0 + t as f64 + 0.5 * y as f64 + 0.25 * x as f64
}

/// Eastward 10 m wind in m/s at one cell.
pub fn u_wind(t: usize, y: usize, x: usize) -> f64 {
    -5.0 + t as f64 + 0.5 * x as f64 - 0.25 * y as f64
}

/// Northward 10 m wind in m/s at one cell.
pub fn v_wind(t: usize, y: usize, x: usize) -> f64 {
    2.0 - 0.5 * t as f64 + 0.25 * y as f64
}

/// Six-hour precipitation in metres at one cell.
///
/// Deterministic pseudo-random: roughly one cell in four is wet.
pub fn precipitation(t: usize, y: usize, x: usize, seed: u32) -> f64 {
    let hash = simple_hash(x as u32, y as u32, seed.wrapping_add(t as u32));
    if hash % 4 == 0 {
        (hash % 5000) as f64 / 100_000.0
    } else {
        0.0
    }
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Builds a full `(time, y, x)` field from a per-cell function.
pub fn create_field<F>(times: usize, height: usize, width: usize, f: F) -> Vec<f64>
where
    F: Fn(usize, usize, usize) -> f64,
{
    let mut data = Vec::with_capacity(times * height * width);
    for t in 0..times {
        for y in 0..height {
            for x in 0..width {
                data.push(f(t, y, x));
            }
        }
    }
    data
}

pub fn create_temperature_field(times: usize, height: usize, width: usize) -> Vec<f64> {
    create_field(times, height, width, temperature_kelvin)
}

pub fn create_u_wind_field(times: usize, height: usize, width: usize) -> Vec<f64> {
    create_field(times, height, width, u_wind)
}

pub fn create_v_wind_field(times: usize, height: usize, width: usize) -> Vec<f64> {
    create_field(times, height, width, v_wind)
}

pub fn create_precipitation_field(
    times: usize,
    height: usize,
    width: usize,
    seed: u32,
) -> Vec<f64> {
    create_field(times, height, width, |t, y, x| precipitation(t, y, x, seed))
}

/// Overwrite the given `(t, y, x)` cells of a field with `value`.
///
/// Out-of-range positions are ignored. Useful for planting NaN, infinity
/// or fill markers.
pub fn plant(
    field: &mut [f64],
    height: usize,
    width: usize,
    cells: &[(usize, usize, usize)],
    value: f64,
) {
    for &(t, y, x) in cells {
        if y < height && x < width {
            if let Some(slot) = field.get_mut((t * height + y) * width + x) {
                *slot = value;
            }
        }
    }
}
