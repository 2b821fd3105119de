//! Time-window selection over a handle's time axis.

use std::ops::Range;

use chrono::{DateTime, Utc};
use weather_common::TimeRange;

use crate::source::GridHandle;

/// The timesteps of a handle that fall inside a window.
///
/// Borrows the handle; holds only an index range.
pub struct FilteredView<'a, H: ?Sized> {
    handle: &'a H,
    range: Range<usize>,
}

impl<'a, H: GridHandle + ?Sized> FilteredView<'a, H> {
    pub fn handle(&self) -> &'a H {
        self.handle
    }

    /// Index range into the handle's time axis.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn times(&self) -> &'a [DateTime<Utc>] {
        &self.handle.times()[self.range.clone()]
    }
}

/// Select timesteps within `window`, both ends inclusive.
///
/// A window outside the dataset's coverage yields an empty view.
pub fn filter<'a, H: GridHandle + ?Sized>(
    handle: &'a H,
    window: &TimeRange,
) -> FilteredView<'a, H> {
    let times = handle.times();
    let first = times.partition_point(|t| *t < window.start);
    let last = times.partition_point(|t| *t <= window.end);

    FilteredView {
        handle,
        range: first..last.max(first),
    }
}
