//! Handle lifecycle under concurrency and failure.

use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use grid_query::{
    DatasetOpener, GridHandle, MemoryGrid, QueryConfig, QueryEngine, QueryError, Rejection,
    Result,
};

const T0: i64 = 1_748_736_000;

#[derive(Default)]
struct Tracker {
    open_now: AtomicUsize,
    max_open: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

#[derive(Clone, Copy, PartialEq)]
enum Fault {
    None,
    FailOpen,
    FailReads,
    PanicOnRead,
}

struct CountingOpener {
    grid: Arc<MemoryGrid>,
    tracker: Arc<Tracker>,
    fault: Fault,
}

struct CountingHandle {
    grid: Arc<MemoryGrid>,
    tracker: Arc<Tracker>,
    fault: Fault,
}

impl Drop for CountingHandle {
    fn drop(&mut self) {
        self.tracker.open_now.fetch_sub(1, Ordering::SeqCst);
        self.tracker.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl DatasetOpener for CountingOpener {
    type Handle = CountingHandle;

    fn open(&self) -> Result<CountingHandle> {
        if self.fault == Fault::FailOpen {
            return Err(QueryError::unavailable("cannot open"));
        }
        let now = self.tracker.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.tracker.max_open.fetch_max(now, Ordering::SeqCst);
        self.tracker.opened.fetch_add(1, Ordering::SeqCst);
        Ok(CountingHandle {
            grid: Arc::clone(&self.grid),
            tracker: Arc::clone(&self.tracker),
            fault: self.fault,
        })
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

impl CountingHandle {
    fn check(&self) -> Result<()> {
        // Widen the window in which overlapping handles would show up.
        thread::sleep(Duration::from_millis(2));
        match self.fault {
            Fault::FailReads => Err(QueryError::read_failed("disk on fire")),
            Fault::PanicOnRead => panic!("read exploded"),
            _ => Ok(()),
        }
    }
}

impl GridHandle for CountingHandle {
    fn times(&self) -> &[DateTime<Utc>] {
        self.grid.times()
    }

    fn latitudes(&self) -> &[f64] {
        self.grid.latitudes()
    }

    fn longitudes(&self) -> &[f64] {
        self.grid.longitudes()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.grid.has_variable(name)
    }

    fn variable_names(&self) -> Vec<String> {
        self.grid.variable_names()
    }

    fn read_series(
        &self,
        name: &str,
        time: Range<usize>,
        lat: usize,
        lon: usize,
    ) -> Result<Vec<f64>> {
        self.check()?;
        self.grid.read_series(name, time, lat, lon)
    }

    fn read_value(&self, name: &str, time: usize, lat: usize, lon: usize) -> Result<f64> {
        self.check()?;
        self.grid.read_value(name, time, lat, lon)
    }
}

fn grid() -> MemoryGrid {
    let times = (0..4)
        .map(|i| Utc.timestamp_opt(T0 + i * 21_600, 0).unwrap())
        .collect();
    MemoryGrid::new(times, vec![41.0, 40.0], vec![-75.0, -74.0])
        .with_field("t2m", vec![300.0; 16])
        .unwrap()
}

fn engine(fault: Fault) -> (Arc<QueryEngine<CountingOpener>>, Arc<Tracker>) {
    let tracker = Arc::new(Tracker::default());
    let opener = CountingOpener {
        grid: Arc::new(grid()),
        tracker: Arc::clone(&tracker),
        fault,
    };
    let engine = QueryEngine::new(opener, QueryConfig::default()).unwrap();
    (Arc::new(engine), tracker)
}

#[test]
fn test_at_most_one_open_handle_under_concurrency() {
    let (engine, tracker) = engine(Fault::None);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..5 {
                    let result = engine
                        .query_point(T0, T0 + 86_400, 40.2, -74.1, "temperature")
                        .unwrap();
                    assert_eq!(result.metadata.count, 4);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(tracker.max_open.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.opened.load(Ordering::SeqCst), 40);
    assert_eq!(tracker.closed.load(Ordering::SeqCst), 40);
}

#[test]
fn test_rejected_queries_never_open_the_dataset() {
    let (engine, tracker) = engine(Fault::None);

    let err = engine
        .query_point(T0 + 100, T0, 40.0, -74.0, "temperature")
        .unwrap_err();
    assert!(matches!(err, QueryError::Rejected(Rejection::StartNotBeforeEnd)));

    let err = engine.query_point(T0, T0 + 100, 40.0, -74.0, "snow").unwrap_err();
    assert!(matches!(err, QueryError::Rejected(Rejection::InvalidType)));

    assert_eq!(tracker.opened.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_reads_release_exactly_once() {
    let (engine, tracker) = engine(Fault::FailReads);

    let result = engine
        .query_point(T0, T0 + 86_400, 40.0, -74.0, "temperature")
        .unwrap();
    assert_eq!(result.metadata.count, 4);
    assert!(result.data.iter().all(|p| p.value.is_missing()));

    assert_eq!(tracker.opened.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_open_failure_is_service_error_and_frees_lock() {
    let (engine, _tracker) = engine(Fault::FailOpen);

    for _ in 0..2 {
        let err = engine
            .query_point(T0, T0 + 86_400, 40.0, -74.0, "temperature")
            .unwrap_err();
        assert!(matches!(err, QueryError::DatasetUnavailable(_)));
        assert_eq!(err.http_status_code(), 500);
    }
}

#[test]
fn test_panic_during_extraction_releases_and_recovers() {
    let (engine, tracker) = engine(Fault::PanicOnRead);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        engine.query_point(T0, T0 + 86_400, 40.0, -74.0, "temperature")
    }));
    assert!(outcome.is_err());
    assert_eq!(tracker.opened.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.closed.load(Ordering::SeqCst), 1);

    // The poisoned access lock does not wedge later queries; a query that
    // never reads still goes through.
    let result = engine
        .query_point(T0 - 200, T0 - 100, 40.0, -74.0, "temperature")
        .unwrap();
    assert_eq!(result.metadata.count, 0);
    assert_eq!(tracker.closed.load(Ordering::SeqCst), 2);
}

#[test]
fn test_malformed_axis_fails_after_acquire_and_releases() {
    let tracker = Arc::new(Tracker::default());
    let times = vec![Utc.timestamp_opt(T0, 0).unwrap()];
    let opener = CountingOpener {
        grid: Arc::new(MemoryGrid::new(times, vec![f64::NAN], vec![-74.0])),
        tracker: Arc::clone(&tracker),
        fault: Fault::None,
    };
    let engine = QueryEngine::new(opener, QueryConfig::default()).unwrap();

    let err = engine
        .query_point(T0, T0 + 10, 40.0, -74.0, "temperature")
        .unwrap_err();
    assert!(matches!(err, QueryError::DatasetUnavailable(_)));
    assert_eq!(tracker.opened.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_metadata_is_computed_once() {
    let (engine, tracker) = engine(Fault::None);

    let first = engine.metadata().unwrap().clone();
    let second = engine.metadata().unwrap();
    assert_eq!(&first, second);
    assert_eq!(first.variables, vec!["t2m".to_string()]);
    assert_eq!(first.dimensions.time, 4);
    assert_eq!(tracker.opened.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.open_now.load(Ordering::SeqCst), 0);
}

#[test]
fn test_metadata_failure_is_retried_on_next_call() {
    let (engine, _tracker) = engine(Fault::FailOpen);

    assert!(engine.metadata().is_err());
    assert!(engine.manager().cached_metadata().is_none());
    assert!(engine.warm_up().is_err());
}
