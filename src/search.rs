//! Parallel frame search.
//!
//! The frame range is cut into `W` equal contiguous slices, one per worker,
//! and whatever does not divide evenly is scanned on the calling thread.
//! Every slice re-walks the generator from boot to its own first frame, so
//! workers share nothing but the result set.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::evaluate::{FrameEvaluator, RawCorruption};

/// Status when a search completes without hits.
pub const NO_RESULTS_MESSAGE: &str = "No corruptions could be computed (add more RNG frames)";

/// Input field names, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RngFrameMin,
    RngFrameMax,
    TrainerId,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::RngFrameMin => "RNG Frame Min",
            Field::RngFrameMax => "RNG Frame Max",
            Field::TrainerId => "Trainer ID",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A field was left unset
    Missing(Field),
    /// `min > max`
    InvertedRange { min: u32, max: u32 },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::Missing(field) => write!(f, "{} is invalid", field),
            ParamError::InvertedRange { .. } => {
                write!(f, "{} must not exceed {}", Field::RngFrameMin, Field::RngFrameMax)
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// Validated search input. `rng_frame_min <= rng_frame_max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParameters {
    rng_frame_min: u32,
    rng_frame_max: u32,
    trainer_id: u16,
}

impl SearchParameters {
    pub fn new(rng_frame_min: u32, rng_frame_max: u32, trainer_id: u16) -> Result<Self, ParamError> {
        if rng_frame_min > rng_frame_max {
            return Err(ParamError::InvertedRange {
                min: rng_frame_min,
                max: rng_frame_max,
            });
        }
        Ok(Self {
            rng_frame_min,
            rng_frame_max,
            trainer_id,
        })
    }

    /// Build from possibly unset fields, reporting the first missing one
    /// (min, max, trainer ID).
    pub fn collect(
        rng_frame_min: Option<u32>,
        rng_frame_max: Option<u32>,
        trainer_id: Option<u16>,
    ) -> Result<Self, ParamError> {
        let min = rng_frame_min.ok_or(ParamError::Missing(Field::RngFrameMin))?;
        let max = rng_frame_max.ok_or(ParamError::Missing(Field::RngFrameMax))?;
        let tid = trainer_id.ok_or(ParamError::Missing(Field::TrainerId))?;
        Self::new(min, max, tid)
    }

    pub fn rng_frame_min(&self) -> u32 {
        self.rng_frame_min
    }

    pub fn rng_frame_max(&self) -> u32 {
        self.rng_frame_max
    }

    pub fn trainer_id(&self) -> u16 {
        self.trainer_id
    }

    /// Number of frames in the inclusive range.
    pub fn frame_count(&self) -> u64 {
        self.rng_frame_max as u64 - self.rng_frame_min as u64 + 1
    }
}

/// How many worker threads to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerCount {
    /// Three quarters of the logical cores, at least one
    #[default]
    Auto,
    Fixed(usize),
}

impl WorkerCount {
    pub fn resolve(&self) -> usize {
        match *self {
            WorkerCount::Auto => {
                let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
                (cores * 3 / 4).max(1)
            }
            WorkerCount::Fixed(n) => n.max(1),
        }
    }
}

/// Run-time knobs for a search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub workers: WorkerCount,
    pub show_progress: bool,
}

/// Inclusive frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
}

impl FrameRange {
    pub fn len(&self) -> u64 {
        self.end as u64 - self.start as u64 + 1
    }

    /// Inclusive ranges always hold at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Worker slices plus the leftover tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub workers: Vec<FrameRange>,
    pub remainder: Option<FrameRange>,
}

impl Partition {
    /// All ranges, workers first.
    pub fn ranges(&self) -> impl Iterator<Item = FrameRange> + '_ {
        self.workers.iter().copied().chain(self.remainder)
    }
}

/// Split `min..=max` across `workers` slices of `total / workers` frames.
///
/// No worker slices are produced when the range is shorter than the worker
/// count; the remainder then covers everything.
pub fn partition(min: u32, max: u32, workers: usize) -> Partition {
    debug_assert!(min <= max);
    let workers = workers.max(1) as u64;
    let total = max as u64 - min as u64 + 1;
    let per_worker = total / workers;

    let mut slices = Vec::new();
    if per_worker > 0 {
        for i in 0..workers {
            let start = min as u64 + i * per_worker;
            let end = start + per_worker - 1;
            slices.push(FrameRange {
                start: start as u32,
                end: end as u32,
            });
        }
    }

    let tail = min as u64 + workers * per_worker;
    let remainder = (tail <= max as u64).then(|| FrameRange {
        start: tail as u32,
        end: max,
    });

    Partition {
        workers: slices,
        remainder,
    }
}

/// Append-only result set shared by all workers.
#[derive(Debug, Default)]
pub struct CorruptionSet {
    inner: Mutex<Vec<RawCorruption>>,
}

impl CorruptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, corruption: RawCorruption) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(corruption);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<RawCorruption> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of one search. Candidates are in no particular order.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub candidates: Vec<RawCorruption>,
    pub frames_scanned: u64,
    pub workers: usize,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Status line when nothing was found.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_RESULTS_MESSAGE)
    }
}

/// Scan every frame of `params` and collect the corruptions.
///
/// Blocks until every worker and the remainder have finished.
pub fn search(params: &SearchParameters, options: &SearchOptions) -> Result<SearchReport> {
    let start_time = Instant::now();
    let workers = options.workers.resolve();
    let plan = partition(params.rng_frame_min(), params.rng_frame_max(), workers);
    let evaluator = FrameEvaluator::new(params.trainer_id());
    let results = CorruptionSet::new();

    info!(
        min = params.rng_frame_min(),
        max = params.rng_frame_max(),
        trainer_id = params.trainer_id(),
        workers,
        "searching frames"
    );

    let pb = if options.show_progress {
        let pb = ProgressBar::new(params.frame_count());
        pb.set_style(crate::default_progress_style());
        Some(pb)
    } else {
        None
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("frame-worker-{}", i))
        .build()?;

    pool.in_place_scope(|scope| {
        for (worker, range) in plan.workers.iter().copied().enumerate() {
            let results = &results;
            let progress = pb.as_ref();
            scope.spawn(move |_| {
                debug!(worker, start = range.start, end = range.end, "worker started");
                let hits = evaluator.scan(range.start, range.end, progress, |c| results.push(c));
                debug!(worker, hits, "worker finished");
            });
        }

        if let Some(range) = plan.remainder {
            debug!(start = range.start, end = range.end, "scanning remainder on caller");
            evaluator.scan(range.start, range.end, pb.as_ref(), |c| results.push(c));
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let candidates = results.into_vec();
    let elapsed = start_time.elapsed();
    info!(found = candidates.len(), elapsed_ms = elapsed.as_millis() as u64, "search finished");

    Ok(SearchReport {
        candidates,
        frames_scanned: params.frame_count(),
        workers,
        elapsed,
    })
}
