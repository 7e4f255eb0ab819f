//! mailcorrupt - RNG frame search for the Emerald mail corruption setup.
//!
//! Finds the frames at which the starter's PID and IVs let three typed mail
//! words overwrite its species with a grab species while leaving the box
//! checksum intact.

pub mod benchmark;
pub mod easy_chat;
pub mod evaluate;
pub mod format;
pub mod lcg;
pub mod output;
pub mod search;
pub mod session;
pub mod species;
pub mod substructure;

pub use evaluate::{FrameEvaluator, RawCorruption};
pub use format::{DisplayRow, FrameReport};
pub use search::{search, SearchOptions, SearchParameters, SearchReport, WorkerCount};
pub use session::Session;

/// Default progress bar style for CLI operations.
pub fn default_progress_style() -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
        .progress_chars("#>-")
}
