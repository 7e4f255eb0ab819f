//! Input/compute/reset cycle behind an interactive front end.
//!
//! A session holds the three optional inputs, the last computed rows and the
//! last status line. Invalid input leaves previous rows in place.

use tracing::warn;

use crate::easy_chat::EasyChatCatalogue;
use crate::format::{computed_message, format_corruptions, DisplayRow};
use crate::search::{search, SearchOptions, SearchParameters, NO_RESULTS_MESSAGE};

pub const RESET_MESSAGE: &str = "Corruption computations reset";

#[derive(Debug, Default)]
pub struct Session {
    rng_frame_min: Option<u32>,
    rng_frame_max: Option<u32>,
    trainer_id: Option<u16>,
    options: SearchOptions,
    rows: Vec<DisplayRow>,
    message: String,
}

impl Session {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn set_rng_frame_min(&mut self, value: Option<u32>) {
        self.rng_frame_min = value;
    }

    pub fn set_rng_frame_max(&mut self, value: Option<u32>) {
        self.rng_frame_max = value;
    }

    pub fn set_trainer_id(&mut self, value: Option<u16>) {
        self.trainer_id = value;
    }

    /// Validate inputs, search, and replace the rows. Returns the status line.
    ///
    /// An empty result only changes the status line.
    pub fn compute(&mut self) -> &str {
        let params = match SearchParameters::collect(self.rng_frame_min, self.rng_frame_max, self.trainer_id) {
            Ok(p) => p,
            Err(e) => {
                self.message = e.to_string();
                return &self.message;
            }
        };

        let report = match search(&params, &self.options) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "search failed");
                self.message = e.to_string();
                return &self.message;
            }
        };

        self.message = match report.empty_message() {
            Some(msg) => msg.to_string(),
            None => {
                self.rows = format_corruptions(EasyChatCatalogue::emerald(), report.candidates);
                computed_message(self.rows.len())
            }
        };
        &self.message
    }

    /// Drop all rows. Inputs are kept.
    pub fn reset(&mut self) -> &str {
        self.rows.clear();
        self.message = RESET_MESSAGE.to_string();
        &self.message
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_no_results(&self) -> bool {
        self.message == NO_RESULTS_MESSAGE
    }
}
