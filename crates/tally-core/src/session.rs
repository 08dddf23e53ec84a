//! Per-upload session state
//!
//! Each upload rebuilds everything from the new bytes. A failed upload leaves
//! the session with no table, so views never show data from a previous file.

use tracing::{debug, info};

use crate::detect::detect_subscriptions;
use crate::error::Result;
use crate::import;
use crate::models::{MonthlySummary, NormalizedRow, NormalizedTable, SubscriptionCandidate, Totals};
use crate::normalize::Normalizer;
use crate::qa::{self, Answer};
use crate::reports;
use crate::settings::Settings;

/// One user's loaded file and the settings used to interpret it
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    normalizer: Normalizer,
    table: Option<NormalizedTable>,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self> {
        let normalizer = Normalizer::new(&settings)?;
        Ok(Self {
            settings,
            normalizer,
            table: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load and normalize a new file, replacing whatever was loaded before
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&NormalizedTable> {
        self.table = None;

        let raw = import::load(bytes, &self.settings.loader_options())?;
        let table = self.normalizer.normalize(&raw);
        info!("Loaded {} transactions", table.len());

        Ok(&*self.table.insert(table))
    }

    /// The current table, if an upload succeeded
    pub fn table(&self) -> Option<&NormalizedTable> {
        self.table.as_ref()
    }

    pub fn monthly_summary(&self) -> Option<MonthlySummary> {
        self.table.as_ref().map(reports::monthly_summary)
    }

    pub fn totals(&self) -> Option<Totals> {
        self.table.as_ref().map(reports::totals)
    }

    pub fn subscriptions(&self) -> Option<Vec<SubscriptionCandidate>> {
        self.table.as_ref().map(|t| {
            detect_subscriptions(t, self.settings.subscription_min_occurrences)
        })
    }

    /// Head preview using the configured row count
    pub fn preview(&self) -> Option<&[NormalizedRow]> {
        self.table
            .as_ref()
            .map(|t| reports::preview(t, self.settings.preview_rows))
    }

    /// Answer a question; with nothing loaded the answer is the fallback
    pub fn ask(&self, question: &str) -> Answer {
        match &self.table {
            Some(table) => qa::answer(table, question, &self.settings),
            None => {
                debug!("Question asked with no file loaded");
                Answer::fallback()
            }
        }
    }
}
