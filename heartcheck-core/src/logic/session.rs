//! Session Context - state owned by one logged-in user
//!
//! Replaces process-wide globals: each session carries its own history
//! and last prediction, and is dropped when the session ends.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::logic::features::FeatureVector;
use crate::logic::history::{HistoryEntry, HistoryLog};
use crate::logic::model::PredictionResult;
use crate::logic::report::{self, ReportError};

/// Most recent prediction, kept for report downloads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastPrediction {
    pub features: FeatureVector,
    pub result: PredictionResult,
    pub at: NaiveDateTime,
}

#[derive(Debug)]
pub struct SessionContext {
    username: String,
    started_at: DateTime<Utc>,
    history: HistoryLog,
    last_prediction: Option<LastPrediction>,
}

impl SessionContext {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            started_at: Utc::now(),
            history: HistoryLog::new(),
            last_prediction: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn last_prediction(&self) -> Option<&LastPrediction> {
        self.last_prediction.as_ref()
    }

    /// Record a prediction made now
    pub fn record_prediction(&mut self, features: FeatureVector, result: PredictionResult) {
        self.record_prediction_at(features, result, Local::now().naive_local());
    }

    /// Record a prediction made at `at`: appends to history and becomes
    /// the report subject
    pub fn record_prediction_at(
        &mut self,
        features: FeatureVector,
        result: PredictionResult,
        at: NaiveDateTime,
    ) {
        self.history.record(HistoryEntry::from_prediction(at, &features, &result));
        self.last_prediction = Some(LastPrediction { features, result, at });
    }

    /// PDF report for the last prediction, if any
    pub fn report(&self) -> Option<Result<Vec<u8>, ReportError>> {
        self.last_prediction.as_ref().map(|last| {
            report::render(
                &last.features.to_report_fields(),
                last.result.label,
                last.result.confidence,
            )
        })
    }

    pub fn export_history_csv(&self) -> Vec<u8> {
        self.history.export_csv()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
