//! Per-symbol outcomes and the run report

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolOutcome {
    /// New events were written
    Recorded { events: usize },
    /// Scan found nothing not already stored
    UpToDate,
    /// Prices could not be read; retried on the next run
    Skipped { reason: String },
    /// A batch write failed; `written` events were committed before it
    Failed { written: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    #[serde(flatten)]
    pub outcome: SymbolOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub reports: Vec<SymbolReport>,
}

impl RunSummary {
    pub fn push(&mut self, symbol: &str, outcome: SymbolOutcome) {
        self.reports.push(SymbolReport {
            symbol: symbol.to_string(),
            outcome,
        });
    }

    /// Symbols whose scan completed (with or without new events)
    pub fn processed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    SymbolOutcome::Recorded { .. } | SymbolOutcome::UpToDate
                )
            })
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, SymbolOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_symbols(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, SymbolOutcome::Failed { .. }))
            .map(|r| r.symbol.as_str())
            .collect()
    }

    /// New events durably written, including partial writes of failed symbols
    pub fn total_new_events(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                SymbolOutcome::Recorded { events } => events,
                SymbolOutcome::Failed { written, .. } => written,
                _ => 0,
            })
            .sum()
    }

    pub fn outcome_for(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.reports
            .iter()
            .find(|r| r.symbol == symbol)
            .map(|r| &r.outcome)
    }

    pub fn is_complete(&self) -> bool {
        self.failed_symbols().is_empty()
    }
}
