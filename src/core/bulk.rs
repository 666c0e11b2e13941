//! Per-record outcomes of bulk operations.
//!
//! Bulk operations never stop at the first failure; each selected id gets
//! its own outcome and the caller decides how to surface them.

use crate::models::DriverId;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Deleted,
    Exported(PathBuf),
    /// The id is no longer in the roster; nothing was done.
    Missing,
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Deleted | Outcome::Exported(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub action: BulkAction,
    pub outcomes: Vec<(DriverId, Outcome)>,
}

impl BulkReport {
    pub fn new(action: BulkAction) -> Self {
        Self {
            action,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, id: DriverId, outcome: Outcome) {
        self.outcomes.push((id, outcome));
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn missing(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Missing))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&DriverId, &str)> {
        self.outcomes.iter().filter_map(|(id, o)| match o {
            Outcome::Failed(reason) => Some((id, reason.as_str())),
            _ => None,
        })
    }

    pub fn outcome(&self, id: &DriverId) -> Option<&Outcome> {
        self.outcomes.iter().find(|(i, _)| i == id).map(|(_, o)| o)
    }

    /// True when nothing failed. Missing ids do not count as failures.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl fmt::Display for BulkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            BulkAction::Delete => "Удалено",
            BulkAction::Export => "Экспортировано",
        };
        write!(f, "{verb} {} из {}", self.succeeded(), self.total())
    }
}
