use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, DEFAULT_COMPARE_LIMIT};
use crate::ranking::{Comparable, ComparisonRanker, Metric};
use crate::types::OfferId;

/// result of trying to add a record to the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOutcome {
    Added,
    AlreadySelected,
    /// toggled off
    Removed,
    /// selection is full; nothing changed
    Rejected,
}

/// records picked for side-by-side comparison, in pick order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSelection {
    ids: Vec<OfferId>,
    limit: usize,
}

impl ComparisonSelection {
    pub fn new(limit: usize) -> Self {
        Self {
            ids: Vec::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.compare_limit)
    }

    pub fn add(&mut self, id: OfferId) -> SelectionOutcome {
        if self.contains(id) {
            SelectionOutcome::AlreadySelected
        } else if self.is_full() {
            SelectionOutcome::Rejected
        } else {
            self.ids.push(id);
            SelectionOutcome::Added
        }
    }

    /// returns whether the id was selected
    pub fn remove(&mut self, id: OfferId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| *selected != id);
        self.ids.len() != before
    }

    /// add when absent, remove when present
    pub fn toggle(&mut self, id: OfferId) -> SelectionOutcome {
        if self.remove(id) {
            SelectionOutcome::Removed
        } else {
            self.add(id)
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: OfferId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn ids(&self) -> &[OfferId] {
        &self.ids
    }

    /// selected records, in selection order
    pub fn resolve<'r, T: Comparable>(&self, records: &'r [T]) -> Vec<&'r T> {
        self.ids
            .iter()
            .filter_map(|id| records.iter().find(|r| r.record_id() == *id))
            .collect()
    }
}

impl Default for ComparisonSelection {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARE_LIMIT)
    }
}

/// winner of a single metric in the comparison modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricWinner {
    pub metric: Metric,
    pub winner: Option<OfferId>,
}

/// per-metric winners among the selected records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub selected: Vec<OfferId>,
    pub winners: Vec<MetricWinner>,
}

impl ComparisonReport {
    pub fn build<T: Comparable>(
        ranker: &ComparisonRanker,
        selection: &ComparisonSelection,
        records: &[T],
        metrics: &[Metric],
    ) -> Self {
        let chosen = selection.resolve(records);
        let winners = metrics
            .iter()
            .map(|&metric| MetricWinner {
                metric,
                winner: ranker.winner(chosen.iter().copied(), metric),
            })
            .collect();

        Self {
            selected: chosen.iter().map(|r| r.record_id()).collect(),
            winners,
        }
    }

    pub fn winner_for(&self, metric: Metric) -> Option<OfferId> {
        self.winners
            .iter()
            .find(|w| w.metric == metric)
            .and_then(|w| w.winner)
    }

    /// metrics the record wins, for badge rendering
    pub fn wins_of(&self, id: OfferId) -> Vec<Metric> {
        self.winners
            .iter()
            .filter(|w| w.winner == Some(id))
            .map(|w| w.metric)
            .collect()
    }
}
