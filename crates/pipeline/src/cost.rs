//! Per-job cost accounting.
//!
//! One [`CostLedger`] is created per pipeline run and shared with every
//! stage task. Accumulation is monotone: totals only grow, and each `add`
//! pushes a fresh snapshot through the event sink so observers can stream
//! cost updates without polling.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::events::{EventSink, PipelineEvent};

/// Which stage a billed call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCategory {
    Backgrounds,
    Heroes,
}

/// Per-category cost totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub backgrounds: f64,
    pub heroes: f64,
}

/// Cumulative cost of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostInfo {
    pub total_cost: f64,
    pub api_calls: u32,
    pub breakdown: CostBreakdown,
}

/// Thread-safe cost accumulator for one run.
pub struct CostLedger {
    info: Mutex<CostInfo>,
    sink: Arc<dyn EventSink>,
}

impl CostLedger {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            info: Mutex::new(CostInfo::default()),
            sink,
        }
    }

    /// Record one billed call and emit the updated snapshot.
    pub fn add(&self, amount: f64, category: CostCategory) {
        let snapshot = {
            let mut info = self.info.lock().expect("cost ledger lock poisoned");
            info.total_cost += amount;
            info.api_calls += 1;
            match category {
                CostCategory::Backgrounds => info.breakdown.backgrounds += amount,
                CostCategory::Heroes => info.breakdown.heroes += amount,
            }
            *info
        };
        self.sink.emit(PipelineEvent::Cost(snapshot));
    }

    /// Current totals.
    pub fn snapshot(&self) -> CostInfo {
        *self.info.lock().expect("cost ledger lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;

    #[test]
    fn totals_accumulate_by_category() {
        let ledger = CostLedger::new(Arc::new(NullSink));

        ledger.add(0.25, CostCategory::Backgrounds);
        ledger.add(0.17, CostCategory::Heroes);
        ledger.add(0.17, CostCategory::Heroes);

        let info = ledger.snapshot();
        assert_eq!(info.api_calls, 3);
        assert!((info.total_cost - 0.59).abs() < 1e-9);
        assert!((info.breakdown.backgrounds - 0.25).abs() < 1e-9);
        assert!((info.breakdown.heroes - 0.34).abs() < 1e-9);
    }

    #[test]
    fn fresh_ledger_is_zero() {
        let ledger = CostLedger::new(Arc::new(NullSink));
        let info = ledger.snapshot();
        assert_eq!(info.api_calls, 0);
        assert_eq!(info.total_cost, 0.0);
    }

    #[test]
    fn add_emits_a_cost_snapshot() {
        struct Recorder(Mutex<Vec<CostInfo>>);
        impl EventSink for Recorder {
            fn emit(&self, event: PipelineEvent) {
                if let PipelineEvent::Cost(info) = event {
                    self.0.lock().unwrap().push(info);
                }
            }
        }

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let ledger = CostLedger::new(recorder.clone());

        ledger.add(0.04, CostCategory::Backgrounds);
        ledger.add(0.04, CostCategory::Backgrounds);

        let snapshots = recorder.0.lock().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].api_calls, 2);
        assert!(snapshots[1].total_cost > snapshots[0].total_cost);
    }
}
