//! Per-month cash-flow schedule
//!
//! The schedule is a read-only input to the engine: each month may carry a
//! contribution, a withdrawal and a reinvestment toggle. Months without an
//! entry default to no flows with full reinvestment.

use crate::rates::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cash-flow decisions for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEvent {
    /// Amount added after the month's return is applied.
    pub contribution: f64,

    /// Amount removed after growth and after the contribution.
    pub withdrawal: f64,

    /// When false, the month's net gain is distributed out instead of
    /// compounded into next month's principal.
    pub reinvest: bool,
}

impl CashFlowEvent {
    pub fn contribution(amount: f64) -> Self {
        Self {
            contribution: amount,
            ..Self::default()
        }
    }

    pub fn withdrawal(amount: f64) -> Self {
        Self {
            withdrawal: amount,
            ..Self::default()
        }
    }

    pub fn with_reinvest(mut self, reinvest: bool) -> Self {
        self.reinvest = reinvest;
        self
    }

    /// True when the month carries no flows and fully reinvests.
    pub fn is_passive(&self) -> bool {
        self.contribution == 0.0 && self.withdrawal == 0.0 && self.reinvest
    }
}

impl Default for CashFlowEvent {
    fn default() -> Self {
        Self {
            contribution: 0.0,
            withdrawal: 0.0,
            reinvest: true,
        }
    }
}

/// Month-keyed schedule of cash-flow events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    events: BTreeMap<Month, CashFlowEvent>,
}

impl CashFlowSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same event applied every month for `months` months starting at `start`.
    /// This is the shape the original product form produces: one flat monthly
    /// contribution/withdrawal over the whole horizon.
    pub fn flat(start: Month, months: u32, event: CashFlowEvent) -> Self {
        let mut schedule = Self::new();
        let mut month = start;
        for _ in 0..months {
            schedule.set(month, event);
            month = month.succ();
        }
        schedule
    }

    pub fn set(&mut self, month: Month, event: CashFlowEvent) {
        self.events.insert(month, event);
    }

    /// Event for the month; absent months are passive (no flows, reinvest).
    pub fn event_for(&self, month: Month) -> CashFlowEvent {
        self.events.get(&month).copied().unwrap_or_default()
    }

    /// Last month with a scheduled event, if any.
    pub fn last_month(&self) -> Option<Month> {
        self.events.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, CashFlowEvent)> + '_ {
        self.events.iter().map(|(&month, &event)| (month, event))
    }
}
