//! # Autosave Scheduler
//!
//! Debounce and coalescing for page saves, as an explicit state machine:
//!
//! ```text
//!            schedule                 deadline passed (poll)
//!   Idle ─────────────→ Pending ───────────────────────────→ Saving
//!    ↑                  ↑  │ schedule: deadline reset           │  │
//!    │                  │  └──┘                        schedule │  │ complete
//!    │                  │                                       ↓  │
//!    │                  └──────── complete ──── SavingAndPending   │
//!    └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler holds only the latest snapshot, so intermediate states that
//! were superseded before their save started are never sent. It performs no
//! I/O and reads no clock: the caller passes `now` and runs the save itself.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveState {
    Idle,
    Pending { deadline: Instant },
    Saving,
    /// An edit arrived while a save was in flight
    SavingAndPending { deadline: Instant },
}

#[derive(Debug)]
pub struct AutosaveScheduler<T> {
    quiet_period: Duration,
    state: AutosaveState,

    /// Latest snapshot not yet handed out for saving
    latest: Option<T>,

    /// Snapshot being written, kept so a failure can hand it back
    in_flight: Option<T>,
}

impl<T: Clone> AutosaveScheduler<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            state: AutosaveState::Idle,
            latest: None,
            in_flight: None,
        }
    }

    pub fn state(&self) -> AutosaveState {
        self.state
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a new snapshot and restart the quiet period
    pub fn schedule(&mut self, snapshot: T, now: Instant) {
        let deadline = now + self.quiet_period;
        self.latest = Some(snapshot);
        self.state = match self.state {
            AutosaveState::Idle | AutosaveState::Pending { .. } => {
                AutosaveState::Pending { deadline }
            }
            AutosaveState::Saving | AutosaveState::SavingAndPending { .. } => {
                AutosaveState::SavingAndPending { deadline }
            }
        };
    }

    /// Make the held snapshot due immediately. A save in flight still has to
    /// finish first. Returns false when there is nothing to save.
    pub fn flush_now(&mut self, now: Instant) -> bool {
        if self.latest.is_none() {
            return false;
        }

        self.state = match self.state {
            AutosaveState::Idle | AutosaveState::Pending { .. } => {
                AutosaveState::Pending { deadline: now }
            }
            AutosaveState::Saving | AutosaveState::SavingAndPending { .. } => {
                AutosaveState::SavingAndPending { deadline: now }
            }
        };
        true
    }

    /// Hand out the snapshot to save if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.state {
            AutosaveState::Pending { deadline } if deadline <= now => {
                let snapshot = self.latest.take()?;
                self.in_flight = Some(snapshot.clone());
                self.state = AutosaveState::Saving;
                Some(snapshot)
            }
            _ => None,
        }
    }

    /// The in-flight save succeeded
    pub fn complete(&mut self) {
        self.in_flight = None;
        self.state = match self.state {
            AutosaveState::SavingAndPending { deadline } => AutosaveState::Pending { deadline },
            _ => AutosaveState::Idle,
        };
    }

    /// The in-flight save failed. A newer edit keeps its own deadline;
    /// otherwise the failed snapshot is held for a manual retry and nothing
    /// is rescheduled.
    pub fn fail(&mut self) {
        let failed = self.in_flight.take();
        self.state = match self.state {
            AutosaveState::SavingAndPending { deadline } => AutosaveState::Pending { deadline },
            _ => {
                if self.latest.is_none() {
                    self.latest = failed;
                }
                AutosaveState::Idle
            }
        };
    }

    /// When the host should poll next
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            AutosaveState::Pending { deadline } | AutosaveState::SavingAndPending { deadline } => {
                Some(deadline)
            }
            _ => None,
        }
    }

    /// A snapshot is waiting that has not been handed out
    pub fn has_unsaved(&self) -> bool {
        self.latest.is_some()
    }

    pub fn is_saving(&self) -> bool {
        matches!(
            self.state,
            AutosaveState::Saving | AutosaveState::SavingAndPending { .. }
        )
    }

    /// Drop everything (page switch after a successful flush)
    pub fn reset(&mut self) {
        self.state = AutosaveState::Idle;
        self.latest = None;
        self.in_flight = None;
    }
}
