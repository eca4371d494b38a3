//! # Event Log
//!
//! Every successful state change leaves an [`EventRecord`] behind. The log
//! is append-only and sequence numbers are assigned in emission order, so
//! an auditor replaying `events_since(n)` sees exactly what happened, in
//! the order it happened.

use bastion_protocol::{Amount, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An observable state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEvent {
    /// Units moved. `from: None` is a mint, `to: None` is a burn.
    Transfer {
        from: Option<Principal>,
        to: Option<Principal>,
        amount: Amount,
    },
    /// An allowance was set.
    Approval {
        owner: Principal,
        spender: Principal,
        amount: Amount,
    },
    /// Balance mutations halted.
    Paused { by: Principal },
    /// Balance mutations resumed.
    Unpaused { by: Principal },
    /// Control changed hands. `new_owner: None` means renounced.
    OwnershipTransferred {
        previous_owner: Option<Principal>,
        new_owner: Option<Principal>,
    },
    /// A principal was added to the deny-list.
    Blacklisted { account: Principal },
    /// A principal was removed from the deny-list.
    Unblacklisted { account: Principal },
    /// The allow-list was replaced. Carries the full new snapshot.
    WhitelistUpdated { accounts: Vec<Principal> },
}

impl TokenEvent {
    /// Short name of the event kind, for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "transfer",
            TokenEvent::Approval { .. } => "approval",
            TokenEvent::Paused { .. } => "paused",
            TokenEvent::Unpaused { .. } => "unpaused",
            TokenEvent::OwnershipTransferred { .. } => "ownership_transferred",
            TokenEvent::Blacklisted { .. } => "blacklisted",
            TokenEvent::Unblacklisted { .. } => "unblacklisted",
            TokenEvent::WhitelistUpdated { .. } => "whitelist_updated",
        }
    }
}

/// A logged event with its position and wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub event: TokenEvent,
}

/// Append-only event log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and returns its sequence number.
    pub fn record(&mut self, event: TokenEvent) -> u64 {
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord {
            sequence,
            timestamp: Utc::now(),
            event,
        });
        sequence
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `sequence >= since`.
    pub fn since(&self, since: u64) -> &[EventRecord] {
        let start = usize::try_from(since)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// Number of records in the log.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }
}
