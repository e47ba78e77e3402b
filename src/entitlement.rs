//! Redemption codes, access tiers and the free-trial window
//!
//! Everything here is a pure function of its inputs; callers own the state and
//! decide what to persist.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Length of the free trial.
pub const TRIAL_WINDOW: Duration = Duration::days(7);

/// Marker that promotes a valid code to the gold tier.
pub const DEFAULT_GOLD_MARKER: &str = "GOLD";

const TRIAL_START_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntitlementError {
    #[error("Invalid code")]
    InvalidCode,

    #[error("Trial already started on {started_at}")]
    TrialAlreadyStarted { started_at: String },

    #[error("Unreadable trial start '{0}'")]
    InvalidTrialStart(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Silver,
    Gold,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Free => "FREE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Allow-list of redemption codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBook {
    codes: HashSet<String>,
    gold_marker: String,
}

impl CodeBook {
    pub fn new<I, S>(codes: I, gold_marker: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            gold_marker: gold_marker.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Exact, case-sensitive lookup. Redeeming the same code again yields the same tier.
    pub fn redeem(&self, code: &str) -> Result<Tier, EntitlementError> {
        if !self.codes.contains(code) {
            return Err(EntitlementError::InvalidCode);
        }

        if !self.gold_marker.is_empty() && code.contains(&self.gold_marker) {
            Ok(Tier::Gold)
        } else {
            Ok(Tier::Silver)
        }
    }
}

/// Moment the free trial was started. Never cleared once written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialRecord {
    started_at: OffsetDateTime,
}

impl TrialRecord {
    pub fn new(started_at: OffsetDateTime) -> Self {
        Self {
            started_at: started_at.to_offset(UtcOffset::UTC),
        }
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    /// ISO-8601 UTC with millisecond precision, e.g. `2025-01-01T12:00:00.000Z`.
    pub fn encode(&self) -> String {
        self.started_at
            .format(TRIAL_START_FORMAT)
            .unwrap_or_else(|_| self.started_at.unix_timestamp().to_string())
    }

    pub fn decode(raw: &str) -> Result<Self, EntitlementError> {
        OffsetDateTime::parse(raw.trim(), &Rfc3339)
            .map(Self::new)
            .map_err(|_| EntitlementError::InvalidTrialStart(raw.to_string()))
    }

    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        now - self.started_at <= TRIAL_WINDOW
    }
}

/// Begin a trial at `now`, unless one was already started.
pub fn start_trial(
    existing: Option<&TrialRecord>,
    now: OffsetDateTime,
) -> Result<TrialRecord, EntitlementError> {
    match existing {
        Some(record) => Err(EntitlementError::TrialAlreadyStarted {
            started_at: record.encode(),
        }),
        None => Ok(TrialRecord::new(now)),
    }
}

pub fn is_trial_active(record: Option<&TrialRecord>, now: OffsetDateTime) -> bool {
    record.is_some_and(|record| record.is_active(now))
}
