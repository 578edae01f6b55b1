//! Status classification for compliance records.
//!
//! Every screen derives its badge from [`evaluate`]; nothing stores the
//! result. All dates are UTC calendar dates, and the caller supplies the
//! reference date so the function never reads the clock.

use super::domain::DocumentCategory;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Four-way classification shared by every category.
///
/// Spot checks use scheduling vocabulary for the same variants; see
/// [`ComplianceStatus::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    #[serde(alias = "not_scheduled")]
    Missing,
    #[serde(alias = "overdue")]
    Expired,
    #[serde(alias = "due_soon")]
    ExpiringSoon,
    #[serde(alias = "scheduled")]
    Active,
}

impl ComplianceStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Expired, Self::ExpiringSoon, Self::Missing, Self::Active]
    }

    pub const fn label(self, category: DocumentCategory) -> &'static str {
        if category.is_scheduling() {
            match self {
                Self::Missing => "Not Scheduled",
                Self::Expired => "Overdue",
                Self::ExpiringSoon => "Due Soon",
                Self::Active => "Scheduled",
            }
        } else {
            match self {
                Self::Missing => "Missing",
                Self::Expired => "Expired",
                Self::ExpiringSoon => "Expiring Soon",
                Self::Active => "Active",
            }
        }
    }

    pub const fn badge(self) -> BadgeTone {
        match self {
            Self::Missing => BadgeTone::Gray,
            Self::Expired => BadgeTone::Red,
            Self::ExpiringSoon => BadgeTone::Amber,
            Self::Active => BadgeTone::Green,
        }
    }

    /// Lower is more urgent.
    pub const fn urgency_rank(self) -> u8 {
        match self {
            Self::Expired => 0,
            Self::ExpiringSoon => 1,
            Self::Missing => 2,
            Self::Active => 3,
        }
    }

    /// Whether the record needs someone's attention on the list screen.
    pub const fn needs_attention(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Badge colour selected by the list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Gray,
    Red,
    Amber,
    Green,
}

impl BadgeTone {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Green => "green",
        }
    }
}

/// Signed number of days from `reference_date` to `relevant_date`.
/// Negative once the relevant date has passed.
pub fn days_until(relevant_date: NaiveDate, reference_date: NaiveDate) -> i64 {
    relevant_date
        .signed_duration_since(reference_date)
        .num_days()
}

/// Classify a record from its relevant date and the company threshold.
///
/// A threshold of zero disables the warning window entirely, including on the
/// relevant day itself.
pub fn evaluate(
    relevant_date: Option<NaiveDate>,
    threshold_days: u32,
    reference_date: NaiveDate,
) -> ComplianceStatus {
    let Some(relevant_date) = relevant_date else {
        return ComplianceStatus::Missing;
    };

    if reference_date > relevant_date {
        return ComplianceStatus::Expired;
    }

    let diff_days = days_until(relevant_date, reference_date);
    if threshold_days > 0 && diff_days <= i64::from(threshold_days) {
        ComplianceStatus::ExpiringSoon
    } else {
        ComplianceStatus::Active
    }
}

/// [`evaluate`] over timestamps; only the UTC calendar day of each is used.
pub fn evaluate_at(
    relevant_at: Option<DateTime<Utc>>,
    threshold_days: u32,
    reference_at: DateTime<Utc>,
) -> ComplianceStatus {
    evaluate(
        relevant_at.map(|at| at.date_naive()),
        threshold_days,
        reference_at.date_naive(),
    )
}

/// [`evaluate`] over naive timestamps already expressed in UTC.
pub fn evaluate_naive(
    relevant_at: Option<NaiveDateTime>,
    threshold_days: u32,
    reference_at: NaiveDateTime,
) -> ComplianceStatus {
    evaluate(
        relevant_at.map(|at| at.date()),
        threshold_days,
        reference_at.date(),
    )
}

/// Today's UTC date. Only the outermost layers call this.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
