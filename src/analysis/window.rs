//! Inclusive calendar-date windows.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive `[from, to]` range of calendar days.
///
/// Either bound may be absent, which means no selection has been made yet.
/// An unset or partial window matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// A fully specified window.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// The "nothing selected" window.
    pub fn unset() -> Self {
        Self::default()
    }

    /// The window `[today - days, today]`.
    ///
    /// Saturates at the earliest representable date.
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self::between(from, today)
    }

    /// Pick the window for a run.
    ///
    /// Explicit bounds win (even a single one, which leaves the window
    /// partial), then a `last_days` preset, then the configured default.
    /// With none of these the window stays unset.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        last_days: Option<u32>,
        default_days: Option<u32>,
        today: NaiveDate,
    ) -> Self {
        if from.is_some() || to.is_some() {
            return Self::new(from, to);
        }

        match last_days.or(default_days) {
            Some(days) => Self::last_days(days, today),
            None => Self::unset(),
        }
    }

    /// Returns the bounds if both are present.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    /// Returns true if both bounds are present.
    pub fn is_set(&self) -> bool {
        self.bounds().is_some()
    }

    /// Returns true if both bounds are present and `from > to`.
    pub fn is_inverted(&self) -> bool {
        matches!(self.bounds(), Some((from, to)) if from > to)
    }

    /// Returns true if `day` falls inside the window, bounds included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        match self.bounds() {
            Some((from, to)) => from <= day && day <= to,
            None => false,
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "{} to {}", from, to),
            (Some(from), None) => write!(f, "from {} (end not selected)", from),
            (None, Some(to)) => write!(f, "until {} (start not selected)", to),
            (None, None) => write!(f, "not selected"),
        }
    }
}
