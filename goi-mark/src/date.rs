// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::fmt;

/// A wall-clock calendar date. The engine is not in the business of
/// validating calendars (`spec.md` §1 treats time sourcing as the caller's
/// concern); this is deliberately a plain, `Ord`-derived tuple so date
/// comparisons (`spec.md` §4.2's monotonicity requirement) fall out of
/// `derive(PartialOrd, Ord)` for free.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl MarkDate {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for MarkDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_chronologically() {
        assert!(MarkDate::new(2024, 1, 1) < MarkDate::new(2024, 1, 2));
        assert!(MarkDate::new(2024, 1, 31) < MarkDate::new(2024, 2, 1));
        assert!(MarkDate::new(2024, 12, 31) < MarkDate::new(2025, 1, 1));
    }
}
