//! Month arithmetic and random stay windows.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// `None` unless `month` is in 1–12.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month, wrapping December into January of the next year.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    #[must_use]
    pub fn plus(self, months: u32) -> Self {
        (0..months).fold(self, |ym, _| ym.next())
    }

    #[must_use]
    pub fn days(self) -> u32 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            _ => 31,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// The month after the one containing `today`.
#[must_use]
pub fn anchor_month(today: NaiveDate) -> YearMonth {
    YearMonth::of(today).next()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StayLength {
    TwoNights,
    OneNight,
}

impl StayLength {
    #[must_use]
    pub fn nights(self) -> u32 {
        match self {
            Self::TwoNights => 2,
            Self::OneNight => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TwoNights => "2 nights",
            Self::OneNight => "1 night",
        }
    }
}

/// A concrete check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayWindow {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub stay: StayLength,
}

impl fmt::Display for StayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} ({})",
            self.check_in.format("%Y-%m-%d"),
            self.check_out.format("%Y-%m-%d"),
            self.stay.label()
        )
    }
}

/// Source of check-in days.
///
/// `pick_day(last)` must return a day in `1..=last`; out-of-range answers
/// are clamped.
pub trait DayPicker {
    fn pick_day(&mut self, last_check_in_day: u32) -> u32;
}

impl<F: FnMut(u32) -> u32> DayPicker for F {
    fn pick_day(&mut self, last_check_in_day: u32) -> u32 {
        self(last_check_in_day)
    }
}

/// Uniform random days from an OS-seeded generator.
#[derive(Debug, Clone)]
pub struct RandomDayPicker {
    rng: StdRng,
}

impl RandomDayPicker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDayPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl DayPicker for RandomDayPicker {
    fn pick_day(&mut self, last_check_in_day: u32) -> u32 {
        self.rng.random_range(1..=last_check_in_day.max(1))
    }
}

/// Picks a stay of `stay` nights that starts and ends inside `month`.
///
/// The check-in day lies in `1..=days(month) - nights`. Returns `None` only
/// for years outside chrono's supported range.
pub fn pick_window<D: DayPicker + ?Sized>(
    month: YearMonth,
    stay: StayLength,
    days: &mut D,
) -> Option<StayWindow> {
    let last_check_in_day = month.days() - stay.nights();
    let day = days
        .pick_day(last_check_in_day)
        .clamp(1, last_check_in_day);
    let check_in = NaiveDate::from_ymd_opt(month.year, month.month, day)?;
    let check_out = check_in.checked_add_days(Days::new(u64::from(stay.nights())))?;
    Some(StayWindow {
        check_in,
        check_out,
        stay,
    })
}
