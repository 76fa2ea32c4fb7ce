use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;

use casefile_core::Category;

use crate::errors::GenerationError;

pub mod access;
pub mod incidents;
pub mod staff;
pub mod testimony;

/// Characters case ids and badge ids are drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Rows of one table: scripted fixtures first, random filler after.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub rows: Vec<T>,
    fixture_rows: usize,
}

impl<T> Generated<T> {
    pub fn merge(mut fixtures: Vec<T>, filler: Vec<T>) -> Self {
        let fixture_rows = fixtures.len();
        fixtures.extend(filler);
        Self {
            rows: fixtures,
            fixture_rows,
        }
    }

    pub fn fixtures(&self) -> &[T] {
        &self.rows[..self.fixture_rows]
    }

    pub fn filler(&self) -> &[T] {
        &self.rows[self.fixture_rows..]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Half-open range of days random dates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    start: NaiveDate,
    days: i64,
}

impl HistoryWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, GenerationError> {
        let days = (end - start).num_days();
        if days <= 0 {
            return Err(GenerationError::InvalidOptions(format!(
                "history window {start}..{end} is empty"
            )));
        }
        Ok(Self { start, days })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Day after the last day of the window.
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(self.days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end()
    }

    pub fn sample_date<R: Rng>(&self, rng: &mut R) -> NaiveDate {
        self.start + Duration::days(rng.random_range(0..self.days))
    }

    /// Any day of the window at any time of day.
    pub fn sample_datetime<R: Rng>(&self, rng: &mut R) -> NaiveDateTime {
        let date = self.sample_date(rng);
        NaiveDateTime::new(date, sample_time(rng, 0))
    }
}

/// Random time of day no earlier than `first_hour`.
pub fn sample_time<R: Rng>(rng: &mut R, first_hour: u32) -> NaiveTime {
    let hour = rng.random_range(first_hour.min(23)..=23);
    let minute = rng.random_range(0..=59);
    let second = rng.random_range(0..=59);
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default()
}

/// Random uppercase alphanumeric code.
pub fn random_code<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
        .collect()
}

/// Uniform pick over every variant of a category.
pub fn sample<T: Category, R: Rng>(rng: &mut R) -> T {
    pick(rng, T::ALL)
}

/// Uniform pick from a fixed, non-empty list.
pub fn pick<T: Copy, R: Rng>(rng: &mut R, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}
