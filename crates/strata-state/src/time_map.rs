//! The report-step timeline.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strata_core::{DeckKeyword, DeckRecord, Result, ScheduleError};
use tracing::debug;

/// Month tokens accepted in DATES and START records.
const ECLIPSE_MONTHS: &[(&str, u32)] = &[
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("JLY", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

/// Longest single TSTEP entry accepted, in days (about 27 000 years).
const MAX_STEP_DAYS: f64 = 1.0e7;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Ordered calendar time points, one per report step.
///
/// Time point `n` is the start of report step `n`. The map always holds at
/// least the start time, and every appended point lies strictly after the
/// previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NaiveDateTime>", into = "Vec<NaiveDateTime>")]
pub struct TimeMap {
    time_points: Vec<NaiveDateTime>,
}

impl TimeMap {
    /// Create a timeline holding only the start of `start`.
    pub fn new(start: NaiveDate) -> Self {
        Self::starting_at(start.and_time(NaiveTime::MIN))
    }

    /// Create a timeline whose first time point is `start`.
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            time_points: vec![start],
        }
    }

    /// Date of the first time point.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time().date()
    }

    /// The first time point.
    pub fn start_time(&self) -> NaiveDateTime {
        self.time_points[0]
    }

    /// The most recently appended time point.
    pub fn last_time(&self) -> NaiveDateTime {
        self.time_points[self.time_points.len() - 1]
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// Always false; a timeline starts with one time point.
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Number of intervals between time points.
    pub fn num_timesteps(&self) -> usize {
        self.time_points.len() - 1
    }

    /// Append a time point.
    pub fn add_time(&mut self, time: NaiveDateTime) -> Result<()> {
        let previous = self.last_time();
        if time <= previous {
            return Err(ScheduleError::NonMonotonicTime {
                previous,
                next: time,
            });
        }
        self.time_points.push(time);
        Ok(())
    }

    /// Append a time point `days` after the last one. Fractional days are kept to the second.
    pub fn add_time_step(&mut self, days: f64) -> Result<()> {
        if !days.is_finite() || days.abs() > MAX_STEP_DAYS {
            return Err(ScheduleError::invalid_value(format!(
                "time step of {} days is out of range",
                days
            )));
        }
        let step = Duration::seconds((days * SECONDS_PER_DAY).round() as i64);
        let previous = self.last_time();
        let next = previous.checked_add_signed(step).ok_or_else(|| {
            ScheduleError::invalid_value(format!(
                "time step of {} days overflows the calendar",
                days
            ))
        })?;
        self.add_time(next)
    }

    /// Append one time point per DATES record.
    pub fn add_from_dates(&mut self, keyword: &DeckKeyword) -> Result<()> {
        for record in keyword.records() {
            let time = Self::date_from_record(record)?;
            self.add_time(time)?;
        }
        debug!(
            "DATES at deck index {} extended timeline to {} points",
            keyword.index(),
            self.len()
        );
        Ok(())
    }

    /// Append one time point per entry in the first item of the first TSTEP record.
    pub fn add_from_tstep(&mut self, keyword: &DeckKeyword) -> Result<()> {
        let steps = keyword.record(0)?.item(0)?.get_doubles()?;
        for days in steps {
            self.add_time_step(days)?;
        }
        debug!(
            "TSTEP at deck index {} extended timeline to {} points",
            keyword.index(),
            self.len()
        );
        Ok(())
    }

    /// Parse a record with `DAY`, `MONTH`, `YEAR` and optional `TIME` items.
    pub fn date_from_record(record: &DeckRecord) -> Result<NaiveDateTime> {
        let day = record.item_named("DAY")?.get_int(0)?;
        let month_token = record.item_named("MONTH")?.get_string(0)?;
        let year = record.item_named("YEAR")?.get_int(0)?;

        let month = month_from_token(month_token)?;
        let date = u32::try_from(day)
            .ok()
            .zip(i32::try_from(year).ok())
            .and_then(|(day, year)| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(|| {
                ScheduleError::invalid_value(format!(
                    "invalid date {} {} {}",
                    day, month_token, year
                ))
            })?;

        let time = match record.find_item("TIME") {
            Some(item) => match item.get_string_opt(0)? {
                Some(text) => parse_time_of_day(text)?,
                None => NaiveTime::MIN,
            },
            None => NaiveTime::MIN,
        };

        Ok(date.and_time(time))
    }

    /// The time point starting report step `step`.
    pub fn time_point(&self, step: usize) -> Result<NaiveDateTime> {
        self.time_points
            .get(step)
            .copied()
            .ok_or(ScheduleError::Range {
                what: "TimeMap",
                index: step,
                size: self.time_points.len(),
            })
    }

    /// Length of report step `step`, from its time point to the next.
    pub fn time_step_length(&self, step: usize) -> Result<Duration> {
        if step >= self.num_timesteps() {
            return Err(ScheduleError::Range {
                what: "TimeMap timesteps",
                index: step,
                size: self.num_timesteps(),
            });
        }
        Ok(self.time_points[step + 1] - self.time_points[step])
    }

    /// Time from the start up to the time point of `step`.
    pub fn elapsed_until(&self, step: usize) -> Result<Duration> {
        Ok(self.time_point(step)? - self.start_time())
    }

    /// Iterate over the time points.
    pub fn iter(&self) -> std::slice::Iter<'_, NaiveDateTime> {
        self.time_points.iter()
    }
}

impl TryFrom<Vec<NaiveDateTime>> for TimeMap {
    type Error = ScheduleError;

    /// Rebuild a timeline point by point, so the same ordering rules apply.
    fn try_from(time_points: Vec<NaiveDateTime>) -> Result<Self> {
        let mut points = time_points.into_iter();
        let start = points.next().ok_or_else(|| {
            ScheduleError::invalid_value("a timeline needs at least a start time")
        })?;

        let mut time_map = TimeMap::starting_at(start);
        for time in points {
            time_map.add_time(time)?;
        }
        Ok(time_map)
    }
}

impl From<TimeMap> for Vec<NaiveDateTime> {
    fn from(time_map: TimeMap) -> Self {
        time_map.time_points
    }
}

fn month_from_token(token: &str) -> Result<u32> {
    let upper = token.trim().to_ascii_uppercase();
    ECLIPSE_MONTHS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, month)| *month)
        .ok_or_else(|| ScheduleError::invalid_value(format!("unknown month {:?}", token)))
}

fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S%.f"))
        .map_err(|_| ScheduleError::invalid_value(format!("invalid time of day {:?}", text)))
}
