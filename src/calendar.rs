use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("a business calendar requires at least one working day")]
    NoWorkingDays,
    #[error("days per week must be between 1 and 7 (got {0})")]
    InvalidDaysPerWeek(u32),
}

/// Working weekdays plus holidays for the business-day regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkCalendarConfig", into = "WorkCalendarConfig")]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    #[serde(default)]
    holidays: Vec<NaiveDate>,
}

impl Default for WorkCalendar {
    /// Monday through Friday, no holidays.
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn custom<I, J>(working_days: I, holidays: J) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = WorkCalendarConfig::new(working_days, holidays)?;
        Self::from_config(&config)
    }

    /// Working days are the first `days` weekdays counted from Monday.
    pub fn with_days_per_week(days: u32) -> Result<Self, CalendarError> {
        if !(1..=7).contains(&days) {
            return Err(CalendarError::InvalidDaysPerWeek(days));
        }
        Self::custom(
            Self::ALL_WEEKDAYS.into_iter().take(days as usize),
            std::iter::empty(),
        )
    }

    pub fn from_config(config: &WorkCalendarConfig) -> Result<Self, CalendarError> {
        let working_set: HashSet<Weekday> = config.working_days.iter().copied().collect();
        if working_set.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        let non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !working_set.contains(day))
            .collect();

        Ok(Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
        })
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    pub fn working_days_per_week(&self) -> u32 {
        (Self::ALL_WEEKDAYS.len() - self.non_working_days.len()) as u32
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Add the same date as a holiday for every year in the range (inclusive).
    /// Dates that do not exist in a given year (Feb 29) are skipped.
    pub fn add_recurring_holiday(&mut self, month: u32, day: u32, start_year: i32, end_year: i32) {
        for year in start_year..=end_year {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }
    }

    pub fn set_working_days(&mut self, days: &[Weekday]) -> Result<(), CalendarError> {
        if days.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        self.non_working_days = Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !days.contains(day))
            .collect();
        Ok(())
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    /// The first available date after `from`. `None` past the end of the
    /// representable calendar.
    pub fn next_available(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from.succ_opt()?;
        while !self.is_available(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// The date `days_ahead` available days after `from`.
    pub fn find_next_available(&self, from: NaiveDate, days_ahead: i64) -> Option<NaiveDate> {
        let mut current = from;
        let mut count = 0;
        while count < days_ahead {
            current = current.succ_opt()?;
            if self.is_available(current) {
                count += 1;
            }
        }
        Some(current)
    }

    /// Inverse of [`WorkCalendar::find_next_available`].
    pub fn find_prev_available(&self, from: NaiveDate, days_back: i64) -> Option<NaiveDate> {
        let mut current = from;
        let mut count = 0;
        while count < days_back {
            current = current.pred_opt()?;
            if self.is_available(current) {
                count += 1;
            }
        }
        Some(current)
    }

    pub fn count_available_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_available(*day))
            .count() as i64
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        if working.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup();

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Ok(Self {
            working_days: working,
            holidays,
        })
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let working = WorkCalendar::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !calendar.non_working_days.contains(day))
            .collect();

        let mut holidays: Vec<NaiveDate> = calendar.holidays.iter().copied().collect();
        holidays.sort();

        Self {
            working_days: working,
            holidays,
        }
    }
}

impl From<WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: WorkCalendar) -> Self {
        WorkCalendarConfig::from(&calendar)
    }
}

impl TryFrom<WorkCalendarConfig> for WorkCalendar {
    type Error = CalendarError;

    fn try_from(config: WorkCalendarConfig) -> Result<Self, Self::Error> {
        WorkCalendar::from_config(&config)
    }
}

/// How integer duration units map onto the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarRegime {
    /// Every day counts.
    CalendarDays,
    /// Only working days of the calendar count.
    BusinessDays(WorkCalendar),
}

impl Default for CalendarRegime {
    fn default() -> Self {
        CalendarRegime::BusinessDays(WorkCalendar::default())
    }
}

impl CalendarRegime {
    pub fn business_days() -> Self {
        Self::default()
    }

    pub fn with_days_per_week(days: u32) -> Result<Self, CalendarError> {
        WorkCalendar::with_days_per_week(days).map(CalendarRegime::BusinessDays)
    }

    pub fn uses_business_days(&self) -> bool {
        matches!(self, CalendarRegime::BusinessDays(_))
    }

    pub fn days_per_week(&self) -> u32 {
        match self {
            CalendarRegime::CalendarDays => 7,
            CalendarRegime::BusinessDays(calendar) => calendar.working_days_per_week(),
        }
    }

    /// Date reached `duration` units after `start`. Under the business regime a
    /// non-working `start` first rolls forward to the next working day.
    ///
    /// `None` when the result falls outside chrono's date range.
    pub fn date_from_duration(&self, start: NaiveDate, duration: i64) -> Option<NaiveDate> {
        match self {
            CalendarRegime::CalendarDays => {
                let days = Duration::try_days(duration)?;
                start.checked_add_signed(days)
            }
            CalendarRegime::BusinessDays(calendar) => {
                let anchor = if calendar.is_available(start) {
                    start
                } else {
                    calendar.next_available(start)?
                };
                // working days never outnumber calendar days
                if duration >= 0 {
                    if duration > NaiveDate::MAX.signed_duration_since(anchor).num_days() {
                        return None;
                    }
                    calendar.find_next_available(anchor, duration)
                } else {
                    let days_back = duration.checked_neg()?;
                    if days_back > anchor.signed_duration_since(NaiveDate::MIN).num_days() {
                        return None;
                    }
                    calendar.find_prev_available(anchor, days_back)
                }
            }
        }
    }

    pub fn duration_to_man_months(&self, duration: i64) -> f64 {
        // duration / (days_per_week * 52 / 12), kept in this order for exactness
        duration as f64 * 12.0 / (f64::from(self.days_per_week()) * 52.0)
    }
}

pub fn date_from_duration(
    start: NaiveDate,
    duration: i64,
    regime: &CalendarRegime,
) -> Option<NaiveDate> {
    regime.date_from_duration(start, duration)
}

pub fn duration_to_man_months(duration: i64, regime: &CalendarRegime) -> f64 {
    regime.duration_to_man_months(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calendar_is_five_day_week() {
        assert_eq!(WorkCalendar::default().working_days_per_week(), 5);
        assert_eq!(CalendarRegime::default().days_per_week(), 5);
        assert_eq!(CalendarRegime::CalendarDays.days_per_week(), 7);
    }

    #[test]
    fn days_per_week_out_of_range_is_rejected() {
        assert_eq!(
            WorkCalendar::with_days_per_week(0),
            Err(CalendarError::InvalidDaysPerWeek(0))
        );
        assert_eq!(
            CalendarRegime::with_days_per_week(8),
            Err(CalendarError::InvalidDaysPerWeek(8))
        );
    }

    #[test]
    fn empty_working_days_is_an_error() {
        let mut cal = WorkCalendar::default();
        assert_eq!(cal.set_working_days(&[]), Err(CalendarError::NoWorkingDays));
        assert!(WorkCalendar::custom(Vec::new(), Vec::new()).is_err());
    }
}
