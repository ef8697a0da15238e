//! Academic calendar: which year's datasheets are still editable.

use chrono::{Datelike, NaiveDate, Utc};

use crate::config::{ConfigError, ConfigResult, DatasheetConfig};
use crate::datasheet::YearCode;
use crate::errors::CollaboratorResult;

/// Source of the current working academic year
pub trait AcademicYearOracle: Send + Sync {
    fn working_year(&self) -> CollaboratorResult<YearCode>;
}

/// Always reports the same working year
#[derive(Debug, Clone, Copy)]
pub struct FixedWorkingYear(pub YearCode);

impl AcademicYearOracle for FixedWorkingYear {
    fn working_year(&self) -> CollaboratorResult<YearCode> {
        Ok(self.0)
    }
}

/// Derives the working year from today's date.
///
/// The academic year begins on the first day of `start_month`; a date before
/// that month belongs to the year that began the previous calendar year.
#[derive(Debug, Clone, Copy)]
pub struct CalendarWorkingYear {
    start_month: u32,
}

impl CalendarWorkingYear {
    pub fn new(start_month: u32) -> ConfigResult<Self> {
        if !(1..=12).contains(&start_month) {
            return Err(ConfigError::Invalid(format!(
                "academic_year_start_month must be 1..=12, got {}",
                start_month
            )));
        }
        Ok(Self { start_month })
    }

    pub fn from_config(config: &DatasheetConfig) -> ConfigResult<Self> {
        Self::new(config.academic_year_start_month)
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }

    /// Working year on a given date
    pub fn year_on(&self, date: NaiveDate) -> YearCode {
        let start_year = if date.month() >= self.start_month {
            date.year()
        } else {
            date.year() - 1
        };
        YearCode::for_start_year(start_year)
    }
}

impl AcademicYearOracle for CalendarWorkingYear {
    fn working_year(&self) -> CollaboratorResult<YearCode> {
        Ok(self.year_on(Utc::now().date_naive()))
    }
}
