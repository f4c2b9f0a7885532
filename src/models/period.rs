//! Summary period model
//!
//! Weekly or monthly windows used by period summaries and spending insights.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity of a period summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Weekly,
    #[default]
    Monthly,
}

impl std::str::FromStr for PeriodKind {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(PeriodParseError::InvalidFormat(s.to_string())),
        }
    }
}

/// A concrete calendar window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SummaryPeriod {
    /// Seven days starting at `start`
    Weekly { start: NaiveDate },
    /// A calendar month
    Monthly { year: i32, month: u32 },
}

impl SummaryPeriod {
    /// Week containing `date`, starting on `week_start`
    pub fn week_containing(date: NaiveDate, week_start: Weekday) -> Self {
        let offset = (date.weekday().num_days_from_sunday() + 7
            - week_start.num_days_from_sunday())
            % 7;
        Self::Weekly {
            start: date - Duration::days(offset as i64),
        }
    }

    pub fn month_containing(date: NaiveDate) -> Self {
        Self::Monthly {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period of the given kind containing `date`
    pub fn containing(kind: PeriodKind, date: NaiveDate, week_start: Weekday) -> Self {
        match kind {
            PeriodKind::Weekly => Self::week_containing(date, week_start),
            PeriodKind::Monthly => Self::month_containing(date),
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Self::Weekly { .. } => PeriodKind::Weekly,
            Self::Monthly { .. } => PeriodKind::Monthly,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        match *self {
            Self::Weekly { start } => start,
            Self::Monthly { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Last day of the period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        match *self {
            Self::Weekly { start } => start + Duration::days(6),
            Self::Monthly { .. } => self.next().start_date() - Duration::days(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Every day in the period, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start_date()
            .iter_days()
            .take_while(|d| *d <= self.end_date())
            .collect()
    }

    pub fn next(&self) -> Self {
        match *self {
            Self::Weekly { start } => Self::Weekly {
                start: start + Duration::days(7),
            },
            Self::Monthly { year, month } => {
                if month == 12 {
                    Self::Monthly {
                        year: year + 1,
                        month: 1,
                    }
                } else {
                    Self::Monthly {
                        year,
                        month: month + 1,
                    }
                }
            }
        }
    }

    pub fn prev(&self) -> Self {
        match *self {
            Self::Weekly { start } => Self::Weekly {
                start: start - Duration::days(7),
            },
            Self::Monthly { year, month } => {
                if month == 1 {
                    Self::Monthly {
                        year: year - 1,
                        month: 12,
                    }
                } else {
                    Self::Monthly {
                        year,
                        month: month - 1,
                    }
                }
            }
        }
    }

    /// Parse "2025-01" (monthly) or "2025-01-05" (week containing that day)
    pub fn parse(s: &str, week_start: Weekday) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::week_containing(date, week_start));
        }
        if let Some((year, month)) = s.split_once('-') {
            let year: i32 = year
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            let month: u32 = month
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            if !(1..=12).contains(&month) {
                return Err(PeriodParseError::InvalidMonth(month));
            }
            return Ok(Self::Monthly { year, month });
        }
        Err(PeriodParseError::InvalidFormat(s.to_string()))
    }

    /// Human label ("January 2025", "Week of Jan 05, 2025")
    pub fn label(&self) -> String {
        match self {
            Self::Weekly { start } => format!("Week of {}", start.format("%b %d, %Y")),
            Self::Monthly { .. } => self.start_date().format("%B %Y").to_string(),
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly { start } => write!(f, "{}", start.format("%Y-%m-%d")),
            Self::Monthly { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(
                f,
                "Invalid period '{}'. Use YYYY-MM for a month or YYYY-MM-DD for the week containing a day",
                s
            ),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2025-01-08 is a Wednesday
        let week = SummaryPeriod::week_containing(date(2025, 1, 8), Weekday::Sun);
        assert_eq!(week.start_date(), date(2025, 1, 5));
        assert_eq!(week.end_date(), date(2025, 1, 11));
        assert_eq!(week.days().len(), 7);

        let sunday = SummaryPeriod::week_containing(date(2025, 1, 5), Weekday::Sun);
        assert_eq!(sunday, week);
    }

    #[test]
    fn test_week_starts_on_monday() {
        let week = SummaryPeriod::week_containing(date(2025, 1, 5), Weekday::Mon);
        assert_eq!(week.start_date(), date(2024, 12, 30));
    }

    #[test]
    fn test_month_bounds() {
        let feb = SummaryPeriod::Monthly {
            year: 2024,
            month: 2,
        };
        assert_eq!(feb.end_date(), date(2024, 2, 29));
        assert_eq!(feb.days().len(), 29);
        assert!(feb.contains(date(2024, 2, 15)));
        assert!(!feb.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_navigation_wraps_years() {
        let jan = SummaryPeriod::Monthly {
            year: 2025,
            month: 1,
        };
        assert_eq!(
            jan.prev(),
            SummaryPeriod::Monthly {
                year: 2024,
                month: 12
            }
        );
        assert_eq!(jan.prev().next(), jan);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            SummaryPeriod::parse("2025-03", Weekday::Sun).unwrap(),
            SummaryPeriod::Monthly {
                year: 2025,
                month: 3
            }
        );
        assert_eq!(
            SummaryPeriod::parse("2025-01-08", Weekday::Sun)
                .unwrap()
                .start_date(),
            date(2025, 1, 5)
        );
        assert!(matches!(
            SummaryPeriod::parse("2025-13", Weekday::Sun),
            Err(PeriodParseError::InvalidMonth(13))
        ));
        assert!(SummaryPeriod::parse("soon", Weekday::Sun).is_err());
    }

    #[test]
    fn test_labels() {
        let month = SummaryPeriod::Monthly {
            year: 2025,
            month: 1,
        };
        assert_eq!(month.label(), "January 2025");
        assert_eq!(month.to_string(), "2025-01");
    }
}
