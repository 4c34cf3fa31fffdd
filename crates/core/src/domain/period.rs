use anyhow::Context;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single earnings period, e.g. `2024Q1`. Ordering is chronological.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EarningsPeriod {
    pub year: i32,
    pub quarter: u8,
}

impl EarningsPeriod {
    pub fn new(year: i32, quarter: u8) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (1..=4).contains(&quarter),
            "quarter must be 1..=4 (got {quarter})"
        );
        Ok(Self { year, quarter })
    }

    /// The most recent quarter that has fully closed as of `now`. Filings
    /// trail the quarter end, so the running quarter is never reported yet.
    pub fn latest_reported(now: DateTime<Utc>) -> Self {
        let current_quarter = (now.month0() / 3 + 1) as u8;
        if current_quarter == 1 {
            Self {
                year: now.year() - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: now.year(),
                quarter: current_quarter - 1,
            }
        }
    }

    pub fn previous(self) -> Self {
        if self.quarter == 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }
}

impl fmt::Display for EarningsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for EarningsPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, quarter) = s
            .trim()
            .split_once(['Q', 'q'])
            .with_context(|| format!("invalid earnings period: {s:?} (expected YYYYQn)"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("invalid year in earnings period: {s:?}"))?;
        let quarter: u8 = quarter
            .parse()
            .with_context(|| format!("invalid quarter in earnings period: {s:?}"))?;
        Self::new(year, quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_and_displays_round_trip() {
        let period: EarningsPeriod = "2024Q1".parse().unwrap();
        assert_eq!(period, EarningsPeriod::new(2024, 1).unwrap());
        assert_eq!(period.to_string(), "2024Q1");
    }

    #[test]
    fn rejects_bad_quarters() {
        assert!("2024Q5".parse::<EarningsPeriod>().is_err());
        assert!("2024Q0".parse::<EarningsPeriod>().is_err());
        assert!("2024".parse::<EarningsPeriod>().is_err());
    }

    #[test]
    fn latest_reported_is_previous_quarter() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(
            EarningsPeriod::latest_reported(now),
            EarningsPeriod::new(2024, 1).unwrap()
        );
    }

    #[test]
    fn latest_reported_wraps_year_in_q1() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(
            EarningsPeriod::latest_reported(now),
            EarningsPeriod::new(2023, 4).unwrap()
        );
    }

    #[test]
    fn ordering_is_chronological() {
        let a = EarningsPeriod::new(2023, 4).unwrap();
        let b = EarningsPeriod::new(2024, 1).unwrap();
        assert!(a < b);
        assert_eq!(b.previous(), a);
    }
}
