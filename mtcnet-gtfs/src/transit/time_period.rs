use super::TransitError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: u32 = 86_400;
const SECONDS_PER_HOUR: u32 = 3_600;

/// a named span of the service day, `[start_hour, end_hour)`. a period whose
/// end is not after its start wraps past midnight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimePeriod {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimePeriod {
    pub fn new(name: &str, start_hour: u32, end_hour: u32) -> TimePeriod {
        TimePeriod {
            name: String::from(name),
            start_hour,
            end_hour,
        }
    }

    fn start_secs(&self) -> u32 {
        self.start_hour * SECONDS_PER_HOUR
    }

    pub fn duration_secs(&self) -> u32 {
        let span = (self.end_hour + 24 - self.start_hour) % 24;
        match span {
            0 => SECONDS_PER_DAY,
            hours => hours * SECONDS_PER_HOUR,
        }
    }

    /// seconds elapsed since the period start, for a time of day taken modulo 24h
    pub fn offset_secs(&self, secs: u32) -> u32 {
        (secs % SECONDS_PER_DAY + SECONDS_PER_DAY - self.start_secs()) % SECONDS_PER_DAY
    }

    pub fn contains(&self, secs: u32) -> bool {
        self.offset_secs(secs) < self.duration_secs()
    }
}

/// the ordered set of periods that partition a service day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct TimePeriods(pub Vec<TimePeriod>);

impl Default for TimePeriods {
    /// MTC model periods EA, AM, MD, PM and EV
    fn default() -> Self {
        TimePeriods(vec![
            TimePeriod::new("EA", 3, 6),
            TimePeriod::new("AM", 6, 10),
            TimePeriod::new("MD", 10, 15),
            TimePeriod::new("PM", 15, 19),
            TimePeriod::new("EV", 19, 3),
        ])
    }
}

impl TimePeriods {
    /// the period containing a GTFS time (seconds past midnight, may exceed 24h)
    pub fn period_of(&self, secs: u32) -> Option<&TimePeriod> {
        self.0.iter().find(|p| p.contains(secs))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|p| p.name == name)
    }

    /// confirms hours are valid and the periods cover the day exactly once.
    pub fn validate(&self) -> Result<(), TransitError> {
        if let Some(p) = self.0.iter().find(|p| p.start_hour >= 24 || p.end_hour >= 24) {
            return Err(TransitError::InvalidTimePeriodError(format!(
                "period {} has an hour outside of [0, 24)",
                p.name
            )));
        }
        let total: u32 = self.0.iter().map(|p| p.duration_secs()).sum();
        if total != SECONDS_PER_DAY {
            return Err(TransitError::InvalidTimePeriodError(format!(
                "periods cover {} hours of the day, expected 24",
                total / SECONDS_PER_HOUR
            )));
        }
        let by_start = self.0.iter().sorted_by_key(|p| p.start_hour).collect::<Vec<_>>();
        let gap = by_start
            .iter()
            .zip(by_start.iter().cycle().skip(1))
            .find(|(p, next)| p.end_hour != next.start_hour);
        if let Some((p, next)) = gap {
            return Err(TransitError::InvalidTimePeriodError(format!(
                "period {} ends at hour {} but the next period {} starts at hour {}",
                p.name, p.end_hour, next.name, next.start_hour
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TimePeriod, TimePeriods};

    fn period_name(periods: &TimePeriods, hh: u32, mm: u32) -> String {
        periods
            .period_of(hh * 3600 + mm * 60)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_default_periods() {
        let periods = TimePeriods::default();
        assert!(periods.validate().is_ok());
        assert_eq!(period_name(&periods, 3, 0), "EA");
        assert_eq!(period_name(&periods, 9, 59), "AM");
        assert_eq!(period_name(&periods, 10, 0), "MD");
        assert_eq!(period_name(&periods, 18, 30), "PM");
        assert_eq!(period_name(&periods, 23, 0), "EV");
        assert_eq!(period_name(&periods, 1, 0), "EV");
        // GTFS times past midnight of the service day
        assert_eq!(period_name(&periods, 25, 30), "EV");
        assert_eq!(period_name(&periods, 27, 15), "EA");
    }

    #[test]
    fn test_wrapping_period() {
        let ev = TimePeriod::new("EV", 19, 3);
        assert_eq!(ev.duration_secs(), 8 * 3600);
        assert_eq!(ev.offset_secs(20 * 3600), 3600);
        assert_eq!(ev.offset_secs(2 * 3600), 7 * 3600);
    }

    #[test]
    fn test_incomplete_periods_are_rejected() {
        let periods = TimePeriods(vec![TimePeriod::new("AM", 6, 10)]);
        assert!(periods.validate().is_err());
    }

    #[test]
    fn test_overlapping_periods_are_rejected() {
        let periods = TimePeriods(vec![
            TimePeriod::new("A", 0, 12),
            TimePeriod::new("B", 6, 18),
        ]);
        match periods.validate() {
            Err(e) => assert!(e.to_string().contains("period A ends at hour 12")),
            Ok(()) => panic!("overlapping periods passed validation"),
        }
        let whole_day = TimePeriods(vec![TimePeriod::new("ALL", 5, 5)]);
        assert!(whole_day.validate().is_ok());
    }
}
