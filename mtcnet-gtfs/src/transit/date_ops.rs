use chrono::{Datelike, NaiveDate, Weekday};
use gtfs_structures::{Calendar, Exception, Gtfs};
use std::collections::HashMap;

/// weekday pattern and date range of a calendar.txt row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCalendar {
    /// monday first
    pub weekdays: [bool; 7],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Calendar> for ServiceCalendar {
    fn from(c: &Calendar) -> Self {
        ServiceCalendar {
            weekdays: [
                c.monday,
                c.tuesday,
                c.wednesday,
                c.thursday,
                c.friday,
                c.saturday,
                c.sunday,
            ],
            start_date: c.start_date,
            end_date: c.end_date,
        }
    }
}

impl ServiceCalendar {
    /// true if the date is within the range and on a service weekday
    pub fn runs_on(&self, date: &NaiveDate) -> bool {
        let in_range = self.start_date <= *date && *date <= self.end_date;
        let weekday_idx = match date.weekday() {
            Weekday::Mon => 0,
            Weekday::Tue => 1,
            Weekday::Wed => 2,
            Weekday::Thu => 3,
            Weekday::Fri => 4,
            Weekday::Sat => 5,
            Weekday::Sun => 6,
        };
        in_range && self.weekdays[weekday_idx]
    }
}

/// calendar_dates.txt exceptions by service id and date
pub type ServiceExceptions = HashMap<String, HashMap<NaiveDate, Exception>>;

pub fn service_exceptions(gtfs: &Gtfs) -> ServiceExceptions {
    gtfs.calendar_dates
        .iter()
        .map(|(service_id, dates)| {
            let by_date = dates
                .iter()
                .map(|cd| (cd.date, cd.exception_type))
                .collect::<HashMap<_, _>>();
            (service_id.clone(), by_date)
        })
        .collect()
}

/// uses calendar.txt and calendar_dates.txt to test if a service runs on the
/// given date. an exception on the date wins over the calendar; a service with
/// neither never runs.
pub fn is_service_active(
    calendar: Option<&ServiceCalendar>,
    exceptions: Option<&HashMap<NaiveDate, Exception>>,
    date: &NaiveDate,
) -> bool {
    match exceptions.and_then(|cd| cd.get(date)) {
        Some(Exception::Added) => true,
        Some(Exception::Deleted) => false,
        None => calendar.is_some_and(|c| c.runs_on(date)),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_service_active, ServiceCalendar};
    use chrono::NaiveDate;
    use gtfs_structures::Exception;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        match NaiveDate::from_ymd_opt(y, m, d) {
            Some(d) => d,
            None => panic!("invalid date {y}-{m}-{d}"),
        }
    }

    fn weekday_service() -> ServiceCalendar {
        ServiceCalendar {
            weekdays: [true, true, true, true, true, false, false],
            start_date: date(2023, 8, 1),
            end_date: date(2023, 12, 31),
        }
    }

    #[test]
    fn test_calendar_weekday_and_range() {
        let c = weekday_service();
        // 2023-09-27 is a Wednesday
        assert!(is_service_active(Some(&c), None, &date(2023, 9, 27)));
        assert!(!is_service_active(Some(&c), None, &date(2023, 9, 30)));
        assert!(!is_service_active(Some(&c), None, &date(2024, 1, 3)));
        assert!(!is_service_active(None, None, &date(2023, 9, 27)));
    }

    #[test]
    fn test_exceptions_override_calendar() {
        let c = weekday_service();
        let deleted = HashMap::from([(date(2023, 9, 27), Exception::Deleted)]);
        assert!(!is_service_active(Some(&c), Some(&deleted), &date(2023, 9, 27)));
        let added = HashMap::from([(date(2023, 9, 30), Exception::Added)]);
        assert!(is_service_active(Some(&c), Some(&added), &date(2023, 9, 30)));
        assert!(is_service_active(None, Some(&added), &date(2023, 9, 30)));
    }
}
