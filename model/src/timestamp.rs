use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::LocationUpdate;

/// Parses "dd/mm/yyyy".
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(date.trim(), "%d/%m/%Y") {
        Ok(x) => Ok(x),
        Err(err) => bail!("Invalid date {:?}, expected dd/mm/yyyy: {}", date, err),
    }
}

/// Parses a 12-hour clock time like "4:05 PM" or "04:05:30 pm". 12 AM is midnight and 12 PM is
/// noon. Anything without an AM/PM suffix or with an hour outside 1-12 is an error.
pub fn parse_time(time: &str) -> Result<NaiveTime> {
    let time = time.trim();
    for fmt in ["%I:%M %p", "%I:%M:%S %p"] {
        if let Ok(x) = NaiveTime::parse_from_str(time, fmt) {
            return Ok(x);
        }
    }
    bail!("Invalid time {:?}, expected a 12-hour time like \"4:05 PM\"", time)
}

pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::new(parse_date(date)?, parse_time(time)?))
}

impl LocationUpdate {
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.date, &self.time)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn noon_and_midnight() {
        assert_eq!(parse_time("12:00 PM").unwrap().hour(), 12);
        assert_eq!(parse_time("12:00 AM").unwrap().hour(), 0);
        assert_eq!(parse_time("12:45 AM").unwrap().minute(), 45);
    }

    #[test]
    fn afternoon_hours_shift() {
        let t = parse_time("4:05 PM").unwrap();
        assert_eq!((t.hour(), t.minute()), (16, 5));
        assert_eq!(parse_time("4:05PM").unwrap().hour(), 16);
        assert_eq!(parse_time("11:59 am").unwrap().hour(), 11);
        assert_eq!(parse_time("09:30:15 PM").unwrap().second(), 15);
    }

    #[test]
    fn malformed_times_fail() {
        for bad in [
            "25:00", "13:00", "13:00 PM", "0:30 AM", "10:60 AM", "noon", "", "10:00 XM",
        ] {
            assert!(parse_time(bad).is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn dates_are_day_first() {
        let d = parse_date("03/11/2024").unwrap();
        assert_eq!((d.day(), d.month(), d.year()), (3, 11, 2024));
        assert!(parse_date("31/02/2024").is_err());
        assert!(parse_date("2024-11-03").is_err());
    }

    #[test]
    fn combined_timestamp() {
        let ts = parse_timestamp("03/11/2024", "1:15 PM").unwrap();
        assert_eq!(ts.to_string(), "2024-11-03 13:15:00");
        assert!(parse_timestamp("03/11/2024", "25:00").is_err());
    }
}
