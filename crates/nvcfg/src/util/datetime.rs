//! Calendar conversion for 32-bit epoch timestamps.
//!
//! Settings store timestamps as seconds since the Unix epoch. For display they
//! are rendered as `YYYY-MM-DD HH:MM` in a caller-chosen offset from UTC; the
//! same form is accepted back when editing.

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Error type for calendar string parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given date (Howard Hinnant's
/// `days_from_civil`).
fn date_to_days(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year } as i64;
    let m = if month <= 2 {
        month as i64 + 9
    } else {
        month as i64 - 3
    };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // year of era
    let doy = (153 * m as u32 + 2) / 5 + day - 1; // day of year
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era

    era * 146097 + doe as i64 - 719468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i32, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1; // day
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // month

    let year = if m <= 2 { y + 1 } else { y } as i32;
    (year, m, d)
}

/// Formats epoch seconds as `YYYY-MM-DD HH:MM`, shifted by `offset_min`
/// minutes east of UTC.
pub fn format_timestamp(epoch_secs: u32, offset_min: i32) -> String {
    let local = epoch_secs as i64 + offset_min as i64 * SECONDS_PER_MINUTE;
    let days = local.div_euclid(SECONDS_PER_DAY);
    let secs_of_day = local.rem_euclid(SECONDS_PER_DAY);
    let (year, month, day) = days_to_date(days);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        year,
        month,
        day,
        secs_of_day / SECONDS_PER_HOUR,
        (secs_of_day % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    )
}

/// Parses `YYYY-MM-DD HH:MM[:SS]` given in `offset_min` minutes east of UTC
/// back into epoch seconds.
pub fn parse_timestamp(s: &str, offset_min: i32) -> Result<u32, DateTimeParseError> {
    let err = |what: &str| DateTimeParseError {
        message: format!("Invalid {} in timestamp: {}", what, s),
    };

    let (date_part, time_part) = s
        .split_once(|c| c == ' ' || c == 'T')
        .ok_or_else(|| err("format"))?;

    let mut date = date_part.splitn(3, '-');
    let year: i32 = date
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| err("year"))?;
    let month: u32 = date
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| err("month"))?;
    let day: u32 = date
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| err("day"))?;

    if !(1..=12).contains(&month) {
        return Err(err("month"));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(err("day"));
    }

    let mut time = time_part.splitn(3, ':');
    let hours: u32 = time
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| err("hours"))?;
    let minutes: u32 = time
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| err("minutes"))?;
    let seconds: u32 = match time.next() {
        Some(v) => v.parse().map_err(|_| err("seconds"))?,
        None => 0,
    };

    if hours > 23 {
        return Err(err("hours"));
    }
    if minutes > 59 {
        return Err(err("minutes"));
    }
    if seconds > 59 {
        return Err(err("seconds"));
    }

    let local = date_to_days(year, month, day) * SECONDS_PER_DAY
        + i64::from(hours) * SECONDS_PER_HOUR
        + i64::from(minutes) * SECONDS_PER_MINUTE
        + i64::from(seconds);
    let utc = local - offset_min as i64 * SECONDS_PER_MINUTE;

    u32::try_from(utc).map_err(|_| DateTimeParseError {
        message: format!("Timestamp outside 32-bit epoch range: {}", s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch() {
        assert_eq!(format_timestamp(0, 0), "1970-01-01 00:00");
    }

    #[test]
    fn test_format_known_date() {
        // 2016-03-15 14:30:00 UTC
        assert_eq!(format_timestamp(1_458_052_200, 0), "2016-03-15 14:30");
        assert_eq!(format_timestamp(1_458_052_200, 120), "2016-03-15 16:30");
        assert_eq!(format_timestamp(1_458_052_200, -900), "2016-03-14 23:30");
    }

    #[test]
    fn test_parse_roundtrip() {
        for secs in [0u32, 60, 86_400, 951_782_400, 1_458_052_200, 4_102_444_800] {
            let text = format_timestamp(secs, 0);
            assert_eq!(parse_timestamp(&text, 0).unwrap(), secs, "failed for {}", text);
        }
    }

    #[test]
    fn test_parse_with_offset_and_seconds() {
        assert_eq!(
            parse_timestamp("2016-03-15 16:30:05", 120).unwrap(),
            1_458_052_205
        );
    }

    #[test]
    fn test_leap_day() {
        let secs = parse_timestamp("2000-02-29 12:00", 0).unwrap();
        assert_eq!(format_timestamp(secs, 0), "2000-02-29 12:00");
        assert!(parse_timestamp("2001-02-29 12:00", 0).is_err());
    }

    #[test]
    fn test_invalid_timestamps() {
        assert!(parse_timestamp("2016-13-01 00:00", 0).is_err());
        assert!(parse_timestamp("2016-01-01 24:00", 0).is_err());
        assert!(parse_timestamp("2016-01-01", 0).is_err());
        assert!(parse_timestamp("1969-12-31 23:59", 0).is_err());
        assert!(parse_timestamp("2016-01-01 -1:00", 0).is_err());
        assert!(parse_timestamp("2016-01-01 10:-5", 0).is_err());
        assert!(parse_timestamp("2016-01-01 10:05:-1", 0).is_err());
    }
}
