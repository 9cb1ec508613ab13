//! Software real-time clock.
//!
//! Holds the operator-set date as seconds since 1970 plus the microsecond
//! timer reading at which it was set. Out-of-range fields are normalised the
//! way `mktime` does: month 13 of 2024 is January 2025.

use core::fmt::Write;
use crate::peripherals::DateTime;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SECONDS_PER_DAY: i64 = 86_400;

/// Clock driven by a free-running microsecond timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftClock {
    base_epoch_s: i64,
    set_at_us: i64,
}

impl SoftClock {
    /// Clock reading 1970-01-01 00:00:00 at timer zero
    pub const fn new() -> Self {
        Self {
            base_epoch_s: 0,
            set_at_us: 0,
        }
    }

    /// Set the clock to `dt` as of timer reading `now_us`.
    pub fn set(&mut self, dt: DateTime, now_us: i64) {
        self.base_epoch_s = epoch_seconds(dt);
        self.set_at_us = now_us;
    }

    /// Seconds since 1970 at timer reading `now_us`
    pub fn epoch_at(&self, now_us: i64) -> i64 {
        self.base_epoch_s + (now_us - self.set_at_us).div_euclid(1_000_000)
    }

    /// `ctime` layout without the trailing newline: `Mon Jan 15 08:30:00 2024`
    pub fn write_ctime(&self, now_us: i64, out: &mut dyn Write) -> core::fmt::Result {
        let epoch = self.epoch_at(now_us);
        let dt = from_epoch_seconds(epoch);
        let weekday = (epoch.div_euclid(SECONDS_PER_DAY) + 4).rem_euclid(7) as usize;

        write!(
            out,
            "{} {}{:3} {:02}:{:02}:{:02} {}",
            WEEKDAYS[weekday],
            MONTHS[(dt.month - 1) as usize],
            dt.day,
            dt.hour,
            dt.minute,
            dt.second,
            dt.year
        )
    }
}

/// Seconds since 1970-01-01, normalising every field.
pub fn epoch_seconds(dt: DateTime) -> i64 {
    let months = dt.year as i64 * 12 + (dt.month as i64 - 1);
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) + 1;

    let days = days_from_civil(year, month, 1) + (dt.day as i64 - 1);
    days * SECONDS_PER_DAY + dt.hour as i64 * 3600 + dt.minute as i64 * 60 + dt.second as i64
}

/// Inverse of [`epoch_seconds`] for normalised dates
pub fn from_epoch_seconds(epoch: i64) -> DateTime {
    let days = epoch.div_euclid(SECONDS_PER_DAY);
    let secs = epoch.rem_euclid(SECONDS_PER_DAY);
    let (year, month, day) = civil_from_days(days);

    DateTime::new(
        year as i32,
        month as i32,
        day as i32,
        (secs / 3600) as i32,
        (secs % 3600 / 60) as i32,
        (secs % 60) as i32,
    )
}

// Proleptic Gregorian conversions, eras of 400 years starting in March.

fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}
