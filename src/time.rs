//! UTCTime and GeneralizedTime values.
//!
//! Both time types are encoded as ASCII strings. Only the forms that
//! unambiguously describe a point in time in UTC are supported:
//!
//! * UTCTime as `YYMMDDhhmmssZ`, where two-digit years from 50 to 99 are
//!   in the twentieth century and those from 00 to 49 in the twenty-first,
//! * GeneralizedTime as `YYYYMMDDhhmmss[.f]Z` with up to seven fraction
//!   digits of which the last must not be zero.

use std::fmt;
use crate::decode::{DecodeError, Pos};


//------------ Time ----------------------------------------------------------

/// A point in time in UTC.
///
/// Values are ordered chronologically.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl Time {
    /// The maximum number of fraction digits in a GeneralizedTime.
    const MAX_FRACTION_DIGITS: usize = 7;

    /// Creates a time value from its components.
    ///
    /// Returns `None` if the components don’t describe a valid point in
    /// time.
    pub fn new(
        year: i32, month: u8, day: u8,
        hour: u8, minute: u8, second: u8, nanosecond: u32,
    ) -> Option<Self> {
        if !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
            || nanosecond >= 1_000_000_000
        {
            return None
        }
        Some(Time { year, month, day, hour, minute, second, nanosecond })
    }

    /// Decodes the content octets of a UTCTime value.
    pub fn from_utc_time(
        content: &[u8], pos: impl Into<Pos>
    ) -> Result<Self, DecodeError> {
        let pos = pos.into();
        let err = || DecodeError::malformed("invalid UTCTime", pos);
        let (digits, zone) = match content.split_last() {
            Some((zone, digits)) if digits.len() == 12 => (digits, *zone),
            _ => return Err(err())
        };
        if zone != b'Z' {
            return Err(err())
        }
        let yy = two_digits(digits, 0).ok_or_else(err)?;
        let year = (if yy >= 50 { 1900 } else { 2000 }) + i32::from(yy);
        Self::new(
            year,
            two_digits(digits, 2).ok_or_else(err)?,
            two_digits(digits, 4).ok_or_else(err)?,
            two_digits(digits, 6).ok_or_else(err)?,
            two_digits(digits, 8).ok_or_else(err)?,
            two_digits(digits, 10).ok_or_else(err)?,
            0
        ).ok_or_else(err)
    }

    /// Decodes the content octets of a GeneralizedTime value.
    pub fn from_generalized_time(
        content: &[u8], pos: impl Into<Pos>
    ) -> Result<Self, DecodeError> {
        let pos = pos.into();
        let err = || DecodeError::malformed("invalid GeneralizedTime", pos);
        let digits = match content.split_last() {
            Some((b'Z', digits)) if digits.len() >= 14 => digits,
            _ => return Err(err())
        };
        let (digits, fraction) = digits.split_at(14);
        let nanosecond = match fraction.split_first() {
            None => 0,
            Some((b'.', fraction)) => {
                if fraction.is_empty()
                    || fraction.len() > Self::MAX_FRACTION_DIGITS
                    || fraction.last() == Some(&b'0')
                {
                    return Err(err())
                }
                let mut res = 0u32;
                for &ch in fraction {
                    if !ch.is_ascii_digit() {
                        return Err(err())
                    }
                    res = res * 10 + u32::from(ch - b'0');
                }
                for _ in fraction.len()..9 {
                    res *= 10;
                }
                res
            }
            Some(_) => return Err(err())
        };
        let year = i32::from(
            u16::from(two_digits(digits, 0).ok_or_else(err)?) * 100
            + u16::from(two_digits(digits, 2).ok_or_else(err)?)
        );
        Self::new(
            year,
            two_digits(digits, 4).ok_or_else(err)?,
            two_digits(digits, 6).ok_or_else(err)?,
            two_digits(digits, 8).ok_or_else(err)?,
            two_digits(digits, 10).ok_or_else(err)?,
            two_digits(digits, 12).ok_or_else(err)?,
            nanosecond
        ).ok_or_else(err)
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month from 1 to 12.
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day of the month starting at 1.
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the hour from 0 to 23.
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Returns the minute from 0 to 59.
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Returns the second from 0 to 59.
    pub fn second(self) -> u8 {
        self.second
    }

    /// Returns the fraction of the second in nanoseconds.
    pub fn nanosecond(self) -> u32 {
        self.nanosecond
    }

    /// Returns the number of seconds since 1970-01-01T00:00:00Z.
    ///
    /// The fraction of a second is ignored.
    pub fn timestamp(self) -> i64 {
        days_from_civil(self.year, self.month, self.day) * 86_400
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }
}


//--- Display

impl fmt::Display for Time {
    /// Formats the time in RFC 3339 format.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day,
            self.hour, self.minute, self.second
        )?;
        if self.nanosecond != 0 {
            let fraction = format!("{:09}", self.nanosecond);
            write!(f, ".{}", fraction.trim_end_matches('0'))?;
        }
        f.write_str("Z")
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the value of two ASCII digits starting at `start`.
fn two_digits(slice: &[u8], start: usize) -> Option<u8> {
    match slice.get(start..start + 2)? {
        [high, low] if high.is_ascii_digit() && low.is_ascii_digit() => {
            Some((high - b'0') * 10 + (low - b'0'))
        }
        _ => None
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Returns the number of days since 1970-01-01 for a proleptic Gregorian
/// date.
fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let year = i64::from(year) - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let month = i64::from(month);
    let doy = (153 * (month + if month > 2 { -3 } else { 9 }) + 2) / 5
        + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}


//============ Tests =========================================================
