//! Sri Lankan National Identity Card (NIC) number decoding.
//!
//! Two shapes are recognised:
//!
//! - **legacy**: nine digits followed by a `V` or `X` letter (`881002105V`).
//!   The first two digits are the birth year within 1900-1999.
//! - **current**: twelve digits (`198810210597`). The first four digits are
//!   the birth year.
//!
//! In both shapes the three digits following the year encode the day of the
//! year the holder was born on. Female holders have [`FEMALE_DAY_OFFSET`]
//! added to that day.
//!
//! Decoding is pure: the same input always yields the same [`NicRecord`] or
//! the same [`NicError`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, trace};

/// Offset added to the day-of-year field for female holders.
pub const FEMALE_DAY_OFFSET: u32 = 500;

/// Longest accepted NIC, in characters (the current twelve-digit shape).
pub const MAX_NIC_LEN: usize = 12;

/// Century assumed for the two-digit legacy year.
const LEGACY_CENTURY: i32 = 1900;

// ASCII classes on purpose: `\d` would also accept non-Latin digits.
static LEGACY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{9})([VX])$").expect("legacy NIC pattern is valid")
});

static CURRENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("current NIC pattern is valid"));

/// Why a NIC could not be decoded.
///
/// Both kinds are expected, user-correctable outcomes. The `Display` output
/// is the message shown next to the input field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NicError {
    /// Nothing but whitespace was entered.
    #[error("Please enter a NIC number")]
    EmptyInput,

    /// The input matches neither the legacy nor the current shape.
    #[error("Invalid NIC format. Use: 123456789V (old) or 200012345678 (new)")]
    InvalidFormat,
}

/// Which NIC numbering scheme a number was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NicFormat {
    /// Nine digits plus a `V`/`X` letter, two-digit year.
    Legacy,
    /// Twelve digits, four-digit year.
    Current,
}

impl fmt::Display for NicFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// The raw fields encoded in a well-formed NIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedFields {
    /// Scheme the number matched.
    pub format: NicFormat,
    /// Full birth year.
    pub year: i32,
    /// The three-digit day field, before the gender offset is removed.
    pub raw_day: u32,
}

impl NicFormat {
    /// Recognise the shape of an already-normalized NIC and pull out its
    /// year and raw day fields.
    ///
    /// Returns `None` when `normalized` matches neither shape.
    #[must_use]
    pub fn detect(normalized: &str) -> Option<EncodedFields> {
        if let Some(caps) = LEGACY_PATTERN.captures(normalized) {
            let digits = caps.get(1)?.as_str();
            return Some(EncodedFields {
                format: Self::Legacy,
                year: LEGACY_CENTURY + digits.get(0..2)?.parse::<i32>().ok()?,
                raw_day: digits.get(2..5)?.parse().ok()?,
            });
        }

        if CURRENT_PATTERN.is_match(normalized) {
            return Some(EncodedFields {
                format: Self::Current,
                year: normalized.get(0..4)?.parse().ok()?,
                raw_day: normalized.get(4..7)?.parse().ok()?,
            });
        }

        None
    }
}

/// Gender as encoded by the day-of-year field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    /// Raw day field of 500 or less.
    Male,
    /// Raw day field above 500.
    Female,
}

impl Gender {
    /// Split a raw day field into the holder's gender and true day-of-year.
    ///
    /// A raw day strictly greater than [`FEMALE_DAY_OFFSET`] denotes a female
    /// holder and has the offset removed. Anything else, including exactly
    /// 500, is male and passes through unchanged.
    #[must_use]
    pub fn from_raw_day(raw_day: u32) -> (Self, u32) {
        if raw_day > FEMALE_DAY_OFFSET {
            (Self::Female, raw_day - FEMALE_DAY_OFFSET)
        } else {
            (Self::Male, raw_day)
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Icon shown beside the gender on the result card.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Male => "👨",
            Self::Female => "👩",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything decoded from a valid NIC.
///
/// Only [`parse`] builds these, so a record always comes from a fully
/// matched number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NicRecord {
    /// The trimmed, upper-cased NIC.
    pub nic: String,
    /// Which scheme the NIC matched.
    pub format: NicFormat,
    /// Birth year as encoded, before any day-of-year rollover.
    pub year: i32,
    /// Day-of-year with the gender offset removed.
    pub day_of_year: u32,
    /// Holder's gender.
    pub gender: Gender,
    /// Derived date of birth.
    #[serde(serialize_with = "serialize_date")]
    pub date_of_birth: NaiveDate,
}

impl NicRecord {
    /// The date of birth as `DD/MM/YYYY`.
    #[must_use]
    pub fn date_of_birth_display(&self) -> String {
        format_date(self.date_of_birth)
    }
}

impl FromStr for NicRecord {
    type Err = NicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

/// Render a date the British way, `DD/MM/YYYY`.
///
/// Years are zero-padded to four digits and never carry a `+` sign, so year
/// 10000 (reachable from `9999` plus a large day) renders as `10000`. The
/// only negative year reachable is -1, from year `0000` with day 0; it
/// renders unpadded as `-1`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    let year = date.year();
    if year < 0 {
        format!("{:02}/{:02}/{year}", date.day(), date.month())
    } else {
        format!("{:02}/{:02}/{year:04}", date.day(), date.month())
    }
}

/// Trim surrounding whitespace and upper-case the letters.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Resolve a year and day-of-year to a calendar date.
///
/// Day `n` is the `n`-th day counting from December 31 of the previous
/// year: day 1 is January 1 and day 0 is December 31 of `year - 1`. Days
/// past the end of the year roll silently into the next one, so day 366 of a
/// common year is January 1 of the following year.
#[must_use]
pub fn birth_date(year: i32, day_of_year: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_sub_days(Days::new(1))?
        .checked_add_days(Days::new(u64::from(day_of_year)))
}

/// Decode a NIC into its date of birth and gender.
///
/// # Errors
///
/// Returns [`NicError::EmptyInput`] for blank input and
/// [`NicError::InvalidFormat`] when the input is neither nine digits plus
/// `V`/`X` nor twelve digits.
pub fn parse(input: &str) -> Result<NicRecord, NicError> {
    let nic = normalize(input);
    trace!(nic = %nic, "decoding NIC");

    if nic.is_empty() {
        debug!("rejected empty NIC");
        return Err(NicError::EmptyInput);
    }

    let Some(fields) = NicFormat::detect(&nic) else {
        debug!(len = nic.chars().count(), "rejected NIC with unrecognised shape");
        return Err(NicError::InvalidFormat);
    };

    let (gender, day_of_year) = Gender::from_raw_day(fields.raw_day);
    // Four-digit years plus at most 999 days sit far inside chrono's range.
    let date_of_birth = birth_date(fields.year, day_of_year).ok_or(NicError::InvalidFormat)?;

    debug!(
        format = %fields.format,
        year = fields.year,
        day_of_year,
        gender = %gender,
        "decoded NIC"
    );

    Ok(NicRecord {
        nic,
        format: fields.format,
        year: fields.year,
        day_of_year,
        gender,
        date_of_birth,
    })
}
