use chrono::{Datelike, NaiveDate};

/// characters that may never appear in a donor name (digits are rejected separately)
const NAME_FORBIDDEN: &[char] = &[
    '[', ']', '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '?', '/', '\\', '{', '}',
    '<', '>', '|', '+', '=', ':', ';',
];

/// minimum length of a usable zip code. Longer codes (zip+4) are truncated to this.
pub const ZIP_LEN: usize = 5;

/// A name must be non-empty and must not contain digits or special characters.
/// Hyphens, quotes, periods, commas and spaces are allowed.
pub fn valid_name(s: &str) -> bool {
    !s.is_empty() && !s.contains(|c: char| c.is_ascii_digit() || NAME_FORBIDDEN.contains(&c))
}

/// True iff `s` is an integer strictly greater than zero: an optional `+`,
/// then decimal digits, not all of them zero. No width limit.
pub fn valid_positive_int(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits.bytes().any(|b| b != b'0')
}

/// true iff `s` is a real number strictly greater than zero.
/// NaN compares false, so it is rejected here.
pub fn valid_positive_float(s: &str) -> bool {
    matches!(s.parse::<f64>(), Ok(x) if x > 0.0)
}

/// Zip codes must be numeric and at least `ZIP_LEN` long.
/// Non-numeric postal formats (e.g. Canadian codes) are rejected.
pub fn valid_zip(s: &str) -> bool {
    valid_positive_int(s) && s.len() >= ZIP_LEN
}

/// `MMDDYYYY`, and it has to be a real calendar date
pub fn valid_date(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Parses a `MMDDYYYY` date into its calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = s[0..2].parse::<u32>().ok()?;
    let day = s[2..4].parse::<u32>().ok()?;
    let year = s[4..8].parse::<i32>().ok()?;
    // year 0 is a valid proleptic date but never a valid transaction year
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The transaction year of a date accepted by `valid_date`.
pub fn date_year(s: &str) -> Option<i32> {
    parse_date(s).map(|date| date.year())
}

/// The usable part of a zip accepted by `valid_zip`.
pub fn zip_prefix(s: &str) -> &str {
    &s[..ZIP_LEN]
}
