//! Timezone values and their canonical `+HHMM`/`-HHMM` string form.

use crate::error::Error;

/// Largest UTC offset in use anywhere (UTC+14), in seconds.
pub const MAX_OFFSET_SECS: i32 = 50_400;

/// A timezone as Photos stores it: a UTC offset plus a free-form name.
///
/// The name is not validated against the offset; Photos itself stores
/// whatever the capture device reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    offset_secs: i32,
    name: String,
}

impl Timezone {
    pub fn new(offset_secs: i32, name: impl Into<String>) -> Result<Self, Error> {
        if offset_secs.abs() > MAX_OFFSET_SECS {
            return Err(Error::InvalidOffset(offset_secs));
        }
        Ok(Self {
            offset_secs,
            name: name.into(),
        })
    }

    pub fn offset_secs(&self) -> i32 {
        self.offset_secs
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset_str(&self) -> String {
        offset_to_str(self.offset_secs)
    }
}

/// Format a UTC offset in seconds as `+HHMM`/`-HHMM`.
///
/// Sign is `+` for offsets >= 0. Seconds below a whole minute are dropped.
/// The result is always exactly 5 characters.
pub fn offset_to_str(offset_secs: i32) -> String {
    let sign = if offset_secs >= 0 { '+' } else { '-' };
    let minutes = offset_secs.abs() / 60;
    let (hh, mm) = (minutes / 60, minutes % 60);
    format!("{sign}{hh:02}{mm:02}")
}

/// Parse a `+HHMM`/`-HHMM` string back into an offset in seconds.
pub fn offset_from_str(s: &str) -> Option<i32> {
    if s.len() != 5 || !s.is_ascii() {
        return None;
    }
    let sign = match s.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hh: i32 = s[1..3].parse().ok()?;
    let mm: i32 = s[3..5].parse().ok()?;
    if mm >= 60 {
        return None;
    }
    Some(sign * (hh * 3600 + mm * 60))
}
