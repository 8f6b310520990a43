//! Clock-style text for durations.

use crate::error::ValidationError;

/// `MM:SS`. Minutes keep counting past an hour.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `H:MM:SS` for an hour or more, otherwise `MM:SS`.
pub fn format_total(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Parse `m:ss`, `h:mm:ss` or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::invalid("duration", format!("cannot parse '{input}'"));
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u64 = part.parse().map_err(|_| invalid())?;
        if i > 0 && value >= 60 {
            return Err(invalid());
        }
        total = total
            .checked_mul(60)
            .and_then(|t| t.checked_add(value))
            .ok_or_else(invalid)?;
    }
    Ok(total)
}
