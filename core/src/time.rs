use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDate};

/// Format of the persisted last-reset date, e.g. `Mon Jan 01 2024`.
pub const DATE_KEY_FORMAT: &str = "%a %b %d %Y";

/// Source of "today" for the daily reset.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Today's date in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Day-granular string used to decide whether a reset already happened today.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a day relative to `today`.
///
/// Accepts `today`/`tod`, `yesterday`/`yes`, `tomorrow`/`tom`, signed day
/// offsets (`-1d`, `+3d`) and `YYYY-MM-DD`.
pub fn parse_day(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yes" => return offset_day(today, -1),
        "tomorrow" | "tom" => return offset_day(today, 1),
        _ => {}
    }

    if (input.starts_with('+') || input.starts_with('-')) && input.ends_with(['d', 'D']) {
        let num_str = &input[..input.len() - 1];
        let days: i64 = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid day offset: {}", input))?;
        return offset_day(today, days);
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| anyhow!("Could not parse date: {}", input))
}

fn offset_day(today: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|d| today.checked_add_signed(d))
        .ok_or_else(|| anyhow!("Invalid day offset: {}d", days))
}
