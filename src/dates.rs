use crate::error::Error;
use chrono::{Days, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` string into a [`NaiveDate`].
pub fn parse_date(date: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| Error::InvalidDateFormat {
        date: date.to_string(),
    })
}

/// The day before `today`.
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today - Days::new(1)
}

/// Generates the days between `first_date` and yesterday, newest first.
///
/// # Arguments
/// * `first_date` - The oldest day to include, in the form YYYY-MM-DD.
/// * `today` - The current UTC date.
///
/// # Returns
/// A Result containing either a restartable iterator of days or an [`Error::InvalidDateFormat`].
/// The iterator is empty when `first_date` is after yesterday.
pub fn generate_date_range(
    first_date: &str,
    today: NaiveDate,
) -> Result<impl Iterator<Item = NaiveDate> + Clone, Error> {
    let first = parse_date(first_date)?;
    let last = yesterday(today);
    let count = (last - first).num_days() + 1;

    Ok((0..count.max(0) as u64).map(move |offset| last - Days::new(offset)))
}
