use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, e.g. "America/Sao_Paulo".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone is not known.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use super::local_today;
    use crate::Error;

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(
            local_today("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }

    #[test]
    fn known_timezone_gives_a_date() {
        assert!(local_today("America/Sao_Paulo").is_ok());
    }
}
