use chrono::{DateTime, Local, SecondsFormat};
use std::time::SystemTime;

pub fn format_optional_time(time: Option<SystemTime>) -> Option<String> {
    time.map(format_system_time)
}

/// Marca de tiempo ISO-8601 en la zona horaria local.
pub fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(unix)]
pub fn format_unix_timestamp(seconds: i64, nanos: i64) -> Option<String> {
    let nanos = u32::try_from(nanos).ok()?;
    DateTime::from_timestamp(seconds, nanos).map(|utc| {
        utc.with_timezone(&Local)
            .to_rfc3339_opts(SecondsFormat::AutoSi, false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn formats_as_parseable_iso_8601() {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = format_system_time(time);
        let parsed = DateTime::parse_from_rfc3339(&formatted).expect("marca de tiempo inválida");
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[cfg(unix)]
    #[test]
    fn unix_timestamp_matches_system_time() {
        let time = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(
            format_unix_timestamp(1_600_000_000, 0),
            Some(format_system_time(time))
        );
        assert_eq!(format_unix_timestamp(0, -1), None);
    }
}
