//! Timestamp encodings shared by the codecs.

use jiff::{SignedDuration, civil::DateTime};

use crate::PersistError;

/// Reference point of the binary encoding.
const EPOCH: DateTime = DateTime::constant(1970, 1, 1, 0, 0, 0, 0);

/// Encodes `timestamp` as microseconds since [`EPOCH`].
///
/// Sub-microsecond precision is truncated.
pub(crate) fn to_micros(timestamp: DateTime) -> i64 {
    // Civil datetimes span under 20000 years, well inside i64 microseconds.
    timestamp.duration_since(EPOCH).as_micros() as i64
}

pub(crate) fn from_micros(micros: i64) -> Result<DateTime, PersistError> {
    EPOCH
        .checked_add(SignedDuration::from_micros(micros))
        .map_err(|source| PersistError::TimestampOutOfRange { micros, source })
}

pub(crate) fn parse(text: &str) -> Result<DateTime, PersistError> {
    text.trim()
        .parse()
        .map_err(|source| PersistError::InvalidTimestamp {
            text: text.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    #[test]
    fn micros_are_relative_to_unix_epoch() {
        assert_eq!(to_micros(EPOCH), 0);
        assert_eq!(to_micros(date(1970, 1, 2).at(0, 0, 0, 0)), 86_400_000_000);
        assert_eq!(to_micros(date(1969, 12, 31).at(23, 59, 59, 0)), -1_000_000);
    }

    #[test]
    fn micros_round_trip() {
        let ts = date(2024, 3, 1).at(12, 30, 15, 250_000_000);
        assert_eq!(from_micros(to_micros(ts)).unwrap(), ts);
    }

    #[test]
    fn out_of_range_micros_are_rejected() {
        assert!(matches!(
            from_micros(i64::MAX),
            Err(PersistError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn parse_accepts_display_form() {
        let ts = date(2024, 3, 1).at(0, 0, 0, 0);
        assert_eq!(parse(&ts.to_string()).unwrap(), ts);
        assert!(parse("yesterday").is_err());
    }
}
