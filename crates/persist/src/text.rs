//! Line-oriented text codec for [`PointSet`]s.
//!
//! Numbers are written in Rust's shortest round-trip decimal form, so a
//! save followed by a load reproduces every `f64` exactly.
//!
//! Loading writes into the target as it reads: the id and timestamp are
//! replaced first, then each stored sample goes through [`PointSet::add`].
//! Samples that collide with ones already in the target (or with each
//! other) are dropped, and a load that fails partway keeps whatever was
//! applied before the failure.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use fieldset_core::{Complex64, Dataset, PointSet, Sample};

use crate::{Config, PersistError, timestamp};

/// Writes `set` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the id contains a line break or the file cannot be
/// written.
pub fn save(set: &PointSet, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let result = write(set, path);
    match &result {
        Ok(()) => tracing::debug!(path = %path.display(), id = set.id(), count = set.count(), "saved point set"),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to save point set"),
    }
    result
}

/// Reads `path` into `set` using the default [`Config`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is malformed.
/// The target may have been partially updated when an error is returned.
pub fn load(set: &mut PointSet, path: impl AsRef<Path>) -> Result<(), PersistError> {
    load_with(set, path, &Config::default())
}

/// Reads `path` into `set`, applying the limits in `config`.
///
/// # Errors
///
/// Returns an error if `config` is invalid, the file cannot be read, or its
/// content is malformed.
/// The target may have been partially updated when an error is returned.
pub fn load_with(
    set: &mut PointSet,
    path: impl AsRef<Path>,
    config: &Config,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    config
        .validate()
        .map_err(|reason| PersistError::InvalidConfig { reason })?;

    let before = set.count();
    let result = read(set, path, config);
    match &result {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            id = set.id(),
            added = set.count() - before,
            "loaded point set"
        ),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to load point set"),
    }
    result
}

fn write(set: &PointSet, path: &Path) -> Result<(), PersistError> {
    if set.id().contains(['\n', '\r']) {
        return Err(PersistError::MultilineId(set.id().to_owned()));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", set.id())?;
    writeln!(writer, "{}", set.timestamp())?;
    writeln!(writer, "{}", set.count())?;
    for sample in set.items() {
        writeln!(writer, "{}", sample.x())?;
        writeln!(writer, "{}", sample.y())?;
        writeln!(writer, "{}", sample.value().re)?;
        writeln!(writer, "{}", sample.value().im)?;
    }
    writer.flush()?;
    Ok(())
}

fn read(set: &mut PointSet, path: &Path, config: &Config) -> Result<(), PersistError> {
    let mut lines = LineReader::new(File::open(path)?);

    set.set_id(lines.next_bounded("id", config.max_id_len)?);
    set.set_timestamp(timestamp::parse(&lines.next("timestamp")?)?);

    let count: usize = lines.parse("count")?;
    for _ in 0..count {
        let x = lines.parse("x")?;
        let y = lines.parse("y")?;
        let re = lines.parse("value.re")?;
        let im = lines.parse("value.im")?;
        set.add(Sample::new(x, y, Complex64::new(re, im)));
    }

    if lines.has_content()? {
        return Err(PersistError::TrailingData { count });
    }
    Ok(())
}

/// Reads one value per line, with line endings stripped.
struct LineReader {
    reader: BufReader<File>,
}

impl LineReader {
    fn new(file: File) -> Self {
        Self {
            reader: BufReader::new(file),
        }
    }

    fn next(&mut self, field: &'static str) -> Result<String, PersistError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PersistError::UnexpectedEof { field });
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Reads a line of at most `max` bytes without buffering past the limit.
    ///
    /// On overflow the reported length counts only the bytes read so far.
    fn next_bounded(&mut self, field: &'static str, max: usize) -> Result<String, PersistError> {
        let mut bytes = Vec::new();
        // Two extra bytes leave room for a "\r\n" ending.
        let limit = (max as u64).saturating_add(2);
        if (&mut self.reader).take(limit).read_until(b'\n', &mut bytes)? == 0 {
            return Err(PersistError::UnexpectedEof { field });
        }
        if bytes.ends_with(b"\n") {
            bytes.pop();
            if bytes.ends_with(b"\r") {
                bytes.pop();
            }
        }
        if bytes.len() > max {
            return Err(PersistError::IdTooLong {
                len: bytes.len() as u64,
                max,
            });
        }
        String::from_utf8(bytes).map_err(PersistError::InvalidId)
    }

    fn parse<T: FromStr>(&mut self, field: &'static str) -> Result<T, PersistError> {
        let line = self.next(field)?;
        line.trim()
            .parse()
            .map_err(|_| PersistError::InvalidNumber { field, text: line })
    }

    /// Returns `true` if any non-blank line remains.
    fn has_content(&mut self) -> Result<bool, PersistError> {
        let mut line = String::new();
        while self.reader.read_line(&mut line)? != 0 {
            if !line.trim().is_empty() {
                return Ok(true);
            }
            line.clear();
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use approx::assert_relative_eq;
    use fieldset_core::DateTime;
    use jiff::civil::date;
    use tempfile::tempdir;

    fn field(x: f64, y: f64) -> Complex64 {
        Complex64::new(x + y, y - x)
    }

    fn stamp() -> DateTime {
        date(2024, 3, 1).at(0, 0, 0, 0)
    }

    #[test]
    fn save_writes_one_value_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");

        let mut set = PointSet::new("test2", stamp());
        set.add(Sample::new(1.5, -2.0, Complex64::new(0.25, 3.0)));
        save(&set, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "test2\n2024-03-01T00:00:00\n1\n1.5\n-2\n0.25\n3\n"
        );
    }

    #[test]
    fn round_trip_restores_samples_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");

        let mut set = PointSet::new("test2", stamp());
        set.add_generated(3, field);
        set.add(Sample::new(0.1, 1.0 / 3.0, Complex64::new(-0.7, 1e-12)));
        save(&set, &path).unwrap();

        let mut copy = PointSet::new("other", DateTime::default());
        load(&mut copy, &path).unwrap();

        assert_eq!(copy.id(), "test2");
        assert_eq!(copy.timestamp(), stamp());
        assert_eq!(copy.items(), set.items());
        assert_relative_eq!(copy.mean_magnitude(), set.mean_magnitude());
    }

    #[test]
    fn load_deduplicates_against_existing_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");

        let mut set = PointSet::new("src", stamp());
        set.add_generated(3, field);
        save(&set, &path).unwrap();

        let mut target = PointSet::new("dst", stamp());
        target.add(Sample::new(15.0, 12.0, Complex64::new(9.0, 9.0)));
        load(&mut target, &path).unwrap();

        assert_eq!(target.count(), 3);
        assert_eq!(target.items()[0].value(), Complex64::new(9.0, 9.0));
        assert_eq!(target.items()[1].x(), 0.0);
        assert_eq!(target.items()[2].x(), 30.0);
    }

    #[test]
    fn load_keeps_progress_on_truncated_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "cut\n2024-03-01T00:00:00\n2\n1\n2\n3\n4\n5\n").unwrap();

        let mut target = PointSet::new("before", DateTime::default());
        let err = load(&mut target, &path).unwrap_err();

        assert!(matches!(err, PersistError::UnexpectedEof { field: "y" }));
        assert_eq!(target.id(), "cut");
        assert_eq!(target.count(), 1);
    }

    #[test]
    fn load_rejects_bad_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "id\nnot a date\n0\n").unwrap();

        let mut target = PointSet::new("before", stamp());
        let err = load(&mut target, &path).unwrap_err();

        assert!(matches!(err, PersistError::InvalidTimestamp { .. }));
        assert_eq!(target.id(), "id");
        assert_eq!(target.timestamp(), stamp());
    }

    #[test]
    fn load_rejects_bad_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "id\n2024-03-01T00:00:00\n1\n1\nfoo\n3\n4\n").unwrap();

        let err = load(&mut PointSet::new("x", stamp()), &path).unwrap_err();
        assert!(matches!(
            err,
            PersistError::InvalidNumber { field: "y", .. }
        ));
    }

    #[test]
    fn load_rejects_trailing_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "id\n2024-03-01T00:00:00\n0\n1\n2\n3\n4\n").unwrap();

        let err = load(&mut PointSet::new("x", stamp()), &path).unwrap_err();
        assert!(matches!(err, PersistError::TrailingData { count: 0 }));
    }

    #[test]
    fn load_accepts_crlf_and_trailing_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "id\r\n2024-03-01T00:00:00\r\n1\r\n1\r\n2\r\n3\r\n4\r\n\r\n").unwrap();

        let mut target = PointSet::new("x", stamp());
        load(&mut target, &path).unwrap();

        assert_eq!(target.id(), "id");
        assert_eq!(target.items(), &[Sample::new(1.0, 2.0, Complex64::new(3.0, 4.0))]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(&mut PointSet::new("x", stamp()), dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }

    #[test]
    fn load_rejects_long_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "abcdef\n2024-03-01T00:00:00\n0\n").unwrap();

        let config = Config {
            max_id_len: 4,
            ..Config::default()
        };
        let mut target = PointSet::new("x", stamp());
        let err = load_with(&mut target, &path, &config).unwrap_err();

        assert!(matches!(err, PersistError::IdTooLong { len: 6, max: 4 }));
        assert_eq!(target.id(), "x");
    }

    #[test]
    fn load_stops_reading_oversized_id_at_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        let id = "x".repeat(10_000);
        fs::write(&path, format!("{id}\n2024-03-01T00:00:00\n0\n")).unwrap();

        let config = Config {
            max_id_len: 8,
            ..Config::default()
        };
        let err = load_with(&mut PointSet::new("x", stamp()), &path, &config).unwrap_err();

        assert!(matches!(err, PersistError::IdTooLong { len: 10, max: 8 }));
    }

    #[test]
    fn load_accepts_id_at_limit_with_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, "abcd\r\n2024-03-01T00:00:00\r\n0\r\n").unwrap();

        let config = Config {
            max_id_len: 4,
            ..Config::default()
        };
        let mut target = PointSet::new("x", stamp());
        load_with(&mut target, &path, &config).unwrap();

        assert_eq!(target.id(), "abcd");
        assert_eq!(target.count(), 0);
    }

    #[test]
    fn load_rejects_non_utf8_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");
        fs::write(&path, b"\xff\xfe\n2024-03-01T00:00:00\n0\n").unwrap();

        let err = load(&mut PointSet::new("x", stamp()), &path).unwrap_err();
        assert!(matches!(err, PersistError::InvalidId(_)));
    }

    #[test]
    fn save_rejects_multiline_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.txt");

        let set = PointSet::new("two\nlines", stamp());
        assert!(matches!(
            save(&set, &path),
            Err(PersistError::MultilineId(_))
        ));
        assert!(!path.exists());
    }
}
