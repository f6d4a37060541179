//! Fixed-layout binary codec for [`Grid`]s.
//!
//! Fields are written in a fixed order with no padding; see the crate docs
//! for the layout.
//! Every `f64` is stored bit for bit, so a round trip is exact.
//!
//! Loading is not atomic. Each header field is committed to the target as
//! soon as it has been read, and cells are written into the live array.
//! If the input is truncated or malformed, the fields read so far stay
//! updated even though the load reports an error.
//! Committing `nx` empties the cells to `nx × 0`; committing `ny` then
//! reallocates them (zero-filled) to `nx × ny`. The grid never reports more
//! cells than it holds, and nothing is allocated beyond what the file declares.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use fieldset_core::{Complex64, Dataset, Grid};

use crate::{Config, PersistError, timestamp};

/// Longest LEB128 encoding of a `u32` length.
const MAX_LENGTH_PREFIX_BYTES: usize = 5;

/// Writes `grid` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if a dimension does not fit in an `i32` or the file
/// cannot be written.
pub fn save(grid: &Grid, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let result = write(grid, path);
    match &result {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            id = grid.id(),
            nx = grid.nx(),
            ny = grid.ny(),
            "saved grid"
        ),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to save grid"),
    }
    result
}

/// Reads `path` into `grid` using the default [`Config`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is malformed.
/// The target may have been partially updated when an error is returned.
pub fn load(grid: &mut Grid, path: impl AsRef<Path>) -> Result<(), PersistError> {
    load_with(grid, path, &Config::default())
}

/// Reads `path` into `grid`, applying the limits in `config`.
///
/// # Errors
///
/// Returns an error if `config` is invalid, the file cannot be read, or its
/// content is malformed or exceeds a limit.
/// The target may have been partially updated when an error is returned.
pub fn load_with(grid: &mut Grid, path: impl AsRef<Path>, config: &Config) -> Result<(), PersistError> {
    let path = path.as_ref();
    config
        .validate()
        .map_err(|reason| PersistError::InvalidConfig { reason })?;

    let result = read(grid, path, config);
    match &result {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            id = grid.id(),
            nx = grid.nx(),
            ny = grid.ny(),
            "loaded grid"
        ),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to load grid"),
    }
    result
}

fn write(grid: &Grid, path: &Path) -> Result<(), PersistError> {
    let nx = dimension_to_i32("nx", grid.nx())?;
    let ny = dimension_to_i32("ny", grid.ny())?;
    let id = grid.id().as_bytes();
    let id_len = u32::try_from(id.len()).map_err(|_| PersistError::IdTooLong {
        len: id.len() as u64,
        max: u32::MAX as usize,
    })?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_length_prefix(&mut writer, id_len)?;
    writer.write_all(id)?;
    writer.write_all(&timestamp::to_micros(grid.timestamp()).to_le_bytes())?;
    writer.write_all(&nx.to_le_bytes())?;
    writer.write_all(&ny.to_le_bytes())?;
    writer.write_all(&grid.step_x().to_le_bytes())?;
    writer.write_all(&grid.step_y().to_le_bytes())?;
    for value in grid.cells() {
        writer.write_all(&value.re.to_le_bytes())?;
        writer.write_all(&value.im.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn read(grid: &mut Grid, path: &Path, config: &Config) -> Result<(), PersistError> {
    let mut reader = BufReader::new(File::open(path)?);

    grid.set_id(read_id(&mut reader, config)?);
    grid.set_timestamp(timestamp::from_micros(i64::from_le_bytes(read_bytes(
        &mut reader,
        "timestamp",
    )?))?);

    let nx = read_dimension(&mut reader, "nx")?;
    grid.reshape(nx, 0);

    let ny = read_dimension(&mut reader, "ny")?;
    check_cells(nx, ny, config)?;
    grid.reshape(nx, ny);

    grid.set_step_x(read_f64(&mut reader, "step_x")?);
    grid.set_step_y(read_f64(&mut reader, "step_y")?);

    // Standard layout, so this visits cells in row-major order.
    for cell in grid.cells_mut().iter_mut() {
        let re = read_f64(&mut reader, "cell")?;
        let im = read_f64(&mut reader, "cell")?;
        *cell = Complex64::new(re, im);
    }
    Ok(())
}

fn read_bytes<const N: usize>(reader: &mut impl Read, field: &'static str) -> Result<[u8; N], PersistError> {
    let mut bytes = [0u8; N];
    reader
        .read_exact(&mut bytes)
        .map_err(PersistError::reading(field))?;
    Ok(bytes)
}

fn read_f64(reader: &mut impl Read, field: &'static str) -> Result<f64, PersistError> {
    read_bytes(reader, field).map(f64::from_le_bytes)
}

fn read_dimension(reader: &mut impl Read, field: &'static str) -> Result<usize, PersistError> {
    let value = i32::from_le_bytes(read_bytes(reader, field)?);
    usize::try_from(value).map_err(|_| PersistError::InvalidDimension {
        field,
        value: value.into(),
    })
}

fn dimension_to_i32(field: &'static str, value: usize) -> Result<i32, PersistError> {
    i32::try_from(value).map_err(|_| PersistError::InvalidDimension {
        field,
        value: value as i128,
    })
}

fn check_cells(nx: usize, ny: usize, config: &Config) -> Result<(), PersistError> {
    match nx.checked_mul(ny) {
        Some(cells) if cells <= config.max_cells => Ok(()),
        _ => Err(PersistError::TooManyCells {
            nx,
            ny,
            max: config.max_cells,
        }),
    }
}

fn read_id(reader: &mut impl Read, config: &Config) -> Result<String, PersistError> {
    let len = u64::from(read_length_prefix(reader)?);
    if len > config.max_id_len as u64 {
        return Err(PersistError::IdTooLong {
            len,
            max: config.max_id_len,
        });
    }

    let mut bytes = Vec::new();
    reader.take(len).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != len {
        return Err(PersistError::UnexpectedEof { field: "id" });
    }
    String::from_utf8(bytes).map_err(PersistError::InvalidId)
}

/// Writes `len` as an unsigned LEB128 integer, seven bits per byte.
fn write_length_prefix(writer: &mut impl Write, mut len: u32) -> Result<(), PersistError> {
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            writer.write_all(&[byte])?;
            return Ok(());
        }
        writer.write_all(&[byte | 0x80])?;
    }
}

fn read_length_prefix(reader: &mut impl Read) -> Result<u32, PersistError> {
    let mut len: u64 = 0;
    for index in 0..MAX_LENGTH_PREFIX_BYTES {
        let [byte] = read_bytes(reader, "id length")?;
        len |= u64::from(byte & 0x7f) << (7 * index);
        if byte & 0x80 == 0 {
            return u32::try_from(len).map_err(|_| PersistError::InvalidIdLength);
        }
    }
    Err(PersistError::InvalidIdLength)
}
