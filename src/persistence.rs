//! Binary save files holding one or more paths.
//!
//! Only the inputs of a path are stored (start state and maneuvers). Samples
//! are never saved: [`crate::path::Path::restore`] recomputes them, so a
//! loaded path is never queried stale.
//!
//! Layout, all little-endian:
//!
//! ```text
//! magic       8 bytes  "ORBPATH\0"
//! version     u32      1
//! path_count  u32
//! per path:
//!   start_pos.x, start_pos.y, start_vel.x, start_vel.y   f64 × 4
//!   count     u32
//!   per maneuver: index u32, kind u32, angle f64, magnitude f64
//! ```

use std::fs::File;
use std::io::{BufWriter, Read, Write};

use bevy::log::{info, warn};
use bevy::math::DVec2;

use crate::path::{Maneuver, ManeuverKind};

/// Binary path file format constants.
const MAGIC: &[u8; 8] = b"ORBPATH\0";
const VERSION: u32 = 1;

/// Upper bound on maneuvers in one saved path.
pub const MAX_MANEUVERS_PER_PATH: u32 = 1 << 16;

/// Size of one maneuver entry in bytes.
const MANEUVER_BYTES: usize = 4 + 4 + 8 + 8;

/// Everything needed to rebuild a path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathRecord {
    pub start_pos: DVec2,
    pub start_vel: DVec2,
    /// In index order.
    pub maneuvers: Vec<Maneuver>,
}

#[derive(thiserror::Error, Debug)]
pub enum PathFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid magic header")]
    BadMagic,

    #[error("unsupported path file version {0}")]
    UnsupportedVersion(u32),

    #[error("file ended early at byte {offset} (needed {needed} more)")]
    Truncated { offset: usize, needed: usize },

    #[error("unknown maneuver kind {kind} at index {index}")]
    UnknownManeuverKind { index: u32, kind: u32 },

    #[error("path {path} has two maneuvers at index {index}")]
    DuplicateManeuver { path: usize, index: u32 },

    #[error("path {path} has {count} maneuvers (at most {max} allowed)")]
    TooManyManeuvers { path: usize, count: u32, max: u32 },

    #[error("path {path} has a non-finite start state")]
    NonFiniteStart { path: usize },

    #[error("expected {expected} paths, file holds {found}")]
    PathCount { expected: usize, found: usize },
}

/// Check that every record fits the file format.
fn validate(records: &[PathRecord]) -> Result<(), PathFileError> {
    len_u32(records.len())?;
    for (path, record) in records.iter().enumerate() {
        let count = len_u32(record.maneuvers.len())?;
        if count > MAX_MANEUVERS_PER_PATH {
            return Err(PathFileError::TooManyManeuvers {
                path,
                count,
                max: MAX_MANEUVERS_PER_PATH,
            });
        }
        for m in &record.maneuvers {
            len_u32(m.index)?;
        }
    }
    Ok(())
}

/// Serialize `records` to `out`. Nothing is written if a record does not
/// fit the format.
pub fn write_records(records: &[PathRecord], mut out: impl Write) -> Result<(), PathFileError> {
    validate(records)?;

    out.write_all(MAGIC)?;
    out.write_all(&VERSION.to_le_bytes())?;
    out.write_all(&len_u32(records.len())?.to_le_bytes())?;

    for record in records {
        for v in [
            record.start_pos.x,
            record.start_pos.y,
            record.start_vel.x,
            record.start_vel.y,
        ] {
            out.write_all(&v.to_le_bytes())?;
        }

        out.write_all(&len_u32(record.maneuvers.len())?.to_le_bytes())?;

        for m in &record.maneuvers {
            out.write_all(&len_u32(m.index)?.to_le_bytes())?;
            out.write_all(&m.kind.code().to_le_bytes())?;
            out.write_all(&m.angle.to_le_bytes())?;
            out.write_all(&m.magnitude.to_le_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}

fn len_u32(n: usize) -> Result<u32, PathFileError> {
    u32::try_from(n).map_err(|_| {
        PathFileError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{n} does not fit the file format"),
        ))
    })
}

/// Parse records from an in-memory file image.
pub fn read_records(bytes: &[u8]) -> Result<Vec<PathRecord>, PathFileError> {
    let mut r = Cursor::new(bytes);

    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(PathFileError::BadMagic);
    }

    let version = r.read_u32_le()?;
    if version != VERSION {
        return Err(PathFileError::UnsupportedVersion(version));
    }

    let path_count = r.read_u32_le()? as usize;
    let mut records = Vec::new();

    for path in 0..path_count {
        let start_pos = DVec2::new(r.read_f64_le()?, r.read_f64_le()?);
        let start_vel = DVec2::new(r.read_f64_le()?, r.read_f64_le()?);
        if !start_pos.is_finite() || !start_vel.is_finite() {
            return Err(PathFileError::NonFiniteStart { path });
        }

        let count = r.read_u32_le()?;
        if count > MAX_MANEUVERS_PER_PATH {
            return Err(PathFileError::TooManyManeuvers {
                path,
                count,
                max: MAX_MANEUVERS_PER_PATH,
            });
        }
        r.ensure(count as usize * MANEUVER_BYTES)?;

        let mut maneuvers: Vec<Maneuver> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let index = r.read_u32_le()?;
            let code = r.read_u32_le()?;
            let angle = r.read_f64_le()?;
            let magnitude = r.read_f64_le()?;

            let kind = ManeuverKind::from_code(code)
                .ok_or(PathFileError::UnknownManeuverKind { index, kind: code })?;

            maneuvers.push(
                Maneuver::new(index as usize)
                    .with_kind(kind)
                    .with_thrust(angle, magnitude),
            );
        }
        maneuvers.sort_by_key(|m| m.index);
        if let Some(pair) = maneuvers.windows(2).find(|w| w[0].index == w[1].index) {
            return Err(PathFileError::DuplicateManeuver {
                path,
                index: pair[0].index as u32,
            });
        }

        records.push(PathRecord {
            start_pos,
            start_vel,
            maneuvers,
        });
    }

    Ok(records)
}

/// Write `records` to a file, replacing it.
pub fn save(path: impl AsRef<std::path::Path>, records: &[PathRecord]) -> Result<(), PathFileError> {
    let path = path.as_ref();
    // An existing file is only truncated once the records are known to fit
    validate(records)?;
    let file = File::create(path)?;
    write_records(records, BufWriter::new(file))?;
    info!("Saved {} path(s) to {}", records.len(), path.display());
    Ok(())
}

/// Read every record from a file.
pub fn load(path: impl AsRef<std::path::Path>) -> Result<Vec<PathRecord>, PathFileError> {
    let path = path.as_ref();
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;

    let records = read_records(&buf).inspect_err(|e| {
        warn!("Rejected path file {}: {}", path.display(), e);
    })?;
    info!("Loaded {} path(s) from {}", records.len(), path.display());
    Ok(records)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn ensure(&self, len: usize) -> Result<(), PathFileError> {
        let remaining = self.bytes.len() - self.offset;
        if len > remaining {
            return Err(PathFileError::Truncated {
                offset: self.offset,
                needed: len - remaining,
            });
        }
        Ok(())
    }

    fn read_exact(&mut self, out: &mut [u8]) -> Result<(), PathFileError> {
        self.ensure(out.len())?;
        let end = self.offset + out.len();
        out.copy_from_slice(&self.bytes[self.offset..end]);
        self.offset = end;
        Ok(())
    }

    fn read_u32_le(&mut self) -> Result<u32, PathFileError> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn read_f64_le(&mut self) -> Result<f64, PathFileError> {
        let mut b = [0u8; 8];
        self.read_exact(&mut b)?;
        Ok(f64::from_le_bytes(b))
    }
}
