//! Route record persistence.
//!
//! The backing file is plain text, one record per line:
//!
//! ```text
//! ORIGIN,DESTINATION,COST
//! ```
//!
//! No header row, COST is a base-10 non-negative integer. The file is only
//! ever appended to. Loading always rebuilds the whole [`RouteGraph`] from
//! the file; there is no incremental patching.
//!
//! The free functions [`load_routes`] and [`append_route`] do the raw I/O.
//! [`GraphStore`] wraps them with the store-wide lock so no load observes a
//! half-written line and no two appends interleave.

use crate::{Node, Record, RouteGraph};
use farepath_core::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

// ============================================================================
// GraphStore
// ============================================================================

/// Owner of the record file and the lock serializing access to it.
#[derive(Debug)]
pub struct GraphStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl GraphStore {
    /// Create a store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record and build a fresh graph.
    pub fn load(&self) -> Result<RouteGraph> {
        let _guard = self.acquire();
        load_routes(&self.path)
    }

    /// Durably append one record.
    pub fn append(&self, record: &Record) -> Result<()> {
        let _guard = self.acquire();
        append_route(&self.path, record)
    }

    // The guarded value is `()`, so a poisoned lock carries no broken state.
    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Load
// ============================================================================

/// Load a route graph from a record file.
///
/// Fails with an I/O error if the file cannot be opened or read, and with a
/// format error on the first malformed record. No partial graph is returned.
pub fn load_routes(path: impl AsRef<Path>) -> Result<RouteGraph> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io_with_path(e, path))?;

    let graph = parse_routes(file).map_err(|e| match e {
        Error::Io(source) => Error::io_with_path(source, path),
        other => other,
    })?;

    log::info!(
        "Loaded {} route(s) across {} location(s) from {}",
        graph.record_count(),
        graph.node_count(),
        path.display()
    );
    Ok(graph)
}

/// Parse route records from any reader.
///
/// Blank lines are skipped. Every other line must hold exactly three
/// comma-separated fields: two non-blank identifiers and a non-negative
/// integer cost. Format errors name the 1-based line of the offending
/// record in the raw input, blank lines included.
pub fn parse_routes<R: Read>(mut reader: R) -> Result<RouteGraph> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(Error::io)?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(buf.as_slice());

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let fallback_line = idx as u64 + 1;
        let row = row.map_err(|e| csv_read_error(e, &buf, fallback_line))?;
        let line = row
            .position()
            .map_or(fallback_line, |p| line_at(&buf, p.byte()));
        records.push(parse_record(&row, line)?);
    }

    Ok(RouteGraph::from_records(records))
}

/// Line number of the first record byte at or after `offset`.
///
/// The csv reader does not count the blank lines it skips, so the line is
/// derived from the byte offset instead. Skipped line breaks directly after
/// `offset` belong to the gap before the record.
fn line_at(buf: &[u8], offset: u64) -> u64 {
    let start = usize::try_from(offset).map_or(buf.len(), |o| o.min(buf.len()));
    let gap = buf[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .count();
    let breaks = buf[..start + gap].iter().filter(|&&b| b == b'\n').count();
    breaks as u64 + 1
}

fn parse_record(row: &csv::StringRecord, line: u64) -> Result<Record> {
    if row.len() != 3 {
        return Err(Error::format(
            line,
            format!("expected 3 fields, found {}", row.len()),
        ));
    }

    let origin = Node::new(&row[0]);
    let destination = Node::new(&row[1]);
    if origin.is_empty() || destination.is_empty() {
        return Err(Error::format(line, "location identifiers must not be blank"));
    }

    let raw_cost = row[2].trim();
    let cost = raw_cost.parse::<u64>().map_err(|_| {
        Error::format(
            line,
            format!("cost '{raw_cost}' is not a non-negative integer"),
        )
    })?;

    Ok(Record {
        origin,
        destination,
        cost,
    })
}

fn csv_read_error(err: csv::Error, buf: &[u8], fallback_line: u64) -> Error {
    let line = err
        .position()
        .map_or(fallback_line, |p| line_at(buf, p.byte()));
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::io(source),
        _ => Error::format(line, message),
    }
}

// ============================================================================
// Append
// ============================================================================

/// Append one record to the end of the file, creating it if needed.
///
/// If the existing file does not end in a newline one is written first so
/// the new record never merges into the previous line. The data is synced
/// before returning.
pub fn append_route(path: impl AsRef<Path>, record: &Record) -> Result<()> {
    let path = path.as_ref();
    write_record(path, record).map_err(|e| Error::io_with_path(e, path))?;

    log::debug!(
        "Appended route {} -> {} ({}) to {}",
        record.origin,
        record.destination,
        record.cost,
        path.display()
    );
    Ok(())
}

fn write_record(path: &Path, record: &Record) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    if missing_trailing_newline(&mut file)? {
        file.write_all(b"\n")?;
    }

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut file);
        let cost = record.cost.to_string();
        writer
            .write_record([record.origin.as_str(), record.destination.as_str(), cost.as_str()])
            .map_err(io::Error::from)?;
        writer.flush()?;
    }

    file.sync_data()
}

fn missing_trailing_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

// ============================================================================
// Tests
// ============================================================================
