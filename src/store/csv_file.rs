//! CSV file store with columns `id,date,odometer`

use super::ReadingStore;
use crate::error::Result;
use crate::lease::{sort_readings, Reading};
use chrono::NaiveDate;
use csv::{Reader, WriterBuilder};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Readings persisted to a single CSV file
///
/// The file is created on the first append. Rows are appended in
/// submission order; ordering by date happens on read. Ids are derived
/// from the file contents on every append, so several handles on one
/// file never hand out the same id.
#[derive(Debug, Clone)]
pub struct CsvReadingStore {
    path: PathBuf,
}

impl CsvReadingStore {
    /// Open a store, validating any existing rows
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let existing = read_readings(&path)?;

        info!(
            "Opened reading store {} ({} readings)",
            path.display(),
            existing.len()
        );

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadingStore for CsvReadingStore {
    fn append(&mut self, reading_date: NaiveDate, odometer: u64) -> Result<Reading> {
        let next_id = read_readings(&self.path)?
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            + 1;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let write_header = file.metadata()?.len() == 0;
        if !write_header && !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        let reading = Reading::new(next_id, reading_date, odometer);
        writer.serialize(reading)?;
        writer.flush()?;

        debug!("Appended reading {} to {}", reading.id, self.path.display());
        Ok(reading)
    }

    fn list_all(&self) -> Result<Vec<Reading>> {
        let mut readings = read_readings(&self.path)?;
        sort_readings(&mut readings);
        Ok(readings)
    }
}

/// Whether a non-empty file's last byte is a line feed
fn ends_with_newline(file: &mut File) -> Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Read every row of a readings file; a missing file has no readings
fn read_readings(path: &Path) -> Result<Vec<Reading>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::from_path(path)?;
    let mut readings = Vec::new();
    for result in reader.deserialize() {
        let reading: Reading = result?;
        readings.push(reading);
    }

    Ok(readings)
}
