use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::models::{LogRecord, LOG_HEADER};

/// Append-only CSV log of completed tasks.
///
/// The file is opened and closed on every call; nothing is held between
/// operations.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LogStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file if needed and writes the header into an empty file.
    ///
    /// Safe to call on every start: existing content is never truncated and
    /// the header is never written twice.
    pub fn ensure_initialized(&self) -> Result<()> {
        let file = self.open_for_append()?;
        let len = file.metadata().map_err(|e| self.io_error(e))?.len();
        if len == 0 {
            info!(path = %self.path.display(), "writing log header");
            self.write_row(file, &LOG_HEADER)?;
        }
        Ok(())
    }

    /// Appends one record and flushes it before returning.
    pub fn append(&self, record: &LogRecord) -> Result<()> {
        let file = self.open_for_append()?;
        self.write_row(file, &record.to_row())?;
        debug!(path = %self.path.display(), task = %record.task_name, "record appended");
        Ok(())
    }

    /// Every row in the file, header included, in file order.
    pub fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TrackerError::LogNotFound(self.path.clone()))
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| self.csv_error(e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(path = %self.path.display(), rows = rows.len(), "log read");
        Ok(rows)
    }

    /// Every logged record, header skipped.
    pub fn read_records(&self) -> Result<Vec<LogRecord>> {
        self.read_all()?
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, row)| LogRecord::from_row(i + 1, row))
            .collect()
    }

    fn open_for_append(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))
    }

    fn write_row<I, T>(&self, file: File, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        // Minimal quoting and CRLF row endings, matching existing log files.
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(file);
        writer.write_record(row).map_err(|e| self.csv_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> TrackerError {
        TrackerError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// IO failures inside the csv layer surface as plain IO errors.
    fn csv_error(&self, source: csv::Error) -> TrackerError {
        if let csv::ErrorKind::Io(e) = source.kind() {
            return self.io_error(io::Error::new(e.kind(), e.to_string()));
        }
        TrackerError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}
