//! Append-Only Transaction Log
//!
//! JSON-lines write-ahead log. Every mutation of the table is appended here
//! and the whole file is replayed at startup to rebuild it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Split, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::persistence::Record;

/// Handle on the transaction log, opened in append mode.
///
/// Appends are not internally synchronized; the engine serializes them under
/// the same lock that guards the table.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    file: File,
    sync_writes: bool,
    /// Length of the file up to the last complete record
    len: u64,
    /// Set when a failed append could not be rolled back, so the file may
    /// end mid-line
    torn: bool,
}

impl LogStore {
    /// Opens (or creates) the log at `path` for appending.
    ///
    /// Failing to open the log is fatal to startup: without it no mutation
    /// can be made durable. A partial last line left by a crash is closed
    /// with a newline so the next record starts on a line of its own.
    pub fn open(path: impl AsRef<Path>, sync_writes: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let opened = (|| -> io::Result<(File, u64)> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&path)?;
            let len = terminate_last_line(&mut file, &path)?;
            Ok((file, len))
        })();

        let (file, len) = opened.map_err(|source| CacheError::LogOpen {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), len, sync_writes, "Transaction log opened");

        Ok(Self {
            path,
            file,
            sync_writes,
            len,
            torn: false,
        })
    }

    /// Appends one record as a single line.
    ///
    /// The line is written with one `write_all` so records never interleave,
    /// then flushed to stable storage when `sync_writes` is enabled. If the
    /// write fails the file is cut back to its previous length.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        let mut line = Vec::new();
        if self.torn {
            line.push(b'\n');
        }
        line.extend(record.encode_line()?);

        if let Err(err) = self.write_line(&line) {
            self.rollback();
            return Err(err.into());
        }

        self.len += line.len() as u64;
        self.torn = false;
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.file.write_all(line)?;
        if self.sync_writes {
            self.file.sync_data()?;
        }
        Ok(())
    }

    fn rollback(&mut self) {
        match self.file.set_len(self.len) {
            Ok(()) => self.torn = false,
            Err(err) => {
                warn!(error = %err, "Could not roll back partial log append");
                self.torn = true;
            }
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts a lazy replay of every record at `path`, in append order.
    ///
    /// A missing file replays as empty.
    pub fn replay(path: impl AsRef<Path>) -> Result<LogReplay> {
        let path = path.as_ref();
        let lines = match File::open(path) {
            Ok(file) => Some(BufReader::new(file).split(b'\n')),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(CacheError::LogOpen {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        };

        Ok(LogReplay {
            lines,
            line_no: 0,
            skipped: 0,
        })
    }
}

/// Appends a newline if the file does not end with one, returning the
/// resulting length.
fn terminate_last_line(file: &mut File, path: &Path) -> io::Result<u64> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(len);
    }

    warn!("Closing torn record at the end of {}", path.display());
    file.write_all(b"\n")?;
    file.sync_data()?;
    Ok(len + 1)
}

/// One-shot iterator over the records of a log file.
///
/// Lines that fail to parse, including lines that are not valid UTF-8, are
/// skipped with a warning so that one bad record does not block recovery of
/// the others. Replay stops only on an I/O error.
#[derive(Debug)]
pub struct LogReplay {
    lines: Option<Split<BufReader<File>>>,
    line_no: usize,
    skipped: usize,
}

impl LogReplay {
    /// Number of lines dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for LogReplay {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let line = match self.lines.as_mut()?.next()? {
                Ok(line) => line,
                Err(err) => {
                    warn!(line = self.line_no + 1, error = %err, "Stopping log replay on read error");
                    self.lines = None;
                    return None;
                }
            };
            self.line_no += 1;

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<Record>(&line) {
                Ok(record) => return Some(record),
                Err(source) => {
                    self.skipped += 1;
                    let err = CacheError::CorruptRecord {
                        line: self.line_no,
                        source,
                    };
                    warn!("{}, skipping", err);
                }
            }
        }
    }
}
