//! One payment file: a file header, its batches and, once closed, the
//! file control record. Also the stream entry points, including stacked
//! streams of several files separated by blocking filler.

use crate::batch::Batch;
use crate::collection::Collection;
use crate::control::{FileControl, Totals};
use crate::error::{Error, LifecycleError, StructuralError};
use crate::file_header::FileHeader;
use crate::scanner::LineScanner;
use log::{debug, warn};
use std::fmt;
use std::io::BufRead;

/// Lines per block under the fixed blocking factor of 10.
const BLOCKING_FACTOR: u64 = 10;

/// A payment file. Batches are appended while the file is open; closing
/// computes the control record and freezes it.
#[derive(Debug, Clone)]
pub struct File {
    inner: Collection<FileHeader, Batch, FileControl>,
}

impl File {
    pub fn new(header: FileHeader) -> Self {
        File {
            inner: Collection::new("file", header),
        }
    }

    pub fn header(&self) -> &FileHeader {
        &self.inner.header
    }

    pub fn batches(&self) -> &[Batch] {
        &self.inner.children
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Appends a closed batch to an open file. An open batch is rejected:
    /// it has no control record yet, so the file could never account for
    /// its lines.
    pub fn add_batch(&mut self, batch: Batch) -> Result<&mut Self, LifecycleError> {
        if batch.is_open() {
            return Err(LifecycleError::OpenBatch);
        }
        self.inner.push(batch)?;
        Ok(self)
    }

    /// Closes the file, computing its control record from the batches.
    pub fn close(&mut self) -> Result<&mut Self, Error> {
        if !self.is_open() {
            return Err(LifecycleError::AlreadyClosed("file").into());
        }
        let batch_count = self.inner.children.len() as u64;
        let control = FileControl::from_totals(batch_count, self.block_count_now(), self.inner.totals())?;
        self.inner.close_with(control)?;
        Ok(self)
    }

    /// The control record of a closed file.
    pub fn control(&self) -> Result<&FileControl, LifecycleError> {
        self.inner.control()
    }

    /// Aggregated totals of a closed file.
    pub fn totals(&self) -> Result<Totals, LifecycleError> {
        self.inner.require_closed()?;
        Ok(self.inner.totals())
    }

    /// Number of batches in a closed file.
    pub fn batch_count(&self) -> Result<u64, LifecycleError> {
        self.inner.require_closed()?;
        Ok(self.inner.children.len() as u64)
    }

    /// Number of 10-line blocks a closed file occupies, rounded up.
    pub fn block_count(&self) -> Result<u64, LifecycleError> {
        self.inner.require_closed()?;
        Ok(self.block_count_now())
    }

    fn block_count_now(&self) -> u64 {
        self.inner.line_count().div_ceil(BLOCKING_FACTOR)
    }

    /// Serializes a closed file: one line per record plus a trailing
    /// newline.
    pub fn encode(&self) -> Result<String, LifecycleError> {
        let mut text = self.inner.encode()?;
        text.push('\n');
        Ok(text)
    }

    /// Parses exactly one file from the stream.
    ///
    /// The parsed file keeps the control records it read rather than
    /// recomputing them, and comes back closed.
    pub fn build_from_stream<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut scanner = LineScanner::new(reader);
        File::parse(&mut scanner)
    }

    /// Parses every file from a stream of several files separated by runs
    /// of all-`9` blocking filler lines.
    ///
    /// Termination is not an error: end of stream, or a boundary that no
    /// longer parses as a file header, ends the run and whatever parsed so
    /// far is returned. The unparsable case is logged.
    pub fn build_all_from_stacked_stream<R: BufRead>(reader: R) -> Vec<Self> {
        let mut scanner = LineScanner::new(reader);
        let mut files = Vec::new();
        loop {
            match Self::skip_blocking_filler(&mut scanner) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("stacked stream unreadable after {} file(s): {e}", files.len());
                    break;
                }
            }
            match File::parse(&mut scanner) {
                Ok(file) => files.push(file),
                Err(e) => {
                    warn!(
                        "stacked stream ends after {} file(s): next file does not parse: {e}",
                        files.len()
                    );
                    break;
                }
            }
        }
        files
    }

    /// Consumes filler lines up to the next candidate record; `false`
    /// means the stream is exhausted.
    fn skip_blocking_filler<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<bool, Error> {
        loop {
            match scanner.peek()? {
                None => return Ok(false),
                Some(line) if line.len() == 94 && line.bytes().all(|b| b == b'9') => {
                    scanner.next_line()?;
                    debug!("skipped blocking filler on line {}", scanner.line_number());
                }
                Some(_) => return Ok(true),
            }
        }
    }

    pub(crate) fn parse<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<Self, Error> {
        let expected_at = scanner.line_number() + 1;
        let line = match scanner.next_line()? {
            Some(line) => line,
            None => {
                return Err(StructuralError::UnexpectedEndOfInput {
                    expected: '1',
                    record: "file header record",
                    line: expected_at,
                }
                .into())
            }
        };
        if !line.starts_with('1') {
            return Err(StructuralError::UnexpectedRecordType {
                expected: '1',
                found: line.chars().next(),
                record: "file header record",
                line: scanner.line_number(),
            }
            .into());
        }
        let header = FileHeader::from_line(&line)?;
        let mut file = File::new(header);

        while let Some(batch) = Batch::parse(scanner)? {
            file.inner.push(batch)?;
        }

        let expected_at = scanner.line_number() + 1;
        match scanner.next_line()? {
            Some(line) if line.starts_with('9') => {
                let control = FileControl::from_line(&line)?;
                file.inner.close_with(control)?;
                Ok(file)
            }
            Some(line) => Err(StructuralError::UnexpectedRecordType {
                expected: '9',
                found: line.chars().next(),
                record: "file control record",
                line: scanner.line_number(),
            }
            .into()),
            None => Err(StructuralError::UnexpectedEndOfInput {
                expected: '9',
                record: "file control record",
                line: expected_at,
            }
            .into()),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<open file>"),
        }
    }
}
