//! One batch: a batch header, its entry detail records (with their
//! addenda) and, once closed, the batch control record.

use crate::batch_header::BatchHeader;
use crate::collection::{Collection, Component};
use crate::control::{BatchControl, Totals};
use crate::entry_detail::EntryDetail;
use crate::error::{Error, LifecycleError, StructuralError};
use crate::scanner::LineScanner;
use std::fmt;
use std::io::BufRead;

/// A batch of entries under one header. Entries are appended while the
/// batch is open; closing computes the control record and freezes it.
#[derive(Debug, Clone)]
pub struct Batch {
    inner: Collection<BatchHeader, EntryDetail, BatchControl>,
}

impl Batch {
    pub fn new(header: BatchHeader) -> Self {
        Batch {
            inner: Collection::new("batch", header),
        }
    }

    pub fn header(&self) -> &BatchHeader {
        &self.inner.header
    }

    pub fn entries(&self) -> &[EntryDetail] {
        &self.inner.children
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Appends an entry to an open batch.
    ///
    /// The entry's trace number must begin with the header's originating
    /// DFI ID; entries built for one batch cannot stray into another.
    pub fn add_entry(&mut self, entry: EntryDetail) -> Result<&mut Self, LifecycleError> {
        if self.is_open() {
            let odfi = self.inner.header.originating_dfi_id();
            if !entry.trace_number().starts_with(odfi) {
                return Err(LifecycleError::TraceOutsideBatch {
                    trace: entry.trace_number().to_string(),
                    odfi: odfi.to_string(),
                });
            }
        }
        self.inner.push(entry)?;
        Ok(self)
    }

    /// Closes the batch, computing its control record from the entries.
    pub fn close(&mut self) -> Result<&mut Self, Error> {
        if !self.is_open() {
            return Err(LifecycleError::AlreadyClosed("batch").into());
        }
        let control = BatchControl::from_totals(&self.inner.header, self.inner.totals())?;
        self.inner.close_with(control)?;
        Ok(self)
    }

    /// The control record of a closed batch.
    pub fn control(&self) -> Result<&BatchControl, LifecycleError> {
        self.inner.control()
    }

    /// Aggregated totals of a closed batch.
    pub fn totals(&self) -> Result<Totals, LifecycleError> {
        self.inner.require_closed()?;
        Ok(self.inner.totals())
    }

    /// Serialized line count (header + entries + addenda + control) of a
    /// closed batch.
    pub fn line_count(&self) -> Result<u64, LifecycleError> {
        self.inner.require_closed()?;
        Ok(self.inner.line_count())
    }

    /// Serializes a closed batch: one line per record, no trailing
    /// newline.
    pub fn encode(&self) -> Result<String, LifecycleError> {
        self.inner.encode()
    }

    /// Parses one batch from the stream, if the upcoming line starts one.
    ///
    /// Returns `Ok(None)` when the lookahead line does not carry the batch
    /// header type code, leaving the stream untouched for the caller.
    /// Trusted entries are appended without the trace cross-reference
    /// check; reject files carry traces no originating DFI ever issued.
    pub(crate) fn parse<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<Option<Self>, Error> {
        match scanner.peek()? {
            Some(line) if line.starts_with('5') => {}
            _ => return Ok(None),
        }
        // Safety: the peek above saw a line
        let line = scanner.next_line()?.expect("peeked line present");
        let header = BatchHeader::from_line(&line)?;
        let mut batch = Batch::new(header);

        while let Some(line) = scanner.peek()? {
            if !line.starts_with('6') {
                break;
            }
            // Safety: the peek above saw a line
            let line = scanner.next_line()?.expect("peeked line present");
            let mut entry = EntryDetail::from_line(&line)?;
            if entry.has_addenda_indicator() {
                let expected_at = scanner.line_number() + 1;
                match scanner.next_line()? {
                    Some(line) if line.starts_with('7') => {
                        entry.set_parsed_addenda(crate::addenda::Addenda::from_line(&line)?);
                    }
                    Some(line) => {
                        return Err(StructuralError::UnexpectedRecordType {
                            expected: '7',
                            found: line.chars().next(),
                            record: "addenda record",
                            line: scanner.line_number(),
                        }
                        .into())
                    }
                    None => {
                        return Err(StructuralError::UnexpectedEndOfInput {
                            expected: '7',
                            record: "addenda record",
                            line: expected_at,
                        }
                        .into())
                    }
                }
            }
            batch.inner.push(entry)?;
        }

        let expected_at = scanner.line_number() + 1;
        match scanner.next_line()? {
            Some(line) if line.starts_with('8') => {
                let control = BatchControl::from_line(&line)?;
                batch.inner.close_with(control)?;
                Ok(Some(batch))
            }
            Some(line) => Err(StructuralError::UnexpectedRecordType {
                expected: '8',
                found: line.chars().next(),
                record: "batch control record",
                line: scanner.line_number(),
            }
            .into()),
            None => Err(StructuralError::UnexpectedEndOfInput {
                expected: '8',
                record: "batch control record",
                line: expected_at,
            }
            .into()),
        }
    }
}

impl Component for Batch {
    fn block_count(&self) -> u64 {
        self.inner.line_count()
    }

    fn entry_and_addenda_count(&self) -> u64 {
        self.inner.totals().entry_and_addenda_count
    }

    fn transit_sum(&self) -> u64 {
        self.inner.totals().transit_sum
    }

    fn dollar_sum(&self, transaction_codes: &[&str]) -> u64 {
        self.inner
            .children
            .iter()
            .map(|entry| entry.dollar_sum(transaction_codes))
            .sum()
    }

    fn write_lines(&self, out: &mut Vec<String>) -> Result<(), LifecycleError> {
        out.extend(self.inner.lines()?);
        Ok(())
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<open batch>"),
        }
    }
}
