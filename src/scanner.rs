//! Line scanner with one line of lookahead over any buffered reader.
//!
//! The stream protocol decides what to parse next from the first
//! character of the upcoming line, so the scanner can peek a line without
//! consuming it. Line numbers are 1-based and count consumed lines; a
//! trailing `\r` is stripped so CRLF input parses like LF input.

use std::io::{self, BufRead};

pub(crate) struct LineScanner<R> {
    lines: io::Lines<R>,
    peeked: Option<String>,
    consumed: u64,
}

impl<R: BufRead> LineScanner<R> {
    pub(crate) fn new(reader: R) -> Self {
        LineScanner {
            lines: reader.lines(),
            peeked: None,
            consumed: 0,
        }
    }

    /// The upcoming line, without consuming it.
    pub(crate) fn peek(&mut self) -> io::Result<Option<&str>> {
        if self.peeked.is_none() {
            self.peeked = self.read_raw()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// Consumes and returns the next line, or `None` at end of stream.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<String>> {
        let line = match self.peeked.take() {
            Some(line) => Some(line),
            None => self.read_raw()?,
        };
        if line.is_some() {
            self.consumed += 1;
        }
        Ok(line)
    }

    /// 1-based number of the most recently consumed line.
    pub(crate) fn line_number(&self) -> u64 {
        self.consumed
    }

    fn read_raw(&mut self) -> io::Result<Option<String>> {
        match self.lines.next() {
            None => Ok(None),
            Some(Err(e)) => Err(e),
            Some(Ok(mut line)) => {
                if line.ends_with('\r') {
                    line.pop();
                }
                Ok(Some(line))
            }
        }
    }
}
