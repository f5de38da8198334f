//! Generic collection engine shared by batches and files.
//!
//! A [`Collection`] is one header record, an ordered list of children and
//! a lifecycle state: open (children may still be appended) or closed
//! (the control record exists and the contents are frozen). Aggregated
//! totals recurse through the [`Component`] trait, so a file sums its
//! batches the same way a batch sums its entries.

use crate::control::Totals;
use crate::entry_detail::{CREDIT_TRANSACTION_CODES, DEBIT_TRANSACTION_CODES};
use crate::error::LifecycleError;
use std::fmt::Display;

/// Aggregation surface shared by entries and nested collections.
pub trait Component {
    /// Number of serialized lines this component contributes.
    fn block_count(&self) -> u64;

    /// Number of entry and addenda records, recursively.
    fn entry_and_addenda_count(&self) -> u64;

    /// Sum of leaf ABA transit numbers, recursively, before hash
    /// truncation.
    fn transit_sum(&self) -> u64;

    /// Sum of leaf amounts in cents over entries whose transaction code is
    /// in the given set.
    fn dollar_sum(&self, transaction_codes: &[&str]) -> u64;

    /// Appends this component's serialized lines; fails if a nested
    /// collection is still open.
    fn write_lines(&self, out: &mut Vec<String>) -> Result<(), LifecycleError>;
}

/// Lifecycle of a collection: the control record only exists once closed.
#[derive(Debug, Clone)]
enum State<T> {
    Open,
    Closed { control: T },
}

/// One header, ordered children and an open/closed lifecycle.
#[derive(Debug, Clone)]
pub(crate) struct Collection<H, C, T> {
    kind: &'static str,
    pub(crate) header: H,
    pub(crate) children: Vec<C>,
    state: State<T>,
}

impl<H, C, T> Collection<H, C, T>
where
    C: Component,
{
    pub(crate) fn new(kind: &'static str, header: H) -> Self {
        Collection {
            kind,
            header,
            children: Vec::new(),
            state: State::Open,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        matches!(self.state, State::Open)
    }

    /// Appends a child; fails once closed.
    pub(crate) fn push(&mut self, child: C) -> Result<(), LifecycleError> {
        if !self.is_open() {
            return Err(LifecycleError::Closed(self.kind));
        }
        self.children.push(child);
        Ok(())
    }

    /// Transitions to closed with the given control record; fails if
    /// already closed.
    pub(crate) fn close_with(&mut self, control: T) -> Result<(), LifecycleError> {
        if !self.is_open() {
            return Err(LifecycleError::AlreadyClosed(self.kind));
        }
        self.state = State::Closed { control };
        Ok(())
    }

    /// The control record; fails while still open.
    pub(crate) fn control(&self) -> Result<&T, LifecycleError> {
        match &self.state {
            State::Closed { control } => Ok(control),
            State::Open => Err(LifecycleError::StillOpen(self.kind)),
        }
    }

    /// Guard for derived totals, which are only observable once closed.
    pub(crate) fn require_closed(&self) -> Result<(), LifecycleError> {
        self.control().map(|_| ())
    }

    /// Totals over all children, regardless of state. Callers gate on
    /// [`Self::require_closed`] before exposing them.
    pub(crate) fn totals(&self) -> Totals {
        Totals {
            entry_and_addenda_count: self
                .children
                .iter()
                .map(Component::entry_and_addenda_count)
                .sum(),
            transit_sum: self.children.iter().map(Component::transit_sum).sum(),
            debit_cents: self
                .children
                .iter()
                .map(|c| c.dollar_sum(&DEBIT_TRANSACTION_CODES))
                .sum(),
            credit_cents: self
                .children
                .iter()
                .map(|c| c.dollar_sum(&CREDIT_TRANSACTION_CODES))
                .sum(),
        }
    }

    /// Serialized line count: header + children + control.
    pub(crate) fn line_count(&self) -> u64 {
        2 + self.children.iter().map(Component::block_count).sum::<u64>()
    }
}

impl<H, C, T> Collection<H, C, T>
where
    H: Display,
    C: Component,
    T: Display,
{
    /// All serialized lines in protocol order; fails while open.
    pub(crate) fn lines(&self) -> Result<Vec<String>, LifecycleError> {
        let control = self.control()?;
        let mut out = Vec::with_capacity(self.line_count() as usize);
        out.push(self.header.to_string());
        for child in &self.children {
            child.write_lines(&mut out)?;
        }
        out.push(control.to_string());
        Ok(out)
    }

    /// Newline-joined serialization without a trailing newline.
    pub(crate) fn encode(&self) -> Result<String, LifecycleError> {
        Ok(self.lines()?.join("\n"))
    }
}
