//! Encoder and decoder for NACHA ACH payment files.
//!
//! An ACH file is a stack of fixed-width 94-character records: one file
//! header, any number of batches (header, entry details with optional
//! addenda, control) and one file control record. This crate builds such
//! files programmatically and parses existing ones back into the same
//! model, byte-for-byte.
//!
//! Building a file:
//!
//! ```
//! use ach_codec::{batch_header, entry_detail, file_header};
//! use ach_codec::{Batch, BatchHeader, EntryDetail, File, FileHeader};
//!
//! # fn main() -> ach_codec::Result<()> {
//! let header = FileHeader::new(vec![
//!     (file_header::IMMEDIATE_DESTINATION, " 123456789".into()),
//!     (file_header::IMMEDIATE_ORIGIN, "0123456789".into()),
//!     (file_header::IMMEDIATE_DESTINATION_NAME, "Their Bank".into()),
//!     (file_header::IMMEDIATE_ORIGIN_NAME, "Our Company".into()),
//! ])?;
//!
//! let mut batch = Batch::new(BatchHeader::new(vec![
//!     (batch_header::SERVICE_CLASS_CODE, batch_header::MIXED_SERVICE_CLASS.into()),
//!     (batch_header::COMPANY_NAME, "Our Company".into()),
//!     (batch_header::COMPANY_ID, "0123456789".into()),
//!     (batch_header::STANDARD_ENTRY_CLASS_CODE, batch_header::SEC_PPD.into()),
//!     (batch_header::COMPANY_ENTRY_DESCRIPTION, "Payroll".into()),
//!     (batch_header::ORIGINATING_DFI_ID, "87654321".into()),
//! ])?);
//! batch.add_entry(EntryDetail::new(
//!     vec![
//!         (entry_detail::TRANSACTION_CODE, "22".into()),
//!         (entry_detail::TRANSIT_ABA_NUMBER, "113000023".into()),
//!         (entry_detail::DFI_ACCOUNT_NUMBER, "1234567890".into()),
//!         (entry_detail::AMOUNT, "11.00".into()),
//!         (entry_detail::INDIVIDUAL_NAME, "Jane Doe".into()),
//!         (entry_detail::TRACE_NUMBER, "87654321".into()),
//!     ],
//!     1,
//! )?)?;
//! batch.close()?;
//!
//! let mut file = File::new(header);
//! file.add_batch(batch)?;
//! file.close()?;
//! let text = file.encode()?;
//! assert!(text.lines().all(|line| line.len() == 94));
//! # Ok(())
//! # }
//! ```
//!
//! Parsing reverses the process: [`File::build_from_stream`] reads one
//! file from any [`std::io::BufRead`] source, and
//! [`File::build_all_from_stacked_stream`] reads a whole transmission of
//! files separated by all-`9` blocking filler.

pub mod addenda;
pub mod batch;
pub mod batch_header;
pub mod collection;
pub mod control;
pub mod entry_detail;
pub mod error;
pub mod field;
pub mod file;
pub mod file_header;
pub mod record;
mod scanner;

pub use addenda::Addenda;
pub use batch::Batch;
pub use batch_header::BatchHeader;
pub use collection::Component;
pub use control::{BatchControl, FileControl, Totals};
pub use entry_detail::EntryDetail;
pub use error::{Error, LifecycleError, Result, StructuralError, ValidationError};
pub use field::{FieldDef, FieldValue, Inclusion, Padding, Validator};
pub use file::File;
pub use file_header::FileHeader;
pub use record::{Record, RecordSpec};
