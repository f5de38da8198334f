//! Batch and file control records (type codes `8` and `9`): the trailing
//! records carrying counts, the entry hash and dollar totals.
//!
//! In the normal flow these are produced by `close()` from aggregated
//! child data, never supplied by the caller; parsing reconstructs them
//! from trusted lines like any other record.

use crate::batch_header::BatchHeader;
use crate::error::Error;
use crate::field::{FieldDef, Inclusion, Padding, Validator};
use crate::record::{ach_record, Record, RecordSpec};

pub const RECORD_TYPE_CODE: &str = "RECORD_TYPE_CODE";
pub const SERVICE_CLASS_CODE: &str = "SERVICE_CLASS_CODE";
pub const ENTRY_AND_ADDENDA_COUNT: &str = "ENTRY_AND_ADDENDA_COUNT";
pub const ENTRY_HASH: &str = "ENTRY_HASH";
pub const TOTAL_DEBIT_AMOUNT: &str = "TOTAL_DEBIT_ENTRY_DOLLAR_AMOUNT";
pub const TOTAL_CREDIT_AMOUNT: &str = "TOTAL_CREDIT_ENTRY_DOLLAR_AMOUNT";
pub const COMPANY_ID: &str = "COMPANY_ID";
pub const MESSAGE_AUTHENTICATION_CODE: &str = "MESSAGE_AUTHENTICATION_CODE";
pub const RESERVED: &str = "RESERVED";
pub const ORIGINATING_DFI_ID: &str = "ORIGINATING_DFI_ID";
pub const BATCH_NUMBER: &str = "BATCH_NUMBER";
pub const BATCH_COUNT: &str = "BATCH_COUNT";
pub const BLOCK_COUNT: &str = "BLOCK_COUNT";

/// The entry hash keeps only the low ten digits of the transit sum;
/// overflow is silently truncated per the format.
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

pub static BATCH_CONTROL_SPEC: RecordSpec = RecordSpec {
    name: "batch control record",
    type_code: '8',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^8$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("8"),
        },
        FieldDef {
            name: SERVICE_CLASS_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^(200|220|225)$"),
            width: 3,
            start: 2,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: ENTRY_AND_ADDENDA_COUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,6}$"),
            width: 6,
            start: 5,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: ENTRY_HASH,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,10}$"),
            width: 10,
            start: 11,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: TOTAL_DEBIT_AMOUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,12}$"),
            width: 12,
            start: 21,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: TOTAL_CREDIT_AMOUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,12}$"),
            width: 12,
            start: 33,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: COMPANY_ID,
            inclusion: Inclusion::Required,
            validator: Validator::Pattern(r"^[a-zA-Z0-9]{10}$"),
            width: 10,
            start: 45,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: MESSAGE_AUTHENTICATION_CODE,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^ {0,19}$"),
            width: 19,
            start: 55,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: RESERVED,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^ {0,6}$"),
            width: 6,
            start: 74,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: ORIGINATING_DFI_ID,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{8}$"),
            width: 8,
            start: 80,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: BATCH_NUMBER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,7}$"),
            width: 7,
            start: 88,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
    ],
    required: &[],
};

pub static FILE_CONTROL_SPEC: RecordSpec = RecordSpec {
    name: "file control record",
    type_code: '9',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^9$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("9"),
        },
        FieldDef {
            name: BATCH_COUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,6}$"),
            width: 6,
            start: 2,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: BLOCK_COUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,6}$"),
            width: 6,
            start: 8,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: ENTRY_AND_ADDENDA_COUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,8}$"),
            width: 8,
            start: 14,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: ENTRY_HASH,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,10}$"),
            width: 10,
            start: 22,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: TOTAL_DEBIT_AMOUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,12}$"),
            width: 12,
            start: 32,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: TOTAL_CREDIT_AMOUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,12}$"),
            width: 12,
            start: 44,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: RESERVED,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^ {0,39}$"),
            width: 39,
            start: 56,
            padding: Padding::SpaceRight,
            fixed: None,
        },
    ],
    required: &[],
};

ach_record!(
    /// The trailing control record of one batch.
    BatchControl,
    &BATCH_CONTROL_SPEC
);

ach_record!(
    /// The trailing control record of a payment file.
    FileControl,
    &FILE_CONTROL_SPEC
);

/// Totals aggregated from a collection's children, feeding control record
/// construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub entry_and_addenda_count: u64,
    pub transit_sum: u64,
    pub debit_cents: u64,
    pub credit_cents: u64,
}

impl Totals {
    /// Low ten digits of the transit sum.
    pub fn entry_hash(&self) -> u64 {
        self.transit_sum % ENTRY_HASH_MODULUS
    }
}

impl BatchControl {
    /// Builds a batch control record from aggregated totals, carrying the
    /// service class, company ID, originating DFI ID and batch number over
    /// from the batch header.
    pub fn from_totals(header: &BatchHeader, totals: Totals) -> Result<Self, Error> {
        Ok(Self {
            record: Record::build(
                &BATCH_CONTROL_SPEC,
                vec![
                    (SERVICE_CLASS_CODE, header.service_class_code().into()),
                    (
                        ENTRY_AND_ADDENDA_COUNT,
                        totals.entry_and_addenda_count.to_string().into(),
                    ),
                    (ENTRY_HASH, totals.entry_hash().to_string().into()),
                    (TOTAL_DEBIT_AMOUNT, totals.debit_cents.to_string().into()),
                    (TOTAL_CREDIT_AMOUNT, totals.credit_cents.to_string().into()),
                    (COMPANY_ID, header.company_id().into()),
                    (ORIGINATING_DFI_ID, header.originating_dfi_id().into()),
                    (BATCH_NUMBER, header.batch_number().into()),
                ],
            )?,
        })
    }
}

impl FileControl {
    /// Builds a file control record from aggregated totals plus the batch
    /// count and the 10-line block count.
    pub fn from_totals(batch_count: u64, block_count: u64, totals: Totals) -> Result<Self, Error> {
        Ok(Self {
            record: Record::build(
                &FILE_CONTROL_SPEC,
                vec![
                    (BATCH_COUNT, batch_count.to_string().into()),
                    (BLOCK_COUNT, block_count.to_string().into()),
                    (
                        ENTRY_AND_ADDENDA_COUNT,
                        totals.entry_and_addenda_count.to_string().into(),
                    ),
                    (ENTRY_HASH, totals.entry_hash().to_string().into()),
                    (TOTAL_DEBIT_AMOUNT, totals.debit_cents.to_string().into()),
                    (TOTAL_CREDIT_AMOUNT, totals.credit_cents.to_string().into()),
                ],
            )?,
        })
    }
}
