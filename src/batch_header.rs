//! Batch header record (type code `5`): opens a batch and names the
//! originating company, the standard entry class and the effective date.

use crate::error::Error;
use crate::field::{FieldDef, FieldValue, Inclusion, Padding, Validator};
use crate::record::{ach_record, Record, RecordSpec};

pub const RECORD_TYPE_CODE: &str = "RECORD_TYPE_CODE";
pub const SERVICE_CLASS_CODE: &str = "SERVICE_CLASS_CODE";
pub const COMPANY_NAME: &str = "COMPANY_NAME";
pub const DISCRETIONARY_DATA: &str = "DISCRETIONARY_DATA";
pub const COMPANY_ID: &str = "COMPANY_ID";
pub const STANDARD_ENTRY_CLASS_CODE: &str = "STANDARD_ENTRY_CLASS_CODE";
pub const COMPANY_ENTRY_DESCRIPTION: &str = "COMPANY_ENTRY_DESCRIPTION";
pub const COMPANY_DESCRIPTIVE_DATE: &str = "COMPANY_DESCRIPTIVE_DATE";
pub const EFFECTIVE_ENTRY_DATE: &str = "EFFECTIVE_ENTRY_DATE";
pub const SETTLEMENT_DATE: &str = "SETTLEMENT_DATE";
pub const ORIGINATOR_STATUS_CODE: &str = "ORIGINATOR_STATUS_CODE";
pub const ORIGINATING_DFI_ID: &str = "ORIGINATING_DFI_ID";
pub const BATCH_NUMBER: &str = "BATCH_NUMBER";

/// Pseudo-field consumed by [`BatchHeader::new`]: a timestamp overriding
/// the effective entry date, which otherwise defaults to now.
pub const ENTRY_DATE_OVERRIDE: &str = "ENTRY_DATE_OVERRIDE";

/// Batch contains both debit and credit entries.
pub const MIXED_SERVICE_CLASS: &str = "200";
/// Batch contains credit entries only.
pub const CREDIT_SERVICE_CLASS: &str = "220";
/// Batch contains debit entries only.
pub const DEBIT_SERVICE_CLASS: &str = "225";

/// Prearranged payment and deposit (consumer).
pub const SEC_PPD: &str = "PPD";
/// Corporate credit or debit.
pub const SEC_CCD: &str = "CCD";
/// Notification of change.
pub const SEC_COR: &str = "COR";
/// Internet-initiated entry.
pub const SEC_WEB: &str = "WEB";

pub static SPEC: RecordSpec = RecordSpec {
    name: "batch header record",
    type_code: '5',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^5$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("5"),
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
            name: COMPANY_NAME,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{1,16}$"),
            width: 16,
            start: 5,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: DISCRETIONARY_DATA,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{0,20}$"),
            width: 20,
            start: 21,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: COMPANY_ID,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{10}$"),
            width: 10,
            start: 41,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: STANDARD_ENTRY_CLASS_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^[a-zA-Z]{3}$"),
            width: 3,
            start: 51,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: COMPANY_ENTRY_DESCRIPTION,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{1,10}$"),
            width: 10,
            start: 54,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: COMPANY_DESCRIPTIVE_DATE,
            inclusion: Inclusion::Optional,
            validator: Validator::Date("%y%m%d"),
            width: 6,
            start: 64,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: EFFECTIVE_ENTRY_DATE,
            inclusion: Inclusion::Required,
            validator: Validator::Date("%y%m%d"),
            width: 6,
            start: 70,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: SETTLEMENT_DATE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^ {3}$"),
            width: 3,
            start: 76,
            padding: Padding::None,
            fixed: Some("   "),
        },
        FieldDef {
            name: ORIGINATOR_STATUS_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^1$"),
            width: 1,
            start: 79,
            padding: Padding::None,
            fixed: Some("1"),
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
    required: &[
        SERVICE_CLASS_CODE,
        COMPANY_NAME,
        COMPANY_ID,
        STANDARD_ENTRY_CLASS_CODE,
        COMPANY_ENTRY_DESCRIPTION,
        ORIGINATING_DFI_ID,
    ],
};

ach_record!(
    /// The header record of one batch.
    BatchHeader,
    &SPEC
);

impl BatchHeader {
    /// Builds a batch header from named field values.
    ///
    /// The effective entry date defaults to now and can be overridden with
    /// the pseudo-field [`ENTRY_DATE_OVERRIDE`]. The company descriptive
    /// date defaults to the effective entry date, discretionary data to
    /// blank and the batch number to `1`.
    pub fn new(fields: Vec<(&'static str, FieldValue)>) -> Result<Self, Error> {
        let mut entry_date = None;
        let mut rest = Vec::with_capacity(fields.len() + 3);
        for (name, value) in fields {
            match (name, value) {
                (ENTRY_DATE_OVERRIDE, FieldValue::Date(date)) => entry_date = Some(date),
                (ENTRY_DATE_OVERRIDE, other) => {
                    return Err(crate::error::ValidationError::DateFormat {
                        field: ENTRY_DATE_OVERRIDE,
                        value: other.into_text(),
                        format: "%y%m%d",
                    }
                    .into())
                }
                (COMPANY_DESCRIPTIVE_DATE, FieldValue::Date(date)) => {
                    rest.push((COMPANY_DESCRIPTIVE_DATE, date.format("%y%m%d").to_string().into()));
                }
                (name, value) => rest.push((name, value)),
            }
        }

        let effective = entry_date
            .unwrap_or_else(crate::field::now)
            .format("%y%m%d")
            .to_string();
        if !rest.iter().any(|(name, _)| *name == COMPANY_DESCRIPTIVE_DATE) {
            rest.push((COMPANY_DESCRIPTIVE_DATE, effective.clone().into()));
        }
        if !rest.iter().any(|(name, _)| *name == EFFECTIVE_ENTRY_DATE) {
            rest.push((EFFECTIVE_ENTRY_DATE, effective.into()));
        }
        if !rest.iter().any(|(name, _)| *name == DISCRETIONARY_DATA) {
            rest.push((DISCRETIONARY_DATA, "".into()));
        }
        if !rest.iter().any(|(name, _)| *name == BATCH_NUMBER) {
            rest.push((BATCH_NUMBER, "1".into()));
        }

        Ok(Self {
            record: Record::build(&SPEC, rest)?,
        })
    }

    pub fn service_class_code(&self) -> &str {
        self.record.content(SERVICE_CLASS_CODE)
    }

    pub fn company_id(&self) -> &str {
        self.record.content(COMPANY_ID)
    }

    pub fn originating_dfi_id(&self) -> &str {
        self.record.content(ORIGINATING_DFI_ID)
    }

    pub fn batch_number(&self) -> &str {
        self.record.content(BATCH_NUMBER)
    }
}
