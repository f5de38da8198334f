//! Addenda record (type code `7`): supplementary data carried by a single
//! entry detail record.
//!
//! Two layouts share the type code and are told apart by the two-character
//! addenda type code at offset 2: `98` is a notice of change, `99` a
//! return entry. Any other type code is a structural error.

use crate::error::{Error, StructuralError};
use crate::field::{FieldDef, FieldValue, Inclusion, Padding, Validator};
use crate::record::{Record, RecordSpec};
use std::fmt;

pub const RECORD_TYPE_CODE: &str = "RECORD_TYPE_CODE";
pub const ADDENDA_TYPE_CODE: &str = "ADDENDA_TYPE_CODE";
pub const CHANGE_CODE: &str = "CHANGE_CODE";
pub const RETURN_REASON_CODE: &str = "RETURN_REASON_CODE";
pub const ORIGINAL_ENTRY_TRACE_NUMBER: &str = "ORIGINAL_ENTRY_TRACE_NUMBER";
pub const DATE_OF_DEATH: &str = "DATE_OF_DEATH";
pub const RESERVED_A: &str = "RESERVED_A";
pub const RESERVED_B: &str = "RESERVED_B";
pub const ORIGINAL_RECEIVING_DFI_ID: &str = "ORIGINAL_RECEIVING_DFI_ID";
pub const CORRECTED_DATA: &str = "CORRECTED_DATA";
pub const ADDENDA_INFORMATION: &str = "ADDENDA_INFORMATION";
pub const TRACE_NUMBER: &str = "TRACE_NUMBER";

/// Addenda type code announcing a notice of change.
pub const NOTICE_OF_CHANGE_TYPE_CODE: &str = "98";
/// Addenda type code announcing a return entry.
pub const RETURN_ENTRY_TYPE_CODE: &str = "99";

pub static NOTICE_OF_CHANGE_SPEC: RecordSpec = RecordSpec {
    name: "notice of change addenda record",
    type_code: '7',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^7$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("7"),
        },
        FieldDef {
            name: ADDENDA_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^98$"),
            width: 2,
            start: 2,
            padding: Padding::None,
            fixed: Some("98"),
        },
        FieldDef {
            name: CHANGE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^C\d{2}$"),
            width: 3,
            start: 4,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: ORIGINAL_ENTRY_TRACE_NUMBER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,15}$"),
            width: 15,
            start: 7,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: RESERVED_A,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^ {0,6}$"),
            width: 6,
            start: 22,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: ORIGINAL_RECEIVING_DFI_ID,
            inclusion: Inclusion::Required,
            validator: Validator::Pattern(r"^\d{8}$"),
            width: 8,
            start: 28,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: CORRECTED_DATA,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[-a-zA-Z0-9 ]{1,29}$"),
            width: 29,
            start: 36,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: RESERVED_B,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^ {0,15}$"),
            width: 15,
            start: 65,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: TRACE_NUMBER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,15}$"),
            width: 15,
            start: 80,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
    ],
    required: &[
        CHANGE_CODE,
        ORIGINAL_ENTRY_TRACE_NUMBER,
        ORIGINAL_RECEIVING_DFI_ID,
        TRACE_NUMBER,
    ],
};

pub static RETURN_ENTRY_SPEC: RecordSpec = RecordSpec {
    name: "return entry addenda record",
    type_code: '7',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^7$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("7"),
        },
        FieldDef {
            name: ADDENDA_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^99$"),
            width: 2,
            start: 2,
            padding: Padding::None,
            fixed: Some("99"),
        },
        FieldDef {
            name: RETURN_REASON_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^R\d{2}$"),
            width: 3,
            start: 4,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: ORIGINAL_ENTRY_TRACE_NUMBER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,15}$"),
            width: 15,
            start: 7,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: DATE_OF_DEATH,
            inclusion: Inclusion::Optional,
            validator: Validator::Date("%y%m%d"),
            width: 6,
            start: 22,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: ORIGINAL_RECEIVING_DFI_ID,
            inclusion: Inclusion::Required,
            validator: Validator::Pattern(r"^\d{8}$"),
            width: 8,
            start: 28,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: ADDENDA_INFORMATION,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[-a-zA-Z0-9 ]{1,44}$"),
            width: 44,
            start: 36,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: TRACE_NUMBER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,15}$"),
            width: 15,
            start: 80,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
    ],
    required: &[
        RETURN_REASON_CODE,
        ORIGINAL_ENTRY_TRACE_NUMBER,
        ORIGINAL_RECEIVING_DFI_ID,
        TRACE_NUMBER,
    ],
};

/// The closed set of supported addenda layouts.
#[derive(Debug, Clone)]
pub enum Addenda {
    NoticeOfChange(Record),
    ReturnEntry(Record),
}

impl Addenda {
    /// Builds a notice-of-change addenda from named field values.
    pub fn new_notice_of_change(fields: Vec<(&'static str, FieldValue)>) -> Result<Self, Error> {
        Ok(Addenda::NoticeOfChange(Record::build(
            &NOTICE_OF_CHANGE_SPEC,
            fields,
        )?))
    }

    /// Builds a return-entry addenda from named field values.
    pub fn new_return_entry(fields: Vec<(&'static str, FieldValue)>) -> Result<Self, Error> {
        Ok(Addenda::ReturnEntry(Record::build(
            &RETURN_ENTRY_SPEC,
            fields,
        )?))
    }

    /// Reconstructs an addenda from a serialized 94-character line,
    /// dispatching on the addenda type code at offset 2.
    pub fn from_line(line: &str) -> Result<Self, StructuralError> {
        match line.get(1..3) {
            Some(NOTICE_OF_CHANGE_TYPE_CODE) => Ok(Addenda::NoticeOfChange(Record::from_line(
                &NOTICE_OF_CHANGE_SPEC,
                line,
            )?)),
            Some(RETURN_ENTRY_TYPE_CODE) => Ok(Addenda::ReturnEntry(Record::from_line(
                &RETURN_ENTRY_SPEC,
                line,
            )?)),
            other => Err(StructuralError::UnknownAddendaType {
                code: other.unwrap_or("").to_string(),
            }),
        }
    }

    fn record(&self) -> &Record {
        match self {
            Addenda::NoticeOfChange(record) | Addenda::ReturnEntry(record) => record,
        }
    }

    /// Returns the padded content of a field by name.
    pub fn get(&self, name: &str) -> Result<&str, StructuralError> {
        self.record().get(name)
    }

    /// The two-character addenda type code.
    pub fn type_code(&self) -> &'static str {
        match self {
            Addenda::NoticeOfChange(_) => NOTICE_OF_CHANGE_TYPE_CODE,
            Addenda::ReturnEntry(_) => RETURN_ENTRY_TYPE_CODE,
        }
    }

    /// Serialized 94-character line for this record.
    pub fn to_line(&self) -> String {
        self.record().to_line()
    }
}

impl fmt::Display for Addenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
